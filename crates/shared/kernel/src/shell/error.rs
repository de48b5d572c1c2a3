use crate::scope::ResolveError;
use std::borrow::Cow;

/// Why a shell context could not be created.
#[canopy_derive::canopy_error]
pub enum ShellError {
    /// The descriptor could not be composed into a blueprint. Carries the strategy's error.
    #[error("Shell composition failed{}: {source}", format_context(.context))]
    Composition {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        context: Option<Cow<'static, str>>,
    },

    /// The blueprint could not be realized into a resolution scope. Carries the factory's error.
    #[error("Resolution scope creation failed{}: {source}", format_context(.context))]
    ScopeCreation {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        context: Option<Cow<'static, str>>,
    },

    /// The scope was built but does not yield the top-level shell service.
    #[error("Mandatory service missing{}: {service}", format_context(.context))]
    MandatoryServiceMissing {
        service: Cow<'static, str>,
        #[source]
        cause: Option<ResolveError>,
        context: Option<Cow<'static, str>>,
    },
}
