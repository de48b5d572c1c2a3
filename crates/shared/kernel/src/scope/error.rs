use std::borrow::Cow;

/// Failures while resolving a service from a [`super::ResolutionScope`].
#[canopy_derive::canopy_error]
pub enum ResolveError {
    /// The registered instance is not of the requested type.
    #[error("Service type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A required service is not registered in the scope.
    #[error("Service not registered{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The scope knows the service but could not produce an instance.
    #[error("Service construction failed{}: {source}", format_context(.context))]
    Construction {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        context: Option<Cow<'static, str>>,
    },
}
