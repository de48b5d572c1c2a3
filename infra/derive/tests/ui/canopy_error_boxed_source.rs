use canopy_derive::canopy_error;
use std::borrow::Cow;
use std::error::Error as _;

#[canopy_error]
pub enum StageError {
    #[error("Stage failed{}: {source}", format_context(.context))]
    Stage {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Nothing resolved{}: {service}", format_context(.context))]
    Missing {
        service: Cow<'static, str>,
        #[source]
        cause: Option<std::fmt::Error>,
        context: Option<Cow<'static, str>>,
    },
}

fn main() {
    let err = StageError::Stage { source: Box::new(std::io::Error::other("disk full")), context: None };
    let source = err.source().and_then(|s| s.downcast_ref::<std::io::Error>());
    assert_eq!(source.map(ToString::to_string).as_deref(), Some("disk full"));

    let err = StageError::Missing { service: "shell".into(), cause: None, context: None };
    assert!(err.source().is_none());
    assert_eq!(err.to_string(), "Nothing resolved: shell");
}
