use canopy_derive::canopy_error;
use std::borrow::Cow;

#[canopy_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk full")).context("Loading tenants")
}

fn convert() -> Result<(), DemoError> {
    let failed: Result<(), std::io::Error> = Err(std::io::Error::other("gone"));
    failed?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Loading tenants): disk full");

    let err = convert().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: None, .. }));

    let err: DemoError = "broken invariant".into();
    assert_eq!(err.to_string(), "Internal error: broken invariant");

    let err = Err::<(), _>(err).context("while testing").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (while testing): broken invariant");
}
