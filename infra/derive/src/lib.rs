#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Canopy crates.
//!
//! * [`macro@canopy_error`] turns an enum into a context-carrying `thiserror` error.
//! * [`macro@shell_service`] turns a struct into a cheaply clonable service handle that can be
//!   registered in a resolution scope.
//!
//! Examples are `ignore`d here because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every plain source type.
/// * **Conversions**: Implements `From<Source>` for variants with a plain `source` field, so `?`
///   works on upstream errors. Boxed (`Box<..>`) and optional (`Option<..>`) sources are skipped,
///   as are fields marked `#[from]` (those are left to `thiserror`).
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal` variant
///   with a `message` field is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** whose variants all have **named fields**.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[canopy_derive::canopy_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<String, StoreError> {
///     std::fs::read_to_string("tenants.toml").context("Reading tenant list")
/// }
/// ```
#[proc_macro_attribute]
pub fn canopy_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Attribute macro to define a scoped service handle.
///
/// The annotated struct becomes `<Name>Inner`, and `<Name>` becomes an `Arc` wrapper with
/// `new`, `Deref` to the inner state and an implementation of
/// `canopy_kernel::scope::ScopedService`, which makes it registrable in a `ServiceScope`.
///
/// # Example
/// ```rust,ignore
/// #[canopy_derive::shell_service]
/// pub struct SetupWizard {
///     pub tenant: String,
/// }
///
/// let wizard = SetupWizard::new(SetupWizardInner { tenant: "acme".to_owned() });
/// let scope = ServiceScope::builder().register(wizard).build();
/// ```
#[proc_macro_attribute]
pub fn shell_service(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::service::expand(input).into()
}
