//! Shell contexts and the coordinator that assembles them.

mod context;
mod error;
mod factory;

pub use crate::shell::context::{SetupContext, ShellContext};
pub use crate::shell::error::{ShellError, ShellErrorExt};
pub use crate::shell::factory::ShellContextFactory;

use crate::scope::ScopedService;
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

/// The top-level runtime service of a tenant shell.
pub trait Shell: Debug + Send + Sync {
    /// Starts serving the tenant.
    fn activate(&self);

    /// Stops serving the tenant. Called before the shell context is released.
    fn terminate(&self);
}

/// Scope registration of the top-level [`Shell`].
///
/// Scope factories register a `ShellHandle` to make a scope usable as a running shell.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    inner: Arc<dyn Shell>,
}

impl ShellHandle {
    pub fn new<S: Shell + 'static>(shell: S) -> Self {
        Self { inner: Arc::new(shell) }
    }

    #[must_use]
    pub fn from_arc(shell: Arc<dyn Shell>) -> Self {
        Self { inner: shell }
    }

    /// Whether both handles point at the same shell instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for ShellHandle {
    type Target = dyn Shell;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ScopedService for ShellHandle {}
