use crate::shell::ShellHandle;
use canopy_domain::tenant::TenantSettings;

/// A fully assembled, tenant-scoped runtime.
///
/// Owns the resolution scope it was built with; dropping the context releases the scope.
/// `H` is the shell slot: a [`ShellHandle`] for operational tenants, an optional one for
/// [`SetupContext`].
#[derive(Debug)]
pub struct ShellContext<B, S, H = ShellHandle> {
    /// Unique per created context, for diagnostics.
    pub id: String,
    pub settings: TenantSettings,
    // Field order matters: the shell is dropped before the scope that produced it.
    pub shell: H,
    pub blueprint: B,
    pub lifetime_scope: S,
}

/// Context of a tenant in setup mode. The top-level shell may be absent.
pub type SetupContext<B, S> = ShellContext<B, S, Option<ShellHandle>>;

impl<B, S, H> ShellContext<B, S, H> {
    pub(crate) fn new(settings: TenantSettings, blueprint: B, lifetime_scope: S, shell: H) -> Self {
        Self { id: crate::safe_nanoid!(), settings, shell, blueprint, lifetime_scope }
    }

    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.settings.name
    }
}

impl<B, S> SetupContext<B, S> {
    /// Whether the setup shell came up without a top-level service.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.shell.is_none()
    }
}
