//! Eager scope realization: every feature in a blueprint maps to the services it contributes.

use crate::composition::FeatureBlueprint;
use canopy_domain::constants::{HOSTING, SETTINGS, SETUP};
use canopy_kernel::BoxError;
use canopy_kernel::composition::ScopeFactory;
use canopy_kernel::domain::tenant::TenantSettings;
use canopy_kernel::scope::ServiceScope;
use canopy_kernel::shell::{Shell, ShellHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Steps a freshly created tenant walks through before it can run.
pub const SETUP_STEPS: &[&str] = &["tenant-settings", "administrator", "features"];

/// Guides an uninitialized tenant through first-time setup.
#[canopy_derive::shell_service]
pub struct SetupWizard {
    pub tenant: String,
    pub steps: &'static [&'static str],
}

/// Read-only view of the tenant settings a shell was built for.
#[canopy_derive::shell_service]
pub struct SettingsService {
    pub settings: TenantSettings,
}

/// Top-level shell contributed by the hosting feature.
#[derive(Debug)]
pub struct TenantShell {
    tenant: String,
    active: AtomicBool,
}

impl TenantShell {
    #[must_use]
    pub fn new(tenant: impl Into<String>) -> Self {
        Self { tenant: tenant.into(), active: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Shell for TenantShell {
    fn activate(&self) {
        if !self.active.swap(true, Ordering::AcqRel) {
            info!(tenant = %self.tenant, "Shell activated");
        }
    }

    fn terminate(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            info!(tenant = %self.tenant, "Shell terminated");
        }
    }
}

/// Builds a [`ServiceScope`] from the catalog features of a blueprint.
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogScopes;

impl ScopeFactory<FeatureBlueprint> for CatalogScopes {
    type Scope = ServiceScope;

    fn create_scope(
        &self,
        settings: &TenantSettings,
        blueprint: &FeatureBlueprint,
    ) -> Result<Self::Scope, BoxError> {
        let mut builder = ServiceScope::builder();

        if blueprint.has(SETTINGS) {
            builder = builder.register(SettingsService::new(SettingsServiceInner {
                settings: settings.clone(),
            }));
        }
        if blueprint.has(SETUP) {
            builder = builder.register(SetupWizard::new(SetupWizardInner {
                tenant: settings.name.clone(),
                steps: SETUP_STEPS,
            }));
        }
        if blueprint.has(HOSTING) {
            builder = builder.register(ShellHandle::new(TenantShell::new(&settings.name)));
        }

        let scope = builder.build();
        debug!(tenant = %settings.name, services = scope.len(), "Scope realized");
        Ok(scope)
    }
}
