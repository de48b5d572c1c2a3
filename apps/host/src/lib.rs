//! # Canopy Host
//!
//! Boots every configured tenant into a shell context: running tenants get the full baseline,
//! uninitialized tenants a setup shell, disabled tenants nothing.
//!
//! ## Example
//! ```no_run
//! use canopy_host::Host;
//!
//! fn main() -> anyhow::Result<()> {
//!     Host::builder().build()?.run()
//! }
//! ```

pub mod composition;
pub mod scopes;

use crate::composition::{FeatureBlueprint, FeatureCatalog};
use crate::scopes::{CatalogScopes, SetupWizard};
use anyhow::{Context, Result};
use canopy_kernel::baseline::ConfiguredBaseline;
use canopy_kernel::domain::config::HostConfig;
use canopy_kernel::domain::tenant::{BootstrapMode, TenantSettings};
use canopy_kernel::scope::{ResolutionScope, ResolutionScopeExt, ServiceScope};
use canopy_kernel::shell::{SetupContext, ShellContext, ShellContextFactory, ShellError};
use tracing::{debug, info, warn};

type HostFactory = ShellContextFactory<FeatureCatalog, CatalogScopes>;

/// A tenant that made it through bootstrap.
#[derive(Debug)]
pub enum Bootstrapped {
    Normal(ShellContext<FeatureBlueprint, ServiceScope>),
    Setup(SetupContext<FeatureBlueprint, ServiceScope>),
}

impl Bootstrapped {
    #[must_use]
    pub fn tenant(&self) -> &str {
        match self {
            Self::Normal(context) => context.tenant(),
            Self::Setup(context) => context.tenant(),
        }
    }

    /// Activates the shell, or reports a setup shell that has none.
    pub fn activate(&self) {
        match self {
            Self::Normal(context) => context.shell.activate(),
            Self::Setup(context) => match &context.shell {
                Some(shell) => shell.activate(),
                None => {
                    let steps = setup_steps(context.tenant(), &context.lifetime_scope);
                    info!(tenant = %context.tenant(), steps, "Setup shell waiting for first-time setup");
                },
            },
        }
    }

    pub fn terminate(&self) {
        match self {
            Self::Normal(context) => context.shell.terminate(),
            Self::Setup(context) => {
                if let Some(shell) = &context.shell {
                    shell.terminate();
                }
            },
        }
    }
}

/// Number of setup steps the scope's wizard offers. A wizard that cannot be resolved counts as
/// none.
fn setup_steps<S: ResolutionScope>(tenant: &str, scope: &S) -> usize {
    let wizard = scope.get_service::<SetupWizard>().unwrap_or_else(|err| {
        debug!(tenant, error = %err, "Setup wizard is not usable");
        None
    });
    wizard.map_or(0, |wizard| wizard.steps.len())
}

/// Outcome of bootstrapping every configured tenant.
#[derive(Debug, Default)]
pub struct BootReport {
    pub started: Vec<Bootstrapped>,
    /// Names of tenants whose shell context could not be created.
    pub failed: Vec<String>,
}

/// A fluent builder for configuring the [`Host`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct HostBuilder {
    cfg: HostConfig,
    catalog: Option<FeatureCatalog>,
}

impl HostBuilder {
    pub fn config(mut self, cfg: HostConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn tenant(mut self, settings: TenantSettings) -> Self {
        self.cfg.tenants.push(settings);
        self
    }

    /// Replaces the default feature catalog.
    pub fn catalog(mut self, catalog: FeatureCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validates the baseline and assembles the coordinator.
    ///
    /// # Errors
    /// Returns an error if the configured baseline is invalid.
    pub fn build(self) -> Result<Host> {
        let baseline = ConfiguredBaseline::new(&self.cfg.baseline)
            .context("Critical: Baseline configuration is invalid")?;

        info!(tenants = self.cfg.tenants.len(), "Host configured");

        Ok(Host {
            factory: ShellContextFactory::new(
                self.catalog.unwrap_or_default(),
                CatalogScopes,
                baseline,
            ),
            cfg: self.cfg,
        })
    }
}

#[derive(Debug)]
pub struct Host {
    cfg: HostConfig,
    factory: HostFactory,
}

impl Host {
    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    /// Builds the shell context `settings` calls for. Disabled tenants yield `None`.
    ///
    /// # Errors
    /// Propagates the coordinator's [`ShellError`].
    pub fn bootstrap(&self, settings: &TenantSettings) -> Result<Option<Bootstrapped>, ShellError> {
        match settings.state.bootstrap_mode() {
            Some(BootstrapMode::Normal) => {
                self.factory.create_shell_context(settings).map(Bootstrapped::Normal).map(Some)
            },
            Some(BootstrapMode::Setup) => {
                self.factory.create_setup_context(settings).map(Bootstrapped::Setup).map(Some)
            },
            None => {
                info!(tenant = %settings.name, state = %settings.state, "Tenant skipped");
                Ok(None)
            },
        }
    }

    /// Bootstraps every configured tenant. A failing tenant does not stop the others.
    pub fn bootstrap_all(&self) -> BootReport {
        let mut report = BootReport::default();
        for settings in &self.cfg.tenants {
            match self.bootstrap(settings) {
                Ok(Some(context)) => report.started.push(context),
                Ok(None) => {},
                Err(err) => {
                    warn!(tenant = %settings.name, error = %err, "Tenant not started");
                    report.failed.push(settings.name.clone());
                },
            }
        }
        report
    }

    /// Bootstraps and activates all tenants, then shuts them down in reverse order.
    ///
    /// # Errors
    /// Returns an error naming the tenants that could not be started.
    pub fn run(self) -> Result<()> {
        let report = self.bootstrap_all();
        for context in &report.started {
            context.activate();
        }

        info!(
            started = report.started.len(),
            failed = report.failed.len(),
            configured = self.cfg.tenants.len(),
            "Tenants bootstrapped"
        );

        for context in report.started.iter().rev() {
            context.terminate();
        }

        if !report.failed.is_empty() {
            anyhow::bail!("Tenants failed to start: {}", report.failed.join(", "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scopes::{SETUP_STEPS, SetupWizardInner};
    use canopy_kernel::scope::{ResolveError, ServiceInstance, ServiceKind};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::{Context as LayerContext, Layer, SubscriberExt};

    #[derive(Debug)]
    struct BrokenWizard;

    impl ResolutionScope for BrokenWizard {
        fn resolve(&self, kind: ServiceKind) -> Result<Option<ServiceInstance>, ResolveError> {
            Err(ResolveError::Construction {
                source: "wizard storage offline".into(),
                context: Some(kind.name().into()),
            })
        }
    }

    #[derive(Clone, Default)]
    struct DebugLines(Arc<Mutex<Vec<(Level, String)>>>);

    struct Line<'a>(&'a mut String);

    impl Visit for Line<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={value:?} ", field.name()));
        }
    }

    impl<S: Subscriber> Layer<S> for DebugLines {
        fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
            let mut line = String::new();
            event.record(&mut Line(&mut line));
            self.0.lock().push((*event.metadata().level(), line));
        }
    }

    #[test]
    fn test_registered_wizard_reports_its_steps() {
        let scope = ServiceScope::builder()
            .register(SetupWizard::new(SetupWizardInner {
                tenant: "newco".to_owned(),
                steps: SETUP_STEPS,
            }))
            .build();

        assert_eq!(setup_steps("newco", &scope), SETUP_STEPS.len());
        assert_eq!(setup_steps("newco", &ServiceScope::default()), 0);
    }

    #[test]
    fn test_unusable_wizard_is_logged_at_debug() {
        let lines = DebugLines::default();
        let subscriber = Registry::default().with(lines.clone());

        let steps =
            tracing::subscriber::with_default(subscriber, || setup_steps("newco", &BrokenWizard));

        assert_eq!(steps, 0);
        let recorded = lines.0.lock();
        let (level, line) = recorded.first().expect("one record");
        assert_eq!(*level, Level::DEBUG);
        assert!(line.contains("Setup wizard is not usable"), "{line}");
        assert!(line.contains("wizard storage offline"), "{line}");
        assert!(line.contains("newco"), "{line}");
    }
}
