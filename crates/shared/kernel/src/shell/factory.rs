use crate::baseline::{BaselineDescriptorProvider, ConfiguredBaseline};
use crate::composition::{CompositionStrategy, ScopeFactory};
use crate::scope::{ResolutionScopeExt, ServiceKind};
use crate::shell::{SetupContext, ShellContext, ShellError, ShellHandle};
use canopy_domain::descriptor::ShellDescriptor;
use canopy_domain::tenant::TenantSettings;
use tracing::{debug, error, info};

/// High-level coordinator that builds every artifact of a tenant shell.
///
/// Holds no mutable state. It can be shared across threads and used concurrently for distinct
/// tenants, or repeatedly for the same tenant on reload; every call composes a fresh blueprint
/// and a fresh scope.
#[derive(Debug)]
pub struct ShellContextFactory<C, F, P = ConfiguredBaseline> {
    composition: C,
    scopes: F,
    baseline: P,
}

impl<C, F> ShellContextFactory<C, F>
where
    C: CompositionStrategy,
    F: ScopeFactory<C::Blueprint>,
{
    /// Coordinator over the default baseline.
    pub fn with_default_baseline(composition: C, scopes: F) -> Self {
        Self::new(composition, scopes, ConfiguredBaseline::default())
    }
}

impl<C, F, P> ShellContextFactory<C, F, P>
where
    C: CompositionStrategy,
    F: ScopeFactory<C::Blueprint>,
    P: BaselineDescriptorProvider,
{
    pub const fn new(composition: C, scopes: F, baseline: P) -> Self {
        Self { composition, scopes, baseline }
    }

    /// Builds the shell of an operational tenant from the mandatory baseline.
    ///
    /// The top-level [`ShellHandle`] is required. Every failure is logged once at error level
    /// with the tenant and descriptor, then returned as is.
    ///
    /// # Errors
    /// * [`ShellError::Composition`] if the strategy rejects the baseline descriptor.
    /// * [`ShellError::ScopeCreation`] if the scope factory fails.
    /// * [`ShellError::MandatoryServiceMissing`] if the scope does not yield a shell. The scope
    ///   is released before this error is returned.
    pub fn create_shell_context(
        &self,
        settings: &TenantSettings,
    ) -> Result<ShellContext<C::Blueprint, F::Scope>, ShellError> {
        info!(tenant = %settings.name, "Creating shell context");

        let descriptor = self.baseline.shell_descriptor();

        let result = self.realize(settings, &descriptor).and_then(|(blueprint, scope)| {
            let shell = match scope.get_service::<ShellHandle>() {
                Ok(Some(shell)) => shell,
                Ok(None) => return Err(missing_shell(None)),
                Err(cause) => return Err(missing_shell(Some(cause))),
            };
            Ok(ShellContext::new(settings.clone(), blueprint, scope, shell))
        });

        if let Err(err) = &result {
            error!(
                tenant = %settings.name,
                serial = descriptor.serial_number,
                features = ?descriptor.feature_names().collect::<Vec<_>>(),
                error = %err,
                "Cannot create shell context"
            );
        }

        result
    }

    /// Builds a reduced shell that can only run first-time setup.
    ///
    /// The top-level [`ShellHandle`] is optional here: when the setup capabilities do not provide
    /// one, the context is returned with an empty shell slot.
    ///
    /// # Errors
    /// * [`ShellError::Composition`] if the strategy rejects the setup descriptor.
    /// * [`ShellError::ScopeCreation`] if the scope factory fails.
    pub fn create_setup_context(
        &self,
        settings: &TenantSettings,
    ) -> Result<SetupContext<C::Blueprint, F::Scope>, ShellError> {
        debug!("No tenant configuration available, creating shell context for setup");

        let descriptor = self.baseline.setup_descriptor();
        let (blueprint, scope) = self.realize(settings, &descriptor)?;

        let shell = scope.get_service::<ShellHandle>().unwrap_or_else(|err| {
            debug!(tenant = %settings.name, error = %err, "Setup shell has no usable top-level service");
            None
        });

        Ok(ShellContext::new(settings.clone(), blueprint, scope, shell))
    }

    /// Composes `descriptor` and realizes the blueprint, strictly in that order.
    fn realize(
        &self,
        settings: &TenantSettings,
        descriptor: &ShellDescriptor,
    ) -> Result<(C::Blueprint, F::Scope), ShellError> {
        let blueprint = self
            .composition
            .compose(settings, descriptor)
            .map_err(|source| ShellError::Composition { source, context: None })?;

        let scope = self
            .scopes
            .create_scope(settings, &blueprint)
            .map_err(|source| ShellError::ScopeCreation { source, context: None })?;

        Ok((blueprint, scope))
    }
}

fn missing_shell(cause: Option<crate::scope::ResolveError>) -> ShellError {
    ShellError::MandatoryServiceMissing {
        service: ServiceKind::of::<ShellHandle>().name().into(),
        cause,
        context: None,
    }
}
