//! Contracts of the external collaborators the coordinator orchestrates.

use crate::BoxError;
use crate::scope::ResolutionScope;
use canopy_domain::descriptor::ShellDescriptor;
use canopy_domain::tenant::TenantSettings;
use std::fmt::Debug;
use std::sync::Arc;

/// Turns a descriptor into a dependency blueprint.
///
/// Must be deterministic for equivalent inputs and must not retain or mutate the settings.
pub trait CompositionStrategy: Send + Sync {
    /// Composed, ready-to-instantiate form of a descriptor. Opaque to the coordinator.
    type Blueprint: Debug + Send + Sync;

    /// # Errors
    /// Fails when capability declarations are unresolvable or conflicting.
    fn compose(
        &self,
        settings: &TenantSettings,
        descriptor: &ShellDescriptor,
    ) -> Result<Self::Blueprint, BoxError>;
}

/// Realizes a blueprint into an isolated resolution scope.
pub trait ScopeFactory<B>: Send + Sync {
    type Scope: ResolutionScope;

    /// # Errors
    /// Fails when the blueprint cannot be instantiated.
    fn create_scope(&self, settings: &TenantSettings, blueprint: &B) -> Result<Self::Scope, BoxError>;
}

impl<C: CompositionStrategy + ?Sized> CompositionStrategy for Arc<C> {
    type Blueprint = C::Blueprint;

    fn compose(
        &self,
        settings: &TenantSettings,
        descriptor: &ShellDescriptor,
    ) -> Result<Self::Blueprint, BoxError> {
        (**self).compose(settings, descriptor)
    }
}

impl<B, F: ScopeFactory<B> + ?Sized> ScopeFactory<B> for Arc<F> {
    type Scope = F::Scope;

    fn create_scope(&self, settings: &TenantSettings, blueprint: &B) -> Result<Self::Scope, BoxError> {
        (**self).create_scope(settings, blueprint)
    }
}
