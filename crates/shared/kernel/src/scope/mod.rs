//! Resolution scopes: isolated, tenant-bound containers that hand out service instances.
//!
//! The dependency-injection engine behind a scope is not part of the kernel. Scope factories
//! implement [`ResolutionScope`] however they like; [`ServiceScope`] is a ready-made, map-backed
//! implementation for factories that build their services eagerly.

mod error;

pub use crate::scope::error::{ResolveError, ResolveErrorExt};

use fxhash::FxHashMap;
use std::any::{Any, TypeId, type_name};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A resolved, type-erased service instance.
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Marker trait for services that can live in a resolution scope.
///
/// Implemented by handles generated with `#[canopy_derive::shell_service]`.
pub trait ScopedService: Any + Debug + Send + Sync {}

/// Identifies a kind of service inside a scope.
#[derive(Clone, Copy)]
pub struct ServiceKind {
    id: TypeId,
    name: &'static str,
}

impl ServiceKind {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Type name, for diagnostics only.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKind {}

impl std::hash::Hash for ServiceKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An isolated, tenant-scoped handle capable of producing service instances.
///
/// A scope is owned by exactly one shell context. Dropping it releases everything it holds.
pub trait ResolutionScope: Debug + Send + Sync {
    /// Resolves an instance of `kind`, or `None` when the scope does not provide it.
    ///
    /// # Errors
    /// Returns [`ResolveError`] when the scope provides `kind` but cannot produce it.
    fn resolve(&self, kind: ServiceKind) -> Result<Option<ServiceInstance>, ResolveError>;
}

/// Typed lookups on top of [`ResolutionScope::resolve`].
pub trait ResolutionScopeExt: ResolutionScope {
    /// Resolves `T` if the scope provides it.
    ///
    /// # Errors
    /// Propagates resolution failures and reports instances of an unexpected type as
    /// [`ResolveError::TypeMismatch`].
    fn get_service<T: ScopedService + Clone>(&self) -> Result<Option<T>, ResolveError> {
        let Some(instance) = self.resolve(ServiceKind::of::<T>())? else {
            return Ok(None);
        };

        instance.downcast_ref::<T>().cloned().map(Some).ok_or_else(|| ResolveError::TypeMismatch {
            message: type_name::<T>().into(),
            context: Some("Registered instance has a different type".into()),
        })
    }

    /// Resolves `T`, treating absence as an error.
    ///
    /// # Errors
    /// Returns [`ResolveError::Missing`] when the scope does not provide `T`, in addition to the
    /// failures of [`ResolutionScopeExt::get_service`].
    fn get_required_service<T: ScopedService + Clone>(&self) -> Result<T, ResolveError> {
        self.get_service::<T>()?.ok_or_else(|| ResolveError::Missing {
            message: type_name::<T>().into(),
            context: None,
        })
    }
}

impl<S: ResolutionScope + ?Sized> ResolutionScopeExt for S {}

impl<S: ResolutionScope + ?Sized> ResolutionScope for Box<S> {
    fn resolve(&self, kind: ServiceKind) -> Result<Option<ServiceInstance>, ResolveError> {
        (**self).resolve(kind)
    }
}

/// Map-backed scope with eagerly registered instances.
#[derive(Default)]
pub struct ServiceScope {
    services: FxHashMap<ServiceKind, ServiceInstance>,
}

impl ServiceScope {
    #[must_use]
    pub fn builder() -> ServiceScopeBuilder {
        ServiceScopeBuilder::default()
    }

    /// Registered service kinds (for diagnostics).
    pub fn kinds(&self) -> impl Iterator<Item = &ServiceKind> {
        self.services.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.services.keys()).finish()
    }
}

impl ResolutionScope for ServiceScope {
    fn resolve(&self, kind: ServiceKind) -> Result<Option<ServiceInstance>, ResolveError> {
        Ok(self.services.get(&kind).cloned())
    }
}

#[derive(Debug, Default)]
pub struct ServiceScopeBuilder {
    scope: ServiceScope,
}

impl ServiceScopeBuilder {
    /// Registers `service` under its own type. A later registration of the same type wins.
    #[must_use]
    pub fn register<T: ScopedService>(mut self, service: T) -> Self {
        self.scope.services.insert(ServiceKind::of::<T>(), Arc::new(service));
        self
    }

    /// Registers multiple services of one type; the last one wins.
    #[must_use]
    pub fn register_all<T, I>(self, services: I) -> Self
    where
        T: ScopedService,
        I: IntoIterator<Item = T>,
    {
        services.into_iter().fold(self, Self::register)
    }

    #[must_use]
    pub fn build(self) -> ServiceScope {
        self.scope
    }
}
