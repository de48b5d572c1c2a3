//! Common imports for hosts, composition strategies and scope factories.

pub use crate::BoxError;
pub use crate::baseline::{BaselineDescriptorProvider, ConfiguredBaseline};
pub use crate::composition::{CompositionStrategy, ScopeFactory};
pub use crate::scope::{
    ResolutionScope, ResolutionScopeExt, ResolveError, ScopedService, ServiceInstance, ServiceKind,
    ServiceScope,
};
pub use crate::shell::{
    SetupContext, Shell, ShellContext, ShellContextFactory, ShellError, ShellHandle,
};
pub use canopy_domain::descriptor::{ShellDescriptor, ShellFeature, ShellParameter};
pub use canopy_domain::tenant::{BootstrapMode, TenantSettings, TenantState};
