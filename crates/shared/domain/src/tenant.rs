use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a tenant as recorded by the hosting layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantState {
    /// No usable configuration has been persisted yet.
    #[default]
    Uninitialized,
    Running,
    Disabled,
}

/// Which bootstrap path a tenant should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapMode {
    /// Full shell built from the mandatory baseline.
    Normal,
    /// Reduced shell that can only run first-time setup.
    Setup,
}

impl TenantState {
    /// Maps a tenant state to the bootstrap path the host should use.
    ///
    /// Disabled tenants get no shell at all.
    #[must_use]
    pub const fn bootstrap_mode(self) -> Option<BootstrapMode> {
        match self {
            Self::Uninitialized => Some(BootstrapMode::Setup),
            Self::Running => Some(BootstrapMode::Normal),
            Self::Disabled => None,
        }
    }
}

impl fmt::Display for TenantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Disabled => "disabled",
        })
    }
}

/// Identity and state of one tenant.
///
/// Owned by the hosting layer. Shell composition only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSettings {
    pub name: String,
    #[serde(default)]
    pub state: TenantState,
}

impl TenantSettings {
    #[must_use]
    pub fn new(name: impl Into<String>, state: TenantState) -> Self {
        Self { name: name.into(), state }
    }
}
