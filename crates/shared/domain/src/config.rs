use crate::constants::{HOSTING, LOGGING_CONSOLE, SETTINGS, SETUP};
use crate::tenant::TenantSettings;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level host configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfigInner {
    pub logging: LoggingConfig,
    pub baseline: BaselineConfig,
    pub tenants: Vec<TenantSettings>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct HostConfig {
    #[serde(flatten, default)]
    inner: Arc<HostConfigInner>,
}

impl Deref for HostConfig {
    type Target = HostConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for HostConfig {
    fn deref_mut(&mut self) -> &mut HostConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files. Disabled when absent.
    pub path: Option<PathBuf>,
    /// Writes file output as JSON lines. Requires `path`; console output is never JSON.
    pub json: bool,
    pub max_files: usize,
    /// Module-directed filter such as `canopy_kernel=debug`.
    pub filter: Option<String>,
}

/// Feature lists the baseline descriptors are assembled from.
///
/// The normal shell gets `shared` followed by `operational`; the setup shell gets `shared`
/// followed by `setup`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Infrastructure every shell carries, including setup shells.
    pub shared: Vec<String>,
    /// Mandatory capabilities of an operational tenant.
    pub operational: Vec<String>,
    /// Capabilities needed only to run first-time setup.
    pub setup: Vec<String>,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            max_files: 10,
            filter: None,
        }
    }
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            shared: vec![LOGGING_CONSOLE.to_owned()],
            operational: vec![HOSTING.to_owned(), SETTINGS.to_owned()],
            setup: vec![SETUP.to_owned()],
        }
    }
}
