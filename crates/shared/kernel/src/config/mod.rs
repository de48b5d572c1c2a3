use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Default configuration file stem, resolved against the working directory.
const DEFAULT_CONFIG: &str = "host";

/// Custom error type for config loading.
#[canopy_derive::canopy_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file with environment overrides layered on top.
///
/// 1. **Base File**: an explicit `path` must exist. Without one, `host.{toml,yaml,json,..}` in
///    the working directory is used when present.
/// 2. **Environment Overrides**: variables prefixed with `CANOPY` and nested with double
///    underscores, e.g. `CANOPY__LOGGING__LEVEL=debug` maps to `logging.level`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is malformed, or the
/// merged values do not match `T`.
///
/// # Example
/// ```rust
/// use canopy_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(path) => File::from(path.as_ref()).required(true),
        None => File::with_name(DEFAULT_CONFIG).required(false),
    };

    let builder = Config::builder().add_source(file).add_source(
        Environment::with_prefix("CANOPY").separator("__").convert_case(config::Case::Snake),
    );

    match &path {
        Some(path) => info!("Loading config from {}", path.as_ref().display()),
        None => info!("Loading config from {DEFAULT_CONFIG} (optional)"),
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
