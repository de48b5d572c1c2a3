//! Well-known feature names used by the default baseline descriptors.

/// Console logging infrastructure.
pub const LOGGING_CONSOLE: &str = "canopy.logging.console";
/// Hosting glue that connects a shell to the request pipeline.
pub const HOSTING: &str = "canopy.hosting";
/// Per-tenant settings management.
pub const SETTINGS: &str = "canopy.settings";
/// First-run setup workflow.
pub const SETUP: &str = "canopy.setup";

/// Serial number of a descriptor that has never been persisted.
pub const TRANSIENT_SERIAL: i64 = -1;
