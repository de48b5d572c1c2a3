//! Baseline descriptors: what every operational shell and every setup shell is composed from.

use canopy_domain::config::BaselineConfig;
use canopy_domain::constants::{HOSTING, LOGGING_CONSOLE, SETTINGS, SETUP};
use canopy_domain::descriptor::{ShellDescriptor, ShellFeature};
use std::borrow::Cow;
use std::sync::Arc;

#[canopy_derive::canopy_error]
pub enum BaselineError {
    #[error("Baseline validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Supplies the descriptors the coordinator composes shells from.
pub trait BaselineDescriptorProvider: Send + Sync {
    /// Mandatory capability set of an operational tenant.
    fn shell_descriptor(&self) -> ShellDescriptor;

    /// Minimal capability set that can run first-time setup.
    fn setup_descriptor(&self) -> ShellDescriptor;
}

impl<P: BaselineDescriptorProvider + ?Sized> BaselineDescriptorProvider for Arc<P> {
    fn shell_descriptor(&self) -> ShellDescriptor {
        (**self).shell_descriptor()
    }

    fn setup_descriptor(&self) -> ShellDescriptor {
        (**self).setup_descriptor()
    }
}

/// Baseline assembled from a validated [`BaselineConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredBaseline {
    shell: ShellDescriptor,
    setup: ShellDescriptor,
}

impl ConfiguredBaseline {
    /// Validates `config` and assembles both descriptors.
    ///
    /// # Errors
    /// Returns [`BaselineError::Validation`] if a feature name is blank, a descriptor would list a
    /// feature twice, or a setup feature is also an operational one.
    pub fn new(config: &BaselineConfig) -> Result<Self, BaselineError> {
        if let Some(blank) = [&config.shared, &config.operational, &config.setup]
            .into_iter()
            .flatten()
            .find(|name| name.trim().is_empty())
        {
            return Err(BaselineError::Validation {
                message: format!("Blank feature name {blank:?}").into(),
                context: None,
            });
        }

        if let Some(leaked) = config.setup.iter().find(|name| config.operational.contains(name)) {
            return Err(BaselineError::Validation {
                message: format!("Feature '{leaked}' cannot be both operational and setup").into(),
                context: Some("Setup shells must not carry operational features".into()),
            });
        }

        let assemble = |label: &'static str, extra: &[String]| {
            ShellDescriptor::transient(config.shared.iter().chain(extra).cloned()).map_err(
                |duplicate| BaselineError::Validation {
                    message: duplicate.to_string().into(),
                    context: Some(format!("{label} descriptor").into()),
                },
            )
        };

        Ok(Self {
            shell: assemble("shell", config.operational.as_slice())?,
            setup: assemble("setup", config.setup.as_slice())?,
        })
    }
}

impl Default for ConfiguredBaseline {
    /// Mirrors [`BaselineConfig::default`] without re-validating it.
    fn default() -> Self {
        let descriptor = |names: &[&str]| ShellDescriptor {
            features: names.iter().copied().map(ShellFeature::new).collect(),
            ..ShellDescriptor::default()
        };

        Self {
            shell: descriptor(&[LOGGING_CONSOLE, HOSTING, SETTINGS]),
            setup: descriptor(&[LOGGING_CONSOLE, SETUP]),
        }
    }
}

impl BaselineDescriptorProvider for ConfiguredBaseline {
    fn shell_descriptor(&self) -> ShellDescriptor {
        self.shell.clone()
    }

    fn setup_descriptor(&self) -> ShellDescriptor {
        self.setup.clone()
    }
}
