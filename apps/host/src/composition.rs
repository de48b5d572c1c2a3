//! Feature-catalog composition: a blueprint is the checked, ordered feature list of a descriptor.

use canopy_domain::constants::{HOSTING, LOGGING_CONSOLE, SETTINGS, SETUP};
use canopy_kernel::BoxError;
use canopy_kernel::composition::CompositionStrategy;
use canopy_kernel::domain::descriptor::{ShellDescriptor, ShellParameter};
use canopy_kernel::domain::tenant::TenantSettings;
use fxhash::FxHashSet;
use std::borrow::Cow;

#[canopy_derive::canopy_error]
pub enum CompositionError {
    #[error("Unknown feature{}: {message}", format_context(.context))]
    UnknownFeature { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflicting features{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// What a [`crate::scopes::CatalogScopes`] factory instantiates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureBlueprint {
    pub tenant: String,
    pub serial_number: i64,
    pub features: Vec<String>,
    pub parameters: Vec<ShellParameter>,
}

impl FeatureBlueprint {
    #[must_use]
    pub fn has(&self, feature: &str) -> bool {
        self.features.iter().any(|name| name == feature)
    }
}

/// Accepts descriptors whose features are all in a known catalog.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    known: FxHashSet<String>,
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::new([LOGGING_CONSOLE, HOSTING, SETTINGS, SETUP])
    }
}

impl FeatureCatalog {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { known: features.into_iter().map(Into::into).collect() }
    }

    fn check(&self, descriptor: &ShellDescriptor) -> Result<(), CompositionError> {
        if let Some(unknown) = descriptor.feature_names().find(|name| !self.known.contains(*name)) {
            return Err(CompositionError::UnknownFeature {
                message: unknown.to_owned().into(),
                context: Some("Feature is not in the catalog".into()),
            });
        }

        if let Some(duplicate) = descriptor.first_duplicate() {
            return Err(CompositionError::Conflict {
                message: format!("'{duplicate}' is declared twice").into(),
                context: None,
            });
        }

        Ok(())
    }
}

impl CompositionStrategy for FeatureCatalog {
    type Blueprint = FeatureBlueprint;

    fn compose(
        &self,
        settings: &TenantSettings,
        descriptor: &ShellDescriptor,
    ) -> Result<Self::Blueprint, BoxError> {
        self.check(descriptor)?;

        Ok(FeatureBlueprint {
            tenant: settings.name.clone(),
            serial_number: descriptor.serial_number,
            features: descriptor.feature_names().map(str::to_owned).collect(),
            parameters: descriptor.parameters.clone(),
        })
    }
}
