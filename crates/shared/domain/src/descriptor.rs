use crate::constants::TRANSIENT_SERIAL;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A feature name listed more than once in one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFeature(pub String);

impl fmt::Display for DuplicateFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature '{}' is listed twice", self.0)
    }
}

impl std::error::Error for DuplicateFeature {}

/// A named capability a shell may include.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShellFeature {
    pub name: String,
}

impl ShellFeature {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An opaque configuration entry consumed by the composition strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShellParameter {
    pub component: String,
    pub name: String,
    pub value: String,
}

/// Declares what a shell should be composed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellDescriptor {
    pub serial_number: i64,
    pub features: Vec<ShellFeature>,
    pub parameters: Vec<ShellParameter>,
}

impl Default for ShellDescriptor {
    fn default() -> Self {
        Self { serial_number: TRANSIENT_SERIAL, features: Vec::new(), parameters: Vec::new() }
    }
}

impl ShellDescriptor {
    /// Builds a never-persisted descriptor (serial `-1`) with the given features and no parameters.
    ///
    /// Descriptors decoded with serde or built field by field are not checked; use
    /// [`ShellDescriptor::first_duplicate`] on those.
    ///
    /// # Errors
    /// Returns [`DuplicateFeature`] for the first name that occurs twice.
    pub fn transient<I, S>(features: I) -> Result<Self, DuplicateFeature>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let descriptor =
            Self { features: features.into_iter().map(ShellFeature::new).collect(), ..Self::default() };

        match descriptor.first_duplicate() {
            Some(duplicate) => Err(DuplicateFeature(duplicate.to_owned())),
            None => Ok(descriptor),
        }
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.serial_number == TRANSIENT_SERIAL
    }

    /// Feature names in declaration order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|feature| feature.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.feature_names().any(|feature| feature == name)
    }

    /// First feature name that occurs more than once, if any.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.features.len());
        self.feature_names().find(|name| !seen.insert(*name))
    }
}
