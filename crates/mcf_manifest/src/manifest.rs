//! The manifest envelope and the contract every spec implements.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::kind::CloudResourceKind;
use crate::metadata::CloudResourceMetadata;
use crate::reference::{StringValueOrRef, ValueFromRef};
use crate::schema::MessageSchema;
use crate::validation::ValidationResult;

/// Contract implemented by every kind-specific spec.
pub trait ResourceSpec:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Kind this spec belongs to.
    const KIND: CloudResourceKind;

    /// Runtime validation, with field names relative to the spec.
    fn validate(&self) -> ValidationResult;

    /// Static field descriptor used by the schema linter.
    fn schema() -> MessageSchema;

    /// Every foreign-key field, keyed by its path relative to the spec.
    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        Vec::new()
    }
}

/// A typed resource manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<S> {
    pub api_version: String,
    pub kind: String,
    pub metadata: CloudResourceMetadata,
    pub spec: S,
}

impl<S: ResourceSpec> Manifest<S> {
    /// Build a manifest with the header filled in from the spec's kind.
    pub fn new(metadata: CloudResourceMetadata, spec: S) -> Self {
        Self {
            api_version: S::KIND.api_version(),
            kind: S::KIND.as_str().to_string(),
            metadata,
            spec,
        }
    }

    /// Parse a manifest from YAML, rejecting documents of another kind.
    pub fn from_yaml(content: &str) -> ManifestResult<Self> {
        let manifest: Self = serde_yaml::from_str(content)?;
        if manifest.kind != S::KIND.as_str() {
            return Err(ManifestError::KindMismatch {
                expected: S::KIND.as_str().to_string(),
                found: manifest.kind,
            });
        }
        Ok(manifest)
    }

    /// Read a manifest from a YAML file.
    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.display().to_string()));
        }
        debug!("Reading manifest from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> ManifestResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate header, metadata and spec.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.kind != S::KIND.as_str() {
            result.add_error(
                "kind",
                format!("expected '{}', got '{}'", S::KIND.as_str(), self.kind),
            );
        }

        let expected_version = S::KIND.api_version();
        if self.api_version != expected_version {
            result.add_error(
                "apiVersion",
                format!("expected '{}', got '{}'", expected_version, self.api_version),
            );
        }

        result.merge(self.metadata.validate());
        result.merge_prefixed("spec", self.spec.validate());
        result
    }

    /// References that still point at other stacks, with their spec paths.
    pub fn unresolved_references(&self) -> Vec<(String, ValueFromRef)> {
        let mut spec = self.spec.clone();
        spec.foreign_keys_mut()
            .into_iter()
            .filter_map(|(path, value)| {
                value
                    .value_from()
                    .map(|r| (format!("spec.{}", path), r.clone()))
            })
            .collect()
    }

    /// Substitute references with values returned by `lookup`.
    ///
    /// Returns the number of references resolved.
    pub fn resolve_references<F>(&mut self, mut lookup: F) -> usize
    where
        F: FnMut(&ValueFromRef) -> Option<String>,
    {
        let mut resolved = 0;
        for (path, value) in self.spec.foreign_keys_mut() {
            if value.resolve_with(&mut lookup) {
                debug!("Resolved reference at spec.{}", path);
                resolved += 1;
            }
        }
        resolved
    }
}
