//! Registry of the output keys each kind exports.

use std::collections::BTreeMap;

use mcf_manifest::{CloudResourceKind, ValidationResult, ValueFromRef};
use tracing::debug;

use crate::error::{ModuleError, ModuleResult};

/// Maps each kind to its closed set of output keys.
#[derive(Debug, Default, Clone)]
pub struct OutputRegistry {
    outputs: BTreeMap<CloudResourceKind, &'static [&'static str]>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: CloudResourceKind, keys: &'static [&'static str]) {
        debug!("Registering {} outputs for {}", keys.len(), kind);
        self.outputs.insert(kind, keys);
    }

    pub fn keys(&self, kind: CloudResourceKind) -> Option<&'static [&'static str]> {
        self.outputs.get(&kind).copied()
    }

    pub fn kinds(&self) -> Vec<CloudResourceKind> {
        self.outputs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Check that a reference names an output its kind actually exports.
    ///
    /// Returns `Ok(false)` for kinds outside this registry, which cannot be
    /// checked here.
    pub fn validate_ref(&self, reference: &ValueFromRef) -> ModuleResult<bool> {
        let keys = match CloudResourceKind::from_str(&reference.kind).and_then(|k| self.keys(k)) {
            Some(keys) => keys,
            None => return Ok(false),
        };
        if keys.contains(&reference.field_path.as_str()) {
            Ok(true)
        } else {
            Err(ModuleError::ValidationFailed {
                field: reference.to_string(),
                reason: format!(
                    "{} exports no '{}' (known outputs: {})",
                    reference.kind,
                    reference.field_path,
                    keys.join(", ")
                ),
            })
        }
    }

    /// Check every `(path, reference)` pair, reporting failures by path.
    pub fn check_references(&self, references: &[(String, ValueFromRef)]) -> ValidationResult {
        let mut result = ValidationResult::new();
        for (path, reference) in references {
            match self.validate_ref(reference) {
                Ok(true) => {}
                Ok(false) => result.add_warning(format!(
                    "{}: outputs of {} are not known to this catalog",
                    path, reference.kind
                )),
                Err(e) => result.add_error(path.clone(), e.to_string()),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE_OUTPUTS: &[&str] = &["zone_id", "nameservers"];

    fn registry() -> OutputRegistry {
        let mut registry = OutputRegistry::new();
        registry.register(CloudResourceKind::CloudflareDnsZone, ZONE_OUTPUTS);
        registry
    }

    #[test]
    fn test_validate_ref() {
        let registry = registry();
        assert!(registry
            .validate_ref(&ValueFromRef::new("CloudflareDnsZone", "main", "zone_id"))
            .unwrap());
        assert!(registry
            .validate_ref(&ValueFromRef::new("CloudflareDnsZone", "main", "zone_name"))
            .is_err());
        assert!(!registry
            .validate_ref(&ValueFromRef::new("GcpProject", "main", "project_id"))
            .unwrap());
    }

    #[test]
    fn test_check_references_reports_path() {
        let refs = vec![
            ("spec.zoneId".to_string(), ValueFromRef::new("CloudflareDnsZone", "main", "id")),
            ("spec.projectId".to_string(), ValueFromRef::new("GcpProject", "main", "project_id")),
        ];
        let result = registry().check_references(&refs);
        assert!(!result.valid);
        assert_eq!(result.first_error().unwrap().field, "spec.zoneId");
        assert_eq!(result.warnings.len(), 1);
    }
}
