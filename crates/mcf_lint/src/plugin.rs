//! The lint plugin: a rule list applied to schema descriptors.

use std::path::{Path, PathBuf};

use mcf_manifest::{all_schemas, MessageSchema};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{LintError, LintResult};
use crate::rules::{builtin_rules, LintViolation, RuleSpec};

/// Files picked up by [`LintPlugin::load_schemas`] unless told otherwise.
pub const DEFAULT_SCHEMA_PATTERN: &str = "**/*.yaml";

/// Outcome of one lint run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub schemas_checked: usize,
    pub fields_checked: usize,
    pub violations: Vec<LintViolation>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn merge(&mut self, other: LintReport) {
        self.schemas_checked += other.schemas_checked;
        self.fields_checked += other.fields_checked;
        self.violations.extend(other.violations);
    }

    /// The first violation as an error, if any.
    pub fn into_result(self) -> LintResult<()> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation.into_error()),
            None => Ok(()),
        }
    }
}

/// Runs registered rules over every field of a schema.
#[derive(Debug, Clone)]
pub struct LintPlugin {
    rules: Vec<RuleSpec>,
}

impl Default for LintPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl LintPlugin {
    /// A plugin with the built-in rules registered.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// A plugin with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: RuleSpec) {
        debug!("Registering lint rule: {}", rule.id);
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    pub fn lint_schema(&self, schema: &MessageSchema) -> LintReport {
        let mut report = LintReport {
            schemas_checked: 1,
            ..Default::default()
        };
        schema.walk(&mut |location, field| {
            report.fields_checked += 1;
            report
                .violations
                .extend(self.rules.iter().filter_map(|rule| rule.apply(location, field)));
        });
        report
    }

    /// Lint the schema of every kind in the catalog.
    pub fn lint_builtin(&self) -> LintReport {
        let mut report = LintReport::default();
        for (kind, schema) in all_schemas() {
            debug!("Linting schema of {}", kind);
            report.merge(self.lint_schema(&schema));
        }
        info!(
            "Linted {} built-in schemas, {} violations",
            report.schemas_checked,
            report.violations.len()
        );
        report
    }

    /// Read YAML schema files under `dir` whose relative path matches `pattern`.
    pub fn load_schemas(dir: &Path, pattern: &str) -> LintResult<Vec<(PathBuf, MessageSchema)>> {
        let matcher =
            glob::Pattern::new(pattern).map_err(|e| LintError::InvalidPattern(e.to_string()))?;

        let mut schemas = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
        {
            let path = entry.path();
            let relative = path.strip_prefix(dir).unwrap_or(path);
            if !matcher.matches_path(relative) {
                continue;
            }

            let content = std::fs::read_to_string(path)?;
            let schema: MessageSchema =
                serde_yaml::from_str(&content).map_err(|e| LintError::InvalidSchemaFile {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            debug!("Loaded schema {} from {}", schema.name, path.display());
            schemas.push((path.to_path_buf(), schema));
        }
        Ok(schemas)
    }

    /// Lint every schema file under `dir`.
    pub fn lint_dir(&self, dir: &Path) -> LintResult<LintReport> {
        let mut report = LintReport::default();
        for (path, schema) in Self::load_schemas(dir, DEFAULT_SCHEMA_PATTERN)? {
            let mut file_report = self.lint_schema(&schema);
            for violation in &mut file_report.violations {
                violation.location = format!("{}:{}", path.display(), violation.location);
            }
            report.merge(file_report);
        }
        info!(
            "Linted {} schema files in {}, {} violations",
            report.schemas_checked,
            dir.display(),
            report.violations.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_manifest::{FieldSchema, FieldType};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lint_nested_field() {
        let schema = MessageSchema::new("ExampleSpec").nested(
            MessageSchema::new("network")
                .field(FieldSchema::required("sku", FieldType::Enum).with_default("standard")),
        );
        let report = LintPlugin::new().lint_schema(&schema);
        assert_eq!(report.fields_checked, 1);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].location, "ExampleSpec.network.sku");
    }

    #[test]
    fn test_custom_rule() {
        fn no_doubles(field: &FieldSchema) -> Option<String> {
            (field.field_type == FieldType::Double).then(|| "doubles are not allowed".to_string())
        }

        let mut plugin = LintPlugin::empty();
        plugin.register(RuleSpec::new("no-doubles", "Prices are strings", no_doubles));
        let schema = MessageSchema::new("S").field(FieldSchema::optional("price", FieldType::Double));

        let err = plugin.lint_schema(&schema).into_result().unwrap_err();
        assert_eq!(err.to_string(), "schema lint failed: no-doubles at S.price: doubles are not allowed");
    }

    #[test]
    fn test_lint_dir() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(
            temp.path().join("nested/record.yaml"),
            "name: RecordSpec\nfields:\n  - name: ttl\n    type: uint32\n    default: \"300\"\n",
        )
        .unwrap();
        fs::write(temp.path().join("notes.txt"), "not a schema").unwrap();

        let report = LintPlugin::new().lint_dir(temp.path()).unwrap();
        assert_eq!(report.schemas_checked, 1);
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].location.ends_with("record.yaml:RecordSpec.ttl"));
    }

    #[test]
    fn test_invalid_schema_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.yaml"), "fields: [1, 2").unwrap();

        let err = LintPlugin::new().lint_dir(temp.path()).unwrap_err();
        assert!(matches!(err, LintError::InvalidSchemaFile { .. }));
    }
}
