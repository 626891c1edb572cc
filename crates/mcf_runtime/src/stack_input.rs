//! Stack input: the credential plus the target manifest a module runs with.

use std::path::PathBuf;

use mcf_manifest::{CloudResourceKind, Gvk, Manifest, ResourceSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModuleError, ModuleResult};

/// Environment variable holding inline stack-input YAML.
pub const STACK_INPUT_ENV: &str = "MCF_STACK_INPUT_YAML";

/// Typed stack input for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "P: Deserialize<'de>, S: Deserialize<'de>")
)]
pub struct StackInput<P, S> {
    #[serde(default, alias = "provider_config", skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<P>,
    pub target: Manifest<S>,
}

impl<P, S: ResourceSpec> StackInput<P, S> {
    pub fn new(target: Manifest<S>) -> Self {
        Self {
            provider_config: None,
            target,
        }
    }

    pub fn with_provider_config(mut self, config: P) -> Self {
        self.provider_config = Some(config);
        self
    }
}

/// Where serialized stack input comes from.
#[cfg_attr(test, mockall::automock)]
pub trait StackInputSource: Send + Sync {
    /// Human-readable origin, used in error messages.
    fn describe(&self) -> String;

    /// Raw YAML or JSON.
    fn read(&self) -> ModuleResult<String>;
}

/// Stack input read from a file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StackInputSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> ModuleResult<String> {
        if !self.path.exists() {
            return Err(ModuleError::BadStackInput(format!(
                "stack input file not found: {}",
                self.path.display()
            )));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Stack input held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    content: String,
}

impl InlineSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl StackInputSource for InlineSource {
    fn describe(&self) -> String {
        "inline stack input".to_string()
    }

    fn read(&self) -> ModuleResult<String> {
        Ok(self.content.clone())
    }
}

/// Stack input passed through an environment variable, the way an engine
/// hands config to a program it launches.
#[derive(Debug, Clone)]
pub struct EnvSource {
    var: String,
}

impl EnvSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(STACK_INPUT_ENV)
    }
}

impl StackInputSource for EnvSource {
    fn describe(&self) -> String {
        format!("${}", self.var)
    }

    fn read(&self) -> ModuleResult<String> {
        std::env::var(&self.var)
            .map_err(|_| ModuleError::BadStackInput(format!("environment variable {} is not set", self.var)))
    }
}

/// Deserialize typed stack input from a source.
pub fn load_stack_input<P, S>(source: &dyn StackInputSource) -> ModuleResult<StackInput<P, S>>
where
    P: for<'de> Deserialize<'de>,
    S: ResourceSpec,
{
    let content = source.read()?;
    debug!("Loading stack input from {}", source.describe());

    let input: StackInput<P, S> = serde_yaml::from_str(&content)
        .map_err(|e| ModuleError::BadStackInput(format!("{}: {}", source.describe(), e)))?;

    if input.target.kind != S::KIND.as_str() {
        return Err(ModuleError::BadStackInput(format!(
            "target kind '{}' does not match module kind '{}'",
            input.target.kind,
            S::KIND
        )));
    }
    Ok(input)
}

/// True when the YAML document has a `target` at its root.
pub fn is_stack_input(content: &str) -> bool {
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(content),
        Ok(serde_yaml::Value::Mapping(map)) if map.contains_key("target")
    )
}

/// Kind of the stack input's target, without deserializing its spec.
pub fn detect_kind(content: &str) -> ModuleResult<CloudResourceKind> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| ModuleError::BadStackInput(e.to_string()))?;
    let target = value
        .get("target")
        .cloned()
        .ok_or_else(|| ModuleError::BadStackInput("missing 'target'".to_string()))?;
    let gvk: Gvk = serde_yaml::from_value(target).map_err(|e| ModuleError::BadStackInput(e.to_string()))?;
    if gvk.kind.is_empty() {
        return Err(ModuleError::BadStackInput("target has no 'kind'".to_string()));
    }
    Ok(gvk.resource_kind()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_manifest::kinds::cloudflare::CloudflareDnsRecordSpec;
    use mcf_provider::CloudflareProviderConfig;

    const INPUT: &str = r#"
provider_config:
  api_token: cf-token
target:
  apiVersion: cloudflare.openmcf.org/v1
  kind: CloudflareDnsRecord
  metadata:
    name: www
  spec:
    zoneId: zone-123
    name: www
    type: A
    value: 192.0.2.10
"#;

    #[test]
    fn test_loads_with_snake_case_provider_key() {
        let input: StackInput<CloudflareProviderConfig, CloudflareDnsRecordSpec> =
            load_stack_input(&InlineSource::new(INPUT)).unwrap();
        assert_eq!(input.provider_config.unwrap().api_token, "cf-token");
        assert_eq!(input.target.spec.zone_id.get_value().unwrap(), "zone-123");
    }

    #[test]
    fn test_missing_target_is_bad_stack_input() {
        let result: ModuleResult<StackInput<CloudflareProviderConfig, CloudflareDnsRecordSpec>> =
            load_stack_input(&InlineSource::new("providerConfig:\n  apiToken: x\n"));
        assert!(matches!(result, Err(ModuleError::BadStackInput(_))));
    }

    #[test]
    fn test_source_failure_propagates() {
        let mut source = MockStackInputSource::new();
        source.expect_describe().return_const("mock".to_string());
        source
            .expect_read()
            .returning(|| Err(ModuleError::BadStackInput("unreadable".to_string())));

        let result: ModuleResult<StackInput<CloudflareProviderConfig, CloudflareDnsRecordSpec>> =
            load_stack_input(&source);
        assert!(matches!(result, Err(ModuleError::BadStackInput(d)) if d == "unreadable"));
    }

    #[test]
    fn test_detection() {
        assert!(is_stack_input(INPUT));
        assert!(!is_stack_input("apiVersion: v1\nkind: X\n"));
        assert_eq!(detect_kind(INPUT).unwrap(), CloudResourceKind::CloudflareDnsRecord);
    }
}
