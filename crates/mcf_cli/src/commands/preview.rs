//! Preview command - Run a module against the recording engine.
//!
//! Input is either a full stack input (`--stack-input`), or a manifest plus
//! an optional provider config file (`-f` and `-p`) that are combined into
//! one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_yaml::{Mapping, Value};
use tracing::info;

use mcf_manifest::CloudResourceKind;
use mcf_modules::ModuleRegistry;
use mcf_provider::{
    invalid_provider_config_guidance, kind_detection_error_guidance,
    missing_provider_config_guidance,
};
use mcf_runtime::{detect_kind, InlineSource, ModuleError, RecordingEngine};

use crate::error::CliError;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Stack input file (providerConfig + target)
    #[arg(long, env = "MCF_STACK_INPUT")]
    stack_input: Option<PathBuf>,

    /// Manifest file, used instead of a stack input
    #[arg(short = 'f', long = "file")]
    manifest: Option<PathBuf>,

    /// Provider config file to pair with the manifest
    #[arg(short = 'p', long = "provider-config", requires = "manifest")]
    provider_config: Option<PathBuf>,

    /// Stack name recorded in the preview
    #[arg(long)]
    stack: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_yaml(path: &Path) -> Result<Value> {
    serde_yaml::from_str(&read(path)?).with_context(|| format!("failed to parse {}", path.display()))
}

/// Build stack-input YAML from the arguments.
fn stack_input(args: &PreviewArgs) -> Result<String> {
    match (&args.manifest, &args.stack_input) {
        (Some(manifest), _) => {
            let mut input = Mapping::new();
            if let Some(provider_config) = &args.provider_config {
                input.insert("providerConfig".into(), parse_yaml(provider_config)?);
            }
            input.insert("target".into(), parse_yaml(manifest)?);
            Ok(serde_yaml::to_string(&Value::Mapping(input))?)
        }
        (None, Some(path)) => read(path),
        (None, None) => Err(CliError::InvalidArgs(
            "either --stack-input or -f <manifest> is required".to_string(),
        )
        .into()),
    }
}

fn has_provider_config(content: &str) -> bool {
    serde_yaml::from_str::<Value>(content)
        .map(|v| v.get("providerConfig").or_else(|| v.get("provider_config")).is_some())
        .unwrap_or(false)
}

fn print_guidance(kind: CloudResourceKind, err: &ModuleError, provider_supplied: bool) {
    let guidance = match err.root_cause() {
        ModuleError::ProviderSetupFailed { detail, .. } if provider_supplied => {
            invalid_provider_config_guidance(kind.provider(), detail)
        }
        _ => missing_provider_config_guidance(kind),
    };
    eprintln!("{}", guidance);
}

pub async fn execute(args: PreviewArgs) -> Result<()> {
    let content = stack_input(&args)?;

    let kind = match detect_kind(&content) {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{}\n", kind_detection_error_guidance());
            return Err(e).context("failed to detect manifest kind");
        }
    };
    info!("Previewing {} module", kind);

    let module = ModuleRegistry::builtin().get_required(kind)?;
    let engine = match &args.stack {
        Some(stack) => RecordingEngine::new(stack.clone()),
        None => RecordingEngine::default(),
    };

    if let Err(err) = module.run(&engine, &InlineSource::new(content.clone())).await {
        if err.failed_provider().is_some() {
            print_guidance(kind, &err, has_provider_config(&content));
        }
        return Err(err.into());
    }

    let report = engine.preview();
    let rendered = match args.format {
        OutputFormat::Yaml => report.to_yaml()?,
        OutputFormat::Json => report.to_json()?,
    };
    println!("{}", rendered);

    info!(
        "Preview of {} recorded {} resources and {} outputs",
        kind,
        report.resources.len(),
        report.outputs.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(manifest: Option<PathBuf>, provider_config: Option<PathBuf>) -> PreviewArgs {
        PreviewArgs {
            stack_input: None,
            manifest,
            provider_config,
            stack: None,
            format: OutputFormat::Yaml,
        }
    }

    #[test]
    fn test_manifest_and_provider_are_combined() {
        let temp = tempdir().unwrap();
        let manifest = temp.path().join("manifest.yaml");
        let provider = temp.path().join("cloudflare-provider-config.yaml");
        fs::write(&manifest, "apiVersion: cloudflare.openmcf.org/v1\nkind: CloudflareDnsZone\n").unwrap();
        fs::write(&provider, "apiToken: cf-token\n").unwrap();

        let content = stack_input(&args(Some(manifest), Some(provider))).unwrap();
        assert!(has_provider_config(&content));
        assert_eq!(detect_kind(&content).unwrap(), CloudResourceKind::CloudflareDnsZone);
    }

    #[test]
    fn test_missing_input_is_invalid_args() {
        let err = stack_input(&args(None, None)).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::InvalidArgs(_))));
    }
}
