//! Validate command - Load a manifest and check it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mcf_manifest::AnyManifest;
use mcf_modules::ModuleRegistry;

use crate::error::CliError;

#[derive(Args)]
pub struct ValidateArgs {
    /// Manifest file to validate
    #[arg(short = 'f', long = "file")]
    file: PathBuf,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating manifest: {}", args.file.display());

    let manifest = AnyManifest::from_path(&args.file)
        .with_context(|| format!("failed to load manifest {}", args.file.display()))?;
    println!(
        "📋 {} '{}'",
        manifest.kind(),
        manifest.metadata().name
    );

    let mut result = manifest.validate();
    let references = manifest.unresolved_references();
    if !references.is_empty() {
        let outputs = ModuleRegistry::builtin().output_registry();
        result.merge(outputs.check_references(&references));
        println!("   🔗 {} cross-stack reference(s)", references.len());
    }

    for warning in &result.warnings {
        println!("   ⚠️  {}", warning);
    }

    if result.valid {
        println!("   ✅ Manifest is valid");
        Ok(())
    } else {
        println!("   ❌ Validation failed:");
        for error in &result.errors {
            println!("      - {}", error);
        }
        Err(CliError::ValidationFailed(result.errors.len()).into())
    }
}
