//! Lint command - Check spec schemas.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mcf_lint::LintPlugin;

use crate::error::CliError;

#[derive(Args)]
pub struct LintArgs {
    /// Directory of extra YAML schema files to lint
    #[arg(long)]
    schemas: Option<PathBuf>,

    /// Skip the built-in kinds
    #[arg(long)]
    skip_builtin: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: LintArgs) -> Result<()> {
    let plugin = LintPlugin::new();
    info!("Running {} lint rules", plugin.rules().len());

    let mut report = if args.skip_builtin {
        Default::default()
    } else {
        plugin.lint_builtin()
    };

    if let Some(dir) = &args.schemas {
        if !dir.is_dir() {
            return Err(CliError::InvalidArgs(format!(
                "schema directory not found: {}",
                dir.display()
            ))
            .into());
        }
        let extra = plugin
            .lint_dir(dir)
            .with_context(|| format!("failed to lint schemas in {}", dir.display()))?;
        report.merge(extra);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return match report.violations.len() {
            0 => Ok(()),
            n => Err(CliError::LintFailed(n).into()),
        };
    }

    println!(
        "🔍 Checked {} schemas ({} fields)",
        report.schemas_checked, report.fields_checked
    );

    if report.is_clean() {
        println!("   ✅ No lint violations");
        return Ok(());
    }

    println!("   ❌ Lint violations:");
    for violation in &report.violations {
        println!("      - {}", violation);
    }
    Err(CliError::LintFailed(report.violations.len()).into())
}
