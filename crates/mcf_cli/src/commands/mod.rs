//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod lint;
pub mod outputs;
pub mod preview;
pub mod provider;
pub mod validate;

/// mcf - OpenMCF module catalog
#[derive(Parser)]
#[command(name = "mcf")]
#[command(version, about = "mcf - validate, preview and lint OpenMCF resource modules")]
#[command(long_about = r#"
mcf works with OpenMCF manifests: typed YAML records that declare one cloud
resource. Every supported kind has a module that turns the manifest into a
graph of provider resources.

COMMANDS:
  validate   → Load a manifest and report field violations
  preview    → Run a module against the recording engine and print the graph
  lint       → Check the spec schemas of every kind (and extra schema files)
  provider   → Show how to supply credentials for a provider
  outputs    → List the output keys a kind exports

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Provider setup failure
  5 - Schema lint failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a manifest file
    Validate(validate::ValidateArgs),

    /// Preview the resources a module would create
    Preview(preview::PreviewArgs),

    /// Lint spec schemas
    Lint(lint::LintArgs),

    /// Show credential help for a provider
    Provider(provider::ProviderArgs),

    /// Show the output keys of a kind
    Outputs(outputs::OutputsArgs),
}
