//! Provider command - Show credential help from the provider catalog.

use anyhow::Result;
use clap::Args;

use mcf_manifest::CloudResourceProvider;
use mcf_provider::{catalog, catalog_entry};

use crate::error::CliError;

#[derive(Args)]
pub struct ProviderArgs {
    /// Provider name (aws, azure, gcp, digitalocean, civo, cloudflare, confluent, kubernetes)
    name: Option<String>,

    /// Only print the environment variables
    #[arg(long, conflicts_with = "example")]
    env: bool,

    /// Only print an example provider config file
    #[arg(long)]
    example: bool,
}

pub async fn execute(args: ProviderArgs) -> Result<()> {
    let Some(name) = args.name else {
        println!("Providers:");
        for entry in catalog() {
            println!("  {:<14} {}", entry.provider.as_str(), entry.display_name);
        }
        return Ok(());
    };

    let provider = CloudResourceProvider::from_str(&name)
        .ok_or_else(|| CliError::InvalidArgs(format!("unknown provider '{}'", name)))?;
    let entry = catalog_entry(provider);

    if args.env {
        println!("{}", entry.env_vars_help);
        return Ok(());
    }
    if args.example {
        println!("{}", entry.config_file_example);
        return Ok(());
    }

    println!("{}\n", entry.display_name);
    println!("Environment variables:\n");
    for line in entry.env_vars_help.lines() {
        println!("  {}", line);
    }
    println!("\nProvider config file ({}):\n", entry.config_file_name);
    for line in entry.config_file_example.lines() {
        println!("  {}", line);
    }
    if entry.supports_ambient_credentials {
        println!("\nWithout a config file, ambient credentials are used.");
    }
    if !entry.docs_url.is_empty() {
        println!("\nDocs: {}", entry.docs_url);
    }
    Ok(())
}
