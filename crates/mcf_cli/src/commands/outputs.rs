//! Outputs command - Show the output contract of a kind.

use anyhow::Result;
use clap::Args;

use mcf_manifest::CloudResourceKind;
use mcf_modules::ModuleRegistry;

use crate::error::CliError;

#[derive(Args)]
pub struct OutputsArgs {
    /// Resource kind, e.g. AwsRoute53DnsRecord
    #[arg(required_unless_present = "list")]
    kind: Option<String>,

    /// List every supported kind
    #[arg(long)]
    list: bool,
}

pub async fn execute(args: OutputsArgs) -> Result<()> {
    let registry = ModuleRegistry::builtin();

    if args.list {
        println!("Supported kinds:");
        for kind in registry.kinds() {
            println!("  {:<28} {}", kind.as_str(), kind.api_version());
        }
        return Ok(());
    }

    let name = args.kind.unwrap_or_default();
    let kind = CloudResourceKind::from_str(&name).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "unknown kind '{}'; run 'mcf outputs --list' to see the supported kinds",
            name
        ))
    })?;

    let module = registry.get_required(kind)?;
    println!("{} outputs:", kind);
    for key in module.outputs() {
        println!("  {}", key);
    }
    Ok(())
}
