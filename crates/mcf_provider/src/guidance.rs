//! User-facing guidance for missing or broken provider configs.

use std::fmt::Write;

use mcf_manifest::{CloudResourceKind, CloudResourceProvider};

use crate::catalog::catalog_entry;

fn indented(out: &mut String, text: &str, indent: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "{}{}", indent, line);
    }
}

/// Message shown when a kind needs credentials and none were supplied.
///
/// Offers both routes: exporting environment variables, or writing a
/// provider config file and passing it with `-p`.
pub fn missing_provider_config_guidance(kind: CloudResourceKind) -> String {
    let entry = catalog_entry(kind.provider());
    let mut out = String::new();

    let _ = writeln!(
        out,
        "The {} resource requires {} credentials.\n",
        kind, entry.display_name
    );

    out.push_str("Option 1: Set environment variables\n\n");
    indented(&mut out, entry.env_vars_help, "  ");

    out.push_str("\nOption 2: Create a provider config file\n\n");
    let _ = writeln!(out, "  Create '{}' with:\n", entry.config_file_name);
    indented(&mut out, entry.config_file_example, "    ");

    out.push_str("\n  Then run:\n\n");
    let _ = writeln!(
        out,
        "    mcf preview -f manifest.yaml -p {}",
        entry.config_file_name
    );

    if !entry.docs_url.is_empty() {
        let _ = writeln!(out, "\nFor more information: {}", entry.docs_url);
    }
    out
}

/// Message shown when a provider config file does not parse or validate.
pub fn invalid_provider_config_guidance(provider: CloudResourceProvider, error: &str) -> String {
    let entry = catalog_entry(provider);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "The provider config file could not be parsed as {} credentials.\n",
        entry.display_name
    );
    let _ = writeln!(out, "Parse error: {}\n", error);
    let _ = writeln!(out, "Expected format for {} provider config:\n", entry.display_name);
    indented(&mut out, entry.config_file_example, "  ");

    if !entry.docs_url.is_empty() {
        let _ = writeln!(out, "\nFor more information: {}", entry.docs_url);
    }
    out
}

/// Message shown when a manifest's kind cannot be detected.
pub fn kind_detection_error_guidance() -> &'static str {
    "The manifest must contain valid 'apiVersion' and 'kind' fields:

  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanVpc
  metadata:
    name: my-vpc
  spec:
    # ... resource configuration

Check your manifest file for:
  - Missing or misspelled 'apiVersion'
  - Missing or misspelled 'kind'
  - Invalid YAML syntax

Run 'mcf outputs --list' to see the supported kinds."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_guidance_offers_both_options() {
        let text = missing_provider_config_guidance(CloudResourceKind::AzureVirtualMachine);
        assert!(text.starts_with("The AzureVirtualMachine resource requires Azure credentials."));
        assert!(text.contains("Option 1: Set environment variables"));
        assert!(text.contains("  export ARM_CLIENT_ID="));
        assert!(text.contains("Create 'azure-provider-config.yaml' with:"));
        assert!(text.contains("    client_id: "));
        assert!(text.contains("mcf preview -f manifest.yaml -p azure-provider-config.yaml"));
        assert!(text.contains("For more information: https://learn.microsoft.com/"));
    }

    #[test]
    fn test_invalid_guidance_embeds_error() {
        let text = invalid_provider_config_guidance(CloudResourceProvider::Cloudflare, "missing field");
        assert!(text.contains("Parse error: missing field"));
        assert!(text.contains("  api_token: "));
    }
}
