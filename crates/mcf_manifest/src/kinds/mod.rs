//! Kind-specific spec types, grouped by provider.

pub mod aws;
pub mod azure;
pub mod civo;
pub mod cloudflare;
pub mod digitalocean;
pub mod gcp;
pub mod kubernetes;

use crate::dns::DnsRecordType;
use crate::validation::ValidationResult;

/// Warn about DNS fields that the record type does not use.
pub(crate) fn warn_ignored_dns_fields(
    result: &mut ValidationResult,
    record_type: DnsRecordType,
    has_priority: bool,
    has_weight_or_port: bool,
    has_flags_or_tag: bool,
) {
    if has_priority && !record_type.allows_priority() {
        result.add_warning(format!("priority is ignored for {} records", record_type));
    }
    if has_weight_or_port && !record_type.allows_weight_and_port() {
        result.add_warning(format!("weight and port are ignored for {} records", record_type));
    }
    if has_flags_or_tag && !record_type.allows_flags_and_tag() {
        result.add_warning(format!("flags and tag are ignored for {} records", record_type));
    }
}
