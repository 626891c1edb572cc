//! Field gating shared by the DNS record modules.
//!
//! Providers reject arguments that do not belong to a record type, so each
//! module forwards only the optional fields the type actually uses.

use mcf_manifest::DnsRecordType;
use mcf_runtime::PropertyMap;

/// Optional record fields whose presence depends on the record type.
///
/// Each `with_*` call declares that the provider takes the field; an unset
/// value is forwarded as 0 (or an empty tag) for the types that use it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeGatedFields {
    pub proxied: Option<bool>,
    pub priority: Option<u32>,
    pub weight: Option<u32>,
    pub port: Option<u32>,
    pub flags: Option<u32>,
    pub tag: Option<String>,
}

impl TypeGatedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    pub fn with_priority(mut self, priority: Option<u32>) -> Self {
        self.priority = Some(priority.unwrap_or(0));
        self
    }

    pub fn with_weight(mut self, weight: Option<u32>) -> Self {
        self.weight = Some(weight.unwrap_or(0));
        self
    }

    pub fn with_port(mut self, port: Option<u32>) -> Self {
        self.port = Some(port.unwrap_or(0));
        self
    }

    pub fn with_flags(mut self, flags: Option<u32>) -> Self {
        self.flags = Some(flags.unwrap_or(0));
        self
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = Some(tag.unwrap_or_default());
        self
    }

    /// Add the fields `record_type` accepts to `args`; drop the rest.
    pub fn apply(self, record_type: DnsRecordType, mut args: PropertyMap) -> PropertyMap {
        if record_type.allows_proxied() {
            if let Some(proxied) = self.proxied {
                args.insert("proxied", proxied);
            }
        }
        if record_type.allows_priority() {
            if let Some(priority) = self.priority {
                args.insert("priority", priority);
            }
        }
        if record_type.allows_weight_and_port() {
            if let Some(weight) = self.weight {
                args.insert("weight", weight);
            }
            if let Some(port) = self.port {
                args.insert("port", port);
            }
        }
        if record_type.allows_flags_and_tag() {
            if let Some(flags) = self.flags {
                args.insert("flags", flags);
            }
            if let Some(tag) = self.tag {
                args.insert("tag", tag);
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_fields() -> TypeGatedFields {
        TypeGatedFields::new()
            .with_proxied(true)
            .with_priority(Some(10))
            .with_weight(Some(5))
            .with_port(Some(443))
            .with_flags(Some(0))
            .with_tag(Some("issue".to_string()))
    }

    #[test]
    fn test_address_records_keep_only_proxied() {
        for record_type in [DnsRecordType::A, DnsRecordType::Aaaa, DnsRecordType::Cname] {
            let args = all_fields().apply(record_type, PropertyMap::new());
            assert_eq!(args.len(), 1, "{}", record_type);
            assert_eq!(args.get("proxied").and_then(|v| v.as_bool()), Some(true));
        }
    }

    #[test]
    fn test_mx_keeps_priority() {
        let args = all_fields().apply(DnsRecordType::Mx, PropertyMap::new());
        assert_eq!(args.get("priority").and_then(|v| v.as_i64()), Some(10));
        assert!(!args.contains_key("proxied"));
        assert!(!args.contains_key("weight"));
        assert!(!args.contains_key("tag"));
    }

    #[test]
    fn test_srv_keeps_priority_weight_port() {
        let args = all_fields().apply(DnsRecordType::Srv, PropertyMap::new());
        let mut keys: Vec<_> = args.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["port", "priority", "weight"]);
    }

    #[test]
    fn test_caa_keeps_flags_and_tag() {
        let args = all_fields().apply(DnsRecordType::Caa, PropertyMap::new());
        assert_eq!(args.get("tag").and_then(|v| v.as_str()), Some("issue"));
        assert_eq!(args.get("flags").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_unset_numeric_fields_default_to_zero() {
        let args = TypeGatedFields::new()
            .with_priority(None)
            .apply(DnsRecordType::Mx, PropertyMap::new());
        assert_eq!(args.get("priority").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(args.len(), 1);

        let args = TypeGatedFields::new()
            .with_priority(None)
            .with_weight(None)
            .with_port(Some(5060))
            .apply(DnsRecordType::Srv, PropertyMap::new());
        assert_eq!(args.get("priority").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(args.get("weight").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(args.get("port").and_then(|v| v.as_i64()), Some(5060));

        let args = TypeGatedFields::new()
            .with_priority(None)
            .apply(DnsRecordType::A, PropertyMap::new());
        assert!(args.is_empty());

        // Fields a provider never declares stay out.
        let args = TypeGatedFields::new()
            .with_priority(None)
            .apply(DnsRecordType::Srv, PropertyMap::new());
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_txt_keeps_nothing() {
        let args = all_fields().apply(DnsRecordType::Txt, PropertyMap::new().with("name", "_dmarc"));
        assert_eq!(args.len(), 1);
    }
}
