//! DNS record types and the per-type field rules shared by DNS modules.

use serde::{Deserialize, Serialize};

/// DNS record type. The wire format is the upper-case variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Ns,
    Caa,
    Ptr,
    Soa,
}

impl DnsRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::Aaaa => "AAAA",
            DnsRecordType::Cname => "CNAME",
            DnsRecordType::Mx => "MX",
            DnsRecordType::Txt => "TXT",
            DnsRecordType::Srv => "SRV",
            DnsRecordType::Ns => "NS",
            DnsRecordType::Caa => "CAA",
            DnsRecordType::Ptr => "PTR",
            DnsRecordType::Soa => "SOA",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    pub fn all() -> Vec<Self> {
        vec![
            DnsRecordType::A,
            DnsRecordType::Aaaa,
            DnsRecordType::Cname,
            DnsRecordType::Mx,
            DnsRecordType::Txt,
            DnsRecordType::Srv,
            DnsRecordType::Ns,
            DnsRecordType::Caa,
            DnsRecordType::Ptr,
            DnsRecordType::Soa,
        ]
    }

    /// Only address and alias records can sit behind a proxy.
    pub fn allows_proxied(&self) -> bool {
        matches!(self, DnsRecordType::A | DnsRecordType::Aaaa | DnsRecordType::Cname)
    }

    pub fn allows_priority(&self) -> bool {
        matches!(self, DnsRecordType::Mx | DnsRecordType::Srv)
    }

    /// `weight` and `port` apply to SRV only.
    pub fn allows_weight_and_port(&self) -> bool {
        matches!(self, DnsRecordType::Srv)
    }

    /// `flags` and `tag` apply to CAA only.
    pub fn allows_flags_and_tag(&self) -> bool {
        matches!(self, DnsRecordType::Caa)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
