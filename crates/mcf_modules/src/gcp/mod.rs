//! Google Cloud modules.

pub mod compute_instance;
pub mod dns_record;

pub use compute_instance::GcpComputeInstanceModule;
pub use dns_record::GcpDnsRecordModule;
