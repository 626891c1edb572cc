pub mod dns_record;
pub mod dns_zone;

pub use dns_record::CloudflareDnsRecordModule;
pub use dns_zone::CloudflareDnsZoneModule;
