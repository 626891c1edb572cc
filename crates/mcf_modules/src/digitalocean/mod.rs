pub mod dns_record;
pub mod vpc;

pub use dns_record::DigitalOceanDnsRecordModule;
pub use vpc::DigitalOceanVpcModule;
