pub mod dns_record;

pub use dns_record::CivoDnsRecordModule;
