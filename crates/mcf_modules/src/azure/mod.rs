pub mod dns_record;
pub mod virtual_machine;

pub use dns_record::AzureDnsRecordModule;
pub use virtual_machine::AzureVirtualMachineModule;
