pub mod compute_instance;
pub mod dns_record;

pub use compute_instance::*;
pub use dns_record::*;
