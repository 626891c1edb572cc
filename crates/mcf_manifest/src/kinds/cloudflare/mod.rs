pub mod dns_record;
pub mod dns_zone;

pub use dns_record::*;
pub use dns_zone::*;
