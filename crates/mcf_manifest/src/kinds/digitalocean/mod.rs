pub mod dns_record;
pub mod vpc;

pub use dns_record::*;
pub use vpc::*;
