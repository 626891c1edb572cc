pub mod route53_dns_record;
pub mod s3_bucket;

pub use route53_dns_record::*;
pub use s3_bucket::*;
