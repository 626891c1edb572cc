//! # mcf_modules
//!
//! One resource module per OpenMCF kind.
//!
//! Every module follows the same shape: a `Locals` struct resolves
//! references and derives labels, plain async functions register one
//! resource each, and a unit struct implementing `ResourceModule` wires
//! them together and exports the kind's outputs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcf_manifest::CloudResourceKind;
//! use mcf_modules::ModuleRegistry;
//! use mcf_runtime::{FileSource, RecordingEngine};
//!
//! # async fn run() -> mcf_runtime::ModuleResult<()> {
//! let registry = ModuleRegistry::builtin();
//! let module = registry.get_required(CloudResourceKind::DigitalOceanVpc)?;
//! let engine = RecordingEngine::default();
//! module.run(&engine, &FileSource::new("stack-input.yaml")).await?;
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod azure;
pub mod civo;
pub mod cloudflare;
pub mod digitalocean;
pub mod dns;
pub mod gcp;
pub mod kubernetes;
pub mod registry;

pub use aws::{AwsRoute53DnsRecordModule, AwsS3BucketModule};
pub use azure::{AzureDnsRecordModule, AzureVirtualMachineModule};
pub use civo::CivoDnsRecordModule;
pub use cloudflare::{CloudflareDnsRecordModule, CloudflareDnsZoneModule};
pub use digitalocean::{DigitalOceanDnsRecordModule, DigitalOceanVpcModule};
pub use gcp::{GcpComputeInstanceModule, GcpDnsRecordModule};
pub use kubernetes::KubernetesGatewayApiCrdsModule;
pub use registry::ModuleRegistry;
