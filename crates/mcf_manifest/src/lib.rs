//! # mcf_manifest
//!
//! Typed resource manifests for the OpenMCF module catalog.
//!
//! Every cloud resource is described by a manifest with four fields:
//! `apiVersion`, `kind`, `metadata` and a kind-specific `spec`. This crate
//! defines that envelope, the closed set of kinds, the foreign-key
//! reference type that lets one stack consume another's outputs, and the
//! validation rules each spec enforces before a module touches the engine.
//!
//! ## Features
//!
//! - `Manifest<S>` envelope with YAML loading and validation
//! - `StringValueOrRef` literal-or-reference fields
//! - Per-kind specs for AWS, Azure, GCP, DigitalOcean, Civo, Cloudflare and Kubernetes
//! - Static `MessageSchema` descriptors consumed by the schema linter
//! - GVK extraction and kind-erased loading via `AnyManifest`
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcf_manifest::{AnyManifest, Manifest};
//! use mcf_manifest::kinds::digitalocean::DigitalOceanVpcSpec;
//! use std::path::Path;
//!
//! let vpc: Manifest<DigitalOceanVpcSpec> = Manifest::from_path(Path::new("vpc.yaml")).unwrap();
//! let result = vpc.validate();
//! assert!(result.valid);
//!
//! let any = AnyManifest::from_path(Path::new("record.yaml")).unwrap();
//! println!("{} {}", any.kind(), any.metadata().name);
//! ```

pub mod catalog;
pub mod dns;
pub mod error;
pub mod kind;
pub mod kinds;
pub mod manifest;
pub mod metadata;
pub mod reference;
pub mod schema;
pub mod validation;

pub use catalog::{all_schemas, schema_for, AnyManifest};
pub use dns::DnsRecordType;
pub use error::{ManifestError, ManifestResult};
pub use kind::{CloudResourceKind, CloudResourceProvider, Gvk};
pub use manifest::{Manifest, ResourceSpec};
pub use metadata::CloudResourceMetadata;
pub use reference::{to_string_array, StringValueOrRef, ValueFromRef};
pub use schema::{FieldSchema, FieldType, MessageSchema};
pub use validation::{FieldViolation, ValidationResult};
