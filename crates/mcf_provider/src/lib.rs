//! # mcf_provider
//!
//! Provider credentials and the CLI help catalog for OpenMCF modules.
//!
//! ## Features
//!
//! - One credential record per provider, accepting camelCase or snake_case YAML
//! - Static catalog: environment variables, `export` help, example config, docs link
//! - Guidance text for missing or invalid provider configs
//! - Conversion of credentials into provider SDK environment variables
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcf_provider::{load_provider_config, AwsProviderConfig, ProviderCredential};
//! use std::path::Path;
//!
//! let aws: AwsProviderConfig = load_provider_config(Path::new("aws-provider-config.yaml")).unwrap();
//! for (key, _) in aws.to_env_vars().unwrap() {
//!     println!("{}", key);
//! }
//! ```

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod guidance;
pub mod loader;

pub use catalog::{catalog, catalog_entry, ProviderCatalogEntry, ProviderHelp};
pub use credentials::{
    AwsProviderConfig, AzureProviderConfig, CivoProviderConfig, CloudflareProviderConfig,
    ConfluentProviderConfig, DigitalOceanProviderConfig, GcpProviderConfig, KubeconfigSource,
    KubernetesProviderConfig, ProviderCredential,
};
pub use error::{ProviderError, ProviderResult};
pub use guidance::{
    invalid_provider_config_guidance, kind_detection_error_guidance,
    missing_provider_config_guidance,
};
pub use loader::{load_provider_config, parse_provider_config};
