//! Kubernetes modules.

pub mod gateway_api_crds;

pub use gateway_api_crds::KubernetesGatewayApiCrdsModule;
