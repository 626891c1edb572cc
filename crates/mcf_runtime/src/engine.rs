//! The provisioning engine seam.

use async_trait::async_trait;
use mcf_manifest::CloudResourceProvider;
use serde::Serialize;

use crate::error::ModuleResult;
use crate::property::{OutputRef, PropertyMap, PropertyValue};

/// Request to configure a provider instance.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub provider: CloudResourceProvider,
    pub name: String,
    pub args: PropertyMap,
}

/// A configured provider instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderHandle {
    pub urn: String,
    pub provider: CloudResourceProvider,
    pub name: String,
}

/// Request to register one resource in the graph.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    /// Engine type token, e.g. `aws:route53/record:Record`.
    pub type_token: String,
    /// Logical name, unique per type token.
    pub name: String,
    pub args: PropertyMap,
    pub provider: Option<ProviderHandle>,
    /// Explicit ordering edges.
    pub depends_on: Vec<ResourceHandle>,
}

impl ResourceRequest {
    pub fn new(type_token: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_token: type_token.into(),
            name: name.into(),
            args: PropertyMap::new(),
            provider: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: PropertyMap) -> Self {
        self.args = args;
        self
    }

    pub fn with_provider(mut self, provider: &ProviderHandle) -> Self {
        self.provider = Some(provider.clone());
        self
    }

    pub fn depends_on(mut self, resource: &ResourceHandle) -> Self {
        self.depends_on.push(resource.clone());
        self
    }
}

/// A registered resource. Its properties are only available as outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceHandle {
    pub urn: String,
    pub type_token: String,
    pub name: String,
}

impl ResourceHandle {
    /// Deferred value of one of this resource's properties.
    pub fn output(&self, property: impl Into<String>) -> OutputRef {
        OutputRef {
            urn: self.urn.clone(),
            resource: self.name.clone(),
            property: property.into(),
        }
    }

    /// The provider-assigned id.
    pub fn id(&self) -> OutputRef {
        self.output("id")
    }
}

/// The resource-graph engine a module drives.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Configure a provider that later resources can be bound to.
    async fn register_provider(&self, request: ProviderRequest) -> ModuleResult<ProviderHandle>;

    /// Add a resource to the graph.
    async fn register_resource(&self, request: ResourceRequest) -> ModuleResult<ResourceHandle>;

    /// Publish a stack output.
    async fn export(&self, key: &str, value: PropertyValue) -> ModuleResult<()>;
}

/// URN of a resource in a stack.
pub fn resource_urn(stack: &str, type_token: &str, name: &str) -> String {
    format!("urn:mcf:{}::{}::{}", stack, type_token, name)
}

/// Type token of a provider instance.
pub fn provider_type_token(provider: CloudResourceProvider) -> String {
    format!("pulumi:providers:{}", provider.as_str())
}
