//! In-memory engine that records the resource graph.
//!
//! Backs module tests and `mcf preview`. Nothing is provisioned; every
//! registration is checked and appended to the graph.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mcf_manifest::CloudResourceProvider;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::{
    provider_type_token, resource_urn, Engine, ProviderHandle, ProviderRequest, ResourceHandle,
    ResourceRequest,
};
use crate::error::{ModuleError, ModuleResult};
use crate::property::{PropertyMap, PropertyValue};

pub const DEFAULT_STACK: &str = "dev";

/// A provider registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedProvider {
    pub urn: String,
    pub provider: CloudResourceProvider,
    pub name: String,
    pub args: PropertyMap,
}

/// A resource registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedResource {
    pub urn: String,
    #[serde(rename = "type")]
    pub type_token: String,
    pub name: String,
    pub args: PropertyMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl RecordedResource {
    /// String argument by name.
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(PropertyValue::as_str)
    }
}

/// Snapshot of the recorded graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub stack: String,
    pub providers: Vec<RecordedProvider>,
    pub resources: Vec<RecordedResource>,
    pub outputs: BTreeMap<String, PropertyValue>,
}

impl PreviewReport {
    pub fn to_yaml(&self) -> ModuleResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> ModuleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Engine that records registrations instead of provisioning them.
#[derive(Clone)]
pub struct RecordingEngine {
    stack: String,
    providers: Arc<RwLock<Vec<RecordedProvider>>>,
    resources: Arc<RwLock<Vec<RecordedResource>>>,
    outputs: Arc<RwLock<BTreeMap<String, PropertyValue>>>,
    /// Type tokens whose registration fails.
    failing_types: Arc<RwLock<HashSet<String>>>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STACK)
    }
}

impl RecordingEngine {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            providers: Arc::new(RwLock::new(Vec::new())),
            resources: Arc::new(RwLock::new(Vec::new())),
            outputs: Arc::new(RwLock::new(BTreeMap::new())),
            failing_types: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every registration of `type_token` fail.
    pub fn fail_on(self, type_token: impl Into<String>) -> Self {
        self.failing_types.write().insert(type_token.into());
        self
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn providers(&self) -> Vec<RecordedProvider> {
        self.providers.read().clone()
    }

    /// Resources in registration order.
    pub fn resources(&self) -> Vec<RecordedResource> {
        self.resources.read().clone()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.read().len()
    }

    pub fn resource(&self, type_token: &str, name: &str) -> Option<RecordedResource> {
        self.resources
            .read()
            .iter()
            .find(|r| r.type_token == type_token && r.name == name)
            .cloned()
    }

    pub fn resources_of_type(&self, type_token: &str) -> Vec<RecordedResource> {
        self.resources
            .read()
            .iter()
            .filter(|r| r.type_token == type_token)
            .cloned()
            .collect()
    }

    /// Registration position of a resource, by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.resources.read().iter().position(|r| r.name == name)
    }

    pub fn outputs(&self) -> BTreeMap<String, PropertyValue> {
        self.outputs.read().clone()
    }

    pub fn output(&self, key: &str) -> Option<PropertyValue> {
        self.outputs.read().get(key).cloned()
    }

    pub fn preview(&self) -> PreviewReport {
        PreviewReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            stack: self.stack.clone(),
            providers: self.providers(),
            resources: self.resources(),
            outputs: self.outputs(),
        }
    }

    fn is_known(&self, urn: &str) -> bool {
        self.resources.read().iter().any(|r| r.urn == urn)
            || self.providers.read().iter().any(|p| p.urn == urn)
    }
}

#[async_trait]
impl Engine for RecordingEngine {
    async fn register_provider(&self, request: ProviderRequest) -> ModuleResult<ProviderHandle> {
        let type_token = provider_type_token(request.provider);
        let urn = resource_urn(&self.stack, &type_token, &request.name);
        let mut providers = self.providers.write();
        if providers.iter().any(|p| p.urn == urn) {
            return Err(ModuleError::DuplicateResource {
                type_token,
                name: request.name,
            });
        }

        debug!("Registered provider {}", urn);
        providers.push(RecordedProvider {
            urn: urn.clone(),
            provider: request.provider,
            name: request.name.clone(),
            args: request.args,
        });
        Ok(ProviderHandle {
            urn,
            provider: request.provider,
            name: request.name,
        })
    }

    async fn register_resource(&self, request: ResourceRequest) -> ModuleResult<ResourceHandle> {
        if self.failing_types.read().contains(&request.type_token) {
            return Err(ModuleError::ResourceCreationFailed {
                kind: request.type_token,
                name: request.name,
                cause: "simulated failure".to_string(),
            });
        }

        let urn = resource_urn(&self.stack, &request.type_token, &request.name);

        // One write guard covers the duplicate check and the insert.
        let mut resources = self.resources.write();
        let providers = self.providers.read();
        let known = |urn: &str| {
            resources.iter().any(|r| r.urn == urn) || providers.iter().any(|p| p.urn == urn)
        };
        if known(urn.as_str()) {
            return Err(ModuleError::DuplicateResource {
                type_token: request.type_token,
                name: request.name,
            });
        }

        let provider = request.provider.as_ref().map(|p| p.urn.clone());
        let mut edges: Vec<String> = request.depends_on.iter().map(|d| d.urn.clone()).collect();
        edges.extend(provider.iter().cloned());
        edges.extend(request.args.output_refs().into_iter().map(|r| r.urn.clone()));
        if let Some(missing) = edges.into_iter().find(|urn| !known(urn.as_str())) {
            return Err(ModuleError::UnknownDependency {
                name: request.name,
                urn: missing,
            });
        }
        drop(providers);

        debug!("Registered resource {}", urn);
        resources.push(RecordedResource {
            urn: urn.clone(),
            type_token: request.type_token.clone(),
            name: request.name.clone(),
            args: request.args,
            provider,
            depends_on: request.depends_on.iter().map(|d| d.urn.clone()).collect(),
        });
        Ok(ResourceHandle {
            urn,
            type_token: request.type_token,
            name: request.name,
        })
    }

    async fn export(&self, key: &str, value: PropertyValue) -> ModuleResult<()> {
        let mut outputs = self.outputs.write();
        if outputs.contains_key(key) {
            return Err(ModuleError::DuplicateOutput(key.to_string()));
        }
        for r in value.output_refs() {
            if !self.is_known(&r.urn) {
                return Err(ModuleError::UnknownDependency {
                    name: key.to_string(),
                    urn: r.urn.clone(),
                });
            }
        }
        debug!("Exported output {}", key);
        outputs.insert(key.to_string(), value);
        Ok(())
    }
}
