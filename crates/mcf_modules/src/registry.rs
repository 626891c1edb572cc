//! Module registry keyed by resource kind.

use std::collections::HashMap;
use std::sync::Arc;

use mcf_manifest::CloudResourceKind;
use mcf_runtime::{ModuleError, ModuleResult, OutputRegistry, StackModule};
use tracing::debug;

use crate::aws::{AwsRoute53DnsRecordModule, AwsS3BucketModule};
use crate::azure::{AzureDnsRecordModule, AzureVirtualMachineModule};
use crate::civo::CivoDnsRecordModule;
use crate::cloudflare::{CloudflareDnsRecordModule, CloudflareDnsZoneModule};
use crate::digitalocean::{DigitalOceanDnsRecordModule, DigitalOceanVpcModule};
use crate::gcp::{GcpComputeInstanceModule, GcpDnsRecordModule};
use crate::kubernetes::KubernetesGatewayApiCrdsModule;

/// A registry of resource modules.
///
/// Each module is registered under the kind it provisions, so a manifest's
/// `kind` is enough to find the code that deploys it.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<CloudResourceKind, Arc<dyn StackModule>>,
}

impl ModuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registry holding a module for every kind in the catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AwsRoute53DnsRecordModule));
        registry.register(Arc::new(AwsS3BucketModule));
        registry.register(Arc::new(AzureDnsRecordModule));
        registry.register(Arc::new(AzureVirtualMachineModule));
        registry.register(Arc::new(CivoDnsRecordModule));
        registry.register(Arc::new(CloudflareDnsRecordModule));
        registry.register(Arc::new(CloudflareDnsZoneModule));
        registry.register(Arc::new(DigitalOceanDnsRecordModule));
        registry.register(Arc::new(DigitalOceanVpcModule));
        registry.register(Arc::new(GcpComputeInstanceModule));
        registry.register(Arc::new(GcpDnsRecordModule));
        registry.register(Arc::new(KubernetesGatewayApiCrdsModule));
        registry
    }

    /// Register a module under its `kind()`, replacing any previous one.
    pub fn register(&mut self, module: Arc<dyn StackModule>) {
        let kind = module.kind();
        debug!("Registering module: {}", kind.as_str());
        self.modules.insert(kind, module);
    }

    pub fn get(&self, kind: CloudResourceKind) -> Option<Arc<dyn StackModule>> {
        self.modules.get(&kind).cloned()
    }

    /// Get a module by kind, returning an error if none is registered.
    pub fn get_required(&self, kind: CloudResourceKind) -> ModuleResult<Arc<dyn StackModule>> {
        self.get(kind)
            .ok_or_else(|| ModuleError::ModuleNotFound(kind.as_str().to_string()))
    }

    pub fn contains(&self, kind: CloudResourceKind) -> bool {
        self.modules.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<CloudResourceKind> {
        let mut kinds: Vec<_> = self.modules.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn unregister(&mut self, kind: CloudResourceKind) -> Option<Arc<dyn StackModule>> {
        debug!("Unregistering module: {}", kind.as_str());
        self.modules.remove(&kind)
    }

    /// Output contract of every registered module.
    pub fn output_registry(&self) -> OutputRegistry {
        let mut outputs = OutputRegistry::new();
        for (kind, module) in &self.modules {
            outputs.register(*kind, module.outputs());
        }
        outputs
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.kinds())
            .finish()
    }
}
