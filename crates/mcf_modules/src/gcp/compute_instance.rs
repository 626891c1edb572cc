//! `GcpComputeInstance` module: one Compute Engine VM.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mcf_manifest::kinds::gcp::{GcpComputeInstanceSpec, GcpNetworkInterface};
use mcf_manifest::{Manifest, ResourceSpec};
use mcf_provider::GcpProviderConfig;
use mcf_runtime::labels::{build_gcp_labels, merge_user_labels};
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub const INSTANCE_TYPE_TOKEN: &str = "gcp:compute/instance:Instance";

pub mod outputs {
    pub const INSTANCE_NAME: &str = "instance_name";
    pub const INSTANCE_ID: &str = "instance_id";
    pub const SELF_LINK: &str = "self_link";
    pub const INTERNAL_IP: &str = "internal_ip";
    pub const EXTERNAL_IP: &str = "external_ip";
    pub const ZONE: &str = "zone";

    pub const ALL: &[&str] = &[INSTANCE_NAME, INSTANCE_ID, SELF_LINK, INTERNAL_IP, EXTERNAL_IP, ZONE];
}

/// A network interface with its references resolved.
#[derive(Debug, Clone)]
pub struct ResolvedNetworkInterface<'a> {
    pub network: String,
    pub subnetwork: Option<String>,
    pub spec: &'a GcpNetworkInterface,
}

pub struct ComputeInstanceLocals {
    pub instance: Manifest<GcpComputeInstanceSpec>,
    pub project_id: String,
    pub service_account_email: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl ComputeInstanceLocals {
    pub fn initialize(input: &StackInput<GcpProviderConfig, GcpComputeInstanceSpec>) -> ModuleResult<Self> {
        let instance = input.target.clone();
        let project_id = instance.spec.project_id.get_value()?.to_string();
        let service_account_email = match &instance.spec.service_account {
            Some(sa) => Some(sa.email.get_value()?.to_string()),
            None => None,
        };
        let system = build_gcp_labels(&instance.metadata, GcpComputeInstanceSpec::KIND);
        let labels = merge_user_labels(&system, &instance.spec.labels);
        Ok(Self {
            instance,
            project_id,
            service_account_email,
            labels,
        })
    }

    pub fn network_interfaces(&self) -> ModuleResult<Vec<ResolvedNetworkInterface<'_>>> {
        let mut resolved = Vec::with_capacity(self.instance.spec.network_interfaces.len());
        for nic in &self.instance.spec.network_interfaces {
            let subnetwork = match nic.subnetwork.as_ref().filter(|s| !s.is_empty()) {
                Some(subnetwork) => Some(subnetwork.get_value()?.to_string()),
                None => None,
            };
            resolved.push(ResolvedNetworkInterface {
                network: nic.network.get_value()?.to_string(),
                subnetwork,
                spec: nic,
            });
        }
        Ok(resolved)
    }

    /// True when the first interface gets an external address.
    pub fn has_external_ip(&self) -> bool {
        self.instance
            .spec
            .network_interfaces
            .first()
            .map(|nic| !nic.access_configs.is_empty())
            .unwrap_or(false)
    }
}

fn network_interface_args(nic: &ResolvedNetworkInterface<'_>) -> PropertyMap {
    let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());

    let access_configs: Vec<PropertyMap> = nic
        .spec
        .access_configs
        .iter()
        .map(|ac| {
            PropertyMap::new()
                .with_opt("natIp", non_empty(&ac.nat_ip))
                .with_opt("networkTier", non_empty(&ac.network_tier))
        })
        .collect();
    let alias_ip_ranges: Vec<PropertyMap> = nic
        .spec
        .alias_ip_ranges
        .iter()
        .map(|r| {
            PropertyMap::new()
                .with("ipCidrRange", &r.ip_cidr_range)
                .with_opt("subnetworkRangeName", non_empty(&r.subnetwork_range_name))
        })
        .collect();

    PropertyMap::new()
        .with("network", &nic.network)
        .with_opt("subnetwork", nic.subnetwork.clone())
        .with_opt("accessConfigs", Some(access_configs).filter(|a| !a.is_empty()))
        .with_opt("aliasIpRanges", Some(alias_ip_ranges).filter(|a| !a.is_empty()))
}

fn scheduling_args(spec: &GcpComputeInstanceSpec) -> Option<PropertyMap> {
    if !spec.preemptible && !spec.spot {
        return None;
    }
    let scheduling = PropertyMap::new()
        .with("preemptible", true)
        .with("automaticRestart", false)
        .with("onHostMaintenance", "TERMINATE");
    Some(if spec.spot {
        scheduling.with("provisioningModel", "SPOT")
    } else {
        scheduling
    })
}

pub fn instance_args(locals: &ComputeInstanceLocals) -> ModuleResult<PropertyMap> {
    let spec = &locals.instance.spec;
    let boot_disk = &spec.boot_disk;

    let network_interfaces: Vec<PropertyMap> = locals
        .network_interfaces()?
        .iter()
        .map(network_interface_args)
        .collect();

    let service_account = spec.service_account.as_ref().map(|sa| {
        PropertyMap::new()
            .with_opt("email", locals.service_account_email.clone())
            .with("scopes", sa.effective_scopes())
    });

    Ok(PropertyMap::new()
        .with("name", &locals.instance.metadata.name)
        .with("project", &locals.project_id)
        .with("zone", &spec.zone)
        .with("machineType", &spec.machine_type)
        .with(
            "bootDisk",
            PropertyMap::new().with("autoDelete", boot_disk.auto_delete()).with(
                "initializeParams",
                PropertyMap::new()
                    .with("image", &boot_disk.image)
                    .with_opt("size", boot_disk.size_gb)
                    .with("type", boot_disk.disk_type()),
            ),
        )
        .with("networkInterfaces", network_interfaces)
        .with("labels", &locals.labels)
        .with("deletionProtection", spec.deletion_protection)
        .with("allowStoppingForUpdate", spec.allow_stopping_for_update())
        .with_opt("tags", Some(spec.tags.clone()).filter(|t| !t.is_empty()))
        .with_opt("metadata", Some(&spec.metadata).filter(|m| !m.is_empty()))
        .with_opt(
            "metadataStartupScript",
            Some(spec.startup_script.clone()).filter(|s| !s.is_empty()),
        )
        .with_opt("serviceAccount", service_account)
        .with_opt("scheduling", scheduling_args(spec)))
}

pub async fn compute_instance(
    engine: &dyn Engine,
    locals: &ComputeInstanceLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let name = &locals.instance.metadata.name;
    engine
        .register_resource(
            ResourceRequest::new(INSTANCE_TYPE_TOKEN, name)
                .with_args(instance_args(locals)?)
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create compute instance {}", name))
}

pub struct GcpComputeInstanceModule;

#[async_trait]
impl ResourceModule for GcpComputeInstanceModule {
    type Provider = GcpProviderConfig;
    type Spec = GcpComputeInstanceSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = ComputeInstanceLocals::initialize(input)?;
        let instance = compute_instance(engine, &locals, provider).await?;
        info!(
            "Created compute instance {} in {}",
            locals.instance.metadata.name, locals.instance.spec.zone
        );

        engine.export(outputs::INSTANCE_NAME, instance.output("name").into()).await?;
        engine.export(outputs::INSTANCE_ID, instance.output("instanceId").into()).await?;
        engine.export(outputs::SELF_LINK, instance.output("selfLink").into()).await?;
        engine
            .export(outputs::INTERNAL_IP, instance.output("networkInterfaces[0].networkIp").into())
            .await?;
        if locals.has_external_ip() {
            engine
                .export(
                    outputs::EXTERNAL_IP,
                    instance.output("networkInterfaces[0].accessConfigs[0].natIp").into(),
                )
                .await?;
        }
        engine
            .export(outputs::ZONE, locals.instance.spec.zone.clone().into())
            .await
    }
}
