//! `AzureVirtualMachine` module: network interface, optional public IP,
//! then the VM itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mcf_manifest::kinds::azure::{
    AzureVirtualMachineSpec, PublicIpAllocation, PublicIpSku, OS_DISK_STORAGE_ACCOUNT_TYPE,
};
use mcf_manifest::{Manifest, ResourceSpec};
use mcf_provider::AzureProviderConfig;
use mcf_runtime::labels::{build_provider_labels, merge_user_labels};
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, PropertyValue, ProviderHandle, ResourceHandle,
    ResourceModule, ResourceRequest, StackInput, WrapErr,
};
use tracing::{debug, info};

pub const NETWORK_INTERFACE_TYPE_TOKEN: &str = "azure-native:network:NetworkInterface";
pub const PUBLIC_IP_TYPE_TOKEN: &str = "azure-native:network:PublicIPAddress";
pub const VIRTUAL_MACHINE_TYPE_TOKEN: &str = "azure-native:compute:VirtualMachine";

pub mod outputs {
    pub const VM_ID: &str = "vm_id";
    pub const VM_NAME: &str = "vm_name";
    pub const PRIVATE_IP_ADDRESS: &str = "private_ip_address";
    pub const PUBLIC_IP_ADDRESS: &str = "public_ip_address";
    pub const COMPUTER_NAME: &str = "computer_name";
    pub const NETWORK_INTERFACE_ID: &str = "network_interface_id";
    pub const AVAILABILITY_ZONE: &str = "availability_zone";
    pub const SYSTEM_ASSIGNED_IDENTITY_PRINCIPAL_ID: &str = "system_assigned_identity_principal_id";

    pub const ALL: &[&str] = &[
        VM_ID,
        VM_NAME,
        PRIVATE_IP_ADDRESS,
        PUBLIC_IP_ADDRESS,
        COMPUTER_NAME,
        NETWORK_INTERFACE_ID,
        AVAILABILITY_ZONE,
        SYSTEM_ASSIGNED_IDENTITY_PRINCIPAL_ID,
    ];
}

pub struct VirtualMachineLocals {
    pub vm: Manifest<AzureVirtualMachineSpec>,
    pub subnet_id: String,
    pub network_security_group_id: Option<String>,
    pub admin_password: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl VirtualMachineLocals {
    pub fn initialize(input: &StackInput<AzureProviderConfig, AzureVirtualMachineSpec>) -> ModuleResult<Self> {
        let vm = input.target.clone();
        let spec = &vm.spec;

        let subnet_id = spec.subnet_id.get_value()?.to_string();
        let network_security_group_id = match spec.network.as_ref().and_then(|n| n.network_security_group_id.as_ref()) {
            Some(nsg) if !nsg.is_empty() => Some(nsg.get_value()?.to_string()),
            _ => None,
        };
        let admin_password = match spec.admin_password.as_ref() {
            Some(password) if !password.is_empty() => Some(password.get_value()?.to_string()),
            _ => None,
        };

        let labels = build_provider_labels(&vm.metadata, AzureVirtualMachineSpec::KIND);
        let tags = merge_user_labels(&labels, &spec.tags);

        Ok(Self {
            vm,
            subnet_id,
            network_security_group_id,
            admin_password,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.vm.metadata.name
    }

    fn zones(&self) -> Option<Vec<String>> {
        let zone = &self.vm.spec.availability_zone;
        Some(vec![zone.clone()]).filter(|_| !zone.is_empty())
    }
}

pub async fn network_interface(
    engine: &dyn Engine,
    locals: &VirtualMachineLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.vm.spec;
    let nic_name = format!("{}-nic", locals.name());
    let accelerated = spec
        .network
        .as_ref()
        .and_then(|n| n.enable_accelerated_networking)
        .filter(|enabled| *enabled);

    let args = PropertyMap::new()
        .with("networkInterfaceName", &nic_name)
        .with("resourceGroupName", &spec.resource_group)
        .with("location", &spec.region)
        .with(
            "ipConfigurations",
            vec![PropertyMap::new()
                .with("name", "primary")
                .with("primary", true)
                .with("privateIPAllocationMethod", "Dynamic")
                .with("subnet", PropertyMap::new().with("id", &locals.subnet_id))],
        )
        .with_opt("enableAcceleratedNetworking", accelerated)
        .with_opt(
            "networkSecurityGroup",
            locals
                .network_security_group_id
                .as_ref()
                .map(|id| PropertyMap::new().with("id", id)),
        )
        .with("tags", &locals.tags);

    engine
        .register_resource(
            ResourceRequest::new(NETWORK_INTERFACE_TYPE_TOKEN, nic_name)
                .with_args(args)
                .with_provider(provider),
        )
        .await
        .wrap_err("failed to create network interface")
}

/// Public IP, only when the network config asks for one.
pub async fn public_ip(
    engine: &dyn Engine,
    locals: &VirtualMachineLocals,
    provider: &ProviderHandle,
) -> ModuleResult<Option<ResourceHandle>> {
    let spec = &locals.vm.spec;
    let network = match spec.network.as_ref().filter(|n| n.enable_public_ip) {
        Some(network) => network,
        None => return Ok(None),
    };

    let pip_name = format!("{}-pip", locals.name());
    let sku = network.public_ip_sku.unwrap_or(PublicIpSku::Standard);
    let allocation = network.public_ip_allocation.unwrap_or(PublicIpAllocation::Static);

    let args = PropertyMap::new()
        .with("publicIpAddressName", &pip_name)
        .with("resourceGroupName", &spec.resource_group)
        .with("location", &spec.region)
        .with("publicIPAllocationMethod", allocation.as_str())
        .with("sku", PropertyMap::new().with("name", sku.as_str()))
        .with_opt("zones", locals.zones())
        .with("tags", &locals.tags);

    let handle = engine
        .register_resource(
            ResourceRequest::new(PUBLIC_IP_TYPE_TOKEN, pip_name)
                .with_args(args)
                .with_provider(provider),
        )
        .await
        .wrap_err("failed to create public IP")?;
    Ok(Some(handle))
}

fn os_profile(locals: &VirtualMachineLocals) -> PropertyMap {
    let spec = &locals.vm.spec;
    let admin_username = spec.admin_username();

    let linux_configuration = Some(&spec.ssh_public_key)
        .filter(|key| !key.is_empty())
        .map(|key| {
            PropertyMap::new().with("disablePasswordAuthentication", true).with(
                "ssh",
                PropertyMap::new().with(
                    "publicKeys",
                    vec![PropertyMap::new()
                        .with("path", format!("/home/{}/.ssh/authorized_keys", admin_username))
                        .with("keyData", key)],
                ),
            )
        });

    PropertyMap::new()
        .with("computerName", locals.name())
        .with("adminUsername", admin_username)
        .with_opt("linuxConfiguration", linux_configuration)
        .with_opt(
            "adminPassword",
            locals.admin_password.clone().map(PropertyValue::secret),
        )
}

fn storage_profile(locals: &VirtualMachineLocals) -> PropertyMap {
    let image_reference = locals.vm.spec.image.as_ref().map(|image| {
        if image.is_custom() {
            PropertyMap::new().with("id", &image.custom_image_id)
        } else {
            PropertyMap::new()
                .with("publisher", &image.publisher)
                .with("offer", &image.offer)
                .with("sku", &image.sku)
                .with("version", image.effective_version())
        }
    });

    PropertyMap::new()
        .with_opt("imageReference", image_reference)
        .with(
            "osDisk",
            PropertyMap::new()
                .with("name", format!("{}-osdisk", locals.name()))
                .with("createOption", "FromImage")
                .with("caching", "ReadWrite")
                .with(
                    "managedDisk",
                    PropertyMap::new().with("storageAccountType", OS_DISK_STORAGE_ACCOUNT_TYPE),
                )
                .with("deleteOption", "Delete"),
        )
}

pub fn virtual_machine_args(locals: &VirtualMachineLocals, nic: &ResourceHandle) -> PropertyMap {
    let spec = &locals.vm.spec;

    let mut args = PropertyMap::new()
        .with("vmName", locals.name())
        .with("resourceGroupName", &spec.resource_group)
        .with("location", &spec.region)
        .with("hardwareProfile", PropertyMap::new().with("vmSize", spec.vm_size()))
        .with(
            "networkProfile",
            PropertyMap::new().with(
                "networkInterfaces",
                vec![PropertyMap::new().with("id", nic.id()).with("primary", true)],
            ),
        )
        .with("osProfile", os_profile(locals))
        .with("storageProfile", storage_profile(locals))
        .with_opt("zones", locals.zones())
        .with("tags", &locals.tags);

    if spec.enable_system_assigned_identity {
        args.insert("identity", PropertyMap::new().with("type", "SystemAssigned"));
    }
    if spec.is_spot_instance {
        args.insert("priority", "Spot");
        args.insert("evictionPolicy", "Deallocate");
        if let Some(max_price) = spec.spot_billing_max_price() {
            args.insert("billingProfile", PropertyMap::new().with("maxPrice", max_price));
        }
    }
    if spec.boot_diagnostics_enabled() {
        args.insert(
            "diagnosticsProfile",
            PropertyMap::new().with("bootDiagnostics", PropertyMap::new().with("enabled", true)),
        );
    }
    args
}

pub async fn virtual_machine(
    engine: &dyn Engine,
    locals: &VirtualMachineLocals,
    nic: &ResourceHandle,
    public_ip: Option<&ResourceHandle>,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let mut request = ResourceRequest::new(VIRTUAL_MACHINE_TYPE_TOKEN, locals.name())
        .with_args(virtual_machine_args(locals, nic))
        .with_provider(provider)
        .depends_on(nic);
    if let Some(pip) = public_ip {
        request = request.depends_on(pip);
    }

    engine
        .register_resource(request)
        .await
        .wrap_err_with(|| format!("failed to create virtual machine {}", locals.name()))
}

pub struct AzureVirtualMachineModule;

#[async_trait]
impl ResourceModule for AzureVirtualMachineModule {
    type Provider = AzureProviderConfig;
    type Spec = AzureVirtualMachineSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = VirtualMachineLocals::initialize(input)?;
        let nic = network_interface(engine, &locals, provider).await?;
        let pip = public_ip(engine, &locals, provider).await?;
        debug!("Public IP for {}: {}", locals.name(), pip.is_some());
        let vm = virtual_machine(engine, &locals, &nic, pip.as_ref(), provider).await?;
        info!("Created Azure virtual machine {}", locals.name());

        let spec = &locals.vm.spec;
        engine.export(outputs::VM_ID, vm.id().into()).await?;
        engine.export(outputs::VM_NAME, vm.output("name").into()).await?;
        engine.export(outputs::NETWORK_INTERFACE_ID, nic.id().into()).await?;
        engine
            .export(
                outputs::PRIVATE_IP_ADDRESS,
                nic.output("ipConfigurations[0].privateIPAddress").into(),
            )
            .await?;
        if let Some(pip) = &pip {
            engine
                .export(outputs::PUBLIC_IP_ADDRESS, pip.output("ipAddress").into())
                .await?;
        }
        if !spec.availability_zone.is_empty() {
            engine
                .export(outputs::AVAILABILITY_ZONE, spec.availability_zone.clone().into())
                .await?;
        }
        engine.export(outputs::COMPUTER_NAME, locals.name().into()).await?;
        if spec.enable_system_assigned_identity {
            engine
                .export(
                    outputs::SYSTEM_ASSIGNED_IDENTITY_PRINCIPAL_ID,
                    vm.output("identity.principalId").into(),
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_runtime::{InlineSource, RecordingEngine, StackModule};

    const INPUT: &str = r#"
providerConfig:
  clientId: app-id
  clientSecret: s3cret
  subscriptionId: sub-1
  tenantId: tenant-1
target:
  apiVersion: azure.openmcf.org/v1
  kind: AzureVirtualMachine
  metadata:
    name: web-vm
  spec:
    region: eastus
    resourceGroup: web-rg
    subnetId: /subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/web
    sshPublicKey: ssh-ed25519 AAAAC3Nza user@host
    image:
      publisher: Canonical
      offer: ubuntu-24_04-lts
      sku: server
    network:
      enablePublicIp: true
"#;

    async fn run(input: &str) -> RecordingEngine {
        let engine = RecordingEngine::default();
        AzureVirtualMachineModule
            .run(&engine, &InlineSource::new(input))
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_resources_in_order() {
        let engine = run(INPUT).await;
        let names: Vec<_> = engine.resources().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["web-vm-nic", "web-vm-pip", "web-vm"]);

        let nic = engine.resource(NETWORK_INTERFACE_TYPE_TOKEN, "web-vm-nic").unwrap();
        let pip = engine.resource(PUBLIC_IP_TYPE_TOKEN, "web-vm-pip").unwrap();
        let vm = engine.resource(VIRTUAL_MACHINE_TYPE_TOKEN, "web-vm").unwrap();
        assert_eq!(vm.depends_on, vec![nic.urn, pip.urn]);
    }

    #[tokio::test]
    async fn test_defaults() {
        let engine = run(INPUT).await;
        let vm = engine.resource(VIRTUAL_MACHINE_TYPE_TOKEN, "web-vm").unwrap();

        let size = vm.args.get("hardwareProfile").and_then(|h| h.get("vmSize"));
        assert_eq!(size.and_then(|v| v.as_str()), Some("Standard_D2s_v3"));

        let os = vm.args.get("osProfile").unwrap();
        assert_eq!(os.get("adminUsername").and_then(|v| v.as_str()), Some("azureuser"));
        let key_path = os
            .get("linuxConfiguration")
            .and_then(|l| l.get("ssh"))
            .and_then(|s| s.get("publicKeys"))
            .and_then(|k| k.as_array())
            .and_then(|k| k[0].get("path"))
            .and_then(|p| p.as_str());
        assert_eq!(key_path, Some("/home/azureuser/.ssh/authorized_keys"));

        let image = vm.args.get("storageProfile").and_then(|s| s.get("imageReference")).unwrap();
        assert_eq!(image.get("version").and_then(|v| v.as_str()), Some("latest"));
        assert!(vm.args.contains_key("diagnosticsProfile"));
        assert!(!vm.args.contains_key("priority"));

        let pip = engine.resource(PUBLIC_IP_TYPE_TOKEN, "web-vm-pip").unwrap();
        assert_eq!(pip.arg_str("publicIPAllocationMethod"), Some("Static"));
        assert_eq!(pip.args.get("sku").and_then(|s| s.get("name")).and_then(|v| v.as_str()), Some("Standard"));
        assert!(engine.output(outputs::PUBLIC_IP_ADDRESS).is_some());
    }

    #[tokio::test]
    async fn test_spot_without_public_ip() {
        let input = INPUT.replace(
            "    network:\n      enablePublicIp: true\n",
            "    isSpotInstance: true\n    spotMaxPrice: -1\n    availabilityZone: \"2\"\n",
        );
        let engine = run(&input).await;

        assert!(engine.resources_of_type(PUBLIC_IP_TYPE_TOKEN).is_empty());
        let vm = engine.resource(VIRTUAL_MACHINE_TYPE_TOKEN, "web-vm").unwrap();
        assert_eq!(vm.arg_str("priority"), Some("Spot"));
        assert_eq!(vm.arg_str("evictionPolicy"), Some("Deallocate"));
        assert!(vm.args.contains_key("billingProfile"));
        assert_eq!(vm.depends_on.len(), 1);
        assert!(engine.output(outputs::PUBLIC_IP_ADDRESS).is_none());
        assert_eq!(
            engine.output(outputs::AVAILABILITY_ZONE).and_then(|v| v.as_str().map(String::from)),
            Some("2".to_string())
        );
    }

    #[tokio::test]
    async fn test_unresolved_subnet_reference() {
        let input = INPUT.replace(
            "    subnetId: /subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/web\n",
            "    subnetId:\n      valueFrom:\n        kind: AzureSubnet\n        name: web\n        fieldPath: status.outputs.subnet_id\n",
        );
        let engine = RecordingEngine::default();
        let err = AzureVirtualMachineModule
            .run(&engine, &InlineSource::new(input))
            .await
            .unwrap_err();
        assert!(matches!(err.root_cause(), mcf_runtime::ModuleError::UnresolvedReference { .. }));
        assert_eq!(engine.resource_count(), 0);
    }
}
