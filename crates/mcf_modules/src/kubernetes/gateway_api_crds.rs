//! `KubernetesGatewayApiCrds` module.
//!
//! Applies the upstream Gateway API release manifest for the chosen version
//! and channel. The CRDs are cluster scoped, so nothing here is namespaced.

use async_trait::async_trait;
use mcf_manifest::kinds::kubernetes::KubernetesGatewayApiCrdsSpec;
use mcf_manifest::Manifest;
use mcf_provider::KubernetesProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub const CONFIG_FILE_TYPE_TOKEN: &str = "kubernetes:yaml/v2:ConfigFile";

pub mod outputs {
    pub const INSTALLED_VERSION: &str = "installed_version";
    pub const INSTALL_CHANNEL: &str = "install_channel";

    pub const ALL: &[&str] = &[INSTALLED_VERSION, INSTALL_CHANNEL];
}

pub struct GatewayApiCrdsLocals {
    pub crds: Manifest<KubernetesGatewayApiCrdsSpec>,
    pub version: String,
    pub channel: &'static str,
    pub manifest_url: String,
}

impl GatewayApiCrdsLocals {
    pub fn initialize(
        input: &StackInput<KubernetesProviderConfig, KubernetesGatewayApiCrdsSpec>,
    ) -> Self {
        let crds = input.target.clone();
        Self {
            version: crds.spec.version().to_string(),
            channel: crds.spec.channel().as_str(),
            manifest_url: crds.spec.manifest_url(),
            crds,
        }
    }
}

pub async fn crd_manifest(
    engine: &dyn Engine,
    locals: &GatewayApiCrdsLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    engine
        .register_resource(
            ResourceRequest::new(CONFIG_FILE_TYPE_TOKEN, &locals.crds.metadata.name)
                .with_args(PropertyMap::new().with("file", &locals.manifest_url))
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to apply gateway api crds from {}", locals.manifest_url))
}

pub struct KubernetesGatewayApiCrdsModule;

#[async_trait]
impl ResourceModule for KubernetesGatewayApiCrdsModule {
    type Provider = KubernetesProviderConfig;
    type Spec = KubernetesGatewayApiCrdsSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = GatewayApiCrdsLocals::initialize(input);
        crd_manifest(engine, &locals, provider).await?;
        info!("Installed Gateway API CRDs {} ({} channel)", locals.version, locals.channel);

        engine.export(outputs::INSTALLED_VERSION, locals.version.clone().into()).await?;
        engine.export(outputs::INSTALL_CHANNEL, locals.channel.into()).await
    }
}
