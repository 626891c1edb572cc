//! `DigitalOceanVpc` module.

use async_trait::async_trait;
use mcf_manifest::kinds::digitalocean::DigitalOceanVpcSpec;
use mcf_manifest::Manifest;
use mcf_provider::DigitalOceanProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub const VPC_TYPE_TOKEN: &str = "digitalocean:index/vpc:Vpc";

pub mod outputs {
    pub const VPC_ID: &str = "vpc_id";
    pub const URN: &str = "urn";
    pub const IP_RANGE: &str = "ip_range";

    pub const ALL: &[&str] = &[VPC_ID, URN, IP_RANGE];
}

pub struct DigitalOceanVpcLocals {
    pub vpc: Manifest<DigitalOceanVpcSpec>,
}

impl DigitalOceanVpcLocals {
    pub fn initialize(input: &StackInput<DigitalOceanProviderConfig, DigitalOceanVpcSpec>) -> Self {
        Self {
            vpc: input.target.clone(),
        }
    }
}

pub async fn vpc(
    engine: &dyn Engine,
    locals: &DigitalOceanVpcLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.vpc.spec;
    let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());

    engine
        .register_resource(
            ResourceRequest::new(VPC_TYPE_TOKEN, &locals.vpc.metadata.name)
                .with_args(
                    PropertyMap::new()
                        .with("name", &locals.vpc.metadata.name)
                        .with("region", spec.region.as_str())
                        .with_opt("ipRange", non_empty(&spec.ip_range_cidr))
                        .with_opt("description", non_empty(&spec.description)),
                )
                .with_provider(provider),
        )
        .await
        .wrap_err("failed to create vpc")
}

pub struct DigitalOceanVpcModule;

#[async_trait]
impl ResourceModule for DigitalOceanVpcModule {
    type Provider = DigitalOceanProviderConfig;
    type Spec = DigitalOceanVpcSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = DigitalOceanVpcLocals::initialize(input);
        let created = vpc(engine, &locals, provider).await?;
        info!("Created DigitalOcean VPC {}", locals.vpc.metadata.name);

        engine.export(outputs::VPC_ID, created.id().into()).await?;
        engine.export(outputs::URN, created.output("urn").into()).await?;
        engine.export(outputs::IP_RANGE, created.output("ipRange").into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_runtime::{InlineSource, RecordingEngine, StackModule};

    #[tokio::test]
    async fn test_auto_allocated_range() {
        let input = r#"
providerConfig:
  apiToken: dop_v1_abc
  defaultRegion: sfo3
target:
  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanVpc
  metadata:
    name: staging-vpc
  spec:
    region: sfo3
"#;
        let engine = RecordingEngine::default();
        DigitalOceanVpcModule.run(&engine, &InlineSource::new(input)).await.unwrap();

        let vpc = engine.resource(VPC_TYPE_TOKEN, "staging-vpc").unwrap();
        assert_eq!(vpc.arg_str("region"), Some("sfo3"));
        assert!(!vpc.args.contains_key("ipRange"));
        assert!(engine.output(outputs::IP_RANGE).is_some());
    }
}
