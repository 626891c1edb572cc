//! Integration tests for the module entry point.

use std::fs;

use async_trait::async_trait;
use mcf_manifest::kinds::digitalocean::DigitalOceanVpcSpec;
use mcf_provider::DigitalOceanProviderConfig;
use mcf_runtime::{
    Engine, FileSource, InlineSource, ModuleError, ModuleResult, PropertyMap, ProviderHandle,
    RecordingEngine, ResourceModule, ResourceRequest, StackInput, StackModule,
};
use tempfile::tempdir;

struct VpcModule;

#[async_trait]
impl ResourceModule for VpcModule {
    type Provider = DigitalOceanProviderConfig;
    type Spec = DigitalOceanVpcSpec;

    const OUTPUTS: &'static [&'static str] = &["vpc_id"];

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let vpc = engine
            .register_resource(
                ResourceRequest::new("digitalocean:index/vpc:Vpc", &input.target.metadata.name)
                    .with_args(PropertyMap::new().with("region", input.target.spec.region.as_str()))
                    .with_provider(provider),
            )
            .await?;
        engine.export("vpc_id", vpc.id().into()).await
    }
}

const INPUT: &str = r#"
providerConfig:
  apiToken: dop_v1_abc
  defaultRegion: nyc3
target:
  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanVpc
  metadata:
    name: prod-vpc
    env: production
  spec:
    region: nyc3
    ipRangeCidr: 10.10.0.0/16
"#;

#[tokio::test]
async fn test_runs_module_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stack-input.yaml");
    fs::write(&path, INPUT).unwrap();

    let engine = RecordingEngine::default();
    VpcModule.run(&engine, &FileSource::new(&path)).await.unwrap();

    assert_eq!(engine.providers().len(), 1);
    let vpc = engine.resource("digitalocean:index/vpc:Vpc", "prod-vpc").unwrap();
    assert_eq!(vpc.arg_str("region"), Some("nyc3"));
    assert!(engine.output("vpc_id").is_some());
}

#[tokio::test]
async fn test_bad_stack_input_is_wrapped() {
    let engine = RecordingEngine::default();
    let err = VpcModule
        .run(&engine, &InlineSource::new("providerConfig: {}\n"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to load stack-input");
    assert!(matches!(err.root_cause(), ModuleError::BadStackInput(_)));
    assert_eq!(engine.resource_count(), 0);
}

#[tokio::test]
async fn test_validation_runs_before_provider_setup() {
    let engine = RecordingEngine::default();
    let input = INPUT.replace("10.10.0.0/16", "10.10.0.0/8");
    let err = VpcModule.run(&engine, &InlineSource::new(input)).await.unwrap_err();

    match err {
        ModuleError::ValidationFailed { field, .. } => assert_eq!(field, "spec.ipRangeCidr"),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(engine.providers().is_empty());
}

#[tokio::test]
async fn test_missing_provider_config() {
    let engine = RecordingEngine::default();
    let input = INPUT.replace("providerConfig:\n  apiToken: dop_v1_abc\n  defaultRegion: nyc3\n", "");
    let err = VpcModule.run(&engine, &InlineSource::new(input)).await.unwrap_err();

    assert_eq!(err.failed_provider(), Some("digitalocean"));
    assert_eq!(engine.resource_count(), 0);
}

#[test]
fn test_object_safe_metadata() {
    let module: &dyn StackModule = &VpcModule;
    assert_eq!(module.outputs(), &["vpc_id"]);
    assert_eq!(module.kind().as_str(), "DigitalOceanVpc");
}
