//! The module contract and its uniform entry point.

use async_trait::async_trait;
use mcf_manifest::{CloudResourceKind, ResourceSpec};
use tracing::{info, warn};

use crate::engine::{Engine, ProviderHandle, ProviderRequest, ResourceHandle, ResourceRequest};
use crate::error::{ModuleError, ModuleResult, WrapErr};
use crate::property::PropertyValue;
use crate::provider::{setup_provider, EngineProvider};
use crate::stack_input::{load_stack_input, StackInput, StackInputSource};

/// A resource module: turns one manifest kind into engine resources.
#[async_trait]
pub trait ResourceModule: Send + Sync + 'static {
    type Provider: EngineProvider;
    type Spec: ResourceSpec;

    /// Keys this module exports.
    const OUTPUTS: &'static [&'static str];

    /// Register the kind's resources and export its outputs.
    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()>;
}

/// Object-safe view of a module, for registries and the CLI.
#[async_trait]
pub trait StackModule: Send + Sync {
    fn kind(&self) -> CloudResourceKind;

    fn outputs(&self) -> &'static [&'static str];

    async fn run(&self, engine: &dyn Engine, source: &dyn StackInputSource) -> ModuleResult<()>;
}

#[async_trait]
impl<M: ResourceModule> StackModule for M {
    fn kind(&self) -> CloudResourceKind {
        M::Spec::KIND
    }

    fn outputs(&self) -> &'static [&'static str] {
        M::OUTPUTS
    }

    async fn run(&self, engine: &dyn Engine, source: &dyn StackInputSource) -> ModuleResult<()> {
        run_module(self, engine, source).await
    }
}

/// Load, validate, configure the provider, then provision.
pub async fn run_module<M: ResourceModule>(
    module: &M,
    engine: &dyn Engine,
    source: &dyn StackInputSource,
) -> ModuleResult<()> {
    let kind = M::Spec::KIND;
    let input: StackInput<M::Provider, M::Spec> =
        load_stack_input(source).wrap_err("failed to load stack-input")?;
    info!("Running {} module for '{}'", kind, input.target.metadata.name);

    let validation = input.target.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if let Some(violation) = validation.first_error() {
        return Err(ModuleError::ValidationFailed {
            field: violation.field.clone(),
            reason: violation.reason.clone(),
        });
    }

    let engine = DeclaredOutputs {
        inner: engine,
        kind,
        keys: M::OUTPUTS,
    };
    let provider = setup_provider(&engine, input.provider_config.as_ref()).await?;
    module.resources(&engine, &input, &provider).await?;

    info!("{} module finished", kind);
    Ok(())
}

/// Engine view that only accepts exports under a module's declared keys.
struct DeclaredOutputs<'a> {
    inner: &'a dyn Engine,
    kind: CloudResourceKind,
    keys: &'static [&'static str],
}

#[async_trait]
impl Engine for DeclaredOutputs<'_> {
    async fn register_provider(&self, request: ProviderRequest) -> ModuleResult<ProviderHandle> {
        self.inner.register_provider(request).await
    }

    async fn register_resource(&self, request: ResourceRequest) -> ModuleResult<ResourceHandle> {
        self.inner.register_resource(request).await
    }

    async fn export(&self, key: &str, value: PropertyValue) -> ModuleResult<()> {
        if !self.keys.contains(&key) {
            return Err(ModuleError::UndeclaredOutput {
                kind: self.kind.to_string(),
                key: key.to_string(),
            });
        }
        self.inner.export(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingEngine;
    use crate::stack_input::InlineSource;
    use mcf_manifest::kinds::aws::AwsS3BucketSpec;
    use mcf_provider::AwsProviderConfig;

    const INPUT: &str = r#"
target:
  apiVersion: aws.openmcf.org/v1
  kind: AwsS3Bucket
  metadata:
    name: acme-assets
  spec:
    awsRegion: us-east-1
"#;

    /// Exports one declared key, then a misspelled one.
    struct MisspelledOutputModule;

    #[async_trait]
    impl ResourceModule for MisspelledOutputModule {
        type Provider = AwsProviderConfig;
        type Spec = AwsS3BucketSpec;

        const OUTPUTS: &'static [&'static str] = &["bucket_id", "bucket_arn"];

        async fn resources(
            &self,
            engine: &dyn Engine,
            input: &StackInput<Self::Provider, Self::Spec>,
            _provider: &ProviderHandle,
        ) -> ModuleResult<()> {
            engine
                .export("bucket_id", input.target.metadata.name.clone().into())
                .await?;
            engine.export("bucket_rn", "arn:aws:s3:::acme-assets".into()).await
        }
    }

    #[tokio::test]
    async fn test_undeclared_output_is_rejected() {
        let engine = RecordingEngine::default();
        let err = MisspelledOutputModule
            .run(&engine, &InlineSource::new(INPUT))
            .await
            .unwrap_err();

        assert!(
            matches!(err, ModuleError::UndeclaredOutput { ref key, .. } if key == "bucket_rn"),
            "{}",
            err
        );
        assert!(engine.output("bucket_id").is_some());
        assert!(engine.output("bucket_rn").is_none());
    }
}
