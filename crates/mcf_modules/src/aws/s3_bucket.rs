//! `AwsS3Bucket` module: the bucket, its public access block and,
//! when enabled, versioning.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mcf_manifest::kinds::aws::AwsS3BucketSpec;
use mcf_manifest::{Manifest, ResourceSpec};
use mcf_provider::AwsProviderConfig;
use mcf_runtime::labels::{build_labels, merge_user_labels};
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub const BUCKET_TYPE_TOKEN: &str = "aws:s3/bucketV2:BucketV2";
pub const VERSIONING_TYPE_TOKEN: &str = "aws:s3/bucketVersioningV2:BucketVersioningV2";
pub const PUBLIC_ACCESS_BLOCK_TYPE_TOKEN: &str = "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock";

pub mod outputs {
    pub const BUCKET_ID: &str = "bucket_id";
    pub const BUCKET_ARN: &str = "bucket_arn";
    pub const REGION: &str = "region";
    pub const BUCKET_REGIONAL_DOMAIN_NAME: &str = "bucket_regional_domain_name";

    pub const ALL: &[&str] = &[BUCKET_ID, BUCKET_ARN, REGION, BUCKET_REGIONAL_DOMAIN_NAME];
}

pub struct S3BucketLocals {
    pub bucket: Manifest<AwsS3BucketSpec>,
    /// System labels overlaid with the spec's tags.
    pub tags: BTreeMap<String, String>,
}

impl S3BucketLocals {
    pub fn initialize(input: &StackInput<AwsProviderConfig, AwsS3BucketSpec>) -> Self {
        let bucket = input.target.clone();
        let labels = build_labels(&bucket.metadata, AwsS3BucketSpec::KIND);
        let tags = merge_user_labels(&labels, &bucket.spec.tags);
        Self { bucket, tags }
    }

    fn name(&self) -> &str {
        &self.bucket.metadata.name
    }
}

pub async fn bucket(
    engine: &dyn Engine,
    locals: &S3BucketLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.bucket.spec;
    engine
        .register_resource(
            ResourceRequest::new(BUCKET_TYPE_TOKEN, locals.name())
                .with_args(
                    PropertyMap::new()
                        .with("bucket", locals.name())
                        .with("region", &spec.aws_region)
                        .with("forceDestroy", spec.force_destroy)
                        .with("tags", &locals.tags),
                )
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create S3 bucket {}", locals.name()))
}

/// Private buckets block every form of public access.
pub async fn public_access_block(
    engine: &dyn Engine,
    locals: &S3BucketLocals,
    bucket: &ResourceHandle,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let block = !locals.bucket.spec.is_public;
    engine
        .register_resource(
            ResourceRequest::new(PUBLIC_ACCESS_BLOCK_TYPE_TOKEN, format!("{}-public-access-block", locals.name()))
                .with_args(
                    PropertyMap::new()
                        .with("bucket", bucket.id())
                        .with("blockPublicAcls", block)
                        .with("blockPublicPolicy", block)
                        .with("ignorePublicAcls", block)
                        .with("restrictPublicBuckets", block),
                )
                .with_provider(provider)
                .depends_on(bucket),
        )
        .await
        .wrap_err("failed to create bucket public access block")
}

pub async fn versioning(
    engine: &dyn Engine,
    locals: &S3BucketLocals,
    bucket: &ResourceHandle,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    engine
        .register_resource(
            ResourceRequest::new(VERSIONING_TYPE_TOKEN, format!("{}-versioning", locals.name()))
                .with_args(
                    PropertyMap::new()
                        .with("bucket", bucket.id())
                        .with(
                            "versioningConfiguration",
                            PropertyMap::new().with("status", "Enabled"),
                        ),
                )
                .with_provider(provider)
                .depends_on(bucket),
        )
        .await
        .wrap_err("failed to enable bucket versioning")
}

pub struct AwsS3BucketModule;

#[async_trait]
impl ResourceModule for AwsS3BucketModule {
    type Provider = AwsProviderConfig;
    type Spec = AwsS3BucketSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = S3BucketLocals::initialize(input);
        let created = bucket(engine, &locals, provider).await?;
        public_access_block(engine, &locals, &created, provider).await?;
        if locals.bucket.spec.versioning_enabled {
            versioning(engine, &locals, &created, provider).await?;
        }
        info!("Created S3 bucket {}", locals.name());

        engine.export(outputs::BUCKET_ID, created.id().into()).await?;
        engine.export(outputs::BUCKET_ARN, created.output("arn").into()).await?;
        engine
            .export(outputs::REGION, locals.bucket.spec.aws_region.clone().into())
            .await?;
        engine
            .export(
                outputs::BUCKET_REGIONAL_DOMAIN_NAME,
                created.output("bucketRegionalDomainName").into(),
            )
            .await
    }
}
