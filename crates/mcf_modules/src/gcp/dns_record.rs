//! `GcpDnsRecord` module: one Cloud DNS record set.

use async_trait::async_trait;
use mcf_manifest::kinds::gcp::GcpDnsRecordSpec;
use mcf_manifest::Manifest;
use mcf_provider::GcpProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub const RECORD_SET_TYPE_TOKEN: &str = "gcp:dns/recordSet:RecordSet";

pub mod outputs {
    pub const FQDN: &str = "fqdn";
    pub const RECORD_TYPE: &str = "record_type";
    pub const MANAGED_ZONE: &str = "managed_zone";
    pub const PROJECT_ID: &str = "project_id";
    pub const TTL_SECONDS: &str = "ttl_seconds";

    pub const ALL: &[&str] = &[FQDN, RECORD_TYPE, MANAGED_ZONE, PROJECT_ID, TTL_SECONDS];
}

pub struct GcpDnsRecordLocals {
    pub record: Manifest<GcpDnsRecordSpec>,
    pub project_id: String,
    pub managed_zone: String,
    pub ttl_seconds: u32,
}

impl GcpDnsRecordLocals {
    pub fn initialize(input: &StackInput<GcpProviderConfig, GcpDnsRecordSpec>) -> ModuleResult<Self> {
        let record = input.target.clone();
        let project_id = record.spec.project_id.get_value()?.to_string();
        let managed_zone = record.spec.managed_zone.get_value()?.to_string();
        let ttl_seconds = record.spec.effective_ttl();
        Ok(Self {
            record,
            project_id,
            managed_zone,
            ttl_seconds,
        })
    }
}

pub async fn record_set(
    engine: &dyn Engine,
    locals: &GcpDnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    engine
        .register_resource(
            ResourceRequest::new(RECORD_SET_TYPE_TOKEN, &locals.record.metadata.name)
                .with_args(
                    PropertyMap::new()
                        .with("project", &locals.project_id)
                        .with("managedZone", &locals.managed_zone)
                        .with("name", &spec.name)
                        .with("type", spec.record_type.as_str())
                        .with("ttl", locals.ttl_seconds)
                        .with("rrdatas", spec.values.clone()),
                )
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create DNS record {}", spec.name))
}

pub struct GcpDnsRecordModule;

#[async_trait]
impl ResourceModule for GcpDnsRecordModule {
    type Provider = GcpProviderConfig;
    type Spec = GcpDnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = GcpDnsRecordLocals::initialize(input)?;
        let record = record_set(engine, &locals, provider).await?;
        info!("Created Cloud DNS record {} in {}", locals.record.spec.name, locals.managed_zone);

        engine.export(outputs::FQDN, record.output("name").into()).await?;
        engine
            .export(outputs::RECORD_TYPE, locals.record.spec.record_type.as_str().into())
            .await?;
        engine.export(outputs::MANAGED_ZONE, locals.managed_zone.clone().into()).await?;
        engine.export(outputs::PROJECT_ID, locals.project_id.clone().into()).await?;
        engine.export(outputs::TTL_SECONDS, locals.ttl_seconds.into()).await
    }
}
