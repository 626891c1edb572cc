//! `CivoDnsRecord` module.

use async_trait::async_trait;
use mcf_manifest::kinds::civo::CivoDnsRecordSpec;
use mcf_manifest::Manifest;
use mcf_provider::CivoProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

use crate::dns::TypeGatedFields;

pub const RECORD_TYPE_TOKEN: &str = "civo:index/dnsDomainRecord:DnsDomainRecord";

pub mod outputs {
    pub const RECORD_ID: &str = "record_id";
    pub const HOSTNAME: &str = "hostname";
    pub const RECORD_TYPE: &str = "record_type";
    pub const ACCOUNT_ID: &str = "account_id";

    pub const ALL: &[&str] = &[RECORD_ID, HOSTNAME, RECORD_TYPE, ACCOUNT_ID];
}

pub struct CivoDnsRecordLocals {
    pub record: Manifest<CivoDnsRecordSpec>,
    pub zone_id: String,
}

impl CivoDnsRecordLocals {
    pub fn initialize(input: &StackInput<CivoProviderConfig, CivoDnsRecordSpec>) -> ModuleResult<Self> {
        let record = input.target.clone();
        let zone_id = record.spec.zone_id.get_value()?.to_string();
        Ok(Self { record, zone_id })
    }
}

pub async fn dns_record(
    engine: &dyn Engine,
    locals: &CivoDnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    let args = TypeGatedFields::new().with_priority(spec.priority).apply(
        spec.record_type,
        PropertyMap::new()
            .with("domainId", &locals.zone_id)
            .with("name", &spec.name)
            .with("type", spec.record_type.as_str())
            .with("value", &spec.value)
            .with("ttl", spec.effective_ttl()),
    );

    engine
        .register_resource(
            ResourceRequest::new(RECORD_TYPE_TOKEN, &locals.record.metadata.name)
                .with_args(args)
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create DNS record {}", spec.name))
}

pub struct CivoDnsRecordModule;

#[async_trait]
impl ResourceModule for CivoDnsRecordModule {
    type Provider = CivoProviderConfig;
    type Spec = CivoDnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = CivoDnsRecordLocals::initialize(input)?;
        let record = dns_record(engine, &locals, provider).await?;
        info!("Created Civo DNS record {}", locals.record.spec.name);

        engine.export(outputs::RECORD_ID, record.id().into()).await?;
        engine.export(outputs::HOSTNAME, record.output("name").into()).await?;
        engine
            .export(outputs::RECORD_TYPE, locals.record.spec.record_type.as_str().into())
            .await?;
        engine.export(outputs::ACCOUNT_ID, record.output("accountId").into()).await
    }
}
