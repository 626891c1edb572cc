//! `CloudflareDnsRecord` module.

use async_trait::async_trait;
use mcf_manifest::kinds::cloudflare::CloudflareDnsRecordSpec;
use mcf_manifest::{DnsRecordType, Manifest};
use mcf_provider::CloudflareProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, PropertyValue, ProviderHandle, ResourceHandle,
    ResourceModule, ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

use crate::dns::TypeGatedFields;

pub const RECORD_TYPE_TOKEN: &str = "cloudflare:index/dnsRecord:DnsRecord";

pub mod outputs {
    pub const RECORD_ID: &str = "record_id";
    pub const HOSTNAME: &str = "hostname";
    pub const RECORD_TYPE: &str = "record_type";
    pub const PROXIED: &str = "proxied";

    pub const ALL: &[&str] = &[RECORD_ID, HOSTNAME, RECORD_TYPE, PROXIED];
}

/// Fields of one Cloudflare record, shared with zone-embedded records.
pub struct CloudflareRecordFields<'a> {
    pub name: &'a str,
    pub record_type: DnsRecordType,
    pub value: &'a str,
    pub ttl: u32,
    pub proxied: bool,
    pub priority: Option<u32>,
    pub comment: &'a str,
}

/// Record arguments; `zone_id` may be a literal or a zone output.
pub fn record_args(zone_id: impl Into<PropertyValue>, fields: &CloudflareRecordFields<'_>) -> PropertyMap {
    let comment = Some(fields.comment).filter(|c| !c.is_empty());
    TypeGatedFields::new()
        .with_proxied(fields.proxied)
        .with_priority(fields.priority)
        .apply(
            fields.record_type,
            PropertyMap::new()
                .with("zoneId", zone_id)
                .with("name", fields.name)
                .with("type", fields.record_type.as_str())
                .with("content", fields.value)
                .with("ttl", fields.ttl)
                .with_opt("comment", comment),
        )
}

pub struct CloudflareDnsRecordLocals {
    pub record: Manifest<CloudflareDnsRecordSpec>,
    pub zone_id: String,
}

impl CloudflareDnsRecordLocals {
    pub fn initialize(input: &StackInput<CloudflareProviderConfig, CloudflareDnsRecordSpec>) -> ModuleResult<Self> {
        let record = input.target.clone();
        let zone_id = record.spec.zone_id.get_value()?.to_string();
        Ok(Self { record, zone_id })
    }
}

pub async fn dns_record(
    engine: &dyn Engine,
    locals: &CloudflareDnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    let fields = CloudflareRecordFields {
        name: &spec.name,
        record_type: spec.record_type,
        value: &spec.value,
        ttl: spec.effective_ttl(),
        proxied: spec.proxied,
        priority: spec.priority,
        comment: &spec.comment,
    };

    engine
        .register_resource(
            ResourceRequest::new(RECORD_TYPE_TOKEN, &locals.record.metadata.name)
                .with_args(record_args(locals.zone_id.as_str(), &fields))
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create DNS record {}", spec.name))
}

pub struct CloudflareDnsRecordModule;

#[async_trait]
impl ResourceModule for CloudflareDnsRecordModule {
    type Provider = CloudflareProviderConfig;
    type Spec = CloudflareDnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = CloudflareDnsRecordLocals::initialize(input)?;
        let record = dns_record(engine, &locals, provider).await?;
        info!("Created Cloudflare DNS record {}", locals.record.spec.name);

        engine.export(outputs::RECORD_ID, record.id().into()).await?;
        engine.export(outputs::HOSTNAME, record.output("name").into()).await?;
        engine
            .export(outputs::RECORD_TYPE, locals.record.spec.record_type.as_str().into())
            .await?;
        engine.export(outputs::PROXIED, record.output("proxied").into()).await
    }
}
