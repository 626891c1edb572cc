//! `CloudflareDnsZone` module: the zone, then each embedded record.

use async_trait::async_trait;
use mcf_manifest::kinds::cloudflare::CloudflareDnsZoneSpec;
use mcf_manifest::Manifest;
use mcf_provider::CloudflareProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::{debug, info};

use super::dns_record::{record_args, CloudflareRecordFields, RECORD_TYPE_TOKEN};

pub const ZONE_TYPE_TOKEN: &str = "cloudflare:index/zone:Zone";

pub mod outputs {
    pub const ZONE_ID: &str = "zone_id";
    pub const NAMESERVERS: &str = "nameservers";

    pub const ALL: &[&str] = &[ZONE_ID, NAMESERVERS];
}

pub struct CloudflareDnsZoneLocals {
    pub zone: Manifest<CloudflareDnsZoneSpec>,
}

impl CloudflareDnsZoneLocals {
    pub fn initialize(input: &StackInput<CloudflareProviderConfig, CloudflareDnsZoneSpec>) -> Self {
        Self {
            zone: input.target.clone(),
        }
    }
}

pub async fn dns_zone(
    engine: &dyn Engine,
    locals: &CloudflareDnsZoneLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.zone.spec;
    engine
        .register_resource(
            ResourceRequest::new(ZONE_TYPE_TOKEN, &locals.zone.metadata.name)
                .with_args(
                    PropertyMap::new()
                        .with("account", PropertyMap::new().with("id", &spec.account_id))
                        .with("name", &spec.zone_name)
                        .with("paused", spec.paused),
                )
                .with_provider(provider),
        )
        .await
        .wrap_err("failed to create cloudflare zone")
}

/// One record per entry, named `<name>-<TYPE>-<index>`, each after the zone.
pub async fn records(
    engine: &dyn Engine,
    locals: &CloudflareDnsZoneLocals,
    zone: &ResourceHandle,
    provider: &ProviderHandle,
) -> ModuleResult<Vec<ResourceHandle>> {
    let mut created = Vec::with_capacity(locals.zone.spec.records.len());
    for (index, record) in locals.zone.spec.records.iter().enumerate() {
        let resource_name = record.resource_name(index);
        let fields = CloudflareRecordFields {
            name: &record.name,
            record_type: record.record_type,
            value: &record.value,
            ttl: record.effective_ttl(),
            proxied: record.proxied,
            priority: record.priority,
            comment: &record.comment,
        };

        debug!("Registering zone record {}", resource_name);
        let handle = engine
            .register_resource(
                ResourceRequest::new(RECORD_TYPE_TOKEN, &resource_name)
                    .with_args(record_args(zone.id(), &fields))
                    .with_provider(provider)
                    .depends_on(zone),
            )
            .await
            .wrap_err_with(|| format!("failed to create dns record {}", resource_name))?;
        created.push(handle);
    }
    Ok(created)
}

pub struct CloudflareDnsZoneModule;

#[async_trait]
impl ResourceModule for CloudflareDnsZoneModule {
    type Provider = CloudflareProviderConfig;
    type Spec = CloudflareDnsZoneSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = CloudflareDnsZoneLocals::initialize(input);
        let zone = dns_zone(engine, &locals, provider).await?;
        let created = records(engine, &locals, &zone, provider)
            .await
            .wrap_err("failed to create dns records")?;
        info!(
            "Created Cloudflare zone {} with {} records",
            locals.zone.spec.zone_name,
            created.len()
        );

        engine.export(outputs::ZONE_ID, zone.id().into()).await?;
        engine.export(outputs::NAMESERVERS, zone.output("nameServers").into()).await
    }
}
