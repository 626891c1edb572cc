//! `DigitalOceanDnsRecord` module.

use async_trait::async_trait;
use mcf_manifest::kinds::digitalocean::{digitalocean_hostname, DigitalOceanDnsRecordSpec};
use mcf_manifest::Manifest;
use mcf_provider::DigitalOceanProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

use crate::dns::TypeGatedFields;

pub const RECORD_TYPE_TOKEN: &str = "digitalocean:index/dnsRecord:DnsRecord";

pub mod outputs {
    pub const RECORD_ID: &str = "record_id";
    pub const HOSTNAME: &str = "hostname";
    pub const RECORD_TYPE: &str = "record_type";
    pub const DOMAIN: &str = "domain";
    pub const TTL_SECONDS: &str = "ttl_seconds";

    pub const ALL: &[&str] = &[RECORD_ID, HOSTNAME, RECORD_TYPE, DOMAIN, TTL_SECONDS];
}

pub struct DigitalOceanDnsRecordLocals {
    pub record: Manifest<DigitalOceanDnsRecordSpec>,
    pub domain: String,
    pub value: String,
    pub ttl_seconds: u32,
}

impl DigitalOceanDnsRecordLocals {
    pub fn initialize(
        input: &StackInput<DigitalOceanProviderConfig, DigitalOceanDnsRecordSpec>,
    ) -> ModuleResult<Self> {
        let record = input.target.clone();
        let domain = record.spec.domain.get_value()?.to_string();
        let value = record.spec.value.get_value()?.to_string();
        let ttl_seconds = record.spec.effective_ttl();
        Ok(Self {
            record,
            domain,
            value,
            ttl_seconds,
        })
    }

    pub fn hostname(&self) -> String {
        digitalocean_hostname(&self.record.spec.name, &self.domain)
    }
}

pub async fn dns_record(
    engine: &dyn Engine,
    locals: &DigitalOceanDnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    let args = TypeGatedFields::new()
        .with_priority(spec.priority)
        .with_weight(spec.weight)
        .with_port(spec.port)
        .with_flags(spec.flags)
        .with_tag(spec.tag.clone())
        .apply(
            spec.record_type,
            PropertyMap::new()
                .with("domain", &locals.domain)
                .with("name", &spec.name)
                .with("type", spec.record_type.as_str())
                .with("value", &locals.value)
                .with("ttl", locals.ttl_seconds),
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

pub struct DigitalOceanDnsRecordModule;

#[async_trait]
impl ResourceModule for DigitalOceanDnsRecordModule {
    type Provider = DigitalOceanProviderConfig;
    type Spec = DigitalOceanDnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = DigitalOceanDnsRecordLocals::initialize(input)?;
        let record = dns_record(engine, &locals, provider).await?;
        info!("Created DigitalOcean DNS record {}", locals.hostname());

        engine.export(outputs::RECORD_ID, record.id().into()).await?;
        engine.export(outputs::HOSTNAME, locals.hostname().into()).await?;
        engine
            .export(outputs::RECORD_TYPE, locals.record.spec.record_type.as_str().into())
            .await?;
        engine.export(outputs::DOMAIN, locals.domain.clone().into()).await?;
        engine.export(outputs::TTL_SECONDS, locals.ttl_seconds.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_runtime::{InlineSource, RecordingEngine, StackModule};

    const INPUT: &str = r#"
providerConfig:
  apiToken: dop_v1_abc
  defaultRegion: nyc3
target:
  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanDnsRecord
  metadata:
    name: sip-srv
  spec:
    domain: example.com
    name: _sip._tcp
    type: SRV
    value: sip.example.com
    priority: 10
    weight: 5
    port: 5060
"#;

    #[tokio::test]
    async fn test_srv_record() {
        let engine = RecordingEngine::default();
        DigitalOceanDnsRecordModule
            .run(&engine, &InlineSource::new(INPUT))
            .await
            .unwrap();

        let record = engine.resource(RECORD_TYPE_TOKEN, "sip-srv").unwrap();
        assert_eq!(record.args.get("port").and_then(|v| v.as_i64()), Some(5060));
        assert_eq!(record.args.get("weight").and_then(|v| v.as_i64()), Some(5));
        assert_eq!(record.args.get("ttl").and_then(|v| v.as_i64()), Some(1800));
        assert!(!record.args.contains_key("tag"));

        let hostname = engine.output(outputs::HOSTNAME).unwrap();
        assert_eq!(hostname.as_str(), Some("_sip._tcp.example.com"));
        assert_eq!(engine.output(outputs::TTL_SECONDS).and_then(|v| v.as_i64()), Some(1800));
    }

    #[tokio::test]
    async fn test_apex_hostname() {
        let engine = RecordingEngine::default();
        let input = INPUT
            .replace("name: _sip._tcp", "name: \"@\"")
            .replace("type: SRV", "type: A")
            .replace("value: sip.example.com", "value: 192.0.2.1")
            .replace("    priority: 10\n    weight: 5\n    port: 5060\n", "");
        DigitalOceanDnsRecordModule
            .run(&engine, &InlineSource::new(input))
            .await
            .unwrap();

        assert_eq!(engine.output(outputs::HOSTNAME).unwrap().as_str(), Some("example.com"));
        let record = engine.resource(RECORD_TYPE_TOKEN, "sip-srv").unwrap();
        assert!(!record.args.contains_key("priority"));
    }

    #[tokio::test]
    async fn test_mx_and_srv_without_optional_fields() {
        let engine = RecordingEngine::default();
        let input = INPUT
            .replace("name: _sip._tcp", "name: \"@\"")
            .replace("type: SRV", "type: MX")
            .replace("value: sip.example.com", "value: mail.example.com.")
            .replace("    priority: 10\n    weight: 5\n    port: 5060\n", "");
        DigitalOceanDnsRecordModule
            .run(&engine, &InlineSource::new(input))
            .await
            .unwrap();
        let record = engine.resource(RECORD_TYPE_TOKEN, "sip-srv").unwrap();
        assert_eq!(record.args.get("priority").and_then(|v| v.as_i64()), Some(0));
        assert!(!record.args.contains_key("weight"));

        let engine = RecordingEngine::default();
        let input = INPUT.replace("    priority: 10\n    weight: 5\n", "");
        DigitalOceanDnsRecordModule
            .run(&engine, &InlineSource::new(input))
            .await
            .unwrap();
        let record = engine.resource(RECORD_TYPE_TOKEN, "sip-srv").unwrap();
        assert_eq!(record.args.get("priority").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(record.args.get("weight").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(record.args.get("port").and_then(|v| v.as_i64()), Some(5060));
    }
}
