//! `AzureDnsRecord` module.
//!
//! Azure models every record type as its own resource, so the record type
//! picks both the type token and the shape of `records`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mcf_manifest::kinds::azure::AzureDnsRecordSpec;
use mcf_manifest::{DnsRecordType, Manifest, ResourceSpec};
use mcf_provider::AzureProviderConfig;
use mcf_runtime::labels::build_provider_labels;
use mcf_runtime::{
    Engine, ModuleError, ModuleResult, PropertyMap, PropertyValue, ProviderHandle, ResourceHandle,
    ResourceModule, ResourceRequest, StackInput, WrapErr,
};
use tracing::info;

pub mod outputs {
    pub const RECORD_ID: &str = "record_id";
    pub const FQDN: &str = "fqdn";

    pub const ALL: &[&str] = &[RECORD_ID, FQDN];
}

/// Resource type token for a record type.
pub fn record_type_token(record_type: DnsRecordType) -> ModuleResult<&'static str> {
    let token = match record_type {
        DnsRecordType::A => "azure:dns/aRecord:ARecord",
        DnsRecordType::Aaaa => "azure:dns/aaaaRecord:AaaaRecord",
        DnsRecordType::Cname => "azure:dns/cNameRecord:CNameRecord",
        DnsRecordType::Mx => "azure:dns/mxRecord:MxRecord",
        DnsRecordType::Txt => "azure:dns/txtRecord:TxtRecord",
        DnsRecordType::Srv => "azure:dns/srvRecord:SrvRecord",
        DnsRecordType::Ns => "azure:dns/nsRecord:NsRecord",
        DnsRecordType::Caa => "azure:dns/caaRecord:CaaRecord",
        DnsRecordType::Ptr => "azure:dns/ptrRecord:PtrRecord",
        DnsRecordType::Soa => {
            return Err(ModuleError::ValidationFailed {
                field: "spec.type".to_string(),
                reason: "SOA records are managed by the zone".to_string(),
            })
        }
    };
    Ok(token)
}

pub struct AzureDnsRecordLocals {
    pub record: Manifest<AzureDnsRecordSpec>,
    pub zone_name: String,
    pub tags: BTreeMap<String, String>,
}

impl AzureDnsRecordLocals {
    pub fn initialize(input: &StackInput<AzureProviderConfig, AzureDnsRecordSpec>) -> ModuleResult<Self> {
        let record = input.target.clone();
        let zone_name = record.spec.zone_name.get_value()?.to_string();
        let tags = build_provider_labels(&record.metadata, AzureDnsRecordSpec::KIND);
        Ok(Self {
            record,
            zone_name,
            tags,
        })
    }
}

/// The type-specific part of the record arguments.
pub fn record_values(spec: &AzureDnsRecordSpec) -> ModuleResult<(&'static str, PropertyValue)> {
    let values = &spec.values;
    let each = |f: &dyn Fn(&String) -> PropertyMap| -> PropertyValue {
        values.iter().map(f).collect::<Vec<_>>().into()
    };

    let shaped = match spec.record_type {
        DnsRecordType::Cname => {
            if values.len() != 1 {
                return Err(ModuleError::ValidationFailed {
                    field: "spec.values".to_string(),
                    reason: "a CNAME record holds exactly one value".to_string(),
                });
            }
            ("record", values[0].clone().into())
        }
        DnsRecordType::Mx => (
            "records",
            each(&|v| {
                PropertyMap::new()
                    .with("preference", spec.effective_priority().to_string())
                    .with("exchange", v)
            }),
        ),
        DnsRecordType::Txt => ("records", each(&|v| PropertyMap::new().with("value", v))),
        DnsRecordType::Srv => (
            "records",
            each(&|v| {
                PropertyMap::new()
                    .with("priority", spec.effective_priority())
                    .with("weight", spec.effective_weight())
                    .with("port", spec.effective_port())
                    .with("target", v)
            }),
        ),
        DnsRecordType::Caa => (
            "records",
            each(&|v| {
                PropertyMap::new()
                    .with("flags", spec.effective_flags())
                    .with("tag", spec.effective_tag())
                    .with("value", v)
            }),
        ),
        _ => ("records", values.clone().into()),
    };
    Ok(shaped)
}

pub async fn dns_record(
    engine: &dyn Engine,
    locals: &AzureDnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    let type_token = record_type_token(spec.record_type)?;
    let (key, records) = record_values(spec)?;

    let args = PropertyMap::new()
        .with("name", &spec.name)
        .with("zoneName", &locals.zone_name)
        .with("resourceGroupName", &spec.resource_group)
        .with("ttl", spec.effective_ttl())
        .with("tags", &locals.tags)
        .with(key, records);

    engine
        .register_resource(
            ResourceRequest::new(type_token, &locals.record.metadata.name)
                .with_args(args)
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create {} record {}", spec.record_type, spec.name))
}

pub struct AzureDnsRecordModule;

#[async_trait]
impl ResourceModule for AzureDnsRecordModule {
    type Provider = AzureProviderConfig;
    type Spec = AzureDnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = AzureDnsRecordLocals::initialize(input)?;
        let record = dns_record(engine, &locals, provider).await?;
        info!("Created Azure DNS record {} in {}", locals.record.spec.name, locals.zone_name);

        engine.export(outputs::RECORD_ID, record.id().into()).await?;
        engine.export(outputs::FQDN, record.output("fqdn").into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcf_runtime::{InlineSource, RecordingEngine, StackModule};

    const INPUT: &str = r#"
providerConfig:
  clientId: app-id
  clientSecret: s3cret
  subscriptionId: sub-1
  tenantId: tenant-1
target:
  apiVersion: azure.openmcf.org/v1
  kind: AzureDnsRecord
  metadata:
    name: mail
  spec:
    resourceGroup: dns-rg
    zoneName: example.com
    type: MX
    name: "@"
    values: ["mx1.example.com", "mx2.example.com"]
"#;

    #[tokio::test]
    async fn test_mx_uses_default_preference() {
        let engine = RecordingEngine::default();
        AzureDnsRecordModule.run(&engine, &InlineSource::new(INPUT)).await.unwrap();

        let record = engine.resource("azure:dns/mxRecord:MxRecord", "mail").unwrap();
        let records = record.args.get("records").unwrap().as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("preference").and_then(|v| v.as_str()), Some("10"));
        assert_eq!(records[1].get("exchange").and_then(|v| v.as_str()), Some("mx2.example.com"));
        assert_eq!(record.args.get("ttl").and_then(|v| v.as_i64()), Some(300));
        assert!(engine.output(outputs::FQDN).is_some());
    }

    #[tokio::test]
    async fn test_caa_defaults() {
        let engine = RecordingEngine::default();
        let input = INPUT
            .replace("type: MX", "type: CAA")
            .replace("[\"mx1.example.com\", \"mx2.example.com\"]", "[\"letsencrypt.org\"]");
        AzureDnsRecordModule.run(&engine, &InlineSource::new(input)).await.unwrap();

        let record = engine.resource("azure:dns/caaRecord:CaaRecord", "mail").unwrap();
        let entry = &record.args.get("records").unwrap().as_array().unwrap()[0];
        assert_eq!(entry.get("tag").and_then(|v| v.as_str()), Some("issue"));
        assert_eq!(entry.get("flags").and_then(|v| v.as_i64()), Some(0));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_setup() {
        let engine = RecordingEngine::default();
        let input = INPUT.split("target:").nth(1).map(|t| format!("target:{}", t)).unwrap();
        let err = AzureDnsRecordModule.run(&engine, &InlineSource::new(input)).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to setup azure provider");
        assert_eq!(engine.resource_count(), 0);
    }

    #[test]
    fn test_soa_has_no_token() {
        assert!(record_type_token(DnsRecordType::Soa).is_err());
        assert_eq!(record_type_token(DnsRecordType::Cname).unwrap(), "azure:dns/cNameRecord:CNameRecord");
    }
}
