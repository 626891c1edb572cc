//! End-to-end module runs against the recording engine.

use mcf_manifest::kinds::gcp::GcpDnsRecordSpec;
use mcf_manifest::{CloudResourceKind, Manifest, ValueFromRef};
use mcf_modules::aws::route53_dns_record::RECORD_TYPE_TOKEN as ROUTE53_RECORD;
use mcf_modules::azure::virtual_machine::{self, VIRTUAL_MACHINE_TYPE_TOKEN};
use mcf_modules::cloudflare::dns_record::RECORD_TYPE_TOKEN as CLOUDFLARE_RECORD;
use mcf_modules::digitalocean::vpc::VPC_TYPE_TOKEN;
use mcf_modules::gcp::dns_record::RECORD_SET_TYPE_TOKEN;
use mcf_modules::ModuleRegistry;
use mcf_provider::{missing_provider_config_guidance, GcpProviderConfig};
use mcf_runtime::{detect_kind, InlineSource, RecordingEngine, StackInput};

async fn run(input: &str) -> RecordingEngine {
    let kind = detect_kind(input).unwrap();
    let module = ModuleRegistry::builtin().get_required(kind).unwrap();
    let engine = RecordingEngine::default();
    module.run(&engine, &InlineSource::new(input)).await.unwrap();
    engine
}

#[tokio::test]
async fn test_digitalocean_vpc() {
    let engine = run(r#"
providerConfig:
  apiToken: dop_v1_abc
  defaultRegion: nyc3
target:
  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanVpc
  metadata:
    name: test-vpc
  spec:
    region: nyc3
    ipRangeCidr: 10.10.0.0/16
"#)
    .await;

    assert_eq!(engine.resource_count(), 1);
    let vpc = engine.resource(VPC_TYPE_TOKEN, "test-vpc").unwrap();
    assert_eq!(vpc.arg_str("name"), Some("test-vpc"));
    assert_eq!(vpc.arg_str("ipRange"), Some("10.10.0.0/16"));
    assert!(engine.output("vpc_id").is_some());
}

#[tokio::test]
async fn test_cloudflare_zone_with_proxied_record() {
    let engine = run(r#"
providerConfig:
  apiToken: cf-token
target:
  apiVersion: cloudflare.openmcf.org/v1
  kind: CloudflareDnsZone
  metadata:
    name: example-com
  spec:
    zoneName: example.com
    accountId: acc-1
    records:
      - name: www
        type: A
        value: 192.0.2.1
        proxied: true
"#)
    .await;

    let record = engine.resource(CLOUDFLARE_RECORD, "www-A-0").unwrap();
    assert_eq!(record.args.get("proxied").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(record.arg_str("content"), Some("192.0.2.1"));
    assert_eq!(record.depends_on.len(), 1);
}

#[tokio::test]
async fn test_route53_weighted_record() {
    let engine = run(r#"
target:
  apiVersion: aws.openmcf.org/v1
  kind: AwsRoute53DnsRecord
  metadata:
    name: api-blue
  spec:
    hostedZoneId: Z123
    name: api.example.com
    type: A
    values: ["192.0.2.20"]
    setIdentifier: blue
    routingPolicy:
      weighted:
        weight: 40
"#)
    .await;

    let record = engine.resource(ROUTE53_RECORD, "api-blue").unwrap();
    assert_eq!(record.arg_str("setIdentifier"), Some("blue"));
    assert_eq!(record.args.get("ttl").and_then(|v| v.as_i64()), Some(300));
    let weighted = record.args.get("weightedRoutingPolicies").unwrap();
    assert_eq!(
        weighted.as_array().unwrap()[0].get("weight").and_then(|v| v.as_i64()),
        Some(40)
    );
    for other in ["latencyRoutingPolicies", "failoverRoutingPolicies", "geolocationRoutingPolicies"] {
        assert!(!record.args.contains_key(other));
    }
}

#[tokio::test]
async fn test_azure_vm_with_identity() {
    let engine = run(r#"
providerConfig:
  clientId: app-id
  clientSecret: s3cret
  subscriptionId: sub-1
  tenantId: tenant-1
target:
  apiVersion: azure.openmcf.org/v1
  kind: AzureVirtualMachine
  metadata:
    name: app-vm
  spec:
    region: westeurope
    resourceGroup: app-rg
    subnetId: /subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/app
    sshPublicKey: ssh-ed25519 AAAAC3Nza user@host
    image:
      publisher: Canonical
      offer: ubuntu-24_04-lts
      sku: server
    enableSystemAssignedIdentity: true
"#)
    .await;

    let vm = engine.resource(VIRTUAL_MACHINE_TYPE_TOKEN, "app-vm").unwrap();
    let identity = vm.args.get("identity").unwrap();
    assert_eq!(identity.get("type").and_then(|v| v.as_str()), Some("SystemAssigned"));
    assert!(engine
        .output(virtual_machine::outputs::SYSTEM_ASSIGNED_IDENTITY_PRINCIPAL_ID)
        .is_some());
    assert!(engine.output(virtual_machine::outputs::PUBLIC_IP_ADDRESS).is_none());
}

#[tokio::test]
async fn test_gcp_record_with_resolved_references() {
    let mut manifest = Manifest::<GcpDnsRecordSpec>::from_yaml(
        r#"
apiVersion: gcp.openmcf.org/v1
kind: GcpDnsRecord
metadata:
  name: api-record
spec:
  projectId:
    valueFrom:
      kind: GcpProject
      name: main
      fieldPath: project_id
  managedZone:
    valueFrom:
      kind: GcpDnsZone
      name: example
      fieldPath: zone_name
  recordType: A
  name: api.example.com.
  values: ["192.0.2.30"]
"#,
    )
    .unwrap();
    assert_eq!(manifest.unresolved_references().len(), 2);

    let resolved = manifest.resolve_references(|r: &ValueFromRef| {
        match (r.kind.as_str(), r.field_path.as_str()) {
            ("GcpProject", "project_id") => Some("p-123".to_string()),
            ("GcpDnsZone", "zone_name") => Some("my-zone".to_string()),
            _ => None,
        }
    });
    assert_eq!(resolved, 2);

    let input = StackInput::new(manifest).with_provider_config(GcpProviderConfig {
        service_account_key_base64: "eyJ0eXBlIjogInNlcnZpY2VfYWNjb3VudCJ9".to_string(),
        project_id: None,
    });
    let engine = run(&serde_yaml::to_string(&input).unwrap()).await;

    let record = engine.resource(RECORD_SET_TYPE_TOKEN, "api-record").unwrap();
    assert_eq!(record.arg_str("project"), Some("p-123"));
    assert_eq!(record.arg_str("managedZone"), Some("my-zone"));
    let rrdatas = record.args.get("rrdatas").and_then(|v| v.as_array()).unwrap();
    assert_eq!(rrdatas[0].as_str(), Some("192.0.2.30"));
    assert_eq!(engine.output("ttl_seconds").and_then(|v| v.as_i64()), Some(300));
}

#[tokio::test]
async fn test_azure_record_without_credentials() {
    let input = r#"
target:
  apiVersion: azure.openmcf.org/v1
  kind: AzureDnsRecord
  metadata:
    name: www
  spec:
    resourceGroup: dns-rg
    zoneName: example.com
    type: A
    name: www
    values: ["192.0.2.40"]
"#;
    let kind = detect_kind(input).unwrap();
    assert_eq!(kind, CloudResourceKind::AzureDnsRecord);

    let engine = RecordingEngine::default();
    let err = ModuleRegistry::builtin()
        .get_required(kind)
        .unwrap()
        .run(&engine, &InlineSource::new(input))
        .await
        .unwrap_err();

    assert_eq!(err.failed_provider(), Some("azure"));
    assert_eq!(engine.resource_count(), 0);
    let guidance = missing_provider_config_guidance(kind);
    assert!(guidance.contains("ARM_CLIENT_ID"));
}

const EVERY_KIND: &[&str] = &[
    r#"
target:
  apiVersion: aws.openmcf.org/v1
  kind: AwsRoute53DnsRecord
  metadata:
    name: www-record
  spec:
    hostedZoneId: Z123
    name: www.example.com
    type: A
    values: ["192.0.2.10"]
"#,
    r#"
target:
  apiVersion: aws.openmcf.org/v1
  kind: AwsS3Bucket
  metadata:
    name: acme-assets
  spec:
    awsRegion: us-east-1
    versioningEnabled: true
"#,
    r#"
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
    values: ["mx1.example.com"]
"#,
    r#"
providerConfig:
  clientId: app-id
  clientSecret: s3cret
  subscriptionId: sub-1
  tenantId: tenant-1
target:
  apiVersion: azure.openmcf.org/v1
  kind: AzureVirtualMachine
  metadata:
    name: web-vm
  spec:
    region: eastus
    resourceGroup: web-rg
    subnetId: /subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/web
    sshPublicKey: ssh-ed25519 AAAAC3Nza user@host
    enableSystemAssignedIdentity: true
    image:
      publisher: Canonical
      offer: ubuntu-24_04-lts
      sku: server
    network:
      enablePublicIp: true
"#,
    r#"
providerConfig:
  apiKey: civo-key
  region: LON1
target:
  apiVersion: civo.openmcf.org/v1
  kind: CivoDnsRecord
  metadata:
    name: mail-mx
  spec:
    zoneId: zone-1
    name: "@"
    type: MX
    value: mail.example.com
"#,
    r#"
providerConfig:
  apiToken: cf-token
target:
  apiVersion: cloudflare.openmcf.org/v1
  kind: CloudflareDnsRecord
  metadata:
    name: www
  spec:
    zoneId: 023e105f4ecef8ad9ca31a8372d0c353
    name: www
    type: CNAME
    value: app.example.net
    proxied: true
"#,
    r#"
providerConfig:
  apiToken: cf-token
target:
  apiVersion: cloudflare.openmcf.org/v1
  kind: CloudflareDnsZone
  metadata:
    name: example-com
  spec:
    zoneName: example.com
    accountId: acc-1
    records:
      - name: www
        type: A
        value: 192.0.2.1
"#,
    r#"
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
    port: 5060
"#,
    r#"
providerConfig:
  apiToken: dop_v1_abc
  defaultRegion: nyc3
target:
  apiVersion: digital-ocean.openmcf.org/v1
  kind: DigitalOceanVpc
  metadata:
    name: test-vpc
  spec:
    region: nyc3
    ipRangeCidr: 10.10.0.0/16
"#,
    r#"
providerConfig:
  serviceAccountKeyBase64: eyJ0eXBlIjogInNlcnZpY2VfYWNjb3VudCJ9
target:
  apiVersion: gcp.openmcf.org/v1
  kind: GcpComputeInstance
  metadata:
    name: build-runner
  spec:
    projectId: p-123
    zone: us-central1-a
    machineType: e2-standard-4
    bootDisk:
      image: debian-cloud/debian-12
    networkInterfaces:
      - network: default
        accessConfigs:
          - networkTier: PREMIUM
"#,
    r#"
providerConfig:
  serviceAccountKeyBase64: eyJ0eXBlIjogInNlcnZpY2VfYWNjb3VudCJ9
target:
  apiVersion: gcp.openmcf.org/v1
  kind: GcpDnsRecord
  metadata:
    name: docs-cname
  spec:
    projectId: p-123
    managedZone: my-zone
    recordType: CNAME
    name: docs.example.com.
    values: ["ghs.googlehosted.com."]
"#,
    r#"
target:
  apiVersion: kubernetes.openmcf.org/v1
  kind: KubernetesGatewayApiCrds
  metadata:
    name: gateway-api
  spec: {}
"#,
];

#[tokio::test]
async fn test_every_module_exports_only_declared_keys() {
    let registry = ModuleRegistry::builtin();
    let mut covered = Vec::new();

    for input in EVERY_KIND {
        let kind = detect_kind(input).unwrap();
        let module = registry.get_required(kind).unwrap();
        let engine = RecordingEngine::default();
        module
            .run(&engine, &InlineSource::new(*input))
            .await
            .unwrap_or_else(|e| panic!("{} failed: {:#}", kind, e));

        let exported = engine.outputs();
        assert!(!exported.is_empty(), "{} exported nothing", kind);
        for key in exported.keys() {
            assert!(
                module.outputs().contains(&key.as_str()),
                "{} exported undeclared key '{}'",
                kind,
                key
            );
        }
        covered.push(kind);
    }

    covered.sort();
    assert_eq!(covered, registry.kinds());
}
