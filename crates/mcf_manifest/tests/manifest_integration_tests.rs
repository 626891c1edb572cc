//! Integration tests for manifest loading, validation and references.

use std::fs;

use mcf_manifest::kinds::aws::AwsRoute53DnsRecordSpec;
use mcf_manifest::kinds::digitalocean::{DigitalOceanRegion, DigitalOceanVpcSpec};
use mcf_manifest::kinds::gcp::GcpDnsRecordSpec;
use mcf_manifest::{
    all_schemas, AnyManifest, CloudResourceKind, CloudResourceMetadata, Manifest, ManifestError,
    ResourceSpec,
};
use tempfile::tempdir;

const VPC_YAML: &str = r#"
apiVersion: digital-ocean.openmcf.org/v1
kind: DigitalOceanVpc
metadata:
  name: prod-vpc
  org: acme
  env: production
spec:
  region: nyc3
  ipRangeCidr: 10.10.0.0/16
  description: Production network
"#;

const GCP_RECORD_YAML: &str = r#"
apiVersion: gcp.openmcf.org/v1
kind: GcpDnsRecord
metadata:
  name: www
  env: dev
spec:
  projectId:
    valueFrom:
      kind: GcpProject
      name: main-project
      fieldPath: project_id
  managedZone: example-zone
  recordType: A
  name: www.example.com.
  values:
    - 192.0.2.1
"#;

#[test]
fn test_vpc_manifest_validates() {
    let manifest: Manifest<DigitalOceanVpcSpec> = Manifest::from_yaml(VPC_YAML).unwrap();

    assert_eq!(manifest.metadata.name, "prod-vpc");
    assert_eq!(manifest.spec.region, DigitalOceanRegion::Nyc3);
    let result = manifest.validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_vpc_prefix_out_of_range_is_reported_under_spec() {
    let yaml = VPC_YAML.replace("10.10.0.0/16", "10.10.0.0/28");
    let manifest: Manifest<DigitalOceanVpcSpec> = Manifest::from_yaml(&yaml).unwrap();

    let result = manifest.validate();
    assert!(!result.valid);
    assert_eq!(result.first_error().unwrap().field, "spec.ipRangeCidr");
}

#[test]
fn test_from_path_and_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vpc.yaml");
    fs::write(&path, VPC_YAML).unwrap();

    let manifest: Manifest<DigitalOceanVpcSpec> = Manifest::from_path(&path).unwrap();
    assert_eq!(manifest.kind, "DigitalOceanVpc");

    let missing = dir.path().join("absent.yaml");
    assert!(matches!(
        Manifest::<DigitalOceanVpcSpec>::from_path(&missing),
        Err(ManifestError::NotFound(_))
    ));
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let err = Manifest::<AwsRoute53DnsRecordSpec>::from_yaml(VPC_YAML).unwrap_err();
    match err {
        ManifestError::KindMismatch { expected, found } => {
            assert_eq!(expected, "AwsRoute53DnsRecord");
            assert_eq!(found, "DigitalOceanVpc");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_wrong_api_version_fails_validation() {
    let yaml = VPC_YAML.replace("digital-ocean.openmcf.org/v1", "digitalocean.openmcf.org/v2");
    let manifest: Manifest<DigitalOceanVpcSpec> = Manifest::from_yaml(&yaml).unwrap();

    let result = manifest.validate();
    assert!(!result.valid);
    assert!(result.errors.iter().any(|e| e.field == "apiVersion"));
}

#[test]
fn test_any_manifest_dispatches_on_kind() {
    let any = AnyManifest::from_yaml(GCP_RECORD_YAML).unwrap();
    assert_eq!(any.kind(), CloudResourceKind::GcpDnsRecord);
    assert_eq!(any.metadata().name, "www");

    let refs = any.unresolved_references();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].0, "spec.projectId");
    assert_eq!(refs[0].1.name, "main-project");
}

#[test]
fn test_any_manifest_unknown_kind() {
    let yaml = "apiVersion: aws.openmcf.org/v1\nkind: AwsEksCluster\nmetadata:\n  name: x\nspec: {}\n";
    assert!(matches!(
        AnyManifest::from_yaml(yaml),
        Err(ManifestError::UnsupportedKind(kind)) if kind == "AwsEksCluster"
    ));
}

#[test]
fn test_resolve_references_substitutes_outputs() {
    let mut manifest: Manifest<GcpDnsRecordSpec> = Manifest::from_yaml(GCP_RECORD_YAML).unwrap();
    assert!(manifest.spec.project_id.get_value().is_err());

    let resolved = manifest.resolve_references(|r| {
        (r.kind == "GcpProject" && r.field_path == "project_id").then(|| "acme-prod-123".to_string())
    });

    assert_eq!(resolved, 1);
    assert_eq!(manifest.spec.project_id.get_value().unwrap(), "acme-prod-123");
    assert!(manifest.unresolved_references().is_empty());
}

#[test]
fn test_new_fills_header_and_round_trips() {
    let spec = DigitalOceanVpcSpec {
        region: DigitalOceanRegion::Fra1,
        ip_range_cidr: "10.20.0.0/20".to_string(),
        description: String::new(),
    };
    let manifest = Manifest::new(CloudResourceMetadata::new("edge").with_env("dev"), spec);
    assert_eq!(manifest.api_version, DigitalOceanVpcSpec::KIND.api_version());

    let yaml = manifest.to_yaml().unwrap();
    let parsed: Manifest<DigitalOceanVpcSpec> = Manifest::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.spec, manifest.spec);
}

#[test]
fn test_every_kind_has_a_schema() {
    let schemas = all_schemas();
    assert_eq!(schemas.len(), CloudResourceKind::all().len());
    for (kind, schema) in schemas {
        assert!(!schema.fields.is_empty(), "{} has an empty schema", kind);
    }
}
