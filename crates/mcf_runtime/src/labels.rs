//! Canonical resource labels derived from manifest metadata.
//!
//! All label maps are `BTreeMap`s so the same metadata always renders to
//! the same, ordered set of tags.

use std::collections::BTreeMap;

use mcf_manifest::{CloudResourceKind, CloudResourceMetadata, CloudResourceProvider};

pub const RESOURCE: &str = "resource";
pub const RESOURCE_NAME: &str = "resource_name";
pub const RESOURCE_KIND: &str = "resource_kind";
pub const RESOURCE_ID: &str = "resource_id";
pub const ORGANIZATION: &str = "organization";
pub const ENVIRONMENT: &str = "environment";

/// Keys the system owns; user labels never override them.
pub const RESERVED_KEYS: [&str; 6] = [
    RESOURCE,
    RESOURCE_NAME,
    RESOURCE_KIND,
    RESOURCE_ID,
    ORGANIZATION,
    ENVIRONMENT,
];

pub const KUBERNETES_LABEL_PREFIX: &str = "kubernetes.openmcf.org/";

pub const PULUMI_STACK_FQDN: &str = "pulumi.openmcf.org/stack.fqdn";
pub const PULUMI_ORGANIZATION: &str = "pulumi.openmcf.org/organization";
pub const PULUMI_PROJECT: &str = "pulumi.openmcf.org/project";
pub const PULUMI_STACK_NAME: &str = "pulumi.openmcf.org/stack.name";
pub const KUBERNETES_CONTEXT: &str = "kubernetes.openmcf.org/context";
pub const KUBERNETES_DOCKER_CONFIG_JSON_FILE: &str = "kubernetes.openmcf.org/docker-config-json-file";

fn labels_with_kind(metadata: &CloudResourceMetadata, kind: String) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(RESOURCE.to_string(), "true".to_string());
    labels.insert(RESOURCE_NAME.to_string(), metadata.name.clone());
    labels.insert(RESOURCE_KIND.to_string(), kind);

    let optional = [
        (RESOURCE_ID, &metadata.id),
        (ORGANIZATION, &metadata.org),
        (ENVIRONMENT, &metadata.env),
    ];
    for (key, value) in optional {
        if !value.is_empty() {
            labels.insert(key.to_string(), value.clone());
        }
    }
    labels
}

/// Labels with the kind as declared.
pub fn build_labels(metadata: &CloudResourceMetadata, kind: CloudResourceKind) -> BTreeMap<String, String> {
    labels_with_kind(metadata, kind.as_str().to_string())
}

/// Labels with a lower-cased kind, for clouds that reject upper-case label values.
pub fn build_gcp_labels(metadata: &CloudResourceMetadata, kind: CloudResourceKind) -> BTreeMap<String, String> {
    labels_with_kind(metadata, kind.as_str().to_lowercase())
}

/// Labels in the convention of the kind's provider.
pub fn build_provider_labels(metadata: &CloudResourceMetadata, kind: CloudResourceKind) -> BTreeMap<String, String> {
    match kind.provider() {
        CloudResourceProvider::Gcp | CloudResourceProvider::Azure => build_gcp_labels(metadata, kind),
        _ => build_labels(metadata, kind),
    }
}

/// Overlay user labels on system labels. Reserved keys keep the system value.
pub fn merge_user_labels(
    system: &BTreeMap<String, String>,
    user: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = system.clone();
    for (key, value) in user {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Kubernetes labels under the vendor prefix.
pub fn kubernetes_labels(metadata: &CloudResourceMetadata, kind: CloudResourceKind) -> BTreeMap<String, String> {
    build_labels(metadata, kind)
        .into_iter()
        .map(|(key, value)| {
            let short = match key.as_str() {
                RESOURCE_NAME => "name",
                RESOURCE_KIND => "kind",
                RESOURCE_ID => "id",
                other => other,
            };
            (format!("{}{}", KUBERNETES_LABEL_PREFIX, short), value)
        })
        .collect()
}

/// DigitalOcean tags: `key:value` strings.
pub fn digitalocean_tags(labels: &BTreeMap<String, String>) -> Vec<String> {
    labels
        .iter()
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> CloudResourceMetadata {
        CloudResourceMetadata::new("prod-vpc")
            .with_id("dovpc-123")
            .with_org("acme")
            .with_env("production")
    }

    #[test]
    fn test_labels_cover_metadata() {
        let labels = build_labels(&metadata(), CloudResourceKind::DigitalOceanVpc);
        assert_eq!(labels[RESOURCE], "true");
        assert_eq!(labels[RESOURCE_NAME], "prod-vpc");
        assert_eq!(labels[RESOURCE_KIND], "DigitalOceanVpc");
        assert_eq!(labels[RESOURCE_ID], "dovpc-123");
        assert_eq!(labels[ORGANIZATION], "acme");
        assert_eq!(labels[ENVIRONMENT], "production");
    }

    #[test]
    fn test_empty_metadata_fields_are_omitted() {
        let labels = build_labels(&CloudResourceMetadata::new("x"), CloudResourceKind::AwsS3Bucket);
        assert_eq!(labels.len(), 3);
        assert!(!labels.contains_key(ENVIRONMENT));
    }

    #[test]
    fn test_deterministic() {
        let a = digitalocean_tags(&build_labels(&metadata(), CloudResourceKind::DigitalOceanVpc));
        let b = digitalocean_tags(&build_labels(&metadata(), CloudResourceKind::DigitalOceanVpc));
        assert_eq!(a, b);
        assert_eq!(a[0], "environment:production");
    }

    #[test]
    fn test_provider_convention() {
        let gcp = build_provider_labels(&metadata(), CloudResourceKind::GcpComputeInstance);
        assert_eq!(gcp[RESOURCE_KIND], "gcpcomputeinstance");
        let azure = build_provider_labels(&metadata(), CloudResourceKind::AzureVirtualMachine);
        assert_eq!(azure[RESOURCE_KIND], "azurevirtualmachine");
        let aws = build_provider_labels(&metadata(), CloudResourceKind::AwsS3Bucket);
        assert_eq!(aws[RESOURCE_KIND], "AwsS3Bucket");
    }

    #[test]
    fn test_reserved_keys_win() {
        let system = build_labels(&metadata(), CloudResourceKind::AwsS3Bucket);
        let mut user = BTreeMap::new();
        user.insert(ENVIRONMENT.to_string(), "staging".to_string());
        user.insert("team".to_string(), "platform".to_string());

        let merged = merge_user_labels(&system, &user);
        assert_eq!(merged[ENVIRONMENT], "production");
        assert_eq!(merged["team"], "platform");
    }

    #[test]
    fn test_kubernetes_prefix() {
        let labels = kubernetes_labels(&metadata(), CloudResourceKind::KubernetesGatewayApiCrds);
        assert_eq!(labels["kubernetes.openmcf.org/name"], "prod-vpc");
        assert_eq!(labels["kubernetes.openmcf.org/kind"], "KubernetesGatewayApiCrds");
        assert_eq!(labels["kubernetes.openmcf.org/environment"], "production");
        assert!(labels.keys().all(|k| k.starts_with(KUBERNETES_LABEL_PREFIX)));
    }
}
