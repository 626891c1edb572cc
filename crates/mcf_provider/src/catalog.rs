//! Static CLI metadata for every provider.

use mcf_manifest::CloudResourceProvider;

/// Help metadata shown when credentials are missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCatalogEntry {
    pub provider: CloudResourceProvider,
    pub display_name: &'static str,
    /// Variables the provider SDK reads when no config file is given.
    pub env_vars: &'static [&'static str],
    /// `export ...` lines for the required variables.
    pub env_vars_help: &'static str,
    pub config_file_example: &'static str,
    pub config_file_name: &'static str,
    pub docs_url: &'static str,
    /// Whether a module may run without a provider config.
    pub supports_ambient_credentials: bool,
}

static AWS: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Aws,
    display_name: "AWS",
    env_vars: &[
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_DEFAULT_REGION",
        "AWS_REGION",
        "AWS_SESSION_TOKEN",
        "AWS_PROFILE",
    ],
    env_vars_help: r#"export AWS_ACCESS_KEY_ID="<your-access-key-id>"
export AWS_SECRET_ACCESS_KEY="<your-secret-access-key>"
export AWS_DEFAULT_REGION="us-west-2""#,
    config_file_example: r#"access_key_id: "<your-access-key-id>"
secret_access_key: "<your-secret-access-key>"
region: "us-west-2""#,
    config_file_name: "aws-provider-config.yaml",
    docs_url: "https://docs.aws.amazon.com/cli/latest/userguide/cli-configure-envvars.html",
    supports_ambient_credentials: true,
};

static AZURE: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Azure,
    display_name: "Azure",
    env_vars: &[
        "ARM_CLIENT_ID",
        "ARM_CLIENT_SECRET",
        "ARM_TENANT_ID",
        "ARM_SUBSCRIPTION_ID",
    ],
    env_vars_help: r#"export ARM_CLIENT_ID="<your-client-id>"
export ARM_CLIENT_SECRET="<your-client-secret>"
export ARM_TENANT_ID="<your-tenant-id>"
export ARM_SUBSCRIPTION_ID="<your-subscription-id>""#,
    config_file_example: r#"client_id: "<your-client-id>"
client_secret: "<your-client-secret>"
tenant_id: "<your-tenant-id>"
subscription_id: "<your-subscription-id>""#,
    config_file_name: "azure-provider-config.yaml",
    docs_url: "https://learn.microsoft.com/en-us/azure/developer/terraform/authenticate-to-azure",
    supports_ambient_credentials: false,
};

static GCP: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Gcp,
    display_name: "GCP",
    env_vars: &[
        "GOOGLE_APPLICATION_CREDENTIALS",
        "GOOGLE_CLOUD_PROJECT",
        "GOOGLE_PROJECT",
        "GCLOUD_PROJECT",
        "CLOUDSDK_CORE_PROJECT",
    ],
    env_vars_help: r#"export GOOGLE_APPLICATION_CREDENTIALS="/path/to/service-account-key.json"
export GOOGLE_CLOUD_PROJECT="<your-project-id>""#,
    config_file_example: r#"service_account_key_base64: "<base64-encoded-service-account-json>""#,
    config_file_name: "gcp-provider-config.yaml",
    docs_url: "https://cloud.google.com/docs/authentication/application-default-credentials",
    supports_ambient_credentials: false,
};

static DIGITAL_OCEAN: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::DigitalOcean,
    display_name: "DigitalOcean",
    env_vars: &[
        "DIGITALOCEAN_TOKEN",
        "DIGITALOCEAN_ACCESS_TOKEN",
        "SPACES_ACCESS_KEY_ID",
        "SPACES_SECRET_ACCESS_KEY",
    ],
    env_vars_help: r#"export DIGITALOCEAN_TOKEN="<your-api-token>""#,
    config_file_example: r#"api_token: "<your-api-token>"
default_region: "nyc3""#,
    config_file_name: "digitalocean-provider-config.yaml",
    docs_url: "https://docs.digitalocean.com/reference/api/create-personal-access-token/",
    supports_ambient_credentials: false,
};

static CIVO: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Civo,
    display_name: "Civo",
    env_vars: &["CIVO_TOKEN"],
    env_vars_help: r#"export CIVO_TOKEN="<your-api-token>""#,
    config_file_example: r#"api_key: "<your-api-token>"
region: "lon1""#,
    config_file_name: "civo-provider-config.yaml",
    docs_url: "https://dashboard.civo.com/security",
    supports_ambient_credentials: false,
};

static CLOUDFLARE: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Cloudflare,
    display_name: "Cloudflare",
    env_vars: &["CLOUDFLARE_API_TOKEN", "CLOUDFLARE_API_KEY", "CLOUDFLARE_EMAIL"],
    env_vars_help: r#"export CLOUDFLARE_API_TOKEN="<your-cloudflare-api-token>""#,
    config_file_example: r#"api_token: "<your-cloudflare-api-token>""#,
    config_file_name: "cloudflare-provider-config.yaml",
    docs_url: "https://developers.cloudflare.com/fundamentals/api/get-started/create-token/",
    supports_ambient_credentials: false,
};

static CONFLUENT: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Confluent,
    display_name: "Confluent Cloud",
    env_vars: &["CONFLUENT_CLOUD_API_KEY", "CONFLUENT_CLOUD_API_SECRET"],
    env_vars_help: r#"export CONFLUENT_CLOUD_API_KEY="<your-api-key>"
export CONFLUENT_CLOUD_API_SECRET="<your-api-secret>""#,
    config_file_example: r#"api_key: "<your-api-key>"
api_secret: "<your-api-secret>""#,
    config_file_name: "confluent-provider-config.yaml",
    docs_url: "https://docs.confluent.io/cloud/current/access-management/authenticate/api-keys/api-keys.html",
    supports_ambient_credentials: false,
};

static KUBERNETES: ProviderCatalogEntry = ProviderCatalogEntry {
    provider: CloudResourceProvider::Kubernetes,
    display_name: "Kubernetes",
    env_vars: &["KUBECONFIG", "KUBE_CONFIG_PATH", "KUBE_CONTEXT"],
    env_vars_help: r#"export KUBECONFIG="/path/to/kubeconfig"
export KUBE_CONTEXT="<context-name>""#,
    config_file_example: r#"kubeconfig: "<base64-encoded-kubeconfig or /path/to/kubeconfig>"
context: "<context-name>""#,
    config_file_name: "kubernetes-provider-config.yaml",
    docs_url: "https://kubernetes.io/docs/concepts/configuration/organize-cluster-access-kubeconfig/",
    supports_ambient_credentials: true,
};

/// Catalog entry for a provider.
pub fn catalog_entry(provider: CloudResourceProvider) -> &'static ProviderCatalogEntry {
    match provider {
        CloudResourceProvider::Aws => &AWS,
        CloudResourceProvider::Azure => &AZURE,
        CloudResourceProvider::Gcp => &GCP,
        CloudResourceProvider::DigitalOcean => &DIGITAL_OCEAN,
        CloudResourceProvider::Civo => &CIVO,
        CloudResourceProvider::Cloudflare => &CLOUDFLARE,
        CloudResourceProvider::Confluent => &CONFLUENT,
        CloudResourceProvider::Kubernetes => &KUBERNETES,
    }
}

/// Every catalog entry, in provider order.
pub fn catalog() -> Vec<&'static ProviderCatalogEntry> {
    CloudResourceProvider::all()
        .into_iter()
        .map(catalog_entry)
        .collect()
}

/// CLI help capability shared by every credential record.
pub trait ProviderHelp {
    const PROVIDER: CloudResourceProvider;

    fn catalog_entry() -> &'static ProviderCatalogEntry {
        catalog_entry(Self::PROVIDER)
    }

    fn environment_variables() -> &'static [&'static str] {
        Self::catalog_entry().env_vars
    }

    fn environment_variables_help() -> &'static str {
        Self::catalog_entry().env_vars_help
    }

    fn config_file_example() -> &'static str {
        Self::catalog_entry().config_file_example
    }

    fn config_file_name() -> &'static str {
        Self::catalog_entry().config_file_name
    }

    fn display_name() -> &'static str {
        Self::catalog_entry().display_name
    }

    fn docs_url() -> &'static str {
        Self::catalog_entry().docs_url
    }
}
