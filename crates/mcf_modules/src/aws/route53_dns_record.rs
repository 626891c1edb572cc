//! `AwsRoute53DnsRecord` module: one Route53 record set.

use async_trait::async_trait;
use mcf_manifest::kinds::aws::{AwsRoute53DnsRecordSpec, Route53RoutingPolicy};
use mcf_manifest::Manifest;
use mcf_provider::AwsProviderConfig;
use mcf_runtime::{
    Engine, ModuleResult, PropertyMap, ProviderHandle, ResourceHandle, ResourceModule,
    ResourceRequest, StackInput, WrapErr,
};
use tracing::{debug, info};

pub const RECORD_TYPE_TOKEN: &str = "aws:route53/record:Record";

/// Output keys.
pub mod outputs {
    pub const FQDN: &str = "fqdn";
    pub const RECORD_TYPE: &str = "record_type";
    pub const HOSTED_ZONE_ID: &str = "hosted_zone_id";
    pub const IS_ALIAS: &str = "is_alias";
    pub const SET_IDENTIFIER: &str = "set_identifier";
    pub const RECORD_ID: &str = "record_id";

    pub const ALL: &[&str] = &[FQDN, RECORD_TYPE, HOSTED_ZONE_ID, IS_ALIAS, SET_IDENTIFIER, RECORD_ID];
}

pub struct Route53DnsRecordLocals {
    pub record: Manifest<AwsRoute53DnsRecordSpec>,
    pub hosted_zone_id: String,
}

impl Route53DnsRecordLocals {
    pub fn initialize(input: &StackInput<AwsProviderConfig, AwsRoute53DnsRecordSpec>) -> ModuleResult<Self> {
        let record = input.target.clone();
        let hosted_zone_id = record.spec.hosted_zone_id.get_value()?.to_string();
        Ok(Self {
            record,
            hosted_zone_id,
        })
    }
}

/// Route53 fields for the routing policy. Simple routing adds nothing.
pub fn routing_policy_args(policy: &Route53RoutingPolicy, args: PropertyMap) -> PropertyMap {
    match policy {
        Route53RoutingPolicy::Simple(_) => args,
        Route53RoutingPolicy::Weighted(p) => args.with(
            "weightedRoutingPolicies",
            vec![PropertyMap::new().with("weight", p.weight)],
        ),
        Route53RoutingPolicy::Latency(p) => args.with(
            "latencyRoutingPolicies",
            vec![PropertyMap::new().with("region", &p.region)],
        ),
        Route53RoutingPolicy::Failover(p) => args.with(
            "failoverRoutingPolicies",
            vec![PropertyMap::new().with("type", p.failover_type.as_str())],
        ),
        Route53RoutingPolicy::Geolocation(p) => {
            let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());
            args.with(
                "geolocationRoutingPolicies",
                vec![PropertyMap::new()
                    .with_opt("continent", non_empty(&p.continent))
                    .with_opt("country", non_empty(&p.country))
                    .with_opt("subdivision", non_empty(&p.subdivision))],
            )
        }
    }
}

pub fn record_args(locals: &Route53DnsRecordLocals) -> PropertyMap {
    let spec = &locals.record.spec;
    let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());

    let mut args = PropertyMap::new()
        .with("zoneId", &locals.hosted_zone_id)
        .with("name", &spec.name)
        .with("type", spec.record_type.as_str())
        .with_opt("setIdentifier", non_empty(&spec.set_identifier))
        .with_opt("healthCheckId", non_empty(&spec.health_check_id));

    args = match spec.alias_target.as_ref().filter(|_| spec.is_alias()) {
        Some(alias) => args.with(
            "aliases",
            vec![PropertyMap::new()
                .with("name", &alias.dns_name)
                .with("zoneId", &alias.hosted_zone_id)
                .with("evaluateTargetHealth", alias.evaluate_target_health)],
        ),
        None => args
            .with("ttl", spec.effective_ttl())
            .with("records", spec.values.clone()),
    };

    routing_policy_args(&spec.effective_routing_policy(), args)
}

pub async fn dns_record(
    engine: &dyn Engine,
    locals: &Route53DnsRecordLocals,
    provider: &ProviderHandle,
) -> ModuleResult<ResourceHandle> {
    let spec = &locals.record.spec;
    debug!(
        "Route53 record {} {} uses {} routing",
        spec.record_type,
        spec.name,
        spec.effective_routing_policy().name()
    );
    engine
        .register_resource(
            ResourceRequest::new(RECORD_TYPE_TOKEN, &locals.record.metadata.name)
                .with_args(record_args(locals))
                .with_provider(provider),
        )
        .await
        .wrap_err_with(|| format!("failed to create DNS record {}", spec.name))
}

pub struct AwsRoute53DnsRecordModule;

#[async_trait]
impl ResourceModule for AwsRoute53DnsRecordModule {
    type Provider = AwsProviderConfig;
    type Spec = AwsRoute53DnsRecordSpec;

    const OUTPUTS: &'static [&'static str] = outputs::ALL;

    async fn resources(
        &self,
        engine: &dyn Engine,
        input: &StackInput<Self::Provider, Self::Spec>,
        provider: &ProviderHandle,
    ) -> ModuleResult<()> {
        let locals = Route53DnsRecordLocals::initialize(input)?;
        let record = dns_record(engine, &locals, provider).await?;
        let spec = &locals.record.spec;
        info!("Created Route53 record {}", spec.name);

        engine.export(outputs::FQDN, record.output("fqdn").into()).await?;
        engine.export(outputs::RECORD_TYPE, spec.record_type.as_str().into()).await?;
        engine.export(outputs::HOSTED_ZONE_ID, locals.hosted_zone_id.clone().into()).await?;
        engine.export(outputs::IS_ALIAS, spec.is_alias().into()).await?;
        engine.export(outputs::SET_IDENTIFIER, spec.set_identifier.clone().into()).await?;
        engine.export(outputs::RECORD_ID, record.id().into()).await
    }
}
