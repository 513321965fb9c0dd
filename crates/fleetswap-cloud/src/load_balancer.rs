//! Load balancer finder.
//!
//! Load balancers are shared across releases, so they carry the three-field
//! service identity and no release id.

use tracing::debug;

use crate::api::{BalancerApi, LoadBalancerData};
use crate::error::CloudResult;
use crate::finder::{Named, single_named, single_tag_set};
use crate::identity::{ConfigTagged, ProjectTagged, ServiceTagged};
use crate::tags;

const KIND: &str = "load balancer";

/// A load balancer with its identity derived from tags.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancer {
    name: String,
    project_name: Option<String>,
    config_name: Option<String>,
    service_name: Option<String>,
}

impl LoadBalancer {
    /// Provider-assigned name. Doubles as the tag-fetch identifier.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ProjectTagged for LoadBalancer {
    fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}

impl ConfigTagged for LoadBalancer {
    fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref()
    }
}

impl ServiceTagged for LoadBalancer {
    fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }
}

impl Named for LoadBalancerData {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Find every named load balancer, preserving input order, failing fast.
pub async fn find_all(api: &impl BalancerApi, names: &[String]) -> CloudResult<Vec<LoadBalancer>> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        found.push(find_by_name(api, name).await?);
    }
    Ok(found)
}

/// Find one load balancer by name and fetch its identity tags.
pub async fn find_by_name(api: &impl BalancerApi, name: &str) -> CloudResult<LoadBalancer> {
    let described = api.describe_load_balancers(&[name.to_string()]).await?;
    let data = single_named(described, name, KIND)?;

    let tag_sets = api
        .describe_load_balancer_tags(&[data.name.clone()])
        .await?;
    let lb_tags = single_tag_set(tag_sets, &data.name, KIND)?;

    debug!(name, "load balancer found");
    Ok(LoadBalancer {
        name: data.name,
        project_name: tags::lookup_owned(&lb_tags, tags::PROJECT_NAME),
        config_name: tags::lookup_owned(&lb_tags, tags::CONFIG_NAME),
        service_name: tags::lookup_owned(&lb_tags, tags::SERVICE_NAME),
    })
}
