//! Resource resolution: assemble the bundle a release depends on.
//!
//! Each pass is a fresh snapshot. Nothing is cached between calls, so
//! concurrent invocations for different releases share no state; a caller
//! that wants retries re-runs the whole pass.

use tracing::{debug, info};

use fleetswap_cloud::api::{BalancerApi, ComputeApi, IdentityApi, ScalingApi, TargetApi};
use fleetswap_cloud::{image, load_balancer, profile, scaling_group, security_group, subnet, target_group};

use crate::descriptor::ReleaseSpec;
use crate::error::ReleaseResult;
use crate::resources::ServiceResources;

/// Discover every resource the release's declared configuration names.
///
/// Finders run one at a time in a fixed order and the first error wins; no
/// partial bundle ever reaches validation.
pub async fn resolve<P>(provider: &P, release: &ReleaseSpec) -> ReleaseResult<ServiceResources>
where
    P: ComputeApi + IdentityApi + ScalingApi + BalancerApi + TargetApi,
{
    debug!(
        project = %release.project_name,
        config = %release.config_name,
        service = %release.service_name,
        release = %release.release_id,
        "resolving service resources"
    );

    let image = image::find_by_name(provider, &release.image).await?;

    let profile = match &release.profile {
        Some(name) => Some(profile::find_by_name(provider, name).await?),
        None => None,
    };

    let prev_group = scaling_group::for_not_release_id_service_map(
        provider,
        &release.project_name,
        &release.config_name,
        &release.release_id,
    )
    .await?
    .remove(&release.service_name);

    let security_groups = security_group::find_all(provider, &release.security_groups).await?;
    let load_balancers = load_balancer::find_all(provider, &release.load_balancers).await?;
    let target_groups = target_group::find_all(provider, &release.target_groups).await?;
    let subnets = subnet::find_all(provider, &release.subnets).await?;

    info!(
        service = %release.service_name,
        release = %release.release_id,
        prev_group = ?prev_group.as_ref().map(|g| g.name()),
        "service resources resolved"
    );

    Ok(ServiceResources {
        image: Some(image),
        profile,
        prev_group,
        security_groups,
        load_balancers,
        target_groups,
        subnets,
    })
}
