//! The resolved resource bundle and its validation checks.
//!
//! `ServiceResources` is a pure aggregate with no lifecycle of its own:
//! built fresh by [`resolve`](crate::resolve::resolve), consumed once by
//! [`validate`], then discarded. Validation is pure as well; it touches no
//! provider and mutates nothing, so running it twice on the same bundle
//! yields the same result.

use serde::Serialize;

use fleetswap_cloud::identity::{
    ConfigTagged, ProjectTagged, ReleaseTagged, ServiceTagged, has_config_name, has_project_name,
    has_service_name,
};
use fleetswap_cloud::image::Image;
use fleetswap_cloud::load_balancer::LoadBalancer;
use fleetswap_cloud::profile::Profile;
use fleetswap_cloud::scaling_group::ScalingGroup;
use fleetswap_cloud::security_group::SecurityGroup;
use fleetswap_cloud::subnet::Subnet;
use fleetswap_cloud::tags::MANAGED_BY_VALUE;
use fleetswap_cloud::target_group::TargetGroup;

use crate::descriptor::ReleaseSpec;
use crate::error::{IdentityField, ReleaseError, ReleaseResult, ResourceKind};

/// Every resource a service release depends on, rebuilt per validation pass.
#[derive(Debug, Clone, Default)]
pub struct ServiceResources {
    pub image: Option<Image>,
    pub profile: Option<Profile>,
    /// The scaling group this release supersedes. Absent on the first-ever
    /// release of a service, which is valid.
    pub prev_group: Option<ScalingGroup>,
    pub security_groups: Vec<SecurityGroup>,
    pub load_balancers: Vec<LoadBalancer>,
    pub target_groups: Vec<TargetGroup>,
    pub subnets: Vec<Subnet>,
}

/// Identifier summary of a bundle, for diagnostics and operator output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceNames {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_group: Option<String>,
    pub security_groups: Vec<String>,
    pub load_balancers: Vec<String>,
    pub target_groups: Vec<String>,
    pub subnets: Vec<String>,
}

impl ServiceResources {
    /// Project the bundle down to provider identifiers.
    pub fn names(&self) -> ResourceNames {
        ResourceNames {
            image: self.image.as_ref().map(|image| image.id().to_string()),
            profile: self.profile.as_ref().map(|p| p.arn().to_string()),
            prev_group: self.prev_group.as_ref().map(|g| g.name().to_string()),
            security_groups: self
                .security_groups
                .iter()
                .map(|sg| sg.id().to_string())
                .collect(),
            load_balancers: self
                .load_balancers
                .iter()
                .map(|lb| lb.name().to_string())
                .collect(),
            target_groups: self
                .target_groups
                .iter()
                .map(|tg| tg.arn().to_string())
                .collect(),
            subnets: self.subnets.iter().map(|s| s.id().to_string()).collect(),
        }
    }
}

/// Validate a resolved bundle against the release descriptor.
///
/// Checks run in a fixed order and stop at the first failure: counts, image
/// convention tag, profile path, previous scaling group, then per-resource
/// identity. Operators fix one failure, re-run, and see the next.
pub fn validate(release: &ReleaseSpec, resources: &ServiceResources) -> ReleaseResult<()> {
    validate_counts(release, resources)?;

    validate_image(release, resources.image.as_ref())?;
    validate_profile(release, resources.profile.as_ref())?;
    validate_prev_group(release, resources.prev_group.as_ref())?;

    for sg in &resources.security_groups {
        check_identity(ResourceKind::SecurityGroup, sg.id(), sg, release)?;
    }
    for lb in &resources.load_balancers {
        check_identity(ResourceKind::LoadBalancer, lb.name(), lb, release)?;
    }
    for tg in &resources.target_groups {
        check_identity(ResourceKind::TargetGroup, tg.arn(), tg, release)?;
    }
    for subnet in &resources.subnets {
        check_managed(ResourceKind::Subnet, subnet.id(), subnet.managed_by())?;
    }

    Ok(())
}

/// Discovered counts must exactly equal declared counts.
fn validate_counts(release: &ReleaseSpec, resources: &ServiceResources) -> ReleaseResult<()> {
    let names = resources.names();

    if resources.image.is_none() {
        return Err(ReleaseError::MissingImage {
            image: release.image.clone(),
        });
    }

    let checks = [
        (
            ResourceKind::SecurityGroup,
            names.security_groups,
            &release.security_groups,
        ),
        (
            ResourceKind::LoadBalancer,
            names.load_balancers,
            &release.load_balancers,
        ),
        (
            ResourceKind::TargetGroup,
            names.target_groups,
            &release.target_groups,
        ),
        (ResourceKind::Subnet, names.subnets, &release.subnets),
    ];

    for (kind, actual, expected) in checks {
        if actual.len() != expected.len() {
            return Err(ReleaseError::CountMismatch {
                kind,
                actual,
                expected: expected.clone(),
            });
        }
    }

    Ok(())
}

/// The image must carry the managed-by convention tag.
pub fn validate_image(release: &ReleaseSpec, image: Option<&Image>) -> ReleaseResult<()> {
    let Some(image) = image else {
        return Err(ReleaseError::MissingImage {
            image: release.image.clone(),
        });
    };
    check_managed(ResourceKind::Image, image.id(), image.managed_by())
}

/// The profile path must encode the service identity. A release without a
/// profile is valid.
pub fn validate_profile(release: &ReleaseSpec, profile: Option<&Profile>) -> ReleaseResult<()> {
    let Some(profile) = profile else {
        return Ok(());
    };

    let expected = profile_path(release);
    if profile.path() != expected {
        return Err(ReleaseError::ProfilePath {
            actual: profile.path().to_string(),
            expected,
        });
    }
    Ok(())
}

/// The canonical identity-bearing profile path for a release.
pub fn profile_path(release: &ReleaseSpec) -> String {
    format!(
        "/{}/{}/{}/",
        release.project_name, release.config_name, release.service_name
    )
}

/// The previous scaling group must carry this service's identity and a
/// release id older than the target. Absence is valid: the first-ever
/// release of a service has nothing to supersede.
pub fn validate_prev_group(
    release: &ReleaseSpec,
    prev_group: Option<&ScalingGroup>,
) -> ReleaseResult<()> {
    let Some(group) = prev_group else {
        return Ok(());
    };

    check_identity(ResourceKind::ScalingGroup, group.name(), group, release)?;

    let Some(prev_release) = group.release_id() else {
        return Err(ReleaseError::UntaggedPrevious {
            group: group.name().to_string(),
        });
    };

    // A group cannot be its own predecessor.
    if prev_release == release.release_id {
        return Err(ReleaseError::ReleaseCollision {
            group: group.name().to_string(),
            release_id: release.release_id.clone(),
        });
    }

    Ok(())
}

/// One identity check for every kind exposing the three accessors.
fn check_identity<R>(
    kind: ResourceKind,
    id: &str,
    resource: &R,
    release: &ReleaseSpec,
) -> ReleaseResult<()>
where
    R: ProjectTagged + ConfigTagged + ServiceTagged,
{
    if !has_project_name(resource, &release.project_name) {
        return Err(identity_mismatch(
            kind,
            id,
            IdentityField::Project,
            &release.project_name,
            resource.project_name(),
        ));
    }
    if !has_config_name(resource, &release.config_name) {
        return Err(identity_mismatch(
            kind,
            id,
            IdentityField::Config,
            &release.config_name,
            resource.config_name(),
        ));
    }
    if !has_service_name(resource, &release.service_name) {
        return Err(identity_mismatch(
            kind,
            id,
            IdentityField::Service,
            &release.service_name,
            resource.service_name(),
        ));
    }
    Ok(())
}

fn identity_mismatch(
    kind: ResourceKind,
    id: &str,
    field: IdentityField,
    requires: &str,
    has: Option<&str>,
) -> ReleaseError {
    ReleaseError::IdentityMismatch {
        kind,
        id: id.to_string(),
        field,
        requires: requires.to_string(),
        has: has.map(str::to_string),
    }
}

fn check_managed(kind: ResourceKind, id: &str, managed_by: Option<&str>) -> ReleaseResult<()> {
    if managed_by != Some(MANAGED_BY_VALUE) {
        return Err(ReleaseError::Unmanaged {
            kind,
            id: id.to_string(),
            expected: MANAGED_BY_VALUE.to_string(),
            actual: managed_by.map(str::to_string),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use fleetswap_cloud::mock::MockProvider;
    use fleetswap_cloud::{image, load_balancer, profile, scaling_group, target_group};

    fn release() -> ReleaseSpec {
        ReleaseSpec {
            project_name: "project".to_string(),
            config_name: "config".to_string(),
            service_name: "service".to_string(),
            release_id: "rel-1".to_string(),
            image: "service-image".to_string(),
            profile: None,
            security_groups: vec![],
            load_balancers: vec![],
            target_groups: vec![],
            subnets: vec![],
        }
    }

    async fn resolved_image(mock: &MockProvider) -> Image {
        image::find_by_name(mock, "service-image").await.unwrap()
    }

    #[tokio::test]
    async fn empty_configuration_validates() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");

        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            ..Default::default()
        };
        validate(&release(), &resources).unwrap();
    }

    #[tokio::test]
    async fn validation_is_idempotent() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");

        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            ..Default::default()
        };
        let spec = release();
        let first = validate(&spec, &resources);
        let second = validate(&spec, &resources);
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[test]
    fn missing_image_is_rejected() {
        let resources = ServiceResources::default();
        let err = validate(&release(), &resources).unwrap_err();
        assert!(matches!(err, ReleaseError::MissingImage { .. }));
    }

    #[tokio::test]
    async fn count_mismatch_reports_actual_and_expected() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");

        let spec = ReleaseSpec {
            security_groups: vec!["web".to_string(), "db".to_string()],
            ..release()
        };
        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            ..Default::default()
        };
        let err = validate(&spec, &resources).unwrap_err();
        match err {
            ReleaseError::CountMismatch {
                kind,
                actual,
                expected,
            } => {
                assert_eq!(kind, ResourceKind::SecurityGroup);
                assert_eq!(actual.len(), 0);
                assert_eq!(expected, vec!["web".to_string(), "db".to_string()]);
            }
            other => panic!("expected CountMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unmanaged_image_is_rejected() {
        let mut mock = MockProvider::default();
        mock.add_unmanaged_image("service-image", "img-raw");

        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            ..Default::default()
        };
        let err = validate(&release(), &resources).unwrap_err();
        match err {
            ReleaseError::Unmanaged {
                kind, id, actual, ..
            } => {
                assert_eq!(kind, ResourceKind::Image);
                assert_eq!(id, "img-raw");
                assert_eq!(actual, None);
            }
            other => panic!("expected Unmanaged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn profile_path_must_encode_identity() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");
        mock.add_profile("svc-profile", "arn:profile", "/project/config/other/");

        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            profile: Some(profile::find_by_name(&mock, "svc-profile").await.unwrap()),
            ..Default::default()
        };
        let err = validate(&release(), &resources).unwrap_err();
        match err {
            ReleaseError::ProfilePath { actual, expected } => {
                assert_eq!(actual, "/project/config/other/");
                assert_eq!(expected, "/project/config/service/");
            }
            other => panic!("expected ProfilePath, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn absent_previous_group_is_valid() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");

        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            prev_group: None,
            ..Default::default()
        };
        validate(&release(), &resources).unwrap();
    }

    #[tokio::test]
    async fn previous_group_with_target_release_collides() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");
        mock.add_scaling_group("project", "config", "service", "rel-1");

        let groups = scaling_group::for_release_id(&mock, "project", "config", "rel-1")
            .await
            .unwrap();
        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            prev_group: Some(groups[0].clone()),
            ..Default::default()
        };
        let err = validate(&release(), &resources).unwrap_err();
        assert!(matches!(err, ReleaseError::ReleaseCollision { .. }));
    }

    #[tokio::test]
    async fn previous_group_identity_must_match() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");
        mock.add_scaling_group("project", "config", "other-service", "rel-0");

        let groups = scaling_group::for_not_release_id(&mock, "project", "config", "rel-1")
            .await
            .unwrap();
        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            prev_group: Some(groups[0].clone()),
            ..Default::default()
        };
        let err = validate(&release(), &resources).unwrap_err();
        match err {
            ReleaseError::IdentityMismatch { kind, field, .. } => {
                assert_eq!(kind, ResourceKind::ScalingGroup);
                assert_eq!(field, IdentityField::Service);
            }
            other => panic!("expected IdentityMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dependent_resource_identity_must_match() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");
        mock.add_target_group("tg", "project", "config", "intruder");
        mock.add_load_balancer("lb", "project", "config", "service");

        let spec = ReleaseSpec {
            target_groups: vec!["tg".to_string()],
            load_balancers: vec!["lb".to_string()],
            ..release()
        };
        let resources = ServiceResources {
            image: Some(resolved_image(&mock).await),
            target_groups: target_group::find_all(&mock, &spec.target_groups)
                .await
                .unwrap(),
            load_balancers: load_balancer::find_all(&mock, &spec.load_balancers)
                .await
                .unwrap(),
            ..Default::default()
        };
        let err = validate(&spec, &resources).unwrap_err();
        match err {
            ReleaseError::IdentityMismatch {
                kind,
                field,
                requires,
                has,
                ..
            } => {
                assert_eq!(kind, ResourceKind::TargetGroup);
                assert_eq!(field, IdentityField::Service);
                assert_eq!(requires, "service");
                assert_eq!(has.as_deref(), Some("intruder"));
            }
            other => panic!("expected IdentityMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn names_projection_covers_the_bundle() {
        let mut mock = MockProvider::default();
        mock.add_image("service-image", "img-1");
        mock.add_target_group("tg", "project", "config", "service");

        let spec = ReleaseSpec {
            target_groups: vec!["tg".to_string()],
            ..release()
        };
        let resources = resolve(&mock, &spec).await.unwrap();
        let names = resources.names();
        assert_eq!(names.image.as_deref(), Some("img-1"));
        assert_eq!(names.target_groups, vec!["arn:tg".to_string()]);
        assert_eq!(names.prev_group, None);

        let raw = serde_json::to_string(&names).unwrap();
        assert!(raw.contains("arn:tg"));
    }
}
