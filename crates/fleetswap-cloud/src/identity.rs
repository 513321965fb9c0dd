//! Identity accessors shared across unrelated resource kinds.
//!
//! Scaling groups, target groups, load balancers, and security groups all
//! derive ownership from the same tags but stay independent value types.
//! Each accessor is its own narrow trait so a resource implements exactly
//! the fields its tags carry, and one predicate serves every kind.

/// Access to the `ProjectName` identity tag.
pub trait ProjectTagged {
    fn project_name(&self) -> Option<&str>;
}

/// Access to the `ConfigName` identity tag.
pub trait ConfigTagged {
    fn config_name(&self) -> Option<&str>;
}

/// Access to the `ServiceName` identity tag.
pub trait ServiceTagged {
    fn service_name(&self) -> Option<&str>;
}

/// Access to the `ReleaseId` identity tag.
pub trait ReleaseTagged {
    fn release_id(&self) -> Option<&str>;
}

/// True when the resource carries exactly the wanted project name.
pub fn has_project_name(resource: &impl ProjectTagged, want: &str) -> bool {
    resource.project_name() == Some(want)
}

/// True when the resource carries exactly the wanted config name.
pub fn has_config_name(resource: &impl ConfigTagged, want: &str) -> bool {
    resource.config_name() == Some(want)
}

/// True when the resource carries exactly the wanted service name.
pub fn has_service_name(resource: &impl ServiceTagged, want: &str) -> bool {
    resource.service_name() == Some(want)
}

/// True when the resource carries exactly the wanted release id.
pub fn has_release_id(resource: &impl ReleaseTagged, want: &str) -> bool {
    resource.release_id() == Some(want)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged {
        project: Option<String>,
    }

    impl ProjectTagged for Tagged {
        fn project_name(&self) -> Option<&str> {
            self.project.as_deref()
        }
    }

    #[test]
    fn matches_exact_value_only() {
        let r = Tagged {
            project: Some("alpha".to_string()),
        };
        assert!(has_project_name(&r, "alpha"));
        assert!(!has_project_name(&r, "beta"));
    }

    #[test]
    fn absent_tag_never_matches() {
        let r = Tagged { project: None };
        assert!(!has_project_name(&r, "alpha"));
    }
}
