//! Release descriptor: the input record driving one deployment attempt.
//!
//! Produced by an external configuration loader, consumed read-only by the
//! resolution engine. Carries the full identity tuple plus the declared
//! names of every dependent resource the service expects to find.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, ReleaseResult};

/// One service release: identity plus declared resource names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSpec {
    pub project_name: String,
    pub config_name: String,
    pub service_name: String,
    /// Unique per deployment attempt.
    pub release_id: String,

    /// Name tag of the machine image to launch from.
    pub image: String,
    /// Instance profile name. A service may run without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub load_balancers: Vec<String>,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub subnets: Vec<String>,
}

impl ReleaseSpec {
    /// Parse a descriptor from its JSON form and run the self-checks.
    pub fn from_json(raw: &str) -> ReleaseResult<Self> {
        let spec: ReleaseSpec = serde_json::from_str(raw)
            .map_err(|err| ReleaseError::InvalidDescriptor(err.to_string()))?;
        spec.check()?;
        Ok(spec)
    }

    /// Structural self-checks: identity fields present, declared names
    /// unique per list. Resource existence is the resolution engine's job.
    pub fn check(&self) -> ReleaseResult<()> {
        for (field, value) in [
            ("project_name", &self.project_name),
            ("config_name", &self.config_name),
            ("service_name", &self.service_name),
            ("release_id", &self.release_id),
            ("image", &self.image),
        ] {
            if value.is_empty() {
                return Err(ReleaseError::InvalidDescriptor(format!("{field} is empty")));
            }
        }

        for (list, names) in [
            ("security_groups", &self.security_groups),
            ("load_balancers", &self.load_balancers),
            ("target_groups", &self.target_groups),
            ("subnets", &self.subnets),
        ] {
            let mut seen = HashSet::new();
            for name in names {
                if !seen.insert(name.as_str()) {
                    return Err(ReleaseError::InvalidDescriptor(format!(
                        "{list} declares {name:?} twice"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ReleaseSpec {
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

    #[test]
    fn json_round_trip() {
        let spec = ReleaseSpec {
            profile: Some("service-profile".to_string()),
            security_groups: vec!["web".to_string()],
            ..minimal()
        };
        let raw = serde_json::to_string(&spec).unwrap();
        let back = ReleaseSpec::from_json(&raw).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn optional_lists_default_to_empty() {
        let spec = ReleaseSpec::from_json(
            r#"{
                "project_name": "p",
                "config_name": "c",
                "service_name": "s",
                "release_id": "r",
                "image": "img"
            }"#,
        )
        .unwrap();
        assert_eq!(spec.profile, None);
        assert!(spec.security_groups.is_empty());
        assert!(spec.subnets.is_empty());
    }

    #[test]
    fn empty_identity_field_is_rejected() {
        let mut spec = minimal();
        spec.release_id = String::new();
        assert!(matches!(
            spec.check(),
            Err(ReleaseError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn duplicate_declared_name_is_rejected() {
        let mut spec = minimal();
        spec.target_groups = vec!["tg".to_string(), "tg".to_string()];
        let err = spec.check().unwrap_err();
        assert!(err.to_string().contains("target_groups"));
    }
}
