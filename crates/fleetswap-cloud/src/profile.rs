//! Instance profile finder.
//!
//! Profiles carry no tags; their identity is encoded in the hierarchical
//! path `"/{project}/{config}/{service}/"`, checked during validation.

use crate::api::IdentityApi;
use crate::error::{CloudError, CloudResult};

const KIND: &str = "instance profile";

/// An instance profile and its identity-bearing path.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    arn: String,
    path: String,
}

impl Profile {
    /// Provider-assigned ARN.
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Hierarchical path string.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Find one instance profile by name.
pub async fn find_by_name(api: &impl IdentityApi, name: &str) -> CloudResult<Profile> {
    let data = api
        .find_instance_profile(name)
        .await?
        .ok_or_else(|| CloudError::not_found(KIND, name))?;
    Ok(Profile {
        arn: data.arn,
        path: data.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn finds_profile_with_path() {
        let mut mock = MockProvider::default();
        mock.add_profile("svc-profile", "arn:profile/svc", "/project/config/service/");

        let profile = find_by_name(&mock, "svc-profile").await.unwrap();
        assert_eq!(profile.arn(), "arn:profile/svc");
        assert_eq!(profile.path(), "/project/config/service/");
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mock = MockProvider::default();
        let err = find_by_name(&mock, "svc-profile").await.unwrap_err();
        assert!(matches!(err, CloudError::NotFound(_)));
    }
}
