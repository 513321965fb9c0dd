//! Security group finder.
//!
//! Security groups come back from a filter-style describe with tags inline,
//! so there is no second tag-fetch call. Exactly one match per name is still
//! required.

use crate::api::{ComputeApi, SecurityGroupData};
use crate::error::{CloudError, CloudResult};
use crate::identity::{ConfigTagged, ProjectTagged, ServiceTagged};
use crate::tags;

const KIND: &str = "security group";

/// A security group with its identity derived from tags.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityGroup {
    id: String,
    project_name: Option<String>,
    config_name: Option<String>,
    service_name: Option<String>,
}

impl SecurityGroup {
    /// Provider-assigned group id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ProjectTagged for SecurityGroup {
    fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}

impl ConfigTagged for SecurityGroup {
    fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref()
    }
}

impl ServiceTagged for SecurityGroup {
    fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }
}

/// Find every named security group, preserving input order, failing fast.
pub async fn find_all(api: &impl ComputeApi, names: &[String]) -> CloudResult<Vec<SecurityGroup>> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        found.push(find_by_name(api, name).await?);
    }
    Ok(found)
}

/// Find one security group by name filter.
pub async fn find_by_name(api: &impl ComputeApi, name: &str) -> CloudResult<SecurityGroup> {
    let mut described = api.describe_security_groups(name).await?;
    if described.len() != 1 {
        return Err(CloudError::not_found(KIND, name));
    }
    Ok(from_data(described.remove(0)))
}

fn from_data(data: SecurityGroupData) -> SecurityGroup {
    SecurityGroup {
        id: data.id,
        project_name: tags::lookup_owned(&data.tags, tags::PROJECT_NAME),
        config_name: tags::lookup_owned(&data.tags, tags::CONFIG_NAME),
        service_name: tags::lookup_owned(&data.tags, tags::SERVICE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn find_all_resolves_each_name() {
        let mut mock = MockProvider::default();
        mock.add_security_group("web", "sg-1", "project", "config", "service");
        mock.add_security_group("db", "sg-2", "project", "config", "service");

        let found = find_all(&mock, &["web".to_string(), "db".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id(), "sg-1");
        assert_eq!(found[1].id(), "sg-2");
        assert_eq!(found[1].service_name(), Some("service"));
    }

    #[tokio::test]
    async fn missing_group_fails_fast() {
        let mut mock = MockProvider::default();
        mock.add_security_group("web", "sg-1", "project", "config", "service");

        let err = find_all(&mock, &["web".to_string(), "ghost".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::NotFound(_)));
    }
}
