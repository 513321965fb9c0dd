//! Subnet finder.
//!
//! Subnets carry no service identity; ownership is asserted by the
//! `ManagedBy` convention tag alone, checked during validation.

use crate::api::{ComputeApi, SubnetData};
use crate::error::{CloudError, CloudResult};
use crate::tags;

const KIND: &str = "subnet";

/// A subnet with its convention tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Subnet {
    id: String,
    managed_by: Option<String>,
}

impl Subnet {
    /// Provider-assigned subnet id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the `ManagedBy` convention tag, if present.
    pub fn managed_by(&self) -> Option<&str> {
        self.managed_by.as_deref()
    }
}

/// Find every named subnet, preserving input order, failing fast.
pub async fn find_all(api: &impl ComputeApi, names: &[String]) -> CloudResult<Vec<Subnet>> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        found.push(find_by_name(api, name).await?);
    }
    Ok(found)
}

/// Find one subnet by its `Name` tag.
pub async fn find_by_name(api: &impl ComputeApi, name: &str) -> CloudResult<Subnet> {
    let mut described = api.describe_subnets(name).await?;
    if described.len() != 1 {
        return Err(CloudError::not_found(KIND, name));
    }
    Ok(from_data(described.remove(0)))
}

fn from_data(data: SubnetData) -> Subnet {
    Subnet {
        id: data.id,
        managed_by: tags::lookup_owned(&data.tags, tags::MANAGED_BY),
    }
}
