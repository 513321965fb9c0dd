//! Machine image finder.
//!
//! Images, like subnets, carry no service identity; the `ManagedBy`
//! convention tag is the only ownership marker and is checked during
//! validation.

use crate::api::{ComputeApi, ImageData};
use crate::error::{CloudError, CloudResult};
use crate::tags;

const KIND: &str = "image";

/// A machine image with its convention tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    id: String,
    managed_by: Option<String>,
}

impl Image {
    /// Provider-assigned image id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the `ManagedBy` convention tag, if present.
    pub fn managed_by(&self) -> Option<&str> {
        self.managed_by.as_deref()
    }
}

/// Find one image by its `Name` tag. Exactly one match is required; an
/// ambiguous name is as much of a failure as a missing one.
pub async fn find_by_name(api: &impl ComputeApi, name: &str) -> CloudResult<Image> {
    let mut described = api.describe_images(name).await?;
    if described.len() != 1 {
        return Err(CloudError::not_found(KIND, name));
    }
    Ok(from_data(described.remove(0)))
}

fn from_data(data: ImageData) -> Image {
    Image {
        id: data.id,
        managed_by: tags::lookup_owned(&data.tags, tags::MANAGED_BY),
    }
}
