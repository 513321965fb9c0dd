//! Shared shape of name-addressed lookups.
//!
//! Every finder runs the same two calls: describe-by-name, then fetch tags
//! by identifier. The result classification is identical across kinds and
//! lives here: a describe must return exactly one item whose name equals the
//! requested name (providers may match case-insensitively or by prefix), and
//! a tag fetch must return exactly one description echoing the identifier.

use crate::api::TagDescription;
use crate::error::{CloudError, CloudResult};
use crate::tags::Tag;

/// Name extraction for describe results, per resource kind.
pub(crate) trait Named {
    fn name(&self) -> &str;
}

/// Require exactly one item matching the requested name.
pub(crate) fn single_named<T: Named>(
    items: Vec<T>,
    requested: &str,
    kind: &str,
) -> CloudResult<T> {
    let mut items = items;
    if items.len() != 1 {
        return Err(CloudError::not_found(kind, requested));
    }
    let item = items.remove(0);
    if item.name() != requested {
        return Err(CloudError::not_found(kind, requested));
    }
    Ok(item)
}

/// Require exactly one tag description echoing the identifier.
pub(crate) fn single_tag_set(
    sets: Vec<TagDescription>,
    id: &str,
    kind: &str,
) -> CloudResult<Vec<Tag>> {
    let mut sets = sets;
    if sets.len() != 1 {
        return Err(CloudError::not_found(kind, id));
    }
    let set = sets.remove(0);
    if set.resource_id != id {
        return Err(CloudError::not_found(kind, id));
    }
    Ok(set.tags)
}
