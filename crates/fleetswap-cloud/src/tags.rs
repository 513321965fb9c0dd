//! Tag index — typed identity accessors over provider resource tags.
//!
//! Every resource kind derives its identity from the same tag keys, so one
//! lookup implementation serves all of them. Provider tag sets are defined
//! to have unique keys; with duplicates, the first match wins.

/// Tag key carrying the project name.
pub const PROJECT_NAME: &str = "ProjectName";
/// Tag key carrying the config name.
pub const CONFIG_NAME: &str = "ConfigName";
/// Tag key carrying the service name.
pub const SERVICE_NAME: &str = "ServiceName";
/// Tag key carrying the release id.
pub const RELEASE_ID: &str = "ReleaseId";
/// Convention tag marking a resource as managed by this system.
pub const MANAGED_BY: &str = "ManagedBy";
/// Expected value of the [`MANAGED_BY`] tag.
pub const MANAGED_BY_VALUE: &str = "fleetswap";

/// A key/value pair as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Return the value of the first tag whose key equals `key`, if any.
pub fn lookup<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

/// Owned variant of [`lookup`], for building domain objects out of wire data.
pub fn lookup_owned(tags: &[Tag], key: &str) -> Option<String> {
    lookup(tags, key).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let tags = vec![
            Tag::new("ProjectName", "alpha"),
            Tag::new("ProjectName", "beta"),
        ];
        assert_eq!(lookup(&tags, "ProjectName"), Some("alpha"));
    }

    #[test]
    fn absent_key_is_none() {
        let tags = vec![Tag::new("ProjectName", "alpha")];
        assert_eq!(lookup(&tags, "ConfigName"), None);
        assert_eq!(lookup(&[], "ProjectName"), None);
    }

    #[test]
    fn lookup_owned_clones_the_value() {
        let tags = vec![Tag::new(MANAGED_BY, MANAGED_BY_VALUE)];
        assert_eq!(
            lookup_owned(&tags, MANAGED_BY),
            Some("fleetswap".to_string())
        );
    }
}
