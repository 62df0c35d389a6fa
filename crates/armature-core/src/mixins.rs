//! Capability mixins for builder configs.
//!
//! Resource kinds share no base type, so cross-cutting operations (tag
//! merging, dependency aggregation) are expressed as traits any config can
//! implement. Each trait supplies the merge semantics as default methods
//! over a single accessor.

use std::collections::{BTreeMap, BTreeSet};

use crate::identity::ResourceId;

/// A config that carries a tag map.
pub trait Taggable: Sized {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String>;

    /// Merge `tags` into the config, left-biased: keys already present keep
    /// their existing value.
    fn with_tags<K, V, I>(mut self, tags: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let existing = self.tags_mut();
        for (key, value) in tags {
            existing.entry(key.into()).or_insert_with(|| value.into());
        }
        self
    }

    fn with_tag(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_tags([(key.into(), value.into())])
    }
}

/// A config that carries an explicit dependency set.
pub trait Dependable: Sized {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId>;

    /// Add dependency edges; set union, duplicates collapse.
    fn depends_on<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ResourceId>,
    {
        self.dependencies_mut().extend(ids);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ResourceName, ResourceType};

    const ACCOUNTS: ResourceType = ResourceType::new("Example.Storage/accounts", "2023-01-01");

    #[derive(Default)]
    struct TestConfig {
        tags: BTreeMap<String, String>,
        dependencies: BTreeSet<ResourceId>,
    }

    impl Taggable for TestConfig {
        fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
            &mut self.tags
        }
    }

    impl Dependable for TestConfig {
        fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
            &mut self.dependencies
        }
    }

    fn account_id(name: &str) -> ResourceId {
        ACCOUNTS.resource_id(ResourceName::new(name).unwrap())
    }

    #[test]
    fn test_tag_merge_is_left_biased() {
        let config = TestConfig::default()
            .with_tags([("a", "1")])
            .with_tags([("a", "2"), ("b", "3")]);

        assert_eq!(config.tags.get("a").map(String::as_str), Some("1"));
        assert_eq!(config.tags.get("b").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_dependency_merge_is_set_union() {
        let x = account_id("x");
        let y = account_id("y");

        let config = TestConfig::default()
            .depends_on([x.clone()])
            .depends_on([y.clone(), x.clone()]);

        assert_eq!(config.dependencies.len(), 2);
        assert!(config.dependencies.contains(&x));
        assert!(config.dependencies.contains(&y));
    }
}
