//! Builder protocol: locations, terminal definitions, and the contract every
//! fluent resource builder satisfies.

use std::collections::{BTreeMap, BTreeSet};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::ResourceId;
use crate::properties::PropertyValue;

/// A deployment location (provider region).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Location(String);

impl Location {
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    pub fn west_europe() -> Self {
        Self::new("westeurope")
    }

    pub fn north_europe() -> Self {
        Self::new("northeurope")
    }

    pub fn east_us() -> Self {
        Self::new("eastus")
    }

    pub fn west_us() -> Self {
        Self::new("westus")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The terminal, read-only form of a resource config: what the resolver and
/// emitter consume. Built once by [`ResourceBuilder::build`], never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    pub id: ResourceId,
    pub location: Location,
    pub properties: PropertyValue,
    pub dependencies: BTreeSet<ResourceId>,
    pub tags: BTreeMap<String, String>,
    /// Property names the target schema requires as explicit `null` when
    /// absent. Empty for every kind currently shipped; everything else is
    /// omitted rather than emitted as null.
    pub explicit_null_properties: &'static [&'static str],
}

impl ResourceDefinition {
    pub fn new(id: ResourceId, location: Location) -> Self {
        Self {
            id,
            location,
            properties: PropertyValue::object(),
            dependencies: BTreeSet::new(),
            tags: BTreeMap::new(),
            explicit_null_properties: &[],
        }
    }

    pub fn with_properties(mut self, properties: PropertyValue) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_dependencies(mut self, dependencies: BTreeSet<ResourceId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }
}

/// The contract every fluent builder satisfies.
///
/// Configs accumulate immutably through kind-specific operations; `validate`
/// runs once at the boundary between accumulation and build; `build` turns a
/// validated config and a target location into one or more terminal
/// definitions (some kinds explode into a root plus children).
pub trait ResourceBuilder {
    /// Identity of the root resource this builder emits.
    fn resource_id(&self) -> ResourceId;

    /// Finalization check. Kind-specific well-formedness rules; fails with
    /// a validation error naming every unmet condition.
    fn validate(&self) -> Result<()>;

    /// Validate, then emit the terminal definitions for `location`.
    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ResourceName, ResourceType};

    const ACCOUNTS: ResourceType = ResourceType::new("Example.Storage/accounts", "2023-01-01");

    #[test]
    fn test_region_constructors() {
        assert_eq!(Location::west_europe().as_str(), "westeurope");
        assert_eq!(Location::north_europe().as_str(), "northeurope");
        assert_eq!(Location::east_us().as_str(), "eastus");
        assert_eq!(Location::west_us().as_str(), "westus");
        assert_eq!(Location::new("uksouth").as_str(), "uksouth");
    }

    #[test]
    fn test_definition_starts_empty() {
        let id = ACCOUNTS.resource_id(ResourceName::new("store1").unwrap());
        let definition = ResourceDefinition::new(id, Location::east_us());
        assert!(definition.dependencies.is_empty());
        assert!(definition.tags.is_empty());
        assert_eq!(definition.properties, PropertyValue::object());
    }
}
