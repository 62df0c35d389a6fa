//! Storage account builder.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Dependable, Error, Location, PropertyValue, ResourceBuilder, ResourceDefinition, ResourceId,
    ResourceName, ResourceType, Result, Taggable,
};
use serde::{Deserialize, Serialize};

pub const STORAGE_ACCOUNTS: ResourceType =
    ResourceType::new("Microsoft.Storage/storageAccounts", "2023-01-01");

/// Storage account SKU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageSku {
    #[default]
    StandardLrs,
    StandardGrs,
    StandardZrs,
    PremiumLrs,
}

impl std::fmt::Display for StorageSku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageSku::StandardLrs => write!(f, "Standard_LRS"),
            StorageSku::StandardGrs => write!(f, "Standard_GRS"),
            StorageSku::StandardZrs => write!(f, "Standard_ZRS"),
            StorageSku::PremiumLrs => write!(f, "Premium_LRS"),
        }
    }
}

/// Storage access tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessTier {
    Hot,
    Cool,
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessTier::Hot => write!(f, "Hot"),
            AccessTier::Cool => write!(f, "Cool"),
        }
    }
}

/// Accumulating config for a storage account.
#[derive(Debug, Clone, Default)]
pub struct StorageAccountConfig {
    name: ResourceName,
    sku: StorageSku,
    access_tier: Option<AccessTier>,
    https_only: bool,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl StorageAccountConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: ResourceName::new(name)?,
            https_only: true,
            ..Self::default()
        })
    }

    pub fn sku(mut self, sku: StorageSku) -> Self {
        self.sku = sku;
        self
    }

    pub fn access_tier(mut self, tier: AccessTier) -> Self {
        self.access_tier = Some(tier);
        self
    }

    pub fn https_only(mut self, enabled: bool) -> Self {
        self.https_only = enabled;
        self
    }
}

impl Taggable for StorageAccountConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for StorageAccountConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for StorageAccountConfig {
    fn resource_id(&self) -> ResourceId {
        STORAGE_ACCOUNTS.resource_id(self.name.clone())
    }

    fn validate(&self) -> Result<()> {
        // Default-constructed configs still carry the empty name sentinel.
        if self.name.is_empty() {
            return Err(Error::Validation {
                resource: STORAGE_ACCOUNTS.path().to_string(),
                message: "resource name is not set".to_string(),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;

        let mut properties = PropertyValue::object();
        properties.insert("sku", PropertyValue::mapping([("name", self.sku.to_string())]));
        properties.insert("supportsHttpsTrafficOnly", self.https_only);
        if let Some(tier) = self.access_tier {
            properties.insert("accessTier", tier.to_string());
        }

        Ok(vec![
            ResourceDefinition::new(self.resource_id(), location.clone())
                .with_properties(properties)
                .with_dependencies(self.dependencies.clone())
                .with_tags(self.tags.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_single_definition() {
        let config = StorageAccountConfig::new("store1")
            .unwrap()
            .sku(StorageSku::StandardGrs)
            .access_tier(AccessTier::Cool);

        let defs = config.build(&Location::west_europe()).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, config.resource_id());
        assert_eq!(defs[0].location.as_str(), "westeurope");
    }

    #[test]
    fn test_absent_access_tier_is_omitted() {
        let config = StorageAccountConfig::new("store1").unwrap();
        let defs = config.build(&Location::west_europe()).unwrap();
        let json = defs[0].properties.to_json();
        assert!(json.get("accessTier").is_none());
    }

    #[test]
    fn test_default_config_fails_validation() {
        let config = StorageAccountConfig::default();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(config.build(&Location::west_europe()).is_err());
    }

    #[test]
    fn test_tags_carry_through() {
        let config = StorageAccountConfig::new("store1")
            .unwrap()
            .with_tag("env", "prod");
        let defs = config.build(&Location::west_europe()).unwrap();
        assert_eq!(defs[0].tags.get("env").map(String::as_str), Some("prod"));
    }
}
