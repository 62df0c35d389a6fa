//! Log-analytics workspace builder.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Days, Dependable, Error, Gb, Location, PropertyValue, ResourceBuilder, ResourceDefinition,
    ResourceId, ResourceName, ResourceType, Result, Taggable,
};

pub const WORKSPACES: ResourceType =
    ResourceType::new("Microsoft.OperationalInsights/workspaces", "2022-10-01");

/// Accumulating config for a log-analytics workspace.
#[derive(Debug, Clone, Default)]
pub struct LogAnalyticsConfig {
    name: ResourceName,
    retention: Option<Days>,
    daily_quota: Option<Gb>,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl LogAnalyticsConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: ResourceName::new(name)?,
            ..Self::default()
        })
    }

    pub fn retention(mut self, retention: Days) -> Self {
        self.retention = Some(retention);
        self
    }

    pub fn daily_quota(mut self, quota: Gb) -> Self {
        self.daily_quota = Some(quota);
        self
    }
}

impl Taggable for LogAnalyticsConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for LogAnalyticsConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for LogAnalyticsConfig {
    fn resource_id(&self) -> ResourceId {
        WORKSPACES.resource_id(self.name.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation {
                resource: WORKSPACES.path().to_string(),
                message: "resource name is not set".to_string(),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;

        let mut properties = PropertyValue::object();
        properties.insert("sku", PropertyValue::mapping([("name", "PerGB2018")]));
        if let Some(retention) = self.retention {
            properties.insert("retentionInDays", retention);
        }
        if let Some(quota) = self.daily_quota {
            properties.insert(
                "workspaceCapping",
                PropertyValue::mapping([("dailyQuotaGb", quota)]),
            );
        }

        Ok(vec![
            ResourceDefinition::new(self.resource_id(), location.clone())
                .with_properties(properties)
                .with_dependencies(self.dependencies.clone())
                .with_tags(self.tags.clone()),
        ])
    }
}
