//! Diagnostic-settings builder.
//!
//! Routes metric and log categories from one monitored resource to up to
//! three sink kinds: a storage account, an event hub (via a namespace
//! authorization rule), and a log-analytics workspace. The emitted
//! definition nests under the monitored resource, so its identity stays in
//! the source's type family.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Dependable, Error, Location, PropertyValue, ResourceBuilder, ResourceDefinition, ResourceId,
    ResourceName, ResourceType, Result, Taggable,
};
use tracing::debug;

use crate::event_hub::EventHubConfig;
use crate::{log_analytics, storage_account};

pub const DIAGNOSTIC_SETTINGS: ResourceType = ResourceType::new(
    "Microsoft.Insights/diagnosticSettings",
    "2021-05-01-preview",
);

/// Accumulating config for a diagnostic setting.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSettingsConfig {
    name: ResourceName,
    source: Option<ResourceId>,
    metrics: BTreeSet<String>,
    logs: BTreeSet<String>,
    storage_account_id: Option<ResourceId>,
    event_hub_authorization_rule_id: Option<ResourceId>,
    event_hub_name: Option<ResourceName>,
    log_analytics_id: Option<ResourceId>,
    dedicated_log_analytics: bool,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl DiagnosticSettingsConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: ResourceName::new(name)?,
            ..Self::default()
        })
    }

    /// The monitored resource whose metrics and logs are captured.
    pub fn source(mut self, id: ResourceId) -> Self {
        self.source = Some(id);
        self
    }

    pub fn metric(mut self, category: &str) -> Self {
        self.metrics.insert(category.to_string());
        self
    }

    pub fn log(mut self, category: &str) -> Self {
        self.logs.insert(category.to_string());
        self
    }

    /// Canonical storage sink operation.
    pub fn storage_account_id(mut self, id: ResourceId) -> Self {
        self.storage_account_id = Some(id);
        self
    }

    /// Canonical event-hub sink operation.
    pub fn event_hub_authorization_rule_id(mut self, id: ResourceId) -> Self {
        self.event_hub_authorization_rule_id = Some(id);
        self
    }

    /// Name a specific hub within the namespace. Requires the authorization
    /// rule id to be set first.
    pub fn event_hub_name(mut self, name: &str) -> Result<Self> {
        if self.event_hub_authorization_rule_id.is_none() {
            return Err(Error::Precondition {
                resource: self.name.to_string(),
                operation: "event_hub_name",
                requires: "event_hub_authorization_rule_id",
            });
        }
        self.event_hub_name = Some(ResourceName::new(name)?);
        Ok(self)
    }

    pub fn configured_event_hub_name(&self) -> Option<&ResourceName> {
        self.event_hub_name.as_ref()
    }

    /// Canonical log-analytics sink operation.
    pub fn log_analytics_id(mut self, id: ResourceId) -> Self {
        self.log_analytics_id = Some(id);
        self
    }

    /// Route to a dedicated per-resource table in the attached workspace.
    /// Only changes how the workspace stores data; it does not count as a
    /// sink on its own.
    pub fn dedicated_log_analytics(mut self, enabled: bool) -> Self {
        self.dedicated_log_analytics = enabled;
        self
    }

    /// Add a destination by resource id, dispatching over the recognized
    /// sink kinds.
    pub fn add_destination(self, id: ResourceId) -> Result<Self> {
        match id.resource_type() {
            t if t == storage_account::STORAGE_ACCOUNTS => Ok(self.storage_account_id(id)),
            t if t == log_analytics::WORKSPACES => Ok(self.log_analytics_id(id)),
            _ => Err(Error::UnsupportedReference { id }),
        }
    }

    /// Convenience form of [`Self::add_destination`] taking another builder;
    /// pure adapter, computes the id and delegates.
    pub fn add_destination_of(self, builder: &impl ResourceBuilder) -> Result<Self> {
        self.add_destination(builder.resource_id())
    }

    /// Convenience event-hub sink form taking a built event-hub config;
    /// delegates to the canonical rule-id and hub-name operations.
    pub fn event_hub_destination(self, hubs: &EventHubConfig) -> Result<Self> {
        self.event_hub_authorization_rule_id(hubs.authorization_rule_id()?)
            .event_hub_name(hubs.hub_name().as_str())
    }
}

impl Taggable for DiagnosticSettingsConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for DiagnosticSettingsConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for DiagnosticSettingsConfig {
    fn resource_id(&self) -> ResourceId {
        match &self.source {
            Some(source) => DIAGNOSTIC_SETTINGS.child_of(source.clone(), self.name.clone()),
            None => DIAGNOSTIC_SETTINGS.resource_id(self.name.clone()),
        }
    }

    fn validate(&self) -> Result<()> {
        let mut unmet = Vec::new();
        if self.name.is_empty() {
            unmet.push("a setting name");
        }
        if self.source.is_none() {
            unmet.push("a source resource");
        }
        if self.metrics.is_empty() && self.logs.is_empty() {
            unmet.push("at least one metric or log category");
        }
        let has_sink = self.storage_account_id.is_some()
            || self.event_hub_authorization_rule_id.is_some()
            || self.log_analytics_id.is_some();
        if !has_sink {
            // dedicated_log_analytics alone is not a sink
            unmet.push("at least one sink destination (storage, event hub, or log-analytics workspace)");
        }
        if !unmet.is_empty() {
            return Err(Error::Validation {
                resource: self.resource_id().to_string(),
                message: unmet.join("; "),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;
        debug!(setting = %self.resource_id(), "building diagnostic setting");

        let mut properties = PropertyValue::object();
        if !self.metrics.is_empty() {
            properties.insert(
                "metrics",
                PropertyValue::sequence(self.metrics.iter().map(|category| {
                    PropertyValue::mapping([
                        ("category", PropertyValue::from(category.as_str())),
                        ("enabled", PropertyValue::from(true)),
                    ])
                })),
            );
        }
        if !self.logs.is_empty() {
            properties.insert(
                "logs",
                PropertyValue::sequence(self.logs.iter().map(|category| {
                    PropertyValue::mapping([
                        ("category", PropertyValue::from(category.as_str())),
                        ("enabled", PropertyValue::from(true)),
                    ])
                })),
            );
        }
        if let Some(id) = &self.storage_account_id {
            properties.insert("storageAccountId", id.clone());
        }
        if let Some(id) = &self.event_hub_authorization_rule_id {
            properties.insert("eventHubAuthorizationRuleId", id.clone());
        }
        if let Some(name) = &self.event_hub_name {
            properties.insert("eventHubName", name.as_str());
        }
        if let Some(id) = &self.log_analytics_id {
            properties.insert("workspaceId", id.clone());
            if self.dedicated_log_analytics {
                properties.insert("logAnalyticsDestinationType", "Dedicated");
            }
        }

        Ok(vec![
            ResourceDefinition::new(self.resource_id(), location.clone())
                .with_properties(properties)
                .with_dependencies(self.dependencies.clone())
                .with_tags(self.tags.clone()),
        ])
    }
}
