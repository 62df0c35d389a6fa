//! Event-hub namespace builder.
//!
//! One logical config explodes into three definitions: the namespace root,
//! the hub, and a manage-rights authorization rule whose id is what
//! diagnostic settings reference as an event-hub sink.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Capacity, Days, Dependable, Error, Location, PropertyValue, ResourceBuilder,
    ResourceDefinition, ResourceId, ResourceName, ResourceType, Result, Taggable,
};

pub const NAMESPACES: ResourceType =
    ResourceType::new("Microsoft.EventHub/namespaces", "2021-11-01");
pub const EVENT_HUBS: ResourceType =
    ResourceType::new("Microsoft.EventHub/namespaces/eventhubs", "2021-11-01");
pub const AUTHORIZATION_RULES: ResourceType = ResourceType::new(
    "Microsoft.EventHub/namespaces/authorizationRules",
    "2021-11-01",
);

const DEFAULT_RULE: &str = "RootManageSharedAccessKey";

/// Accumulating config for an event-hub namespace with one hub.
#[derive(Debug, Clone, Default)]
pub struct EventHubConfig {
    namespace: ResourceName,
    hub: ResourceName,
    capacity: Option<Capacity>,
    partitions: Option<u32>,
    message_retention: Option<Days>,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl EventHubConfig {
    pub fn new(namespace: &str, hub: &str) -> Result<Self> {
        Ok(Self {
            namespace: ResourceName::new(namespace)?,
            hub: ResourceName::new(hub)?,
            ..Self::default()
        })
    }

    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn partitions(mut self, count: u32) -> Self {
        self.partitions = Some(count);
        self
    }

    pub fn message_retention(mut self, retention: Days) -> Self {
        self.message_retention = Some(retention);
        self
    }

    /// Id of the namespace's manage-rights authorization rule.
    pub fn authorization_rule_id(&self) -> Result<ResourceId> {
        Ok(AUTHORIZATION_RULES.child_of(self.resource_id(), ResourceName::new(DEFAULT_RULE)?))
    }

    /// Id of the hub nested under the namespace.
    pub fn hub_id(&self) -> ResourceId {
        EVENT_HUBS.child_of(self.resource_id(), self.hub.clone())
    }

    /// Name of the hub, as referenced by diagnostic-settings sinks.
    pub fn hub_name(&self) -> &ResourceName {
        &self.hub
    }
}

impl Taggable for EventHubConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for EventHubConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for EventHubConfig {
    fn resource_id(&self) -> ResourceId {
        NAMESPACES.resource_id(self.namespace.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() || self.hub.is_empty() {
            return Err(Error::Validation {
                resource: NAMESPACES.path().to_string(),
                message: "namespace and hub names must be set".to_string(),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;

        let namespace_id = self.resource_id();

        let mut namespace_properties = PropertyValue::object();
        let mut sku = PropertyValue::mapping([("name", "Standard"), ("tier", "Standard")]);
        if let Some(capacity) = self.capacity {
            sku.insert("capacity", capacity);
        }
        namespace_properties.insert("sku", sku);

        let namespace = ResourceDefinition::new(namespace_id.clone(), location.clone())
            .with_properties(namespace_properties)
            .with_dependencies(self.dependencies.clone())
            .with_tags(self.tags.clone());

        let mut hub_properties = PropertyValue::object();
        if let Some(partitions) = self.partitions {
            hub_properties.insert("partitionCount", partitions);
        }
        if let Some(retention) = self.message_retention {
            hub_properties.insert("messageRetentionInDays", retention);
        }

        let hub = ResourceDefinition::new(self.hub_id(), location.clone())
            .with_properties(hub_properties)
            .with_dependencies(BTreeSet::from([namespace_id.clone()]));

        let rule = ResourceDefinition::new(self.authorization_rule_id()?, location.clone())
            .with_properties(PropertyValue::mapping([(
                "rights",
                PropertyValue::sequence(["Listen", "Send", "Manage"]),
            )]))
            .with_dependencies(BTreeSet::from([namespace_id]));

        Ok(vec![namespace, hub, rule])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explodes_into_namespace_hub_and_rule() {
        let config = EventHubConfig::new("ns1", "hub1").unwrap().partitions(4);
        let defs = config.build(&Location::north_europe()).unwrap();

        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].id, config.resource_id());
        assert_eq!(defs[1].id, config.hub_id());
        assert_eq!(defs[2].id, config.authorization_rule_id().unwrap());
    }

    #[test]
    fn test_children_depend_on_namespace() {
        let config = EventHubConfig::new("ns1", "hub1").unwrap();
        let defs = config.build(&Location::north_europe()).unwrap();
        let namespace_id = config.resource_id();

        assert!(defs[1].dependencies.contains(&namespace_id));
        assert!(defs[2].dependencies.contains(&namespace_id));
    }

    #[test]
    fn test_default_config_fails_validation() {
        let config = EventHubConfig::default();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Validation { .. }
        ));
    }

    #[test]
    fn test_rule_id_is_nested_under_namespace() {
        let config = EventHubConfig::new("ns1", "hub1").unwrap();
        let rule = config.authorization_rule_id().unwrap();
        assert_eq!(rule.qualified_name(), "ns1/RootManageSharedAccessKey");
        assert_eq!(rule.resource_type(), AUTHORIZATION_RULES);
    }
}
