//! Virtual network builder.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Dependable, Error, Location, PropertyValue, ResourceBuilder, ResourceDefinition, ResourceId,
    ResourceName, ResourceType, Result, Taggable,
};

pub const VIRTUAL_NETWORKS: ResourceType =
    ResourceType::new("Microsoft.Network/virtualNetworks", "2023-05-01");
pub const SUBNETS: ResourceType =
    ResourceType::new("Microsoft.Network/virtualNetworks/subnets", "2023-05-01");

#[derive(Debug, Clone)]
struct Subnet {
    name: ResourceName,
    prefix: String,
}

/// Accumulating config for a virtual network with inline subnets.
#[derive(Debug, Clone, Default)]
pub struct VirtualNetworkConfig {
    name: ResourceName,
    address_spaces: Vec<String>,
    subnets: Vec<Subnet>,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl VirtualNetworkConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: ResourceName::new(name)?,
            ..Self::default()
        })
    }

    pub fn address_space(mut self, prefix: &str) -> Self {
        self.address_spaces.push(prefix.to_string());
        self
    }

    pub fn subnet(mut self, name: &str, prefix: &str) -> Result<Self> {
        self.subnets.push(Subnet {
            name: ResourceName::new(name)?,
            prefix: prefix.to_string(),
        });
        Ok(self)
    }

    /// Id of a declared subnet, for reference from other builders.
    pub fn subnet_id(&self, name: &str) -> Result<ResourceId> {
        let name = ResourceName::new(name)?;
        if !self.subnets.iter().any(|subnet| subnet.name == name) {
            return Err(Error::Validation {
                resource: self.name.to_string(),
                message: format!("no subnet named '{name}' is declared"),
            });
        }
        Ok(SUBNETS.child_of(self.resource_id(), name))
    }
}

impl Taggable for VirtualNetworkConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for VirtualNetworkConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for VirtualNetworkConfig {
    fn resource_id(&self) -> ResourceId {
        VIRTUAL_NETWORKS.resource_id(self.name.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation {
                resource: VIRTUAL_NETWORKS.path().to_string(),
                message: "resource name is not set".to_string(),
            });
        }
        if self.address_spaces.is_empty() {
            return Err(Error::Validation {
                resource: self.name.to_string(),
                message: "at least one address space is required".to_string(),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;

        let mut properties = PropertyValue::object();
        properties.insert(
            "addressSpace",
            PropertyValue::mapping([(
                "addressPrefixes",
                PropertyValue::sequence(self.address_spaces.iter().map(String::as_str)),
            )]),
        );
        if !self.subnets.is_empty() {
            properties.insert(
                "subnets",
                PropertyValue::sequence(self.subnets.iter().map(|subnet| {
                    PropertyValue::mapping([
                        ("name", PropertyValue::from(subnet.name.as_str())),
                        (
                            "properties",
                            PropertyValue::mapping([("addressPrefix", subnet.prefix.as_str())]),
                        ),
                    ])
                })),
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
