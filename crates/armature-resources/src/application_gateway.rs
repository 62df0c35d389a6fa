//! Application gateway builder.
//!
//! One logical config explodes into a root gateway definition plus one child
//! definition per backend pool. Pool entries and the gateway ip configuration
//! embed subnet references, which the resolver picks up as implicit
//! dependencies on the owning virtual network.

use std::collections::{BTreeMap, BTreeSet};

use armature_core::{
    Capacity, Dependable, Error, Location, PropertyValue, ResourceBuilder, ResourceDefinition,
    ResourceId, ResourceName, ResourceType, Result, Taggable,
};
use tracing::debug;

pub const APPLICATION_GATEWAYS: ResourceType =
    ResourceType::new("Microsoft.Network/applicationGateways", "2023-05-01");
pub const BACKEND_ADDRESS_POOLS: ResourceType = ResourceType::new(
    "Microsoft.Network/applicationGateways/backendAddressPools",
    "2023-05-01",
);

#[derive(Debug, Clone)]
struct BackendPool {
    name: ResourceName,
    addresses: Vec<String>,
    subnet: Option<ResourceId>,
}

/// Accumulating config for an application gateway.
#[derive(Debug, Clone, Default)]
pub struct ApplicationGatewayConfig {
    name: ResourceName,
    capacity: Option<Capacity>,
    gateway_ip_subnet: Option<ResourceId>,
    backend_pools: Vec<BackendPool>,
    dependencies: BTreeSet<ResourceId>,
    tags: BTreeMap<String, String>,
}

impl ApplicationGatewayConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: ResourceName::new(name)?,
            ..Self::default()
        })
    }

    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Subnet hosting the gateway ip configuration.
    pub fn gateway_ip_subnet(mut self, subnet: ResourceId) -> Self {
        self.gateway_ip_subnet = Some(subnet);
        self
    }

    pub fn backend_pool(mut self, name: &str, addresses: &[&str]) -> Result<Self> {
        self.backend_pools.push(BackendPool {
            name: ResourceName::new(name)?,
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            subnet: None,
        });
        Ok(self)
    }

    /// Backend pool whose members live in a subnet of another network.
    pub fn backend_pool_in_subnet(
        mut self,
        name: &str,
        addresses: &[&str],
        subnet: ResourceId,
    ) -> Result<Self> {
        self.backend_pools.push(BackendPool {
            name: ResourceName::new(name)?,
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            subnet: Some(subnet),
        });
        Ok(self)
    }
}

impl Taggable for ApplicationGatewayConfig {
    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }
}

impl Dependable for ApplicationGatewayConfig {
    fn dependencies_mut(&mut self) -> &mut BTreeSet<ResourceId> {
        &mut self.dependencies
    }
}

impl ResourceBuilder for ApplicationGatewayConfig {
    fn resource_id(&self) -> ResourceId {
        APPLICATION_GATEWAYS.resource_id(self.name.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation {
                resource: APPLICATION_GATEWAYS.path().to_string(),
                message: "resource name is not set".to_string(),
            });
        }
        if self.backend_pools.is_empty() {
            return Err(Error::Validation {
                resource: self.name.to_string(),
                message: "at least one backend pool is required".to_string(),
            });
        }
        Ok(())
    }

    fn build(&self, location: &Location) -> Result<Vec<ResourceDefinition>> {
        self.validate()?;

        let gateway_id = self.resource_id();
        debug!(gateway = %gateway_id, pools = self.backend_pools.len(), "building gateway");

        let mut properties = PropertyValue::object();
        let mut sku = PropertyValue::mapping([("name", "Standard_v2"), ("tier", "Standard_v2")]);
        if let Some(capacity) = self.capacity {
            sku.insert("capacity", capacity);
        }
        properties.insert("sku", sku);
        if let Some(subnet) = &self.gateway_ip_subnet {
            properties.insert(
                "gatewayIPConfigurations",
                PropertyValue::sequence([PropertyValue::mapping([
                    ("name", PropertyValue::from("gateway-ip-config")),
                    (
                        "properties",
                        PropertyValue::mapping([("subnet", subnet.clone())]),
                    ),
                ])]),
            );
        }

        let root = ResourceDefinition::new(gateway_id.clone(), location.clone())
            .with_properties(properties)
            .with_dependencies(self.dependencies.clone())
            .with_tags(self.tags.clone());

        let mut definitions = vec![root];
        for pool in &self.backend_pools {
            let pool_id = BACKEND_ADDRESS_POOLS.child_of(gateway_id.clone(), pool.name.clone());
            let mut pool_properties = PropertyValue::object();
            pool_properties.insert(
                "backendAddresses",
                PropertyValue::sequence(pool.addresses.iter().map(|address| {
                    PropertyValue::mapping([("ipAddress", address.as_str())])
                })),
            );
            if let Some(subnet) = &pool.subnet {
                pool_properties.insert("subnet", subnet.clone());
            }

            definitions.push(
                ResourceDefinition::new(pool_id, location.clone())
                    .with_properties(pool_properties)
                    .with_dependencies(BTreeSet::from([gateway_id.clone()])),
            );
        }

        Ok(definitions)
    }
}
