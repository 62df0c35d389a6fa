//! Kind-erased property tree for resource definitions.
//!
//! Builders describe kind-specific properties as [`PropertyValue`] trees so
//! the resolver can discover embedded resource references without knowing
//! any kind's schema, and the emitter can translate the whole tree to JSON
//! uniformly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::ResourceId;

/// One node in a resource's property tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Sequence(Vec<PropertyValue>),
    Mapping(BTreeMap<String, PropertyValue>),
    /// Embedded reference to another resource; renders as that resource's
    /// reference token and contributes an implicit dependency edge.
    Reference(ResourceId),
    /// Raw template expression passed through to the document untouched.
    Expression(String),
}

impl PropertyValue {
    /// An empty mapping node.
    pub fn object() -> Self {
        PropertyValue::Mapping(BTreeMap::new())
    }

    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        PropertyValue::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<PropertyValue>,
        I: IntoIterator<Item = V>,
    {
        PropertyValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Insert an entry into a mapping node. No-op on non-mapping nodes.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        if let PropertyValue::Mapping(entries) = self {
            entries.insert(key.into(), value.into());
        }
    }

    /// Every [`ResourceId`] embedded anywhere in this tree, including inside
    /// nested sequences and mappings.
    pub fn references(&self) -> Vec<ResourceId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<ResourceId>) {
        match self {
            PropertyValue::Reference(id) => out.push(id.clone()),
            PropertyValue::Sequence(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            PropertyValue::Mapping(entries) => {
                for value in entries.values() {
                    value.collect_references(out);
                }
            }
            _ => {}
        }
    }

    /// Translate to the wire representation.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => Value::Number(n.clone()),
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Sequence(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            PropertyValue::Reference(id) => Value::String(id.reference_token()),
            PropertyValue::Expression(expr) => Value::String(expr.clone()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Number(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<ResourceId> for PropertyValue {
    fn from(value: ResourceId) -> Self {
        PropertyValue::Reference(value)
    }
}

impl<V: Into<PropertyValue>> From<Vec<V>> for PropertyValue {
    fn from(items: Vec<V>) -> Self {
        PropertyValue::sequence(items)
    }
}

/// Gigabytes. The unit is a compile-time annotation; the wire format is the
/// bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Gb(pub u32);

/// A retention period in days; bare number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Days(pub u32);

/// A throughput/instance capacity count; bare number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(pub u32);

impl From<Gb> for PropertyValue {
    fn from(value: Gb) -> Self {
        PropertyValue::Number(value.0.into())
    }
}

impl From<Days> for PropertyValue {
    fn from(value: Days) -> Self {
        PropertyValue::Number(value.0.into())
    }
}

impl From<Capacity> for PropertyValue {
    fn from(value: Capacity) -> Self {
        PropertyValue::Number(value.0.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ResourceName, ResourceType};
    use serde_json::json;

    const NETWORKS: ResourceType = ResourceType::new("Example.Network/networks", "2023-05-01");

    fn network_id(name: &str) -> ResourceId {
        NETWORKS.resource_id(ResourceName::new(name).unwrap())
    }

    #[test]
    fn test_references_found_in_nested_structures() {
        let tree = PropertyValue::mapping([
            ("plain", PropertyValue::from("value")),
            (
                "pools",
                PropertyValue::sequence([PropertyValue::mapping([(
                    "network",
                    PropertyValue::from(network_id("net1")),
                )])]),
            ),
        ]);

        assert_eq!(tree.references(), vec![network_id("net1")]);
    }

    #[test]
    fn test_absent_optional_contributes_no_reference() {
        // An unset Option never reaches the tree, so there is nothing to find.
        let mut tree = PropertyValue::object();
        let network: Option<ResourceId> = None;
        if let Some(id) = network {
            tree.insert("network", id);
        }
        assert!(tree.references().is_empty());
    }

    #[test]
    fn test_unit_values_render_as_bare_numbers() {
        let tree = PropertyValue::mapping([
            ("retentionInDays", PropertyValue::from(Days(30))),
            ("dailyQuotaGb", PropertyValue::from(Gb(5))),
        ]);
        assert_eq!(
            tree.to_json(),
            json!({"retentionInDays": 30, "dailyQuotaGb": 5})
        );
    }

    #[test]
    fn test_reference_renders_as_token() {
        let tree = PropertyValue::mapping([("network", network_id("net1"))]);
        assert_eq!(
            tree.to_json(),
            json!({"network": "[resourceId('Example.Network/networks', 'net1')]"})
        );
    }
}
