//! Template document emission.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::resolver::ResolvedResource;

pub const TEMPLATE_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#";
pub const CONTENT_VERSION: &str = "1.0.0.0";

/// Render the resolved, cycle-free deployment unit as a template document.
///
/// Output is deterministic: object keys and `dependsOn` entries are in
/// lexicographic order, and empty `tags`/`dependsOn`/`properties` are
/// omitted rather than emitted as empty collections.
pub fn emit(resources: &[ResolvedResource]) -> Value {
    debug!(resources = resources.len(), "emitting template");
    let entries: Vec<Value> = resources.iter().map(emit_resource).collect();
    json!({
        "$schema": TEMPLATE_SCHEMA,
        "contentVersion": CONTENT_VERSION,
        "resources": entries,
    })
}

fn emit_resource(resource: &ResolvedResource) -> Value {
    let definition = &resource.definition;
    let mut entry = Map::new();

    entry.insert(
        "type".to_string(),
        json!(definition.id.resource_type().path()),
    );
    entry.insert(
        "apiVersion".to_string(),
        json!(definition.id.resource_type().api_version()),
    );
    entry.insert("name".to_string(), json!(definition.id.qualified_name()));
    entry.insert("location".to_string(), json!(definition.location.as_str()));

    if !definition.tags.is_empty() {
        entry.insert("tags".to_string(), json!(definition.tags));
    }

    if !resource.dependencies.is_empty() {
        let mut tokens: Vec<String> = resource
            .dependencies
            .iter()
            .map(|dependency| dependency.reference_token())
            .collect();
        tokens.sort();
        entry.insert("dependsOn".to_string(), json!(tokens));
    }

    let mut properties = definition.properties.to_json();
    if let Value::Object(map) = &mut properties {
        for key in definition.explicit_null_properties {
            map.entry(key.to_string()).or_insert(Value::Null);
        }
        if !map.is_empty() {
            entry.insert("properties".to_string(), Value::Object(map.clone()));
        }
    }

    Value::Object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use armature_core::{
        Location, PropertyValue, ResourceDefinition, ResourceName, ResourceType,
    };
    use std::collections::BTreeSet;

    const ACCOUNTS: ResourceType = ResourceType::new("Example.Storage/accounts", "2023-01-01");

    fn definition(name: &str) -> ResourceDefinition {
        ResourceDefinition::new(
            ACCOUNTS.resource_id(ResourceName::new(name).unwrap()),
            Location::west_europe(),
        )
    }

    #[test]
    fn test_envelope_shape() {
        let resolved = resolve(&[definition("a")]).unwrap();
        let doc = emit(&resolved);

        assert_eq!(doc["$schema"], TEMPLATE_SCHEMA);
        assert_eq!(doc["contentVersion"], CONTENT_VERSION);
        assert_eq!(doc["resources"].as_array().unwrap().len(), 1);
        let entry = &doc["resources"][0];
        assert_eq!(entry["type"], "Example.Storage/accounts");
        assert_eq!(entry["apiVersion"], "2023-01-01");
        assert_eq!(entry["name"], "a");
        assert_eq!(entry["location"], "westeurope");
    }

    #[test]
    fn test_empty_tags_and_depends_on_are_omitted() {
        let resolved = resolve(&[definition("a")]).unwrap();
        let doc = emit(&resolved);
        let entry = &doc["resources"][0];
        assert!(entry.get("tags").is_none());
        assert!(entry.get("dependsOn").is_none());
        assert!(entry.get("properties").is_none());
    }

    #[test]
    fn test_depends_on_is_lexicographic() {
        let deps: BTreeSet<_> = ["zeta", "alpha", "mid"]
            .iter()
            .map(|name| ACCOUNTS.resource_id(ResourceName::new(*name).unwrap()))
            .collect();
        let def = definition("a").with_dependencies(deps);

        let resolved = resolve(&[def]).unwrap();
        let doc = emit(&resolved);
        let depends_on = doc["resources"][0]["dependsOn"].as_array().unwrap();

        let mut sorted = depends_on.clone();
        sorted.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
        assert_eq!(depends_on, &sorted);
        assert_eq!(depends_on.len(), 3);
    }

    #[test]
    fn test_properties_render_through_tree() {
        let def = definition("a").with_properties(PropertyValue::mapping([(
            "linked",
            PropertyValue::from(ACCOUNTS.resource_id(ResourceName::new("b").unwrap())),
        )]));

        let resolved = resolve(&[def, definition("b")]).unwrap();
        let doc = emit(&resolved);
        let entry = &doc["resources"][0];

        assert_eq!(
            entry["properties"]["linked"],
            "[resourceId('Example.Storage/accounts', 'b')]"
        );
        // The embedded reference also became a dependsOn edge.
        assert_eq!(
            entry["dependsOn"][0],
            "[resourceId('Example.Storage/accounts', 'b')]"
        );
    }
}
