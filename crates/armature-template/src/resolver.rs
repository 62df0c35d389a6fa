//! Dependency resolution over a deployment unit.

use std::collections::{BTreeSet, HashMap, HashSet};

use armature_core::{Error, ResourceDefinition, ResourceId, Result};
use tracing::debug;

/// A definition with its final, fully resolved dependency set: the union of
/// explicit edges and every reference embedded in the property tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResource {
    pub definition: ResourceDefinition,
    pub dependencies: BTreeSet<ResourceId>,
}

/// Resolve dependencies for every definition in a deployment unit.
///
/// Fails on two independently authored definitions claiming the same
/// identity, and on any cycle in the combined dependency graph. Edges to
/// resources outside the unit are legal (pre-existing infrastructure) and
/// kept as-is.
pub fn resolve(definitions: &[ResourceDefinition]) -> Result<Vec<ResolvedResource>> {
    let mut seen: HashSet<&ResourceId> = HashSet::new();
    for definition in definitions {
        if !seen.insert(&definition.id) {
            return Err(Error::DuplicateResource {
                id: definition.id.clone(),
            });
        }
    }

    let mut resolved = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let mut dependencies = definition.dependencies.clone();
        for reference in definition.properties.references() {
            debug!(resource = %definition.id, dependency = %reference, "implicit dependency");
            dependencies.insert(reference);
        }
        for dependency in &dependencies {
            if !seen.contains(dependency) {
                debug!(resource = %definition.id, dependency = %dependency,
                    "dependency outside the deployment unit");
            }
        }
        resolved.push(ResolvedResource {
            definition: definition.clone(),
            dependencies,
        });
    }

    detect_cycles(&resolved)?;
    Ok(resolved)
}

/// DFS cycle detection over the resolved graph, reporting the full cycle
/// path rather than a single edge.
fn detect_cycles(resources: &[ResolvedResource]) -> Result<()> {
    let graph: HashMap<&ResourceId, &BTreeSet<ResourceId>> = resources
        .iter()
        .map(|resource| (&resource.definition.id, &resource.dependencies))
        .collect();

    let mut visited: HashSet<&ResourceId> = HashSet::new();
    let mut stack: Vec<&ResourceId> = Vec::new();
    let mut on_stack: HashSet<&ResourceId> = HashSet::new();

    for resource in resources {
        let id = &resource.definition.id;
        if !visited.contains(id) {
            dfs(id, &graph, &mut visited, &mut stack, &mut on_stack)?;
        }
    }
    Ok(())
}

fn dfs<'a>(
    node: &'a ResourceId,
    graph: &HashMap<&'a ResourceId, &'a BTreeSet<ResourceId>>,
    visited: &mut HashSet<&'a ResourceId>,
    stack: &mut Vec<&'a ResourceId>,
    on_stack: &mut HashSet<&'a ResourceId>,
) -> Result<()> {
    visited.insert(node);
    stack.push(node);
    on_stack.insert(node);

    if let Some(dependencies) = graph.get(node) {
        for dependency in dependencies.iter() {
            if on_stack.contains(dependency) {
                let start = stack
                    .iter()
                    .position(|entry| *entry == dependency)
                    .unwrap_or(0);
                let path = stack[start..].iter().map(|id| (*id).clone()).collect();
                return Err(Error::CyclicDependency { path });
            }
            // Edges leaving the unit have no outgoing edges to follow.
            if !visited.contains(dependency) {
                if let Some((key, _)) = graph.get_key_value(dependency) {
                    dfs(*key, graph, visited, stack, on_stack)?;
                }
            }
        }
    }

    on_stack.remove(node);
    stack.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::{Location, PropertyValue, ResourceName, ResourceType};

    const ACCOUNTS: ResourceType = ResourceType::new("Example.Storage/accounts", "2023-01-01");

    fn account_id(name: &str) -> ResourceId {
        ACCOUNTS.resource_id(ResourceName::new(name).unwrap())
    }

    fn definition(name: &str) -> ResourceDefinition {
        ResourceDefinition::new(account_id(name), Location::west_europe())
    }

    fn with_explicit_dep(name: &str, dep: &str) -> ResourceDefinition {
        definition(name).with_dependencies(BTreeSet::from([account_id(dep)]))
    }

    #[test]
    fn test_no_references_yields_empty_set() {
        let resolved = resolve(&[definition("a")]).unwrap();
        assert!(resolved[0].dependencies.is_empty());
    }

    #[test]
    fn test_explicit_and_implicit_edges_merge() {
        let def = with_explicit_dep("a", "b").with_properties(PropertyValue::mapping([(
            "linked",
            PropertyValue::from(account_id("c")),
        )]));

        let resolved = resolve(&[def, definition("b"), definition("c")]).unwrap();
        assert_eq!(
            resolved[0].dependencies,
            BTreeSet::from([account_id("b"), account_id("c")])
        );
    }

    #[test]
    fn test_implicit_edge_found_in_nested_collection() {
        let def = definition("a").with_properties(PropertyValue::mapping([(
            "pools",
            PropertyValue::sequence([PropertyValue::mapping([(
                "network",
                PropertyValue::from(account_id("b")),
            )])]),
        )]));

        let resolved = resolve(&[def, definition("b")]).unwrap();
        assert!(resolved[0].dependencies.contains(&account_id("b")));
    }

    #[test]
    fn test_duplicate_identity_is_a_conflict() {
        let result = resolve(&[definition("a"), definition("a")]);
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateResource { id } if id == account_id("a")
        ));
    }

    #[test]
    fn test_three_cycle_names_all_identities() {
        let result = resolve(&[
            with_explicit_dep("a", "b"),
            with_explicit_dep("b", "c"),
            with_explicit_dep("c", "a"),
        ]);

        match result.unwrap_err() {
            Error::CyclicDependency { path } => {
                assert_eq!(path.len(), 3);
                for name in ["a", "b", "c"] {
                    assert!(path.contains(&account_id(name)));
                }
            }
            other => panic!("expected cyclic dependency error, got {other}"),
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let result = resolve(&[with_explicit_dep("a", "a")]);
        match result.unwrap_err() {
            Error::CyclicDependency { path } => assert_eq!(path, vec![account_id("a")]),
            other => panic!("expected cyclic dependency error, got {other}"),
        }
    }

    #[test]
    fn test_dangling_dependency_is_kept() {
        let resolved = resolve(&[with_explicit_dep("a", "preexisting")]).unwrap();
        assert!(resolved[0].dependencies.contains(&account_id("preexisting")));
    }
}
