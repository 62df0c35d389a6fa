//! Deployment units: collect builder output, resolve, emit.

use armature_core::{Location, ResourceBuilder, ResourceDefinition, Result};
use serde_json::Value;
use tracing::debug;

use crate::{emitter, resolver};

/// The full set of resource definitions emitted together into one template
/// document. Each unit owns its own resource set; units are independent
/// values and may be built concurrently.
#[derive(Debug, Clone)]
pub struct Deployment {
    location: Location,
    definitions: Vec<ResourceDefinition>,
}

impl Deployment {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            definitions: Vec::new(),
        }
    }

    /// Build a resource into this unit. Fails fast on validation errors;
    /// nothing is added for a builder that fails.
    pub fn add(mut self, builder: &dyn ResourceBuilder) -> Result<Self> {
        let definitions = builder.build(&self.location)?;
        debug!(resource = %builder.resource_id(), count = definitions.len(), "adding resources");
        self.definitions.extend(definitions);
        Ok(self)
    }

    /// Add an already-built definition.
    pub fn add_definition(mut self, definition: ResourceDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn definitions(&self) -> &[ResourceDefinition] {
        &self.definitions
    }

    /// Resolve the dependency graph and emit the template document.
    /// Fails fast; no partial document is produced.
    pub fn emit(&self) -> Result<Value> {
        let resolved = resolver::resolve(&self.definitions)?;
        Ok(emitter::emit(&resolved))
    }
}
