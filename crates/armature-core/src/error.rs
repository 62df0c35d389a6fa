//! Error types for armature.

use thiserror::Error;

use crate::identity::ResourceId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed for {resource}: {message}")]
    Validation { resource: String, message: String },

    #[error("{operation} on {resource} requires {requires} to be set first")]
    Precondition {
        resource: String,
        operation: &'static str,
        requires: &'static str,
    },

    #[error("unsupported destination resource type: {id}")]
    UnsupportedReference { id: ResourceId },

    #[error("duplicate resource definition: {id}")]
    DuplicateResource { id: ResourceId },

    #[error("cyclic dependency: {}", render_cycle(.path))]
    CyclicDependency { path: Vec<ResourceId> },
}

fn render_cycle(path: &[ResourceId]) -> String {
    let mut rendered: Vec<String> = path.iter().map(|id| id.to_string()).collect();
    if let Some(first) = rendered.first().cloned() {
        rendered.push(first);
    }
    rendered.join(" -> ")
}

pub type Result<T> = std::result::Result<T, Error>;
