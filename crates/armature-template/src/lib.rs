//! Dependency resolution and template emission for armature.
//!
//! This crate turns independently authored resource definitions into one
//! deployment template document:
//! - `deployment` collects builder output for a target location
//! - `resolver` merges explicit and implicit dependency edges, rejects
//!   duplicate identities and cycles
//! - `emitter` renders the deduplicated, cycle-free graph as JSON

pub mod deployment;
pub mod emitter;
pub mod resolver;

pub use deployment::Deployment;
pub use resolver::{ResolvedResource, resolve};
