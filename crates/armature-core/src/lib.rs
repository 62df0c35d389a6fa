//! Core types for the armature deployment-template builder.
//!
//! This crate contains:
//! - Resource identity (types, names, composite ids)
//! - The kind-erased property tree and unit newtypes
//! - Capability mixins (taggable, dependable)
//! - The builder protocol and terminal resource definitions
//! - The error taxonomy

pub mod builder;
pub mod error;
pub mod identity;
pub mod mixins;
pub mod properties;

pub use builder::{Location, ResourceBuilder, ResourceDefinition};
pub use error::{Error, Result};
pub use identity::{ResourceId, ResourceName, ResourceType};
pub use mixins::{Dependable, Taggable};
pub use properties::{Capacity, Days, Gb, PropertyValue};
