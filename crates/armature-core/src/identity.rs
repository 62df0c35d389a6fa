//! Resource identity: kinds, names, and composite ids.

use std::fmt;
use std::sync::LazyLock;

use derive_more::Display;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

// Provider resource names: alphanumeric start, then alphanumerics, dots,
// underscores, and hyphens.
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// A provider-qualified resource kind with its schema version.
///
/// Declared as constants by the per-kind schema crates, e.g.
/// `Microsoft.Storage/storageAccounts` at `2023-01-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResourceType {
    path: &'static str,
    api_version: &'static str,
}

impl ResourceType {
    pub const fn new(path: &'static str, api_version: &'static str) -> Self {
        Self { path, api_version }
    }

    /// Provider-qualified kind path, e.g. `Microsoft.Network/virtualNetworks`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Schema version string, e.g. `2023-01-01`.
    pub fn api_version(&self) -> &'static str {
        self.api_version
    }

    /// Identity for a top-level resource of this kind.
    pub fn resource_id(&self, name: ResourceName) -> ResourceId {
        ResourceId {
            resource_type: *self,
            name,
            parent: None,
        }
    }

    /// Identity for a resource of this kind nested under `parent`.
    pub fn child_of(&self, parent: ResourceId, name: ResourceName) -> ResourceId {
        ResourceId {
            resource_type: *self,
            name,
            parent: Some(Box::new(parent)),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A validated resource instance name.
///
/// The default value is the empty sentinel used before a builder assigns a
/// real name; constructing a name from an invalid string fails.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display,
)]
#[display("{_0}")]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Validation {
                resource: name,
                message: "resource name must not be empty".to_string(),
            });
        }
        if !NAME_REGEX.is_match(&name) {
            return Err(Error::Validation {
                resource: name.clone(),
                message: format!("'{name}' is not a valid resource name"),
            });
        }
        Ok(Self(name))
    }

    /// Sentinel for a not-yet-assigned name.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ResourceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Composite identity of one resource instance: kind, name, and an optional
/// parent id for nested resource kinds.
///
/// Equality over all fields is the sole mechanism for deduplication and
/// dependency matching. Ids are plain values, copied freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResourceId {
    resource_type: ResourceType,
    name: ResourceName,
    parent: Option<Box<ResourceId>>,
}

impl ResourceId {
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    pub fn parent(&self) -> Option<&ResourceId> {
        self.parent.as_deref()
    }

    /// Parent-qualified name, `gateway/pool` for nested kinds.
    pub fn qualified_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent.qualified_name(), self.name),
            None => self.name.to_string(),
        }
    }

    /// The externally visible reference expression for this resource, used
    /// in `dependsOn` arrays and embedded property references.
    pub fn reference_token(&self) -> String {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        let names = names
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[resourceId('{}', {})]", self.resource_type.path, names)
    }

    fn collect_names(&self, out: &mut Vec<String>) {
        if let Some(parent) = &self.parent {
            parent.collect_names(out);
        }
        out.push(self.name.to_string());
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type.path, self.qualified_name())
    }
}
