//! Core role and permission types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique role identifier
pub type RoleName = String;

/// Canonical permission token (`"<resource>@<action>"`)
pub type PermissionToken = String;

/// A single permission granted to a role
///
/// The canonical token form is `"<resource>@<action>"`. The `@` is an
/// opaque delimiter: parsing splits at the first occurrence and the
/// remainder, further `@`s included, is the action. No escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Resource identifier (e.g., "document", "permission1")
    pub resource: String,

    /// Action identifier (e.g., "create", "update")
    pub action: String,

    /// Optional filter key gating this grant; the grant is only effective
    /// when the registered filter evaluates true against the caller context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
}

impl PermissionGrant {
    /// Create an unconditional grant
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            filter_key: None,
        }
    }

    /// Parse a grant from its canonical token form, splitting at the
    /// first `@`. A token without `@` becomes a resource with an empty
    /// action.
    pub fn parse(token: &str) -> Self {
        let (resource, action) = match token.split_once('@') {
            Some((resource, action)) => (resource, action),
            None => (token, ""),
        };
        Self::new(resource, action)
    }

    /// Gate this grant behind a named filter
    pub fn with_filter(mut self, filter_key: impl Into<String>) -> Self {
        self.filter_key = Some(filter_key.into());
        self
    }

    /// Canonical token for this grant
    pub fn token(&self) -> PermissionToken {
        format!("{}@{}", self.resource, self.action)
    }
}

/// Role definition as supplied by a role provider
///
/// Definitions are immutable and replaced wholesale on reload; the engine
/// never mutates a fetched set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Unique role name within a loaded set
    pub name: RoleName,

    /// Permissions granted directly to this role
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,

    /// Single optional parent role; its grants are merged in at exactly
    /// one level of depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends_role: Option<RoleName>,
}

impl RoleDefinition {
    /// Create a role with no grants
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grants: Vec::new(),
            extends_role: None,
        }
    }

    /// Add a grant to the role
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.grants.push(grant);
        self
    }

    /// Set the parent role
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends_role = Some(parent.into());
        self
    }
}

/// Request-scoped parameter bag consumed by permission filters
///
/// Supplied per `get_role` call and handed to every filter evaluation for
/// that handle. Never cached and never inspected at view-build time.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    params: HashMap<String, serde_json::Value>,
}

impl FilterContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }

    /// Look up a boolean parameter; missing or non-boolean values read as
    /// false (fail-closed)
    pub fn bool_param(&self, key: &str) -> bool {
        self.params
            .get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}
