//! Role definition sources
//!
//! The engine depends only on the [`RoleProvider`] capability; whether the
//! definitions come from static configuration or a remote service is the
//! host's choice at wiring time. [`StaticRoleProvider`] covers the static
//! case, including JSON-file configuration.

use crate::error::{RbacError, Result};
use crate::types::RoleDefinition;
use async_trait::async_trait;
use std::path::Path;

/// Source of role definitions
///
/// `fetch_roles` is invoked once per cache-build cycle, so after every TTL
/// expiry; implementations must be idempotent and safe to call repeatedly.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Fetch the complete role set
    async fn fetch_roles(&self) -> Result<Vec<RoleDefinition>>;
}

/// Static role provider serving a fixed in-memory set
#[derive(Debug)]
pub struct StaticRoleProvider {
    roles: Vec<RoleDefinition>,
}

impl StaticRoleProvider {
    /// Create a provider over a fixed role set
    pub fn new(roles: Vec<RoleDefinition>) -> Self {
        Self { roles }
    }

    /// Load a role set from a JSON array of role definitions
    pub fn from_json(json: &str) -> Result<Self> {
        let roles: Vec<RoleDefinition> = serde_json::from_str(json)
            .map_err(|e| RbacError::Provider(format!("invalid role set JSON: {}", e)))?;
        Ok(Self::new(roles))
    }

    /// Load a role set from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RbacError::Provider(format!("cannot read role set {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

#[async_trait]
impl RoleProvider for StaticRoleProvider {
    async fn fetch_roles(&self) -> Result<Vec<RoleDefinition>> {
        Ok(self.roles.clone())
    }
}
