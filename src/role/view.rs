//! Resolved role permission closures

use crate::error::{RbacError, Result};
use crate::role::store::RoleStore;
use crate::types::{PermissionGrant, PermissionToken, RoleName};
use std::collections::HashMap;
use std::time::Instant;

/// Immutable permission closure for one role
///
/// Merges the role's own grants with its direct parent's grants only,
/// never the parent's parent. Inheritance depth is fixed at one level.
/// Views are owned by the resolution cache and replaced, not mutated, on
/// rebuild.
#[derive(Debug, Clone)]
pub struct RoleView {
    role_name: RoleName,
    grants: HashMap<PermissionToken, PermissionGrant>,
    built_at: Instant,
}

impl RoleView {
    /// Build the view for `name` from an indexed role set
    ///
    /// Merge order is parent first, own grants second: a role's own grant
    /// shadows the parent's grant for the same token.
    pub fn build(store: &RoleStore, name: &str) -> Result<Self> {
        let definition = store
            .find_role(name)
            .ok_or_else(|| RbacError::RoleNotFound(name.to_string()))?;

        let mut grants = HashMap::new();

        if let Some(parent_name) = &definition.extends_role {
            // The store validated parent links at index time.
            let parent = store.find_role(parent_name).ok_or_else(|| {
                RbacError::Provider(format!(
                    "role '{}' extends unknown role '{}'",
                    name, parent_name
                ))
            })?;
            for grant in &parent.grants {
                grants.insert(grant.token(), grant.clone());
            }
        }

        for grant in &definition.grants {
            grants.insert(grant.token(), grant.clone());
        }

        Ok(Self {
            role_name: definition.name.clone(),
            grants,
            built_at: Instant::now(),
        })
    }

    /// Name of the resolved role
    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    /// Look up a grant by its canonical token
    pub fn grant(&self, token: &str) -> Option<&PermissionGrant> {
        self.grants.get(token)
    }

    /// Number of effective grants (own + inherited)
    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }

    /// When this view was built
    pub fn built_at(&self) -> Instant {
        self.built_at
    }
}
