//! In-memory index of one loaded role set

use crate::error::{RbacError, Result};
use crate::types::{RoleDefinition, RoleName};
use std::collections::HashMap;

/// Index over the definitions of a single provider fetch
///
/// A store lives for exactly one cache-build cycle; reloads build a new
/// store from a fresh fetch rather than mutating this one.
#[derive(Debug)]
pub struct RoleStore {
    roles: HashMap<RoleName, RoleDefinition>,
}

impl RoleStore {
    /// Index a fetched role set
    ///
    /// Rejects sets that violate the role-set invariants: duplicate role
    /// names, or an `extends_role` naming a role absent from the set. Both
    /// surface as [`RbacError::Provider`]: the source handed over an
    /// unusable set.
    pub fn from_definitions(definitions: Vec<RoleDefinition>) -> Result<Self> {
        let mut roles = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if roles.contains_key(&definition.name) {
                return Err(RbacError::Provider(format!(
                    "duplicate role definition: {}",
                    definition.name
                )));
            }
            roles.insert(definition.name.clone(), definition);
        }

        for definition in roles.values() {
            if let Some(parent) = &definition.extends_role {
                if !roles.contains_key(parent) {
                    return Err(RbacError::Provider(format!(
                        "role '{}' extends unknown role '{}'",
                        definition.name, parent
                    )));
                }
            }
        }

        Ok(Self { roles })
    }

    /// Look up a role definition by name
    pub fn find_role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.get(name)
    }

    /// Number of indexed roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Names of all indexed roles
    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles.keys().cloned().collect()
    }
}
