//! # RBAC Resolution Engine
//!
//! Embeddable role-based access control: answers "can role R perform
//! permission P", optionally conditioned on caller-supplied context.
//!
//! ## Features
//!
//! - **Role/permission model** with one-level role inheritance
//! - **Conditional grants** gated by named filters, sync and async
//!   predicates dispatched uniformly
//! - **AND-combination** for multi-token checks
//! - **TTL resolution cache** with single-flight deduplication of
//!   concurrent builds
//! - **Pluggable role sources**: static configuration or any async
//!   provider
//!
//! Authentication, transport, and persistence are the host's business;
//! the engine is wired at construction time through explicit registration
//! tables.
//!
//! ## Example
//!
//! ```rust
//! use rbac_engine::{
//!     PermissionGrant, RbacService, RoleDefinition, StaticRoleProvider,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = StaticRoleProvider::new(vec![
//!         RoleDefinition::new("user")
//!             .with_grant(PermissionGrant::parse("permission1@create")),
//!         RoleDefinition::new("admin").extends("user"),
//!     ]);
//!
//!     let rbac = RbacService::builder(Arc::new(provider)).build();
//!
//!     let admin = rbac.get_role("admin").await?;
//!     assert!(admin.can(&["permission1@create"]).await?);
//!     assert!(!admin.can(&["permission1@delete"]).await?);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod filters;
pub mod provider;
pub mod role;
pub mod types;

// Re-export the public surface
pub use engine::{CacheConfig, CacheStats, RbacService, RbacServiceBuilder, ResolutionCache, RoleHandle};
pub use error::{RbacError, Result};
pub use filters::{FilterPermission, FilterRegistry};
pub use provider::{RoleProvider, StaticRoleProvider};
pub use role::{PermissionResolver, RoleStore, RoleView};
pub use types::{FilterContext, PermissionGrant, PermissionToken, RoleDefinition, RoleName};
