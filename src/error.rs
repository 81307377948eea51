//! Error types for the RBAC engine

use thiserror::Error;

/// RBAC engine errors
///
/// The enum is `Clone`: a cache build in flight is shared by every
/// concurrent waiter, and a failing build hands the same error to all of
/// them.
#[derive(Debug, Clone, Error)]
pub enum RbacError {
    /// Requested role does not exist in the loaded role set
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Role provider failed or handed over an unusable role set
    #[error("Role provider error: {0}")]
    Provider(String),

    /// A registered filter's evaluator itself failed
    #[error("Filter '{0}' evaluation failed: {1}")]
    FilterEvaluation(String, String),
}

/// Result type for RBAC operations
pub type Result<T> = std::result::Result<T, RbacError>;
