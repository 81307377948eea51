//! Grant/deny decision for a single permission token

use crate::error::Result;
use crate::filters::FilterRegistry;
use crate::role::view::RoleView;
use crate::types::FilterContext;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides grant/deny for one token against one resolved role
///
/// Decision steps: the token must be present in the view's merged grants;
/// an unconditional grant is a grant; a filter-bound grant requires a
/// registered filter that evaluates true under the caller context. An
/// unregistered filter key is a deny, not an error (fail-closed).
#[derive(Clone)]
pub struct PermissionResolver {
    filters: Arc<FilterRegistry>,
}

impl PermissionResolver {
    /// Create a resolver over a configured filter registry
    pub fn new(filters: Arc<FilterRegistry>) -> Self {
        Self { filters }
    }

    /// Check a single permission token against a resolved role view
    pub async fn check(
        &self,
        view: &RoleView,
        token: &str,
        context: &FilterContext,
    ) -> Result<bool> {
        let Some(grant) = view.grant(token) else {
            debug!(role = view.role_name(), token, "permission not granted");
            return Ok(false);
        };

        let Some(filter_key) = &grant.filter_key else {
            return Ok(true);
        };

        let Some(filter) = self.filters.get(filter_key) else {
            warn!(
                role = view.role_name(),
                token,
                filter = filter_key.as_str(),
                "filter not registered, denying"
            );
            return Ok(false);
        };

        filter.evaluate(context).await
    }
}
