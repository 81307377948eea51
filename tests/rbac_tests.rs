//! End-to-end permission checks against a static role provider
//!
//! Pipeline under test: get_role -> cached view resolution -> per-token
//! grant/filter evaluation -> ANDed result.

use rbac_engine::{
    FilterContext, PermissionGrant, RbacError, RbacService, RoleDefinition, StaticRoleProvider,
};
use proptest::prelude::*;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn role_set() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new("userRoot").with_grant(PermissionGrant::parse("permission4@create")),
        RoleDefinition::new("user")
            .with_grant(PermissionGrant::parse("permission1@create"))
            .with_grant(PermissionGrant::parse("permission2@update"))
            .extends("userRoot"),
        RoleDefinition::new("admin")
            .with_grant(PermissionGrant::parse("permission1@create"))
            .with_grant(PermissionGrant::parse("permission3@filter1").with_filter("filter1"))
            .with_grant(PermissionGrant::parse("permission3@filter2").with_filter("filter2"))
            .with_grant(PermissionGrant::parse("permission3@filter3").with_filter("filter3"))
            .extends("user"),
    ]
}

fn service() -> RbacService {
    init_tracing();
    RbacService::builder(Arc::new(StaticRoleProvider::new(role_set())))
        .filter_fn("filter1", |ctx| ctx.bool_param("filter1"))
        .filter_fn("filter2", |ctx| ctx.bool_param("filter2"))
        .build()
}

// ============================================================================
// DIRECT GRANTS
// ============================================================================

#[tokio::test]
async fn test_admin_can_create_permission1() {
    let rbac = service();
    let admin = rbac.get_role("admin").await.unwrap();
    assert!(admin.can(&["permission1@create"]).await.unwrap());
}

#[tokio::test]
async fn test_user_cannot_update_permission1() {
    let rbac = service();
    let user = rbac.get_role("user").await.unwrap();
    assert!(!user.can(&["permission1@update"]).await.unwrap());
}

#[tokio::test]
async fn test_user_can_create_permission1() {
    let rbac = service();
    let user = rbac.get_role("user").await.unwrap();
    assert!(user.can(&["permission1@create"]).await.unwrap());
}

#[tokio::test]
async fn test_zero_tokens_is_vacuously_true() {
    let rbac = service();
    let user = rbac.get_role("user").await.unwrap();
    assert!(user.can(&[]).await.unwrap());
}

#[tokio::test]
async fn test_unknown_role_fails() {
    let rbac = service();
    let err = rbac.get_role("nobody").await.unwrap_err();
    assert!(matches!(err, RbacError::RoleNotFound(_)));
}

// ============================================================================
// INHERITANCE (DEPTH 1)
// ============================================================================

#[tokio::test]
async fn test_admin_inherits_from_user() {
    let rbac = service();
    let admin = rbac.get_role("admin").await.unwrap();
    assert!(admin.can(&["permission2@update"]).await.unwrap());
}

#[tokio::test]
async fn test_user_inherits_from_user_root() {
    let rbac = service();
    let user = rbac.get_role("user").await.unwrap();
    assert!(user.can(&["permission4@create"]).await.unwrap());
}

#[tokio::test]
async fn test_deep_inheritance_does_not_apply() {
    // admin -> user -> userRoot is two hops; userRoot's grants stop at user.
    let rbac = service();
    let admin = rbac.get_role("admin").await.unwrap();
    assert!(!admin.can(&["permission4@create"]).await.unwrap());
}

// ============================================================================
// FILTERS AND AND-COMBINATION
// ============================================================================

#[tokio::test]
async fn test_filter_grant_follows_context() {
    let rbac = service();
    let ctx = FilterContext::new().with_param("filter1", true);
    let admin = rbac.get_role_with_context("admin", ctx).await.unwrap();
    assert!(admin.can(&["permission3@filter1"]).await.unwrap());
}

#[tokio::test]
async fn test_one_failing_filter_denies_the_conjunction() {
    let rbac = service();
    let ctx = FilterContext::new()
        .with_param("filter1", true)
        .with_param("filter2", false);
    let admin = rbac.get_role_with_context("admin", ctx).await.unwrap();

    assert!(admin.can(&["permission3@filter1"]).await.unwrap());
    assert!(!admin
        .can(&["permission3@filter2", "permission3@filter1"])
        .await
        .unwrap());
}

#[tokio::test]
async fn test_unregistered_filter_denies_without_error() {
    // filter3 is granted but never registered; context values cannot help.
    let rbac = service();
    let ctx = FilterContext::new()
        .with_param("filter1", true)
        .with_param("filter2", true)
        .with_param("filter3", true);
    let admin = rbac.get_role_with_context("admin", ctx).await.unwrap();

    let res = admin
        .can(&["permission3@filter2", "permission3@filter1", "permission3@filter3"])
        .await
        .unwrap();
    assert!(!res);
}

#[tokio::test]
async fn test_filter_grant_denied_without_context() {
    let rbac = service();
    let admin = rbac.get_role("admin").await.unwrap();
    assert!(!admin.can(&["permission3@filter1"]).await.unwrap());
}

// ============================================================================
// CONFIGURATION LOADING
// ============================================================================

#[tokio::test]
async fn test_role_set_from_json_file() {
    init_tracing();
    let json = serde_json::to_string_pretty(&role_set()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roles.json");
    std::fs::write(&path, json).unwrap();

    let provider = StaticRoleProvider::from_file(&path).unwrap();
    let rbac = RbacService::builder(Arc::new(provider))
        .filter_fn("filter1", |ctx| ctx.bool_param("filter1"))
        .build();

    let user = rbac.get_role("user").await.unwrap();
    assert!(user.can(&["permission4@create"]).await.unwrap());
    assert!(!user.can(&["permission1@update"]).await.unwrap());
}

// ============================================================================
// TOKEN FORMAT
// ============================================================================

proptest! {
    #[test]
    fn token_round_trips_through_parse(
        resource in "[a-z0-9_.-]{1,16}",
        action in "[a-z0-9_.@-]{0,16}",
    ) {
        // Split happens at the FIRST '@'; everything after is the action,
        // further '@'s included.
        let token = format!("{}@{}", resource, action);
        let grant = PermissionGrant::parse(&token);
        prop_assert_eq!(grant.token(), token);
        prop_assert!(!grant.resource.contains('@'));
    }
}
