//! Guard boundary and identity wiring tests
//!
//! Verifies that guards enforce role and permission boundaries for the
//! directory's UI surfaces and that session payloads cannot widen access.

use anyhow::Result;
use rolegate::prelude::*;
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn gatekeeper_for(session: serde_json::Value) -> Result<Gatekeeper> {
    let identity = SessionIdentity::from_session(&session)?;
    Ok(Gatekeeper::builder()
        .with_default_roles()
        .with_identity(identity)
        .with_audit_logging(true)
        .build()?)
}

#[tokio::test]
async fn test_directory_surfaces_by_role() -> Result<()> {
    init_tracing();

    let add_restaurant = AccessGuard::all_permissions(["restaurant:create"]);
    let edit_menu = AccessGuard::all_permissions(["menu:update", "menu:read"]);
    let user_admin = AccessGuard::role_and_permissions("admin", ["user:delete"]);
    let remove_admin = AccessGuard::all_permissions(["admin:delete"]);
    let browse = AccessGuard::any_permission(["restaurant:read", "menu:read"]);

    // (role, guard, expected)
    let cases = vec![
        ("customer", &browse, true),
        ("customer", &add_restaurant, false),
        ("customer", &edit_menu, false),
        ("shop_owner", &add_restaurant, true),
        ("shop_owner", &edit_menu, true),
        ("shop_owner", &user_admin, false),
        ("admin", &user_admin, true),
        ("admin", &remove_admin, false),
        ("super_admin", &remove_admin, true),
        ("super_admin", &browse, true),
    ];

    for (role, guard, expected) in cases {
        let gatekeeper = gatekeeper_for(json!({ "user": { "role": role } }))?;
        let decision = gatekeeper.authorize(guard).await?;
        assert_eq!(
            decision.is_granted(),
            expected,
            "role '{}' against guard {}",
            role,
            guard
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_signed_out_session_never_reaches_engine() -> Result<()> {
    let gatekeeper = gatekeeper_for(json!({ "user": null }))?;

    assert!(gatekeeper.current_engine().await?.is_none());
    for guard in [
        AccessGuard::role("customer"),
        AccessGuard::all_permissions(Vec::<Permission>::new()),
        AccessGuard::one_of_roles(["customer"]),
    ] {
        assert_eq!(gatekeeper.authorize(&guard).await?, GuardDecision::Unauthenticated);
    }

    Ok(())
}

#[tokio::test]
async fn test_session_without_claims_is_signed_out() -> Result<()> {
    for session in [json!({}), json!({ "expires": "2026-10-18T00:00:00Z" })] {
        let gatekeeper = gatekeeper_for(session)?;

        assert!(gatekeeper.current_engine().await?.is_none());
        let nothing_required = AccessGuard::all_permissions(Vec::<Permission>::new());
        assert_eq!(
            gatekeeper.authorize(&nothing_required).await?,
            GuardDecision::Unauthenticated
        );
        assert_eq!(
            gatekeeper.authorize(&AccessGuard::role("customer")).await?,
            GuardDecision::Unauthenticated
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_stub_permission_claim_grants_nothing() -> Result<()> {
    // Legacy sessions always carry [""] as their direct permissions.
    let gatekeeper = gatekeeper_for(json!({
        "user": { "role": "customer", "permissions": [""] }
    }))?;

    let engine = gatekeeper
        .current_engine()
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected a subject"))?;
    assert!(engine.direct_permissions().is_empty());
    assert!(!engine.has_permission(""));

    Ok(())
}

#[tokio::test]
async fn test_direct_permission_claims_are_honored() -> Result<()> {
    let gatekeeper = gatekeeper_for(json!({
        "user": { "roles": [], "permissions": ["menu:update"] }
    }))?;

    let guard = AccessGuard::all_permissions(["menu:update"]);
    assert!(gatekeeper.authorize(&guard).await?.is_granted());
    assert!(!gatekeeper.authorize(&AccessGuard::role("customer")).await?.is_granted());

    Ok(())
}

#[tokio::test]
async fn test_literal_role_list_ignores_hierarchy_by_default() -> Result<()> {
    let gatekeeper = gatekeeper_for(json!({ "user": { "role": "super_admin" } }))?;
    let owners_only = AccessGuard::one_of_roles(["shop_owner", "admin"]);

    assert_eq!(gatekeeper.authorize(&owners_only).await?, GuardDecision::Denied);

    let inherited = owners_only.with_role_matching(RoleMatching::Inherited);
    assert_eq!(gatekeeper.authorize(&inherited).await?, GuardDecision::Granted);

    Ok(())
}

#[tokio::test]
async fn test_config_file_drives_gatekeeper() -> Result<()> {
    let config = AccessConfig::new()
        .with_role("editor", &["viewer"], &["listing:edit"])
        .with_role("viewer", &[], &["listing:view"]);
    let temp_file = NamedTempFile::new()?;
    let path = temp_file
        .path()
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("temp path is not UTF-8"))?;
    config.to_file(path)?;

    let gatekeeper = Gatekeeper::builder()
        .with_config_file(path)?
        .with_identity(StaticIdentity::new(SubjectContext::with_role("editor")))
        .build()?;

    let guard = AccessGuard::all_permissions(["listing:view", "listing:edit"]);
    assert!(gatekeeper.authorize(&guard).await?.is_granted());
    assert!(!gatekeeper.authorize(&AccessGuard::role("customer")).await?.is_granted());

    Ok(())
}

#[tokio::test]
async fn test_concurrent_guard_evaluation() -> Result<()> {
    let graph = RoleGraph::shared(&AccessConfig::restaurant_directory());
    let mut handles = Vec::new();

    for i in 0..50 {
        let graph = Arc::clone(&graph);
        let handle = tokio::spawn(async move {
            let role = if i % 2 == 0 { "shop_owner" } else { "customer" };
            let gatekeeper = Gatekeeper::builder()
                .with_graph(graph)
                .with_identity(StaticIdentity::new(SubjectContext::with_role(role)))
                .build()?;
            let decision = gatekeeper
                .authorize(&AccessGuard::all_permissions(["menu:create"]))
                .await?;
            Ok::<_, GuardError>((role, decision))
        });
        handles.push(handle);
    }

    for handle in handles {
        let (role, decision) = handle.await??;
        assert_eq!(decision.is_granted(), role == "shop_owner");
    }

    Ok(())
}

#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_config_issues_logged_once_per_gatekeeper() -> Result<()> {
    let cyclic = AccessConfig::new()
        .with_role("a", &["b"], &["a:perm"])
        .with_role("b", &["a"], &["b:perm"]);

    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || -> Result<()> {
        for _ in 0..5 {
            let engine = PermissionEngine::new(&cyclic, SubjectContext::with_role("a"));
            assert!(engine.has_permission("b:perm"));
        }
        assert!(!capture.contents().contains("Access configuration"));

        Gatekeeper::builder().with_config(cyclic.clone()).build()?;
        Ok(())
    })?;

    let logged = capture.contents();
    let cycle_lines = logged
        .lines()
        .filter(|line| line.contains("Access configuration"))
        .count();
    assert_eq!(cycle_lines, cyclic.diagnostics().len());
    assert!(cycle_lines > 0);

    Ok(())
}
