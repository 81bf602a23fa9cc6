//! Navigation behavior of the route table.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use spa_gateway::routing::{ConfigurationError, ResolveError, RouteTable};

mod common;

use common::{counting, direct, flaky, gated, gated_flaky};

#[test]
fn test_register_unique_table() {
    let table = RouteTable::register(vec![
        direct("/", "home"),
        direct("/buckets", "buckets"),
        direct("/files", "files"),
        direct("/docs", "docs"),
    ])
    .unwrap();
    assert_eq!(table.len(), 4);
}

#[test]
fn test_register_duplicate_name() {
    let err = RouteTable::register(vec![direct("/bucket", "bucket"), direct("/buckets", "bucket")]).unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateName("bucket".into()));
}

#[test]
fn test_register_duplicate_path() {
    let err = RouteTable::register(vec![direct("/docs", "docs"), direct("/docs", "api-docs")]).unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicatePath { path, .. } if path == "/docs"));
}

#[tokio::test]
async fn test_resolve_returns_entry_view() {
    let table = RouteTable::register(vec![direct("/", "home"), direct("/docs", "docs")]).unwrap();

    let resolution = table.resolve("/docs").await.unwrap();
    assert_eq!(resolution.route.name, "docs");
    assert_eq!(resolution.pattern, "/docs");
    assert_eq!(resolution.view.id(), "docs");
    assert_eq!(resolution.view.body().as_ref(), b"<h1>docs</h1>");
}

#[tokio::test]
async fn test_entry_order_breaks_ties() {
    let table = RouteTable::register(vec![direct("/a", "a"), direct("/a/:x", "a-x")]).unwrap();
    assert_eq!(table.resolve("/a").await.unwrap().route.name, "a");

    let nested = table.resolve("/a/42").await.unwrap();
    assert_eq!(nested.route.name, "a-x");
    assert_eq!(nested.route.params.get("x").map(String::as_str), Some("42"));

    // Both patterns match "/b/new"; the earlier entry wins.
    let table = RouteTable::register(vec![direct("/b/:id", "b-id"), direct("/b/new", "b-new")]).unwrap();
    assert_eq!(table.resolve("/b/new").await.unwrap().route.name, "b-id");
}

#[tokio::test]
async fn test_unregistered_path_not_found() {
    let table = RouteTable::register(vec![direct("/", "home")]).unwrap();

    let err = table.resolve("/nonexistent").await.unwrap_err();
    assert_eq!(err, ResolveError::NotFound { path: "/nonexistent".into() });
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_deferred_view_loaded_once() {
    let (entry, calls) = counting("/files", "files");
    let table = RouteTable::register(vec![direct("/", "home"), entry]).unwrap();

    let first = table.resolve("/files").await.unwrap();
    for _ in 0..4 {
        let again = table.resolve("/files").await.unwrap();
        assert!(Arc::ptr_eq(&first.view, &again.view));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let info = table.routes().into_iter().find(|r| r.name == "files").unwrap();
    assert!(info.deferred && info.resolved);
    assert_eq!(info.load_attempts, 1);
}

#[tokio::test]
async fn test_concurrent_first_resolutions_share_one_load() {
    let (entry, gate) = gated("/buckets", "buckets");
    let table = Arc::new(RouteTable::register(vec![entry]).unwrap());

    let t1 = table.clone();
    let first = tokio::spawn(async move { t1.resolve("/buckets").await });
    gate.started.notified().await;

    let t2 = table.clone();
    let second = tokio::spawn(async move { t2.resolve("/buckets").await });
    common::settle(&second).await;

    // The second caller is parked on the in-flight load, not a new one.
    assert!(!second.is_finished());
    let info = table.routes().into_iter().find(|r| r.name == "buckets").unwrap();
    assert!(!info.resolved);
    assert_eq!(info.load_attempts, 1);

    gate.release.notify_one();
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first.view, &second.view));
}

#[tokio::test]
async fn test_failed_load_is_retried() {
    let (entry, calls) = flaky("/docs", "docs", 1);
    let table = RouteTable::register(vec![entry]).unwrap();

    let err = table.resolve("/docs").await.unwrap_err();
    assert!(matches!(&err, ResolveError::ViewLoad(e) if e.view() == "docs"));
    assert!(err.is_retryable());
    assert!(table.current().is_none());

    let resolution = table.resolve("/docs").await.unwrap();
    assert_eq!(resolution.view.id(), "docs");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_waiters_share_a_failed_load() {
    let (entry, gate) = gated_flaky("/docs", "docs", 1);
    let table = Arc::new(RouteTable::register(vec![entry]).unwrap());

    let t1 = table.clone();
    let first = tokio::spawn(async move { t1.resolve("/docs").await });
    gate.started.notified().await;

    let t2 = table.clone();
    let second = tokio::spawn(async move { t2.resolve("/docs").await });
    common::settle(&second).await;
    assert!(!second.is_finished());

    gate.release.notify_one();
    let first = first.await.unwrap().unwrap_err();
    let second = second.await.unwrap().unwrap_err();
    assert!(first.is_retryable() && second.is_retryable());
    assert_eq!(first, second);
    assert_eq!(gate.calls.load(Ordering::SeqCst), 1);

    // The failure was not cached: the next navigation starts a fresh load.
    let t3 = table.clone();
    let retry = tokio::spawn(async move { t3.resolve("/docs").await });
    gate.started.notified().await;
    gate.release.notify_one();
    assert_eq!(retry.await.unwrap().unwrap().view.id(), "docs");
    assert_eq!(gate.calls.load(Ordering::SeqCst), 2);
    assert_eq!(table.current().unwrap().name, "docs");
}

#[tokio::test]
async fn test_failed_navigation_keeps_current_route() {
    let (entry, _) = flaky("/files", "files", usize::MAX);
    let table = RouteTable::register(vec![direct("/", "home"), entry]).unwrap();

    table.resolve("/").await.unwrap();
    assert!(table.resolve("/nonexistent").await.is_err());
    assert!(table.resolve("/files").await.is_err());

    assert_eq!(table.current().unwrap().name, "home");
}

#[tokio::test]
async fn test_current_route_observable() {
    let table = RouteTable::register(vec![direct("/", "home"), direct("/buckets/:bucket", "bucket")]).unwrap();
    let mut rx = table.current_route();
    assert!(rx.borrow().is_none());

    table.resolve("/buckets/raw?prefix=2024&limit=10").await.unwrap();
    rx.changed().await.unwrap();

    let current = rx.borrow_and_update().clone().unwrap();
    assert_eq!(current.name, "bucket");
    assert_eq!(current.path, "/buckets/raw");
    assert_eq!(current.params.get("bucket").map(String::as_str), Some("raw"));
    assert_eq!(current.query.get("prefix").map(String::as_str), Some("2024"));
    assert_eq!(current.query.get("limit").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn test_current_route_params_are_decoded() {
    let table = RouteTable::register(vec![direct("/buckets/:bucket", "bucket")]).unwrap();
    table.resolve("/buckets/my%20bucket?q=a%20b").await.unwrap();

    let current = table.current().unwrap();
    assert_eq!(current.path, "/buckets/my%20bucket");
    assert_eq!(current.params.get("bucket").map(String::as_str), Some("my bucket"));
    assert_eq!(current.query.get("q").map(String::as_str), Some("a b"));
}

#[tokio::test]
async fn test_relative_target_not_found() {
    let table = RouteTable::register(vec![direct("/", "home"), direct("/buckets/:bucket", "bucket")]).unwrap();
    assert!(matches!(
        table.resolve("buckets/x").await,
        Err(ResolveError::NotFound { .. })
    ));
    assert!(table.current().is_none());
}

#[tokio::test]
async fn test_superseded_navigation_does_not_publish() {
    let (slow, gate) = gated("/files", "files");
    let table = Arc::new(RouteTable::register(vec![direct("/", "home"), slow]).unwrap());

    let t = table.clone();
    let stale = tokio::spawn(async move { t.resolve("/files").await });
    gate.started.notified().await;

    table.resolve("/").await.unwrap();
    assert_eq!(table.current().unwrap().name, "home");

    gate.release.notify_one();
    let stale = stale.await.unwrap().unwrap();
    assert_eq!(stale.route.name, "files");

    // The load is cached, but the newer navigation stays current.
    assert_eq!(table.current().unwrap().name, "home");
    let info = table.routes().into_iter().find(|r| r.name == "files").unwrap();
    assert!(info.resolved);
}

#[tokio::test]
async fn test_resolved_routes_do_not_wait_on_pending_loads() {
    let (slow, gate) = gated("/files", "files");
    let table = Arc::new(RouteTable::register(vec![direct("/", "home"), slow]).unwrap());

    let t = table.clone();
    let pending = tokio::spawn(async move { t.resolve("/files").await });
    gate.started.notified().await;

    let home = tokio::time::timeout(Duration::from_secs(1), table.resolve("/"))
        .await
        .expect("resolving a ready route must not block");
    assert_eq!(home.unwrap().route.name, "home");

    gate.release.notify_one();
    pending.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_base_prefix_navigation() {
    let table = RouteTable::register(vec![direct("/", "home"), direct("/docs", "docs")])
        .unwrap()
        .with_base("/portal");

    assert_eq!(table.resolve("/portal/").await.unwrap().route.name, "home");
    assert_eq!(table.resolve("/portal/docs#auth").await.unwrap().route.name, "docs");
    assert!(matches!(
        table.resolve("/docs").await,
        Err(ResolveError::NotFound { .. })
    ));
}
