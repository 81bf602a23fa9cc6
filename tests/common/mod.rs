//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use spa_gateway::config::GatewayConfig;
use spa_gateway::http::HttpServer;
use spa_gateway::lifecycle::{build_route_table, Shutdown};
use spa_gateway::routing::{RouteEntry, RouteTable, ViewRef};
use spa_gateway::views::{View, ViewLoadError};

/// A route holding its view directly.
#[allow(dead_code)]
pub fn direct(path: &str, name: &str) -> RouteEntry {
    RouteEntry::new(path, name, ViewRef::direct(View::html(name, format!("<h1>{name}</h1>"))))
}

/// A deferred route whose loader counts its invocations.
#[allow(dead_code)]
pub fn counting(path: &str, name: &str) -> (RouteEntry, Arc<AtomicUsize>) {
    flaky(path, name, 0)
}

/// A deferred route whose loader fails its first `failures` invocations.
#[allow(dead_code)]
pub fn flaky(path: &str, name: &str, failures: usize) -> (RouteEntry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let id = name.to_string();

    let loader = move || {
        let call = c.fetch_add(1, Ordering::SeqCst);
        let id = id.clone();
        async move {
            if call < failures {
                Err(ViewLoadError::new(id, "asset fetch failed"))
            } else {
                Ok(View::html(id.clone(), format!("<h1>{id}</h1>")))
            }
        }
    };

    (RouteEntry::new(path, name, ViewRef::deferred(loader)), calls)
}

/// Handles on a deferred route whose load blocks until released.
#[allow(dead_code)]
pub struct Gate {
    pub calls: Arc<AtomicUsize>,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// A deferred route whose loader signals `started` and waits for `release`.
#[allow(dead_code)]
pub fn gated(path: &str, name: &str) -> (RouteEntry, Gate) {
    gated_flaky(path, name, 0)
}

/// Like [`gated`], but the first `failures` released loads fail.
#[allow(dead_code)]
pub fn gated_flaky(path: &str, name: &str, failures: usize) -> (RouteEntry, Gate) {
    let gate = Gate {
        calls: Arc::new(AtomicUsize::new(0)),
        started: Arc::new(Notify::new()),
        release: Arc::new(Notify::new()),
    };
    let (calls, started, release) = (gate.calls.clone(), gate.started.clone(), gate.release.clone());
    let id = name.to_string();

    let loader = move || {
        let call = calls.fetch_add(1, Ordering::SeqCst);
        let (started, release, id) = (started.clone(), release.clone(), id.clone());
        async move {
            started.notify_one();
            release.notified().await;
            if call < failures {
                Err(ViewLoadError::new(id, "asset fetch failed"))
            } else {
                Ok(View::html(id.clone(), format!("<h1>{id}</h1>")))
            }
        }
    };

    (RouteEntry::new(path, name, ViewRef::deferred(loader)), gate)
}

/// Yield until `task` has had a chance to run up to its first await.
#[allow(dead_code)]
pub async fn settle<T>(task: &tokio::task::JoinHandle<T>) {
    for _ in 0..16 {
        if task.is_finished() {
            break;
        }
        tokio::task::yield_now().await;
    }
}

/// A fresh, empty directory under the system temp dir.
#[allow(dead_code)]
pub fn temp_assets_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spa-gateway-assets-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Start a gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown, Arc<RouteTable>) {
    let table = Arc::new(build_route_table(&config).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table.clone());
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown, table)
}
