//! The "current route" observable.
//!
//! # Responsibilities
//! - Hand out navigation tickets in request order
//! - Publish a successful resolution only if it is still the latest request
//! - Let consumers watch the current route
//!
//! # Design Decisions
//! - Tickets are taken when a navigation starts, not when it finishes
//! - Check-and-publish is serialized so a stale navigation can never overwrite
//!   a newer one that finished first
//! - Backed by `tokio::sync::watch`: receivers always see the latest value

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

use crate::routing::matcher::Params;

/// The route the application is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentRoute {
    /// Route name.
    pub name: String,
    /// Requested path, with base prefix, query and fragment removed.
    pub path: String,
    /// Parameters captured from `:name` segments.
    pub params: Params,
    /// Decoded query string.
    pub query: BTreeMap<String, String>,
}

/// Position of a navigation in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Orders navigations and publishes their results.
#[derive(Debug)]
pub struct Navigation {
    requested: AtomicU64,
    publish_lock: Mutex<()>,
    tx: watch::Sender<Option<CurrentRoute>>,
}

impl Navigation {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            requested: AtomicU64::new(0),
            publish_lock: Mutex::new(()),
            tx,
        }
    }

    /// Register a new navigation request, superseding every earlier one.
    pub fn begin(&self) -> Ticket {
        Ticket(self.requested.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish `route` if `ticket` is still the latest request.
    ///
    /// Returns false when a newer navigation has been requested since.
    pub fn publish(&self, ticket: Ticket, route: CurrentRoute) -> bool {
        let _guard = self.publish_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.requested.load(Ordering::SeqCst) != ticket.0 {
            return false;
        }
        self.tx.send_replace(Some(route));
        true
    }

    /// Watch the current route. `None` until the first successful navigation.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentRoute>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current route.
    pub fn current(&self) -> Option<CurrentRoute> {
        self.tx.borrow().clone()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}
