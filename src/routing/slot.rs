//! Per-route view cache.
//!
//! # States
//! ```text
//! Deferred(loader) ──first resolve──▶ Loading(pending) ──ok──▶ Ready(view)
//!        ▲                                   │
//!        └──────────────── err ──────────────┘
//! ```
//!
//! # Design Decisions
//! - The pending load is a `Shared` future stored in the slot, so concurrent
//!   first resolutions await the same load and receive the same `Arc<View>`
//! - The lock is never held across an await point
//! - A failed load puts the loader back; failures are never cached
//! - `Ready` is terminal: no eviction

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::observability::metrics;
use crate::routing::entry::ViewRef;
use crate::views::{View, ViewLoadError, ViewLoader};

type PendingLoad = Shared<BoxFuture<'static, Result<Arc<View>, ViewLoadError>>>;

#[derive(Clone)]
enum SlotState {
    Deferred(Arc<dyn ViewLoader>),
    Loading {
        loader: Arc<dyn ViewLoader>,
        attempt: u64,
        pending: PendingLoad,
    },
    Ready(Arc<View>),
}

/// Holds the view of one route through its lifecycle.
pub(crate) struct ViewSlot {
    route: String,
    deferred: bool,
    state: Mutex<SlotState>,
    attempts: AtomicU64,
}

impl ViewSlot {
    pub(crate) fn new(route: impl Into<String>, view: ViewRef) -> Self {
        let (deferred, state) = match view {
            ViewRef::Direct(view) => (false, SlotState::Ready(view)),
            ViewRef::Deferred(loader) => (true, SlotState::Deferred(loader)),
        };

        Self {
            route: route.into(),
            deferred,
            state: Mutex::new(state),
            attempts: AtomicU64::new(0),
        }
    }

    /// Whether the route was registered with a deferred loader.
    pub(crate) fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Whether the view is available without loading.
    pub(crate) fn is_ready(&self) -> bool {
        matches!(*self.lock(), SlotState::Ready(_))
    }

    /// Number of times the loader has been invoked.
    pub(crate) fn load_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Get the view, starting or joining a load if necessary.
    pub(crate) async fn get(&self) -> Result<Arc<View>, ViewLoadError> {
        let (pending, attempt) = {
            let mut state = self.lock();
            match state.clone() {
                SlotState::Ready(view) => return Ok(view),
                SlotState::Loading { pending, attempt, .. } => {
                    tracing::debug!(route = %self.route, attempt, "Joining in-flight view load");
                    (pending, attempt)
                }
                SlotState::Deferred(loader) => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::debug!(route = %self.route, attempt, "Starting view load");

                    let pending = start_load(self.route.clone(), loader.as_ref()).shared();
                    *state = SlotState::Loading {
                        loader,
                        attempt,
                        pending: pending.clone(),
                    };
                    (pending, attempt)
                }
            }
        };

        let outcome = pending.await;

        let mut state = self.lock();
        let settle = match &*state {
            SlotState::Loading { attempt: current, loader, .. } if *current == attempt => {
                Some(match &outcome {
                    Ok(view) => SlotState::Ready(Arc::clone(view)),
                    Err(_) => SlotState::Deferred(Arc::clone(loader)),
                })
            }
            // Another waiter already settled this attempt.
            _ => None,
        };
        if let Some(next) = settle {
            match &outcome {
                Ok(_) => tracing::info!(route = %self.route, attempt, "View loaded"),
                Err(e) => tracing::warn!(route = %self.route, attempt, error = %e, "View load failed"),
            }
            *state = next;
        }

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn start_load(route: String, loader: &dyn ViewLoader) -> BoxFuture<'static, Result<Arc<View>, ViewLoadError>> {
    let started = Instant::now();
    let load = loader.load();

    async move {
        let outcome = load.await.map(Arc::new);
        metrics::record_view_load(&route, outcome.is_ok(), started);
        outcome
    }
    .boxed()
}

impl fmt::Debug for ViewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.lock() {
            SlotState::Deferred(_) => "deferred",
            SlotState::Loading { .. } => "loading",
            SlotState::Ready(_) => "ready",
        };
        f.debug_struct("ViewSlot")
            .field("route", &self.route)
            .field("state", &state)
            .field("attempts", &self.load_attempts())
            .finish()
    }
}
