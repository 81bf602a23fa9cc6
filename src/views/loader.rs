//! Deferred view loaders.
//!
//! # Responsibilities
//! - Define the `ViewLoader` seam used by deferred routes
//! - Load view documents from disk with a deadline
//!
//! # Design Decisions
//! - `load()` returns a boxed `'static` future so the routing slot can share
//!   it between concurrent callers
//! - Any `Fn() -> impl Future<Output = Result<View, ViewLoadError>>` is a loader

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::views::view::{content_type_for, View};

/// Future returned by a loader.
pub type LoadFuture = BoxFuture<'static, Result<View, ViewLoadError>>;

/// A deferred view could not be produced.
///
/// Never cached: the next navigation to the same route retries the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load view `{view}`: {reason}")]
pub struct ViewLoadError {
    view: String,
    reason: String,
}

impl ViewLoadError {
    pub fn new(view: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            reason: reason.into(),
        }
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Produces a view on demand.
pub trait ViewLoader: Send + Sync {
    /// Start loading the view. Called at most once per load attempt.
    fn load(&self) -> LoadFuture;
}

impl<F, Fut> ViewLoader for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<View, ViewLoadError>> + Send + 'static,
{
    fn load(&self) -> LoadFuture {
        Box::pin(self())
    }
}

/// Loads a view document from the filesystem.
#[derive(Debug, Clone)]
pub struct FsViewLoader {
    id: String,
    path: PathBuf,
    timeout: Duration,
}

impl FsViewLoader {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewLoader for FsViewLoader {
    fn load(&self) -> LoadFuture {
        let id = self.id.clone();
        let path = self.path.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            tracing::debug!(view = %id, path = ?path, "Loading view from disk");

            let body = match tokio::time::timeout(timeout, tokio::fs::read(&path)).await {
                Ok(Ok(body)) => body,
                Ok(Err(e)) => {
                    return Err(ViewLoadError::new(id, format!("{}: {}", path.display(), e)));
                }
                Err(_) => {
                    return Err(ViewLoadError::new(
                        id,
                        format!("{}: timed out after {:?}", path.display(), timeout),
                    ));
                }
            };

            Ok(View::new(id, content_type_for(&path), body))
        })
    }
}
