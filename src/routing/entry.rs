//! Route entries: the unit of route table configuration.

use std::fmt;
use std::sync::Arc;

use crate::views::{View, ViewLoader};

/// How a route obtains its view.
#[derive(Clone)]
pub enum ViewRef {
    /// The view is held directly.
    Direct(Arc<View>),
    /// The view is produced on first navigation and cached afterwards.
    Deferred(Arc<dyn ViewLoader>),
}

impl ViewRef {
    pub fn direct(view: View) -> Self {
        ViewRef::Direct(Arc::new(view))
    }

    pub fn deferred(loader: impl ViewLoader + 'static) -> Self {
        ViewRef::Deferred(Arc::new(loader))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ViewRef::Deferred(_))
    }
}

impl fmt::Debug for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRef::Direct(view) => f.debug_tuple("Direct").field(&view.id()).finish(),
            ViewRef::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A named binding from a path pattern to a view.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: String,
    pub name: String,
    pub view: ViewRef,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewRef) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
        }
    }
}
