//! Route lookup and resolution.
//!
//! # Responsibilities
//! - Compile route entries into an ordered table
//! - Reject duplicate names and paths at registration
//! - Match a navigation path (history mode, optional base prefix)
//! - Resolve the matched view, loading deferred views on first use
//! - Publish successful navigations to the current-route observable
//!
//! # Design Decisions
//! - Immutable after construction; per-route view caches are the only
//!   interior state
//! - O(n) ordered scan, first match wins; entry order is the tie-break
//! - Explicit `NotFound` rather than a silent default route

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;

use crate::observability::metrics;
use crate::routing::current::{CurrentRoute, Navigation};
use crate::routing::entry::RouteEntry;
use crate::routing::error::{ConfigurationError, ResolveError};
use crate::routing::matcher::{normalize, Params, PathPattern};
use crate::routing::slot::ViewSlot;
use crate::views::View;

#[derive(Debug)]
struct CompiledRoute {
    name: String,
    pattern: PathPattern,
    slot: ViewSlot,
}

/// A route matched by `RouteTable::lookup`, before its view is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub name: &'a str,
    pub pattern: &'a str,
    pub path: String,
    pub params: Params,
    pub query: BTreeMap<String, String>,
}

/// Outcome of a successful navigation.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The matched route as published to the observable.
    pub route: CurrentRoute,
    /// The pattern of the matched entry.
    pub pattern: String,
    /// The resolved view. Identical instance for every resolution of a route.
    pub view: Arc<View>,
}

/// Description of a registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
    pub deferred: bool,
    pub resolved: bool,
    pub load_attempts: u64,
}

/// Ordered path→view bindings with lazily resolved views.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    base: String,
    navigation: Navigation,
}

impl RouteTable {
    /// Build the table from an ordered list of entries.
    ///
    /// Fails on the first duplicate name, duplicate path or malformed pattern.
    pub fn register(entries: impl IntoIterator<Item = RouteEntry>) -> Result<Self, ConfigurationError> {
        let mut names: HashSet<String> = HashSet::new();
        let mut paths: HashMap<String, String> = HashMap::new();
        let mut routes = Vec::new();

        for entry in entries {
            let pattern = PathPattern::parse(&entry.path)?;

            if !names.insert(entry.name.clone()) {
                return Err(ConfigurationError::DuplicateName(entry.name));
            }
            if let Some(first) = paths.insert(pattern.as_str().to_string(), entry.name.clone()) {
                return Err(ConfigurationError::DuplicatePath {
                    path: pattern.as_str().to_string(),
                    first,
                    second: entry.name,
                });
            }

            tracing::debug!(
                route = %entry.name,
                path = %pattern.as_str(),
                deferred = entry.view.is_deferred(),
                "Route registered"
            );

            routes.push(CompiledRoute {
                slot: ViewSlot::new(entry.name.clone(), entry.view),
                name: entry.name,
                pattern,
            });
        }

        Ok(Self {
            routes,
            base: String::new(),
            navigation: Navigation::new(),
        })
    }

    /// Serve the table under a base prefix (history mode `base`).
    ///
    /// `"/"` and `""` mean no prefix.
    pub fn with_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.base = if base.is_empty() || base.starts_with('/') {
            base.to_string()
        } else {
            format!("/{base}")
        };
        self
    }

    /// The base prefix, without trailing slash. Empty when unset.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Describe every route in table order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .map(|r| RouteInfo {
                name: r.name.clone(),
                path: r.pattern.as_str().to_string(),
                deferred: r.slot.is_deferred(),
                resolved: r.slot.is_ready(),
                load_attempts: r.slot.load_attempts(),
            })
            .collect()
    }

    /// Match `target` without loading anything or publishing.
    ///
    /// `target` may carry a query string and fragment.
    pub fn lookup(&self, target: &str) -> Result<RouteMatch<'_>, ResolveError> {
        self.find(target).map(|(_, matched)| matched)
    }

    /// Navigate to `target`: match, resolve the view, publish.
    ///
    /// A failed navigation does not touch the current route. A successful one
    /// is published only if no newer navigation was requested meanwhile.
    pub async fn resolve(&self, target: &str) -> Result<Resolution, ResolveError> {
        let started = Instant::now();
        let ticket = self.navigation.begin();

        let (route, matched) = match self.find(target) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(path = %target, "No route matched");
                metrics::record_navigation("none", "not_found", started);
                return Err(e);
            }
        };

        let view = match route.slot.get().await {
            Ok(view) => view,
            Err(e) => {
                metrics::record_navigation(&route.name, "load_error", started);
                return Err(ResolveError::ViewLoad(e));
            }
        };

        let current = CurrentRoute {
            name: matched.name.to_string(),
            path: matched.path,
            params: matched.params,
            query: matched.query,
        };

        if self.navigation.publish(ticket, current.clone()) {
            tracing::debug!(route = %current.name, path = %current.path, "Navigated");
            metrics::record_navigation(&route.name, "ok", started);
        } else {
            tracing::debug!(route = %current.name, path = %current.path, "Navigation superseded");
            metrics::record_navigation(&route.name, "superseded", started);
        }

        Ok(Resolution {
            route: current,
            pattern: route.pattern.as_str().to_string(),
            view,
        })
    }

    /// Watch the current route.
    pub fn current_route(&self) -> watch::Receiver<Option<CurrentRoute>> {
        self.navigation.subscribe()
    }

    /// Snapshot of the current route.
    pub fn current(&self) -> Option<CurrentRoute> {
        self.navigation.current()
    }

    fn find(&self, target: &str) -> Result<(&CompiledRoute, RouteMatch<'_>), ResolveError> {
        let not_found = || ResolveError::NotFound {
            path: target.to_string(),
        };

        let (path, query) = split_target(target);
        if !path.starts_with('/') {
            return Err(not_found());
        }
        let path = self.strip_base(path).ok_or_else(not_found)?;
        let path = normalize(path);

        self.routes
            .iter()
            .find_map(|route| {
                route.pattern.matches(path).map(|params| {
                    let matched = RouteMatch {
                        name: route.name.as_str(),
                        pattern: route.pattern.as_str(),
                        path: path.to_string(),
                        params,
                        query: parse_query(query),
                    };
                    (route, matched)
                })
            })
            .ok_or_else(not_found)
    }

    fn strip_base<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.base.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.base.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            // "/app" must not match "/application"
            _ => None,
        }
    }
}

/// Split `path?query#fragment`. The fragment never takes part in routing.
fn split_target(target: &str) -> (&str, &str) {
    let target = target.split_once('#').map_or(target, |(before, _)| before);
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let path = if path.is_empty() { "/" } else { path };
    (path, query)
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
