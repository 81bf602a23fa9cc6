//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated route configuration into a `RouteTable`
//! - Read eager views now, wrap lazy ones in loaders
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Eager (`lazy = false`) views that cannot be read abort startup; lazy views
//!   are only checked on first navigation

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::{GatewayConfig, RouteConfig, ViewConfig};
use crate::observability::metrics;
use crate::routing::{ConfigurationError, RouteEntry, RouteTable, ViewRef};
use crate::views::{view::content_type_for, FsViewLoader, View};

/// Startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("route `{route}`: cannot read view {}: {source}", .path.display())]
    View {
        route: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Routes(#[from] ConfigurationError),
}

/// Build the route table described by `config`.
pub fn build_route_table(config: &GatewayConfig) -> Result<RouteTable, StartupError> {
    let load_timeout = Duration::from_secs(config.timeouts.view_load_secs);

    let entries = config
        .routes
        .iter()
        .map(|route| route_entry(route, &config.app.assets_dir, load_timeout))
        .collect::<Result<Vec<_>, _>>()?;

    let table = RouteTable::register(entries)?.with_base(&config.app.base_url);

    metrics::record_route_count(table.len());
    tracing::info!(
        routes = table.len(),
        base = %config.app.base_url,
        "Route table registered"
    );
    Ok(table)
}

fn route_entry(route: &RouteConfig, assets_dir: &Path, load_timeout: Duration) -> Result<RouteEntry, StartupError> {
    let view = match &route.view {
        ViewConfig::Inline { inline, content_type } => {
            ViewRef::direct(View::new(route.name.clone(), content_type.clone(), inline.clone()))
        }
        ViewConfig::File { file, lazy: true } => {
            ViewRef::deferred(FsViewLoader::new(route.name.clone(), assets_dir.join(file), load_timeout))
        }
        ViewConfig::File { file, lazy: false } => {
            let path = assets_dir.join(file);
            let body = std::fs::read(&path).map_err(|source| StartupError::View {
                route: route.name.clone(),
                path: path.clone(),
                source,
            })?;
            ViewRef::direct(View::new(route.name.clone(), content_type_for(&path), body))
        }
    };

    Ok(RouteEntry::new(route.path.clone(), route.name.clone(), view))
}
