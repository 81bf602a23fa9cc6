//! SPA gateway library: a client-side route table with lazily loaded views,
//! hosted over HTTP in history mode.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod views;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{CurrentRoute, ResolveError, RouteEntry, RouteTable, ViewRef};
pub use views::{View, ViewLoadError, ViewLoader};
