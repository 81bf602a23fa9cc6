use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::routing::{CurrentRoute, RouteInfo};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub base: String,
    pub routes: usize,
    pub resolved_routes: usize,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let routes = state.table.routes();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        base: state.table.base().to_string(),
        routes: routes.len(),
        resolved_routes: routes.iter().filter(|r| r.resolved).count(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteInfo>> {
    Json(state.table.routes())
}

pub async fn get_current(State(state): State<AdminState>) -> Json<Option<CurrentRoute>> {
    Json(state.table.current())
}
