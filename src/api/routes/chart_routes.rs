//! Chart routes (e.g., /api/v1/charts/*, /api/v1/tenants/{tenant_id}/*)

use axum::{routing::{get, post}, Router};

use crate::api::controller::chart::ChartController;
use crate::app_state::AppState;

pub fn chart_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(ChartController::list_services))
        .route("/labels", get(ChartController::list_labels))
}

pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/{tenant_id}/charts/{service}", get(ChartController::get_service_charts))
        .route("/{tenant_id}/charts/{service}/queries", get(ChartController::get_chart_queries))
        .route("/{tenant_id}/counts", post(ChartController::post_counts))
}
