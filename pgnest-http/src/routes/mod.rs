pub mod account;
pub mod admin;
pub mod bookings;
pub mod owner;
pub mod properties;
pub mod swagger;

use crate::server::AppState;
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use swagger::ApiDoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main API router with state
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_router())
}

/// Create the v1 API router with state
fn api_v1_router() -> Router<AppState> {
    Router::new()
        .merge(account::routes())
        .merge(properties::routes())
        .merge(bookings::routes())
        .nest("/owner", owner::routes())
        .nest("/admin", admin::routes())
}

/// Health check endpoint for container health monitoring
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
