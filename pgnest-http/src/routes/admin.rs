use crate::handlers::admin::{
    audit_logs, blacklist_user, change_role, list_bookings, list_promotion_requests,
    list_properties, list_users, review_promotion_request, review_property, stats,
    unblacklist_user,
};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Admin back-office, nested under `/admin`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}/role", patch(change_role))
        .route(
            "/users/{user_id}/blacklist",
            post(blacklist_user).delete(unblacklist_user),
        )
        .route("/properties", get(list_properties))
        .route("/properties/{property_id}/review", post(review_property))
        .route("/bookings", get(list_bookings))
        .route("/promotion-requests", get(list_promotion_requests))
        .route(
            "/promotion-requests/{request_id}/review",
            post(review_promotion_request),
        )
        .route("/audit-logs", get(audit_logs))
        .route("/stats", get(stats))
}
