use crate::handlers::account::{chat, get_me, my_promotion_requests, request_promotion, update_me};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes about the caller's own account, plus the public chatbot
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/promotion-requests", post(request_promotion))
        .route("/promotion-requests/mine", get(my_promotion_requests))
        .route("/chat", post(chat))
}
