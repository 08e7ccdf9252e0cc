use crate::handlers::owner::{
    create_draft, discard_draft, draft_back, finish_draft, get_draft, list_drafts,
    owner_bookings, owner_properties, submit_step,
};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Owner dashboard and listing wizard, nested under `/owner`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(owner_properties))
        .route("/bookings", get(owner_bookings))
        .nest("/drafts", draft_routes())
}

fn draft_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drafts).post(create_draft))
        .route("/{draft_id}", get(get_draft).delete(discard_draft))
        .route("/{draft_id}/steps/{step}", put(submit_step))
        .route("/{draft_id}/back", post(draft_back))
        .route("/{draft_id}/finish", post(finish_draft))
}
