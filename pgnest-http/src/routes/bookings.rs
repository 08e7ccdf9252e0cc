use crate::handlers::bookings::{create_booking, list_bookings, update_booking_status};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{booking_id}/status", patch(update_booking_status))
}
