use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{BookingListResponse, ErrorResponse};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use pgnest_core::models::{Booking, BookingStatusUpdate, NewBooking};

/// Request a booking
///
/// Students only. The property must be approved and available.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking requested", body = Booking),
        (status = 400, description = "Invalid booking", body = ErrorResponse),
        (status = 403, description = "Not a student", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 409, description = "Unavailable or already booked", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(new): AppJson<NewBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state.market.create_booking(auth.user(), new)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Own bookings
///
/// Bookings the caller made, plus those on properties they own.
#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "Bookings", body = BookingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<BookingListResponse> {
    Json(BookingListResponse {
        bookings: state.market.my_bookings(auth.user()),
    })
}

/// Move a booking to a new status
///
/// Owners confirm, reject and complete; students cancel; admins may do all.
#[utoipa::path(
    patch,
    path = "/bookings/{booking_id}/status",
    request_body = BookingStatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = Booking),
        (status = 403, description = "Not allowed for this caller", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse)
    ),
    params(
        ("booking_id" = String, Path, description = "Booking identifier")
    )
)]
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
    AppJson(update): AppJson<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .market
        .update_booking_status(auth.user(), &booking_id, update.status)?;
    Ok(Json(booking))
}
