use crate::auth::{AuthOwner, AuthUser, MaybeUser};
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::{ErrorResponse, PropertySearchResponse};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use pgnest_core::models::{NewProperty, Property, PropertyQuery, PropertyUpdate};

/// Search listings
///
/// Only approved, available properties are returned. No sign-in needed.
#[utoipa::path(
    get,
    path = "/properties",
    params(PropertyQuery),
    responses(
        (status = 200, description = "Search results", body = PropertySearchResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn search_properties(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PropertyQuery>,
) -> AppResult<Json<PropertySearchResponse>> {
    let page = state.market.search_properties(&query)?;
    Ok(Json(page.into()))
}

/// Get a property
///
/// Approved listings are public; others are visible to their owner and admins.
#[utoipa::path(
    get,
    path = "/properties/{property_id}",
    responses(
        (status = 200, description = "Property found", body = Property),
        (status = 404, description = "Property not found", body = ErrorResponse)
    ),
    params(
        ("property_id" = String, Path, description = "Property identifier")
    )
)]
#[axum::debug_handler]
pub async fn get_property(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(property_id): Path<String>,
) -> AppResult<Json<Property>> {
    let property = state.market.get_property(viewer.user(), &property_id)?;
    Ok(Json(property))
}

/// List a property
///
/// Owner listings wait for admin review; admin listings go live at once.
#[utoipa::path(
    post,
    path = "/properties",
    request_body = NewProperty,
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 400, description = "Invalid property", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Owner role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_property(
    State(state): State<AppState>,
    auth: AuthOwner,
    AppJson(new): AppJson<NewProperty>,
) -> AppResult<(StatusCode, Json<Property>)> {
    let property = state.market.create_property(auth.user(), new)?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// Edit a property
///
/// Content changes by an owner send the listing back to review.
#[utoipa::path(
    put,
    path = "/properties/{property_id}",
    request_body = PropertyUpdate,
    responses(
        (status = 200, description = "Property updated", body = Property),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse)
    ),
    params(
        ("property_id" = String, Path, description = "Property identifier")
    )
)]
#[axum::debug_handler]
pub async fn update_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<String>,
    AppJson(update): AppJson<PropertyUpdate>,
) -> AppResult<Json<Property>> {
    let property = state
        .market
        .update_property(auth.user(), &property_id, update)?;
    Ok(Json(property))
}

/// Delete a property
///
/// Pending and confirmed bookings for it are cancelled.
#[utoipa::path(
    delete,
    path = "/properties/{property_id}",
    responses(
        (status = 204, description = "Property deleted"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse)
    ),
    params(
        ("property_id" = String, Path, description = "Property identifier")
    )
)]
#[axum::debug_handler]
pub async fn delete_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<String>,
) -> AppResult<StatusCode> {
    state.market.delete_property(auth.user(), &property_id)?;
    Ok(StatusCode::NO_CONTENT)
}
