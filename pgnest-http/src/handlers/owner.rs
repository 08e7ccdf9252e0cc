use crate::auth::AuthOwner;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{BookingListResponse, DraftListResponse, ErrorResponse, PropertyListResponse};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use pgnest_core::models::Property;
use pgnest_core::wizard::{PropertyDraft, StepData};
use serde_json::Value;

/// Own listings, any approval status
#[utoipa::path(
    get,
    path = "/owner/properties",
    responses(
        (status = 200, description = "Listings", body = PropertyListResponse),
        (status = 403, description = "Owner role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn owner_properties(
    State(state): State<AppState>,
    auth: AuthOwner,
) -> Json<PropertyListResponse> {
    Json(PropertyListResponse {
        properties: state.market.owner_properties(auth.user()),
    })
}

/// Bookings made on own listings
#[utoipa::path(
    get,
    path = "/owner/bookings",
    responses(
        (status = 200, description = "Bookings", body = BookingListResponse),
        (status = 403, description = "Owner role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn owner_bookings(
    State(state): State<AppState>,
    auth: AuthOwner,
) -> Json<BookingListResponse> {
    Json(BookingListResponse {
        bookings: state.market.owner_bookings(auth.user()),
    })
}

/// Drafts in progress, most recently touched first
#[utoipa::path(
    get,
    path = "/owner/drafts",
    responses(
        (status = 200, description = "Drafts", body = DraftListResponse),
        (status = 403, description = "Owner role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_drafts(
    State(state): State<AppState>,
    auth: AuthOwner,
) -> Json<DraftListResponse> {
    Json(DraftListResponse {
        drafts: state.market.list_drafts(auth.user()),
    })
}

/// Start a new listing draft
#[utoipa::path(
    post,
    path = "/owner/drafts",
    responses(
        (status = 201, description = "Draft created at the basics step", body = PropertyDraft),
        (status = 403, description = "Owner role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_draft(
    State(state): State<AppState>,
    auth: AuthOwner,
) -> AppResult<(StatusCode, Json<PropertyDraft>)> {
    let draft = state.market.create_draft(auth.user())?;
    Ok((StatusCode::CREATED, Json(draft)))
}

#[utoipa::path(
    get,
    path = "/owner/drafts/{draft_id}",
    responses(
        (status = 200, description = "Draft found", body = PropertyDraft),
        (status = 404, description = "Draft not found", body = ErrorResponse)
    ),
    params(
        ("draft_id" = String, Path, description = "Draft identifier")
    )
)]
#[axum::debug_handler]
pub async fn get_draft(
    State(state): State<AppState>,
    auth: AuthOwner,
    Path(draft_id): Path<String>,
) -> AppResult<Json<PropertyDraft>> {
    Ok(Json(state.market.get_draft(auth.user(), &draft_id)?))
}

#[utoipa::path(
    delete,
    path = "/owner/drafts/{draft_id}",
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Draft not found", body = ErrorResponse)
    ),
    params(
        ("draft_id" = String, Path, description = "Draft identifier")
    )
)]
#[axum::debug_handler]
pub async fn discard_draft(
    State(state): State<AppState>,
    auth: AuthOwner,
    Path(draft_id): Path<String>,
) -> AppResult<StatusCode> {
    state.market.discard_draft(auth.user(), &draft_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit one wizard step
///
/// The body shape depends on the step: `basics`, `location`, `pricing`,
/// `amenities` or `photos`. Submitting the current step advances the draft;
/// earlier steps can be edited in place.
#[utoipa::path(
    put,
    path = "/owner/drafts/{draft_id}/steps/{step}",
    request_body = Value,
    responses(
        (status = 200, description = "Step saved", body = PropertyDraft),
        (status = 400, description = "Invalid step data", body = ErrorResponse),
        (status = 404, description = "Draft not found", body = ErrorResponse),
        (status = 409, description = "Step is ahead of the draft", body = ErrorResponse)
    ),
    params(
        ("draft_id" = String, Path, description = "Draft identifier"),
        ("step" = String, Path, description = "Wizard step name")
    )
)]
#[axum::debug_handler]
pub async fn submit_step(
    State(state): State<AppState>,
    auth: AuthOwner,
    Path((draft_id, step)): Path<(String, String)>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<PropertyDraft>> {
    let data = StepData::from_json(&step, body).map_err(pgnest_core::Error::from)?;
    let draft = state
        .market
        .submit_draft_step(auth.user(), &draft_id, data)?;
    Ok(Json(draft))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/owner/drafts/{draft_id}/back",
    responses(
        (status = 200, description = "Draft moved back", body = PropertyDraft),
        (status = 404, description = "Draft not found", body = ErrorResponse)
    ),
    params(
        ("draft_id" = String, Path, description = "Draft identifier")
    )
)]
#[axum::debug_handler]
pub async fn draft_back(
    State(state): State<AppState>,
    auth: AuthOwner,
    Path(draft_id): Path<String>,
) -> AppResult<Json<PropertyDraft>> {
    Ok(Json(state.market.draft_back(auth.user(), &draft_id)?))
}

/// Finish the wizard
///
/// Creates the property (pending review) and removes the draft.
#[utoipa::path(
    post,
    path = "/owner/drafts/{draft_id}/finish",
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 404, description = "Draft not found", body = ErrorResponse),
        (status = 409, description = "Draft is not at the review step", body = ErrorResponse)
    ),
    params(
        ("draft_id" = String, Path, description = "Draft identifier")
    )
)]
#[axum::debug_handler]
pub async fn finish_draft(
    State(state): State<AppState>,
    auth: AuthOwner,
    Path(draft_id): Path<String>,
) -> AppResult<(StatusCode, Json<Property>)> {
    let property = state.market.finish_draft(auth.user(), &draft_id)?;
    Ok((StatusCode::CREATED, Json(property)))
}
