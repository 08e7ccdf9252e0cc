use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{ErrorResponse, PromotionListResponse};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use pgnest_core::chat::{self, ChatReply, ChatRequest};
use pgnest_core::models::{NewPromotionRequest, OwnerPromotionRequest, ProfileUpdate, User};

/// Current user
///
/// Returns the account bound to the caller's token, creating it on first use.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Signed-in user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Blacklisted", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_me(auth: AuthUser) -> Json<User> {
    Json(auth.into_inner())
}

/// Update own profile
#[utoipa::path(
    patch,
    path = "/me",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid name or phone", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(update): AppJson<ProfileUpdate>,
) -> AppResult<Json<User>> {
    let user = state.market.update_profile(auth.user(), update)?;
    Ok(Json(user))
}

/// Ask to become an owner
///
/// Students only. At most one request may be pending per user.
#[utoipa::path(
    post,
    path = "/promotion-requests",
    request_body = NewPromotionRequest,
    responses(
        (status = 201, description = "Request filed", body = OwnerPromotionRequest),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not a student", body = ErrorResponse),
        (status = 409, description = "A request is already pending", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn request_promotion(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(request): AppJson<NewPromotionRequest>,
) -> AppResult<(StatusCode, Json<OwnerPromotionRequest>)> {
    let created = state.market.request_promotion(auth.user(), request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Own promotion requests, newest first
#[utoipa::path(
    get,
    path = "/promotion-requests/mine",
    responses(
        (status = 200, description = "Requests listed", body = PromotionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn my_promotion_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<PromotionListResponse> {
    Json(PromotionListResponse {
        requests: state.market.my_promotion_requests(auth.user()),
    })
}

/// Chatbot search
///
/// Turns a free-text message into filters and returns matching listings.
/// No sign-in needed.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply with matching listings", body = ChatReply),
        (status = 400, description = "Message too long", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let limit = state.market.chat_config().result_limit;
    let reply = chat::respond(&state.market, &request.message, limit)?;
    Ok(Json(reply))
}
