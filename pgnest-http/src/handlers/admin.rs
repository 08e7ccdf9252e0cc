use crate::auth::AuthAdmin;
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::{
    AuditLogResponse, BookingListResponse, ErrorResponse, PromotionListResponse,
    PropertyListResponse, UserListResponse,
};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use pgnest_core::models::{
    AuditQuery, BlacklistRequest, ChangeRoleRequest, OwnerPromotionRequest, PromotionFilter,
    PromotionReview, Property, ReviewDecision, StatusFilter, User, UserFilter,
};
use pgnest_core::services::DashboardStats;

/// List users
#[utoipa::path(
    get,
    path = "/admin/users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users, oldest first", body = UserListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthAdmin,
    AppQuery(filter): AppQuery<UserFilter>,
) -> AppResult<Json<UserListResponse>> {
    let users = state.market.list_users(auth.user(), &filter)?;
    Ok(Json(UserListResponse { users }))
}

/// Change a user's role
#[utoipa::path(
    patch,
    path = "/admin/users/{user_id}/role",
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = User),
        (status = 403, description = "Admins cannot change their own role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    params(
        ("user_id" = String, Path, description = "User identifier")
    )
)]
#[axum::debug_handler]
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(user_id): Path<String>,
    AppJson(request): AppJson<ChangeRoleRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .market
        .change_role(auth.user(), &user_id, request.role)?;
    Ok(Json(user))
}

/// Blacklist a user
///
/// A reason is required. Admins cannot be blacklisted.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/blacklist",
    request_body = BlacklistRequest,
    responses(
        (status = 200, description = "User blacklisted", body = User),
        (status = 400, description = "Missing reason", body = ErrorResponse),
        (status = 403, description = "Target is an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already blacklisted", body = ErrorResponse)
    ),
    params(
        ("user_id" = String, Path, description = "User identifier")
    )
)]
#[axum::debug_handler]
pub async fn blacklist_user(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(user_id): Path<String>,
    AppJson(request): AppJson<BlacklistRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .market
        .blacklist(auth.user(), &user_id, &request.reason)?;
    Ok(Json(user))
}

/// Lift a blacklist
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}/blacklist",
    responses(
        (status = 200, description = "User restored", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User is not blacklisted", body = ErrorResponse)
    ),
    params(
        ("user_id" = String, Path, description = "User identifier")
    )
)]
#[axum::debug_handler]
pub async fn unblacklist_user(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(user_id): Path<String>,
) -> AppResult<Json<User>> {
    Ok(Json(state.market.unblacklist(auth.user(), &user_id)?))
}

/// Review queue
#[utoipa::path(
    get,
    path = "/admin/properties",
    params(StatusFilter),
    responses(
        (status = 200, description = "Properties, oldest first", body = PropertyListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_properties(
    State(state): State<AppState>,
    auth: AuthAdmin,
    AppQuery(filter): AppQuery<StatusFilter>,
) -> AppResult<Json<PropertyListResponse>> {
    let properties = state
        .market
        .properties_by_status(auth.user(), filter.status)?;
    Ok(Json(PropertyListResponse { properties }))
}

/// Approve or reject a listing
#[utoipa::path(
    post,
    path = "/admin/properties/{property_id}/review",
    request_body = ReviewDecision,
    responses(
        (status = 200, description = "Decision recorded", body = Property),
        (status = 400, description = "Rejection without a reason", body = ErrorResponse),
        (status = 404, description = "Property not found", body = ErrorResponse)
    ),
    params(
        ("property_id" = String, Path, description = "Property identifier")
    )
)]
#[axum::debug_handler]
pub async fn review_property(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(property_id): Path<String>,
    AppJson(decision): AppJson<ReviewDecision>,
) -> AppResult<Json<Property>> {
    let property = state
        .market
        .review_property(auth.user(), &property_id, decision)?;
    Ok(Json(property))
}

/// Every booking, newest first
#[utoipa::path(
    get,
    path = "/admin/bookings",
    responses(
        (status = 200, description = "Bookings", body = BookingListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> AppResult<Json<BookingListResponse>> {
    let bookings = state.market.all_bookings(auth.user())?;
    Ok(Json(BookingListResponse { bookings }))
}

/// Owner promotion requests
#[utoipa::path(
    get,
    path = "/admin/promotion-requests",
    params(PromotionFilter),
    responses(
        (status = 200, description = "Requests, oldest first", body = PromotionListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_promotion_requests(
    State(state): State<AppState>,
    auth: AuthAdmin,
    AppQuery(filter): AppQuery<PromotionFilter>,
) -> AppResult<Json<PromotionListResponse>> {
    let requests = state
        .market
        .promotion_requests(auth.user(), filter.status)?;
    Ok(Json(PromotionListResponse { requests }))
}

/// Approve or reject a promotion request
///
/// Approval turns the requester into an owner.
#[utoipa::path(
    post,
    path = "/admin/promotion-requests/{request_id}/review",
    request_body = PromotionReview,
    responses(
        (status = 200, description = "Decision recorded", body = OwnerPromotionRequest),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already reviewed", body = ErrorResponse)
    ),
    params(
        ("request_id" = String, Path, description = "Promotion request identifier")
    )
)]
#[axum::debug_handler]
pub async fn review_promotion_request(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(request_id): Path<String>,
    AppJson(review): AppJson<PromotionReview>,
) -> AppResult<Json<OwnerPromotionRequest>> {
    let request = state
        .market
        .review_promotion(auth.user(), &request_id, review)?;
    Ok(Json(request))
}

/// Audit trail
#[utoipa::path(
    get,
    path = "/admin/audit-logs",
    params(AuditQuery),
    responses(
        (status = 200, description = "Entries, newest first", body = AuditLogResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn audit_logs(
    State(state): State<AppState>,
    auth: AuthAdmin,
    AppQuery(query): AppQuery<AuditQuery>,
) -> AppResult<Json<AuditLogResponse>> {
    let logs = state.market.audit_logs(auth.user(), &query)?;
    Ok(Json(AuditLogResponse { logs }))
}

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Counters", body = DashboardStats),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.market.dashboard(auth.user())?))
}
