use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::server::AppState;

/// Axum middleware resolving the caller's token into a `User`
///
/// The token comes from `Authorization: Bearer` or `X-API-Key`. On success the
/// synced user is stored in the request extensions for the extractors.
/// Public paths pass through anonymously when no usable token is present.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let public = is_public(request.method(), request.uri().path());

    let Some(token) = request_token(request.headers()) else {
        if public {
            return Ok(next.run(request).await);
        }
        return Err(AppError::Unauthorized);
    };

    let Some(identity) = state.identity.resolve(&token).await else {
        if public {
            debug!("Ignoring unknown token on public path {}", request.uri().path());
            return Ok(next.run(request).await);
        }
        warn!("Rejected unknown token for {}", request.uri().path());
        return Err(AppError::Unauthorized);
    };

    let user = state.market.sync_user(&identity)?;
    if user.blacklisted {
        if public {
            return Ok(next.run(request).await);
        }
        warn!("Blacklisted user {} refused at {}", user.id, request.uri().path());
        return Err(AppError::forbidden("account is blacklisted"));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Bearer token or API key, whichever is present.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let api_key = headers
        .get("X-API-Key")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());
    bearer.or(api_key).map(str::to_string)
}

/// Paths that can be called without signing in.
pub fn is_public(method: &Method, path: &str) -> bool {
    is_health_path(path)
        || is_swagger_path(path)
        || is_api_docs_path(path)
        || (*method == Method::GET && is_listing_path(path))
        || (*method == Method::POST && is_chat_path(path))
}

pub fn is_health_path(path: &str) -> bool {
    path.starts_with("/health")
}

pub fn is_swagger_path(path: &str) -> bool {
    path.starts_with("/swagger-ui")
}

pub fn is_api_docs_path(path: &str) -> bool {
    path.starts_with("/api-docs")
}

pub fn is_listing_path(path: &str) -> bool {
    path == "/api/v1/properties" || path.starts_with("/api/v1/properties/")
}

pub fn is_chat_path(path: &str) -> bool {
    path == "/api/v1/chat"
}
