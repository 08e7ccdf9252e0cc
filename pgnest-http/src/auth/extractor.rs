use axum::{extract::FromRequestParts, http::request::Parts};
use pgnest_core::models::User;

use crate::error::AppError;

fn signed_in_user(parts: &Parts) -> Result<User, AppError> {
    parts
        .extensions
        .get::<User>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}

/// Extractor for the authenticated user
///
/// This extractor gets the authenticated user from the request extensions
/// without consuming the request body.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Get a reference to the inner user
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Unwrap the extractor to get the inner user
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(signed_in_user(parts)?))
    }
}

/// Extractor for a user allowed to list properties (owners and admins)
pub struct AuthOwner(pub User);

impl AuthOwner {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = signed_in_user(parts)?;
        if !user.can_list_properties() {
            return Err(AppError::forbidden("owner role required"));
        }
        Ok(AuthOwner(user))
    }
}

/// Extractor for the authenticated admin user
///
/// This extractor gets the authenticated user from the request extensions
/// and ensures that the user has admin role.
pub struct AuthAdmin(pub User);

impl AuthAdmin {
    /// Get a reference to the inner user
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = signed_in_user(parts)?;
        if !user.is_admin() {
            return Err(AppError::forbidden("admin role required"));
        }
        Ok(AuthAdmin(user))
    }
}

/// The signed-in user on public routes, if any
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<User>().cloned()))
    }
}
