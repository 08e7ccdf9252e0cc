use crate::auth::StaticIdentityProvider;
use crate::server::{AppState, build_router};
use axum::Router;
use pgnest_core::DomainResult;
use pgnest_core::models::{Identity, Role, User};
use pgnest_core::services::Marketplace;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const ADMIN_KEY: &str = "admin-key";
pub const OWNER_KEY: &str = "owner-key";
pub const STUDENT_KEY: &str = "student-key";
pub const OTHER_STUDENT_KEY: &str = "student2-key";

pub fn test_identity(subject: &str) -> Identity {
    Identity {
        subject: subject.to_string(),
        email: format!("{}@example.com", subject),
        name: subject.to_string(),
    }
}

/// Create a test AppState for testing
///
/// Four tokens are registered: an admin (bootstrap), an owner, and two
/// students. The owner account already exists with the owner role.
pub fn create_test_state() -> AppState {
    let market = Marketplace::in_memory().with_bootstrap_admins(["admin".to_string()]);

    let provider = StaticIdentityProvider::new();
    provider.add_token(ADMIN_KEY, test_identity("admin"));
    provider.add_token(OWNER_KEY, test_identity("owner"));
    provider.add_token(STUDENT_KEY, test_identity("asha"));
    provider.add_token(OTHER_STUDENT_KEY, test_identity("ravi"));

    let state = AppState::new(market, Arc::new(provider));
    if let Ok(owner) = state.market.sync_user(&test_identity("owner")) {
        let _ = state.market.store().users.update(
            &owner.id,
            |u| -> DomainResult<()> {
                u.role = Role::Owner;
                Ok(())
            },
        );
    }
    state
}

/// The full router over `state`, as served
pub fn create_test_app(state: AppState) -> Router {
    build_router(state, CorsLayer::permissive())
}

/// Look up the account for a test subject, creating it if needed
pub fn test_user(state: &AppState, subject: &str) -> DomainResult<User> {
    state.market.sync_user(&test_identity(subject))
}
