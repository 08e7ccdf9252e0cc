//! Seam to the external identity provider.
//!
//! Sign-in happens elsewhere; this crate only sees the bearer token the
//! provider issued and asks an [`IdentityProvider`] who it belongs to.

use async_trait::async_trait;

use crate::models::Identity;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token. `None` means the token is unknown or expired.
    async fn resolve(&self, token: &str) -> Option<Identity>;
}
