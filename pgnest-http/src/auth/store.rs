use async_trait::async_trait;
use dashmap::DashMap;
use pgnest_core::identity::IdentityProvider;
use pgnest_core::models::Identity;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Identity provider backed by a fixed token table
///
/// Stands in for the external sign-in service: each configured bearer token
/// maps to the identity it was issued for.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentityProvider {
    /// Maps tokens to identities
    tokens: Arc<DashMap<String, Identity>>,
}

impl StaticIdentityProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider from configured token pairs
    pub fn from_tokens(pairs: impl IntoIterator<Item = (SecretString, Identity)>) -> Self {
        let provider = Self::new();
        for (token, identity) in pairs {
            provider.add_token(token.expose_secret(), identity);
        }
        provider
    }

    /// Add a token for an identity
    pub fn add_token(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }

    /// Revoke a token
    pub fn remove_token(&self, token: &str) {
        self.tokens.remove(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).map(|entry| entry.value().clone())
    }
}
