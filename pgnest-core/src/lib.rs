//! # PgNest: student housing marketplace core
//!
//! Domain layer shared by the HTTP server and the CLI.
//!
//! ## Layers
//!
//! ```text
//! models -> store -> services (Marketplace) -> chat / wizard
//! ```
//!
//! - Documents and request shapes ([`models`]) with their `validate()` rules
//! - A concurrent document store with JSON snapshots ([`store`])
//! - Business operations and role checks ([`services::Marketplace`])
//! - Keyword chatbot that turns messages into search filters ([`chat`])
//! - Multi-step property submission state machine ([`wizard`])
//!
//! Authentication is not handled here. Callers resolve a token through an
//! [`identity::IdentityProvider`] and hand the resulting identity to
//! [`services::Marketplace::sync_user`].

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod services;
pub mod store;
pub mod wizard;

pub use error::{DomainResult, Error, ValidationError};
pub use services::Marketplace;
