pub mod admin;
pub mod listings;

// Re-export all models for easier imports
pub use admin::*;
pub use listings::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
