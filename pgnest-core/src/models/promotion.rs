use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{new_id, validate};
use crate::error::ValidationError;
use crate::store::Document;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PromotionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A student asking to become a property owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnerPromotionRequest {
    pub id: String,
    pub user_id: String,
    pub business_name: String,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: PromotionStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnerPromotionRequest {
    pub fn new(user_id: impl Into<String>, new: NewPromotionRequest) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            business_name: new.business_name.trim().to_string(),
            phone: new.phone.trim().to_string(),
            message: new.message.filter(|m| !m.trim().is_empty()),
            status: PromotionStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_note: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for OwnerPromotionRequest {
    const COLLECTION: &'static str = "promotion_requests";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewPromotionRequest {
    pub business_name: String,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewPromotionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("business_name", &self.business_name)?;
        validate::max_len("business_name", &self.business_name, 120)?;
        validate::phone("phone", &self.phone)?;
        if let Some(message) = &self.message {
            validate::max_len("message", message, 1000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromotionReview {
    pub approve: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PromotionFilter {
    pub status: Option<PromotionStatus>,
}
