use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::new_id;
use crate::store::Document;

pub const DEFAULT_AUDIT_LIMIT: usize = 50;
pub const MAX_AUDIT_LIMIT: usize = 500;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
    UserBlacklisted,
    UserUnblacklisted,
    RoleChanged,
    PropertyApproved,
    PropertyRejected,
    PropertyDeleted,
    PromotionApproved,
    PromotionRejected,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditTarget {
    User,
    Property,
    PromotionRequest,
    Booking,
}

/// Append-only record of an admin action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: String,
    /// Position in the log, starting at 1
    pub seq: u64,
    pub actor_id: String,
    pub action: AuditAction,
    pub target: AuditTarget,
    pub target_id: String,
    #[serde(default)]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        seq: u64,
        actor_id: impl Into<String>,
        action: AuditAction,
        target: AuditTarget,
        target_id: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            seq,
            actor_id: actor_id.into(),
            action,
            target,
            target_id: target_id.into(),
            details,
            created_at: Utc::now(),
        }
    }
}

impl Document for AuditLog {
    const COLLECTION: &'static str = "audit_logs";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    pub target_id: Option<String>,
    /// Defaults to 50, capped at 500
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_AUDIT_LIMIT)
    }

    pub fn matches(&self, log: &AuditLog) -> bool {
        self.action.is_none_or(|a| a == log.action)
            && self.actor_id.as_deref().is_none_or(|id| id == log.actor_id)
            && self
                .target_id
                .as_deref()
                .is_none_or(|id| id == log.target_id)
    }
}
