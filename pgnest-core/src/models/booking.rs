use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{new_id, validate};
use crate::error::ValidationError;
use crate::store::Document;

pub const MAX_BOOKING_MONTHS: u8 = 24;

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
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Pending and confirmed bookings still hold a place.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: String,
    pub property_id: String,
    pub student_id: String,
    pub owner_id: String,
    pub move_in: NaiveDate,
    pub duration_months: u8,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        student_id: impl Into<String>,
        owner_id: impl Into<String>,
        new: NewBooking,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            property_id: new.property_id,
            student_id: student_id.into(),
            owner_id: owner_id.into(),
            move_in: new.move_in,
            duration_months: new.duration_months,
            message: new.message.filter(|m| !m.trim().is_empty()),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Booking {
    const COLLECTION: &'static str = "bookings";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewBooking {
    pub property_id: String,
    pub move_in: NaiveDate,
    pub duration_months: u8,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewBooking {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validate::non_empty("property_id", &self.property_id)?;
        if self.move_in < today {
            return Err(ValidationError::new("move_in", "must not be in the past"));
        }
        if self.duration_months == 0 || self.duration_months > MAX_BOOKING_MONTHS {
            return Err(ValidationError::new(
                "duration_months",
                format!("must be between 1 and {}", MAX_BOOKING_MONTHS),
            ));
        }
        if let Some(message) = &self.message {
            validate::max_len("message", message, 1000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
