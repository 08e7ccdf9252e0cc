//! Server-side state for the multi-step property submission form.
//!
//! A [`PropertyDraft`] walks through the [`WizardStep`]s in order:
//!
//! ```text
//! Basics -> Location -> Pricing -> Amenities -> Photos -> Review
//! ```
//!
//! Each step accepts one [`StepData`] payload. Submitting the current step
//! stores the payload and advances the draft; submitting an earlier step edits
//! it in place without moving. Steps after the current one are refused with
//! [`Error::StepOutOfOrder`]. Once the draft reaches `Review`,
//! [`PropertyDraft::to_new_property`] assembles the listing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{DomainResult, Error, ValidationError};
use crate::models::property::{
    validate_description, validate_images, validate_rent, validate_title,
};
use crate::models::{Amenity, Gender, Location, NewProperty, PropertyType, new_id};
use crate::store::Document;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Basics,
    Location,
    Pricing,
    Amenities,
    Photos,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Basics,
        WizardStep::Location,
        WizardStep::Pricing,
        WizardStep::Amenities,
        WizardStep::Photos,
        WizardStep::Review,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The following step; `Review` is terminal.
    pub fn next(self) -> Self {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(WizardStep::Review)
    }

    /// The preceding step; `Basics` stays put.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .map(|i| Self::ALL[i])
            .unwrap_or(WizardStep::Basics)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasicsStep {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricingStep {
    pub rent: u32,
    #[serde(default)]
    pub deposit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AmenitiesStep {
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PhotosStep {
    pub images: Vec<String>,
}

/// Payload for one wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepData {
    Basics(BasicsStep),
    Location(Location),
    Pricing(PricingStep),
    Amenities(AmenitiesStep),
    Photos(PhotosStep),
}

impl StepData {
    pub fn step(&self) -> WizardStep {
        match self {
            StepData::Basics(_) => WizardStep::Basics,
            StepData::Location(_) => WizardStep::Location,
            StepData::Pricing(_) => WizardStep::Pricing,
            StepData::Amenities(_) => WizardStep::Amenities,
            StepData::Photos(_) => WizardStep::Photos,
        }
    }

    /// Decode the body of `PUT .../steps/{step}`.
    pub fn from_json(step: &str, body: serde_json::Value) -> Result<Self, ValidationError> {
        let step = WizardStep::from_str(step)
            .map_err(|_| ValidationError::new("step", format!("unknown step '{}'", step)))?;
        let invalid = |e: serde_json::Error| ValidationError::new(step.to_string(), e.to_string());
        Ok(match step {
            WizardStep::Basics => StepData::Basics(serde_json::from_value(body).map_err(invalid)?),
            WizardStep::Location => {
                StepData::Location(serde_json::from_value(body).map_err(invalid)?)
            }
            WizardStep::Pricing => {
                StepData::Pricing(serde_json::from_value(body).map_err(invalid)?)
            }
            WizardStep::Amenities => {
                StepData::Amenities(serde_json::from_value(body).map_err(invalid)?)
            }
            WizardStep::Photos => StepData::Photos(serde_json::from_value(body).map_err(invalid)?),
            WizardStep::Review => {
                return Err(ValidationError::new(
                    "step",
                    "review has no data, finish the draft instead",
                ));
            }
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            StepData::Basics(basics) => {
                validate_title(&basics.title)?;
                validate_description(&basics.description)
            }
            StepData::Location(location) => location.validate(),
            StepData::Pricing(pricing) => validate_rent(pricing.rent),
            StepData::Amenities(_) => Ok(()),
            StepData::Photos(photos) => validate_images(&photos.images, true),
        }
    }
}

/// An owner's listing in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyDraft {
    pub id: String,
    pub owner_id: String,
    pub current: WizardStep,
    #[serde(default)]
    pub basics: Option<BasicsStep>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub pricing: Option<PricingStep>,
    #[serde(default)]
    pub amenities: Option<AmenitiesStep>,
    #[serde(default)]
    pub photos: Option<PhotosStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyDraft {
    pub fn new(owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            owner_id: owner_id.into(),
            current: WizardStep::Basics,
            basics: None,
            location: None,
            pricing: None,
            amenities: None,
            photos: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store one step's data, advancing when it was the current step.
    pub fn submit(&mut self, data: StepData) -> DomainResult<()> {
        let step = data.step();
        if step > self.current {
            return Err(Error::StepOutOfOrder {
                step: step.to_string(),
                current: self.current.to_string(),
            });
        }
        data.validate()?;

        match data {
            StepData::Basics(basics) => self.basics = Some(basics),
            StepData::Location(location) => self.location = Some(location),
            StepData::Pricing(pricing) => self.pricing = Some(pricing),
            StepData::Amenities(amenities) => self.amenities = Some(amenities),
            StepData::Photos(photos) => self.photos = Some(photos),
        }
        if step == self.current {
            self.current = self.current.next();
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn back(&mut self) {
        self.current = self.current.previous();
        self.updated_at = Utc::now();
    }

    /// Assemble the listing. Only valid at `Review`.
    pub fn to_new_property(&self) -> DomainResult<NewProperty> {
        if self.current != WizardStep::Review {
            return Err(Error::StepOutOfOrder {
                step: WizardStep::Review.to_string(),
                current: self.current.to_string(),
            });
        }
        let (Some(basics), Some(location), Some(pricing), Some(amenities), Some(photos)) = (
            &self.basics,
            &self.location,
            &self.pricing,
            &self.amenities,
            &self.photos,
        ) else {
            return Err(ValidationError::new("draft", "every step must be completed").into());
        };

        Ok(NewProperty {
            title: basics.title.clone(),
            description: basics.description.clone(),
            property_type: basics.property_type,
            gender: basics.gender,
            location: location.clone(),
            rent: pricing.rent,
            deposit: pricing.deposit,
            amenities: amenities.amenities.clone(),
            images: photos.images.clone(),
            available: amenities.available,
        })
    }
}

impl Document for PropertyDraft {
    const COLLECTION: &'static str = "drafts";

    fn id(&self) -> &str {
        &self.id
    }
}
