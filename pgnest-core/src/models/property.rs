use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{new_id, validate};
use crate::chat::{canonical_area, canonical_city};
use crate::error::ValidationError;
use crate::store::Document;

pub const MAX_IMAGES: usize = 10;

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
pub enum PropertyType {
    /// Paying guest accommodation
    Pg,
    Hostel,
    Flat,
}

/// Who a property accepts.
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
pub enum Gender {
    Boys,
    Girls,
    CoLiving,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Amenity {
    Wifi,
    Ac,
    Meals,
    Laundry,
    Parking,
    Gym,
    Security,
    PowerBackup,
    Housekeeping,
}

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
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub address: String,
    pub area: String,
    pub city: String,
    pub pincode: String,
}

impl Location {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("location.address", &self.address)?;
        validate::non_empty("location.area", &self.area)?;
        validate::non_empty("location.city", &self.city)?;
        validate::pincode("location.pincode", &self.pincode)
    }

    /// Trim fields and store known cities and areas under one spelling, so
    /// "Bangalore" and "Bengaluru" listings are found by the same search.
    pub fn normalized(self) -> Self {
        let city = self.city.trim();
        let area = self.area.trim();
        Self {
            address: self.address.trim().to_string(),
            city: canonical_city(city).unwrap_or(city).to_string(),
            area: canonical_area(area).unwrap_or(area).to_string(),
            pincode: self.pincode.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub gender: Gender,
    pub location: Location,
    /// Monthly rent in whole rupees
    pub rent: u32,
    pub deposit: u32,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub images: Vec<String>,
    pub available: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn new(owner_id: impl Into<String>, new: NewProperty) -> Self {
        let now = Utc::now();
        let mut amenities = new.amenities;
        amenities.sort();
        amenities.dedup();
        Self {
            id: new_id(),
            owner_id: owner_id.into(),
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            property_type: new.property_type,
            gender: new.gender,
            location: new.location.normalized(),
            rent: new.rent,
            deposit: new.deposit,
            amenities,
            images: new.images,
            available: new.available,
            approval_status: ApprovalStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_listed(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved && self.available
    }

    pub fn has_amenities(&self, wanted: &[Amenity]) -> bool {
        wanted.iter().all(|a| self.amenities.contains(a))
    }
}

impl Document for Property {
    const COLLECTION: &'static str = "properties";

    fn id(&self) -> &str {
        &self.id
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub gender: Gender,
    pub location: Location,
    pub rent: u32,
    #[serde(default)]
    pub deposit: u32,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate::non_empty("title", title)?;
    validate::max_len("title", title, 120)
}

pub(crate) fn validate_description(description: &str) -> Result<(), ValidationError> {
    validate::non_empty("description", description)?;
    validate::max_len("description", description, 5000)
}

pub(crate) fn validate_rent(rent: u32) -> Result<(), ValidationError> {
    if rent == 0 {
        return Err(ValidationError::new("rent", "must be greater than zero"));
    }
    Ok(())
}

pub(crate) fn validate_images(images: &[String], required: bool) -> Result<(), ValidationError> {
    if required && images.is_empty() {
        return Err(ValidationError::new("images", "at least one photo is required"));
    }
    if images.len() > MAX_IMAGES {
        return Err(ValidationError::new(
            "images",
            format!("at most {} photos are allowed", MAX_IMAGES),
        ));
    }
    images
        .iter()
        .try_for_each(|url| validate::http_url("images", url))
}

impl NewProperty {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        self.location.validate()?;
        validate_rent(self.rent)?;
        validate_images(&self.images, false)
    }
}

/// Partial edit of a property. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub gender: Option<Gender>,
    pub location: Option<Location>,
    pub rent: Option<u32>,
    pub deposit: Option<u32>,
    pub amenities: Option<Vec<Amenity>>,
    pub images: Option<Vec<String>>,
    pub available: Option<bool>,
}

impl PropertyUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if let Some(rent) = self.rent {
            validate_rent(rent)?;
        }
        if let Some(images) = &self.images {
            validate_images(images, false)?;
        }
        Ok(())
    }

    /// True when anything other than availability changes.
    pub fn is_content_edit(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.property_type.is_some()
            || self.gender.is_some()
            || self.location.is_some()
            || self.rent.is_some()
            || self.deposit.is_some()
            || self.amenities.is_some()
            || self.images.is_some()
    }

    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            property.description = description.trim().to_string();
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(gender) = self.gender {
            property.gender = gender;
        }
        if let Some(location) = self.location {
            property.location = location.normalized();
        }
        if let Some(rent) = self.rent {
            property.rent = rent;
        }
        if let Some(deposit) = self.deposit {
            property.deposit = deposit;
        }
        if let Some(mut amenities) = self.amenities {
            amenities.sort();
            amenities.dedup();
            property.amenities = amenities;
        }
        if let Some(images) = self.images {
            property.images = images;
        }
        if let Some(available) = self.available {
            property.available = available;
        }
        property.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    RentAsc,
    RentDesc,
}

/// Search parameters for the public listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PropertyQuery {
    pub city: Option<String>,
    pub area: Option<String>,
    pub min_rent: Option<u32>,
    pub max_rent: Option<u32>,
    pub gender: Option<Gender>,
    pub property_type: Option<PropertyType>,
    /// Comma-separated amenities that must all be present, e.g. `wifi,meals`
    pub amenities: Option<String>,
    /// Free text over title, description and area
    pub q: Option<String>,
    pub sort: Option<SortOrder>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PropertyQuery {
    pub fn amenity_list(&self) -> Result<Vec<Amenity>, ValidationError> {
        let Some(raw) = self.amenities.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Amenity::from_str(s).map_err(|_| {
                    ValidationError::new("amenities", format!("unknown amenity '{}'", s))
                })
            })
            .collect()
    }

    pub fn with_amenities(mut self, amenities: &[Amenity]) -> Self {
        if !amenities.is_empty() {
            self.amenities = Some(
                amenities
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        self
    }

    /// Everything except the approval/availability gate.
    pub fn matches(&self, property: &Property, amenities: &[Amenity]) -> bool {
        if let Some(city) = non_blank(&self.city) {
            let city = canonical_city(city).unwrap_or(city);
            let stored = &property.location.city;
            if !canonical_city(stored)
                .unwrap_or(stored)
                .eq_ignore_ascii_case(city)
            {
                return false;
            }
        }
        if let Some(area) = non_blank(&self.area) {
            let area = canonical_area(area).unwrap_or(area);
            if !property
                .location
                .area
                .to_lowercase()
                .contains(&area.to_lowercase())
            {
                return false;
            }
        }
        if self.min_rent.is_some_and(|min| property.rent < min) {
            return false;
        }
        if self.max_rent.is_some_and(|max| property.rent > max) {
            return false;
        }
        if self.gender.is_some_and(|g| g != property.gender) {
            return false;
        }
        if self
            .property_type
            .is_some_and(|t| t != property.property_type)
        {
            return false;
        }
        if !property.has_amenities(amenities) {
            return false;
        }
        if let Some(q) = non_blank(&self.q) {
            let q = q.to_lowercase();
            let hit = property.title.to_lowercase().contains(&q)
                || property.description.to_lowercase().contains(&q)
                || property.location.area.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    pub status: Option<ApprovalStatus>,
}

/// Admin verdict on a pending listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}
