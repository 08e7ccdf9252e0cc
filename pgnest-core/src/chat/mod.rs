//! Keyword chatbot for the listing widget.
//!
//! No language model is involved: [`extract_filters`] pulls a budget, a place,
//! and a few categorical words out of the message, and [`respond`] runs the
//! resulting search and phrases a short answer.

mod extract;
mod locations;

pub use extract::{extract_filters, extract_price, parse_amount};
pub use locations::{LOCATIONS, LocationAlias, canonical_area, canonical_city, find_location};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::DomainResult;
use crate::models::{Amenity, Gender, Property, PropertyQuery, PropertyType, validate};
use crate::services::Marketplace;

const MAX_MESSAGE_LEN: usize = 500;

lazy_static! {
    static ref GREETING: Regex = Regex::new(r"\b(?:hi|hello|hey|namaste)\b").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatFilters {
    pub city: Option<String>,
    pub area: Option<String>,
    pub min_rent: Option<u32>,
    pub max_rent: Option<u32>,
    pub gender: Option<Gender>,
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
}

impl ChatFilters {
    pub fn is_empty(&self) -> bool {
        *self == ChatFilters::default()
    }

    pub fn to_query(&self, limit: usize) -> PropertyQuery {
        PropertyQuery {
            city: self.city.clone(),
            area: self.area.clone(),
            min_rent: self.min_rent,
            max_rent: self.max_rent,
            gender: self.gender,
            property_type: self.property_type,
            page: Some(1),
            per_page: Some(limit),
            ..Default::default()
        }
        .with_amenities(&self.amenities)
    }

    /// e.g. "girls pg in Koramangala, Bengaluru under ₹9,000 with wifi"
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(gender) = self.gender {
            parts.push(
                match gender {
                    Gender::Boys => "boys",
                    Gender::Girls => "girls",
                    Gender::CoLiving => "co-living",
                }
                .to_string(),
            );
        }
        parts.push(
            match self.property_type {
                Some(PropertyType::Pg) => "PGs",
                Some(PropertyType::Hostel) => "hostels",
                Some(PropertyType::Flat) => "flats",
                None => "places",
            }
            .to_string(),
        );
        match (&self.area, &self.city) {
            (Some(area), Some(city)) => parts.push(format!("in {}, {}", area, city)),
            (None, Some(city)) => parts.push(format!("in {}", city)),
            _ => {}
        }
        match (self.min_rent, self.max_rent) {
            (Some(min), Some(max)) => parts.push(format!(
                "between {} and {}",
                format_rupees(min),
                format_rupees(max)
            )),
            (None, Some(max)) => parts.push(format!("under {}", format_rupees(max))),
            (Some(min), None) => parts.push(format!("from {}", format_rupees(min))),
            (None, None) => {}
        }
        if !self.amenities.is_empty() {
            let names: Vec<_> = self
                .amenities
                .iter()
                .map(|a| a.to_string().replace('_', " "))
                .collect();
            parts.push(format!("with {}", names.join(", ")));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
    pub filters: ChatFilters,
    /// Matching listings, at most the configured result limit
    pub properties: Vec<Property>,
    /// Total number of matches
    pub total: usize,
}

const GREETING_REPLY: &str = "Hi! Tell me what you're looking for, like \
    \"girls PG in Koramangala under 9k with wifi\".";

const HELP_REPLY: &str = "I can search by city or area, budget (\"under 8000\", \
    \"between 6k and 9k\"), boys/girls/co-living, PG/hostel/flat, and amenities \
    such as wifi, AC, meals, laundry, parking, gym, security or power backup.";

/// Answer one chat message with up to `limit` listings.
pub fn respond(market: &Marketplace, message: &str, limit: usize) -> DomainResult<ChatReply> {
    validate::max_len("message", message, MAX_MESSAGE_LEN)?;
    let filters = extract_filters(message);
    debug!("Chat filters for {:?}: {:?}", message, filters);

    if filters.is_empty() {
        let lowered = message.to_lowercase();
        let greeted = GREETING.is_match(&lowered);
        return Ok(ChatReply {
            reply: if greeted { GREETING_REPLY } else { HELP_REPLY }.to_string(),
            filters,
            properties: Vec::new(),
            total: 0,
        });
    }

    let page = market.search_properties(&filters.to_query(limit.max(1)))?;
    let description = filters.describe();
    let reply = match page.total {
        0 => format!(
            "No {} right now. Try a wider budget or a nearby area.",
            description
        ),
        1 => format!("Found 1 match: {}.", description),
        n if n > page.items.len() => format!(
            "Found {} {}. Here are the newest {}.",
            n,
            description,
            page.items.len()
        ),
        n => format!("Found {} {}.", n, description),
    };

    Ok(ChatReply {
        reply,
        filters,
        properties: page.items,
        total: page.total,
    })
}

/// Indian digit grouping: 1,50,000.
pub fn format_rupees(amount: u32) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();
    format!("₹{},{}", groups.join(","), tail)
}
