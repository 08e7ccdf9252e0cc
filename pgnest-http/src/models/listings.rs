use pgnest_core::models::{Booking, OwnerPromotionRequest, Page, Property};
use pgnest_core::wizard::PropertyDraft;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertySearchResponse {
    pub properties: Vec<Property>,

    /// Matches across all pages
    pub total: usize,

    pub page: usize,

    pub per_page: usize,
}

impl From<Page<Property>> for PropertySearchResponse {
    fn from(page: Page<Property>) -> Self {
        Self {
            properties: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyListResponse {
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftListResponse {
    pub drafts: Vec<PropertyDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromotionListResponse {
    pub requests: Vec<OwnerPromotionRequest>,
}
