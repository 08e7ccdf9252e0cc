use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Marketplace, users::require_admin};
use crate::error::DomainResult;
use crate::models::{ApprovalStatus, BookingStatus, PromotionStatus, Role, User};

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub students: usize,
    pub owners: usize,
    pub admins: usize,
    pub blacklisted_users: usize,
    pub properties_pending: usize,
    pub properties_approved: usize,
    pub properties_rejected: usize,
    pub bookings_pending: usize,
    pub bookings_confirmed: usize,
    pub bookings_rejected: usize,
    pub bookings_cancelled: usize,
    pub bookings_completed: usize,
    pub pending_promotion_requests: usize,
}

impl Marketplace {
    pub fn dashboard(&self, admin: &User) -> DomainResult<DashboardStats> {
        require_admin(admin)?;
        let users = &self.store.users;
        let properties = &self.store.properties;
        let bookings = &self.store.bookings;

        Ok(DashboardStats {
            students: users.count(|u| u.role == Role::Student),
            owners: users.count(|u| u.role == Role::Owner),
            admins: users.count(|u| u.role == Role::Admin),
            blacklisted_users: users.count(|u| u.blacklisted),
            properties_pending: properties
                .count(|p| p.approval_status == ApprovalStatus::Pending),
            properties_approved: properties
                .count(|p| p.approval_status == ApprovalStatus::Approved),
            properties_rejected: properties
                .count(|p| p.approval_status == ApprovalStatus::Rejected),
            bookings_pending: bookings.count(|b| b.status == BookingStatus::Pending),
            bookings_confirmed: bookings.count(|b| b.status == BookingStatus::Confirmed),
            bookings_rejected: bookings.count(|b| b.status == BookingStatus::Rejected),
            bookings_cancelled: bookings.count(|b| b.status == BookingStatus::Cancelled),
            bookings_completed: bookings.count(|b| b.status == BookingStatus::Completed),
            pending_promotion_requests: self
                .store
                .promotions
                .count(|r| r.status == PromotionStatus::Pending),
        })
    }
}
