use chrono::Utc;
use tracing::info;

use super::{Marketplace, users::require_admin};
use crate::error::{DomainResult, Error, ValidationError};
use crate::models::{
    ApprovalStatus, AuditAction, AuditTarget, BookingStatus, NewProperty, Page, Property,
    PropertyQuery, PropertyUpdate, ReviewDecision, SortOrder, User, validate,
};

impl Marketplace {
    /// List a new property. Owners' listings wait for review; admins' go live.
    pub fn create_property(&self, user: &User, new: NewProperty) -> DomainResult<Property> {
        if !user.can_list_properties() {
            return Err(Error::forbidden("only owners can list properties"));
        }
        new.validate()?;

        let mut property = Property::new(&user.id, new);
        if user.is_admin() {
            property.approval_status = ApprovalStatus::Approved;
        }
        self.store.properties.insert(property.clone())?;
        info!(
            "{} listed property {} ({})",
            user.id, property.id, property.approval_status
        );
        Ok(property)
    }

    pub fn update_property(
        &self,
        user: &User,
        property_id: &str,
        update: PropertyUpdate,
    ) -> DomainResult<Property> {
        update.validate()?;
        self.store
            .properties
            .update(property_id, |p| -> DomainResult<Property> {
                ensure_can_manage(user, p)?;
                let content_edit = update.is_content_edit();
                update.apply(p);
                if content_edit && !user.is_admin() && p.approval_status != ApprovalStatus::Pending
                {
                    p.approval_status = ApprovalStatus::Pending;
                    p.rejection_reason = None;
                }
                Ok(p.clone())
            })
    }

    /// Remove a listing and cancel the bookings that still hold a place in it.
    pub fn delete_property(&self, user: &User, property_id: &str) -> DomainResult<Property> {
        let property = self.store.properties.get(property_id)?;
        ensure_can_manage(user, &property)?;
        let property = self.store.properties.remove(property_id)?;

        let active = self
            .store
            .bookings
            .find(|b| b.property_id == property_id && b.status.is_active());
        for booking in &active {
            self.store.bookings.update(&booking.id, |b| -> DomainResult<()> {
                b.status = BookingStatus::Cancelled;
                b.updated_at = Utc::now();
                Ok(())
            })?;
        }

        if user.is_admin() {
            self.record(
                user,
                AuditAction::PropertyDeleted,
                AuditTarget::Property,
                property_id,
                Some(property.title.clone()),
            )?;
        }
        info!(
            "{} deleted property {} ({} bookings cancelled)",
            user.id,
            property_id,
            active.len()
        );
        Ok(property)
    }

    /// Approved listings are public; anything else only to its owner and admins.
    pub fn get_property(&self, viewer: Option<&User>, property_id: &str) -> DomainResult<Property> {
        let property = self.store.properties.get(property_id)?;
        if property.approval_status == ApprovalStatus::Approved {
            return Ok(property);
        }
        match viewer {
            Some(user) if user.is_admin() || user.id == property.owner_id => Ok(property),
            _ => Err(Error::not_found(format!("properties {}", property_id))),
        }
    }

    /// Search live listings.
    pub fn search_properties(&self, query: &PropertyQuery) -> DomainResult<Page<Property>> {
        let amenities = query.amenity_list()?;
        if let (Some(min), Some(max)) = (query.min_rent, query.max_rent) {
            if min > max {
                return Err(ValidationError::new("min_rent", "must not exceed max_rent").into());
            }
        }

        let mut matches = self
            .store
            .properties
            .find(|p| p.is_listed() && query.matches(p, &amenities));
        sort_properties(&mut matches, query.sort.unwrap_or_default());

        let per_page = self.search.per_page(query.per_page);
        Ok(Page::paginate(matches, query.page.unwrap_or(1), per_page))
    }

    pub fn owner_properties(&self, owner: &User) -> Vec<Property> {
        let mut properties = self.store.properties.find(|p| p.owner_id == owner.id);
        sort_properties(&mut properties, SortOrder::Newest);
        properties
    }

    /// Review queue, oldest first.
    pub fn properties_by_status(
        &self,
        admin: &User,
        status: Option<ApprovalStatus>,
    ) -> DomainResult<Vec<Property>> {
        require_admin(admin)?;
        let mut properties = self
            .store
            .properties
            .find(|p| status.is_none_or(|s| p.approval_status == s));
        properties.sort_by_key(|p| p.created_at);
        Ok(properties)
    }

    pub fn review_property(
        &self,
        admin: &User,
        property_id: &str,
        decision: ReviewDecision,
    ) -> DomainResult<Property> {
        require_admin(admin)?;
        if let ReviewDecision::Reject { reason } = &decision {
            validate::non_empty("reason", reason)?;
        }

        let property = self
            .store
            .properties
            .update(property_id, |p| -> DomainResult<Property> {
                match &decision {
                    ReviewDecision::Approve => {
                        p.approval_status = ApprovalStatus::Approved;
                        p.rejection_reason = None;
                    }
                    ReviewDecision::Reject { reason } => {
                        p.approval_status = ApprovalStatus::Rejected;
                        p.rejection_reason = Some(reason.trim().to_string());
                    }
                }
                p.updated_at = Utc::now();
                Ok(p.clone())
            })?;

        let (action, details) = match decision {
            ReviewDecision::Approve => (AuditAction::PropertyApproved, None),
            ReviewDecision::Reject { reason } => {
                (AuditAction::PropertyRejected, Some(reason.trim().to_string()))
            }
        };
        self.record(admin, action, AuditTarget::Property, property_id, details)?;
        info!("{} marked property {} {}", admin.id, property_id, property.approval_status);
        Ok(property)
    }
}

/// Admins, or the listing's owner while they still hold the owner role.
fn ensure_can_manage(user: &User, property: &Property) -> DomainResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    if user.id != property.owner_id {
        return Err(Error::forbidden("not the owner of this property"));
    }
    if !user.can_list_properties() {
        return Err(Error::forbidden("owner role required"));
    }
    Ok(())
}

fn sort_properties(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::Newest => properties.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::RentAsc => properties.sort_by(|a, b| {
            a.rent
                .cmp(&b.rent)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortOrder::RentDesc => properties.sort_by(|a, b| {
            b.rent
                .cmp(&a.rent)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}
