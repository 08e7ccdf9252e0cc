use chrono::Utc;
use tracing::info;

use super::{Marketplace, users::require_admin};
use crate::error::{DomainResult, Error};
use crate::models::{
    AuditAction, AuditTarget, NewPromotionRequest, OwnerPromotionRequest, PromotionReview,
    PromotionStatus, Role, User,
};

impl Marketplace {
    /// A student asks to become a property owner.
    pub fn request_promotion(
        &self,
        user: &User,
        new: NewPromotionRequest,
    ) -> DomainResult<OwnerPromotionRequest> {
        if !user.is_student() {
            return Err(Error::forbidden("only students can request owner access"));
        }
        new.validate()?;

        let _guard = self.lock();
        let pending = self
            .store
            .promotions
            .find_one(|r| r.user_id == user.id && r.status == PromotionStatus::Pending);
        if pending.is_some() {
            return Err(Error::conflict("a request is already awaiting review"));
        }

        let request = OwnerPromotionRequest::new(&user.id, new);
        self.store.promotions.insert(request.clone())?;
        info!("{} requested owner access ({})", user.id, request.id);
        Ok(request)
    }

    pub fn my_promotion_requests(&self, user: &User) -> Vec<OwnerPromotionRequest> {
        let mut requests = self.store.promotions.find(|r| r.user_id == user.id);
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }

    /// Oldest first, so the queue reads in arrival order.
    pub fn promotion_requests(
        &self,
        admin: &User,
        status: Option<PromotionStatus>,
    ) -> DomainResult<Vec<OwnerPromotionRequest>> {
        require_admin(admin)?;
        let mut requests = self
            .store
            .promotions
            .find(|r| status.is_none_or(|s| r.status == s));
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    pub fn review_promotion(
        &self,
        admin: &User,
        request_id: &str,
        review: PromotionReview,
    ) -> DomainResult<OwnerPromotionRequest> {
        require_admin(admin)?;
        let note = review
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let request = self.store.promotions.update(
            request_id,
            |r| -> DomainResult<OwnerPromotionRequest> {
                if r.status != PromotionStatus::Pending {
                    return Err(Error::conflict(format!("request is already {}", r.status)));
                }
                let now = Utc::now();
                r.status = if review.approve {
                    PromotionStatus::Approved
                } else {
                    PromotionStatus::Rejected
                };
                r.reviewed_by = Some(admin.id.clone());
                r.reviewed_at = Some(now);
                r.review_note = note.clone();
                r.updated_at = now;
                Ok(r.clone())
            },
        )?;

        let action = if review.approve {
            self.store.users.update(&request.user_id, |u| -> DomainResult<()> {
                if u.role != Role::Admin {
                    u.role = Role::Owner;
                    u.updated_at = Utc::now();
                }
                Ok(())
            })?;
            AuditAction::PromotionApproved
        } else {
            AuditAction::PromotionRejected
        };
        self.record(
            admin,
            action,
            AuditTarget::PromotionRequest,
            request_id,
            note,
        )?;
        info!("{} {} promotion request {}", admin.id, request.status, request_id);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditQuery;
    use crate::services::test_support::{identity, user_with_role};
    use pretty_assertions::assert_eq;

    fn new_request() -> NewPromotionRequest {
        NewPromotionRequest {
            business_name: "Asha Stays".to_string(),
            phone: "+919876543210".to_string(),
            message: Some("Two PGs near Christ University".to_string()),
        }
    }

    #[test]
    fn test_one_pending_request() {
        let market = Marketplace::in_memory();
        let student = market.sync_user(&identity("asha")).unwrap();
        market.request_promotion(&student, new_request()).unwrap();
        assert!(matches!(
            market.request_promotion(&student, new_request()),
            Err(Error::Conflict(_))
        ));
        assert_eq!(market.my_promotion_requests(&student).len(), 1);
    }

    #[test]
    fn test_owners_cannot_request() {
        let market = Marketplace::in_memory();
        let owner = user_with_role(&market, "owner", Role::Owner);
        assert!(matches!(
            market.request_promotion(&owner, new_request()),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn test_approve_promotes_user() {
        let market = Marketplace::in_memory();
        let admin = user_with_role(&market, "root", Role::Admin);
        let student = market.sync_user(&identity("asha")).unwrap();
        let request = market.request_promotion(&student, new_request()).unwrap();

        let reviewed = market
            .review_promotion(
                &admin,
                &request.id,
                PromotionReview {
                    approve: true,
                    note: Some("verified by phone".to_string()),
                },
            )
            .unwrap();
        assert_eq!(reviewed.status, PromotionStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some(admin.id.as_str()));
        assert_eq!(market.get_user(&student.id).unwrap().role, Role::Owner);

        assert!(matches!(
            market.review_promotion(
                &admin,
                &request.id,
                PromotionReview {
                    approve: false,
                    note: None
                }
            ),
            Err(Error::Conflict(_))
        ));

        let logs = market.audit_logs(&admin, &AuditQuery::default()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, AuditAction::PromotionApproved);
        assert_eq!(logs[0].details.as_deref(), Some("verified by phone"));
    }

    #[test]
    fn test_reject_keeps_role() {
        let market = Marketplace::in_memory();
        let admin = user_with_role(&market, "root", Role::Admin);
        let student = market.sync_user(&identity("asha")).unwrap();
        let request = market.request_promotion(&student, new_request()).unwrap();

        market
            .review_promotion(
                &admin,
                &request.id,
                PromotionReview {
                    approve: false,
                    note: Some("  ".to_string()),
                },
            )
            .unwrap();
        assert_eq!(market.get_user(&student.id).unwrap().role, Role::Student);

        let pending = market
            .promotion_requests(&admin, Some(PromotionStatus::Pending))
            .unwrap();
        assert!(pending.is_empty());
        assert_eq!(market.promotion_requests(&admin, None).unwrap().len(), 1);

        // a rejected student may ask again
        assert!(market.request_promotion(&student, new_request()).is_ok());
    }
}
