use chrono::Utc;
use tracing::{info, warn};

use super::{Marketplace, users::require_admin};
use crate::error::{DomainResult, Error};
use crate::models::{ApprovalStatus, Booking, BookingStatus, NewBooking, User};

/// Which side of a booking the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Student,
    Owner,
    Admin,
}

impl Party {
    fn of(user: &User, booking: &Booking) -> Option<Self> {
        if user.is_admin() {
            Some(Party::Admin)
        } else if user.id == booking.owner_id {
            Some(Party::Owner)
        } else if user.id == booking.student_id {
            Some(Party::Student)
        } else {
            None
        }
    }

    fn may_set(self, from: BookingStatus, to: BookingStatus) -> bool {
        use BookingStatus::*;
        match self {
            Party::Admin => true,
            Party::Owner => matches!(
                (from, to),
                (Pending, Confirmed)
                    | (Pending, Rejected)
                    | (Confirmed, Cancelled)
                    | (Confirmed, Completed)
            ),
            Party::Student => to == Cancelled,
        }
    }
}

impl Marketplace {
    pub fn create_booking(&self, student: &User, new: NewBooking) -> DomainResult<Booking> {
        if !student.is_student() {
            return Err(Error::forbidden("only students can book properties"));
        }
        new.validate(Utc::now().date_naive())?;

        let property = self.store.properties.get(&new.property_id)?;
        if !property.is_listed() {
            if property.approval_status != ApprovalStatus::Approved {
                return Err(Error::not_found(format!("properties {}", property.id)));
            }
            return Err(Error::conflict("property is not available"));
        }

        let _guard = self.lock();
        let duplicate = self.store.bookings.find_one(|b| {
            b.student_id == student.id && b.property_id == property.id && b.status.is_active()
        });
        if duplicate.is_some() {
            return Err(Error::conflict(
                "you already have an active booking for this property",
            ));
        }

        let booking = Booking::new(&student.id, &property.owner_id, new);
        self.store.bookings.insert(booking.clone())?;
        info!(
            "{} requested booking {} for property {}",
            student.id, booking.id, booking.property_id
        );
        Ok(booking)
    }

    pub fn update_booking_status(
        &self,
        user: &User,
        booking_id: &str,
        status: BookingStatus,
    ) -> DomainResult<Booking> {
        self.store
            .bookings
            .update(booking_id, |b| -> DomainResult<Booking> {
                let party = Party::of(user, b)
                    .ok_or_else(|| Error::forbidden("not a party to this booking"))?;
                if !b.status.can_transition_to(status) {
                    return Err(Error::InvalidTransition {
                        from: b.status.to_string(),
                        to: status.to_string(),
                    });
                }
                if !party.may_set(b.status, status) {
                    warn!("{} may not move booking {} to {}", user.id, b.id, status);
                    return Err(Error::forbidden(format!(
                        "not allowed to mark this booking {}",
                        status
                    )));
                }
                info!("Booking {}: {} -> {}", b.id, b.status, status);
                b.status = status;
                b.updated_at = Utc::now();
                Ok(b.clone())
            })
    }

    pub fn student_bookings(&self, student: &User) -> Vec<Booking> {
        newest_first(self.store.bookings.find(|b| b.student_id == student.id))
    }

    pub fn owner_bookings(&self, owner: &User) -> Vec<Booking> {
        newest_first(self.store.bookings.find(|b| b.owner_id == owner.id))
    }

    /// Bookings the caller takes part in, on either side.
    pub fn my_bookings(&self, user: &User) -> Vec<Booking> {
        newest_first(
            self.store
                .bookings
                .find(|b| b.student_id == user.id || b.owner_id == user.id),
        )
    }

    pub fn all_bookings(&self, admin: &User) -> DomainResult<Vec<Booking>> {
        require_admin(admin)?;
        Ok(newest_first(self.store.bookings.all()))
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookings
}
