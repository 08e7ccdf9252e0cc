use chrono::Utc;
use tracing::{info, warn};

use super::Marketplace;
use crate::error::{DomainResult, Error};
use crate::models::{
    AuditAction, AuditTarget, Identity, ProfileUpdate, Role, User, UserFilter, validate,
};

impl Marketplace {
    /// Find or create the account bound to `identity`.
    ///
    /// The email is refreshed from the provider; the display name is not,
    /// since users may edit it.
    pub fn sync_user(&self, identity: &Identity) -> DomainResult<User> {
        let _guard = self.lock();
        let users = &self.store.users;

        if let Some(existing) = users.find_one(|u| u.external_id == identity.subject) {
            if existing.email == identity.email {
                return Ok(existing);
            }
            return users.update(&existing.id, |u| -> DomainResult<User> {
                u.email = identity.email.clone();
                u.updated_at = Utc::now();
                Ok(u.clone())
            });
        }

        let mut user = User::from_identity(identity);
        if self.bootstrap_admins.contains(&identity.subject) {
            user.role = Role::Admin;
        }
        info!("Created {} account {} for {}", user.role, user.id, user.email);
        users.insert(user.clone())?;
        Ok(user)
    }

    /// Promote existing accounts listed as bootstrap admins.
    pub fn apply_bootstrap_admins(&self) -> DomainResult<usize> {
        let targets = self.store.users.find(|u| {
            u.role != Role::Admin && self.bootstrap_admins.contains(&u.external_id)
        });
        for user in &targets {
            self.store.users.update(&user.id, |u| -> DomainResult<()> {
                u.role = Role::Admin;
                u.updated_at = Utc::now();
                Ok(())
            })?;
            info!("Promoted bootstrap admin {}", user.email);
        }
        Ok(targets.len())
    }

    pub fn get_user(&self, user_id: &str) -> DomainResult<User> {
        Ok(self.store.users.get(user_id)?)
    }

    pub fn update_profile(&self, user: &User, update: ProfileUpdate) -> DomainResult<User> {
        update.validate()?;
        self.store.users.update(&user.id, |u| -> DomainResult<User> {
            if let Some(name) = update.name {
                u.name = name.trim().to_string();
            }
            if let Some(phone) = update.phone {
                u.phone = Some(phone.trim().to_string());
            }
            u.updated_at = Utc::now();
            Ok(u.clone())
        })
    }

    pub fn list_users(&self, admin: &User, filter: &UserFilter) -> DomainResult<Vec<User>> {
        require_admin(admin)?;
        let mut users = self.store.users.find(|u| filter.matches(u));
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    pub fn change_role(&self, admin: &User, user_id: &str, role: Role) -> DomainResult<User> {
        require_admin(admin)?;
        if admin.id == user_id {
            return Err(Error::forbidden("admins cannot change their own role"));
        }

        let (old, user) = self.store.users.update(user_id, |u| -> DomainResult<_> {
            let old = u.role;
            u.role = role;
            u.updated_at = Utc::now();
            Ok((old, u.clone()))
        })?;

        if old != role {
            self.record(
                admin,
                AuditAction::RoleChanged,
                AuditTarget::User,
                user_id,
                Some(format!("{} -> {}", old, role)),
            )?;
            info!("{} changed role of {} from {} to {}", admin.id, user_id, old, role);
        }
        Ok(user)
    }

    pub fn blacklist(&self, admin: &User, user_id: &str, reason: &str) -> DomainResult<User> {
        require_admin(admin)?;
        validate::non_empty("reason", reason)?;
        if admin.id == user_id {
            return Err(Error::forbidden("admins cannot blacklist themselves"));
        }

        let user = self.store.users.update(user_id, |u| -> DomainResult<User> {
            if u.is_admin() {
                return Err(Error::forbidden("admins cannot be blacklisted"));
            }
            if u.blacklisted {
                return Err(Error::conflict("user is already blacklisted"));
            }
            let now = Utc::now();
            u.blacklisted = true;
            u.blacklist_reason = Some(reason.trim().to_string());
            u.blacklisted_at = Some(now);
            u.updated_at = now;
            Ok(u.clone())
        })?;

        self.record(
            admin,
            AuditAction::UserBlacklisted,
            AuditTarget::User,
            user_id,
            Some(reason.trim().to_string()),
        )?;
        warn!("User {} blacklisted by {}", user_id, admin.id);
        Ok(user)
    }

    pub fn unblacklist(&self, admin: &User, user_id: &str) -> DomainResult<User> {
        require_admin(admin)?;
        let user = self.store.users.update(user_id, |u| -> DomainResult<User> {
            if !u.blacklisted {
                return Err(Error::conflict("user is not blacklisted"));
            }
            u.blacklisted = false;
            u.blacklist_reason = None;
            u.blacklisted_at = None;
            u.updated_at = Utc::now();
            Ok(u.clone())
        })?;

        self.record(
            admin,
            AuditAction::UserUnblacklisted,
            AuditTarget::User,
            user_id,
            None,
        )?;
        info!("User {} restored by {}", user_id, admin.id);
        Ok(user)
    }
}

pub(super) fn require_admin(user: &User) -> DomainResult<()> {
    if !user.is_admin() {
        return Err(Error::forbidden("admin role required"));
    }
    Ok(())
}
