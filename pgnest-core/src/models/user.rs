use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{new_id, validate};
use crate::error::ValidationError;
use crate::store::Document;

/// Account role. Everyone starts out as a student.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Owner,
    Admin,
}

/// Who the identity provider says is calling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Stable subject id issued by the identity provider
    pub subject: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    /// Identity-provider subject this account is bound to
    pub external_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub blacklisted: bool,
    #[serde(default)]
    pub blacklist_reason: Option<String>,
    #[serde(default)]
    pub blacklisted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn from_identity(identity: &Identity) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            external_id: identity.subject.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            phone: None,
            role: Role::Student,
            blacklisted: false,
            blacklist_reason: None,
            blacklisted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Owners and admins may list properties.
    pub fn can_list_properties(&self) -> bool {
        matches!(self.role, Role::Owner | Role::Admin)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate::non_empty("name", name)?;
            validate::max_len("name", name, 100)?;
        }
        if let Some(phone) = &self.phone {
            validate::phone("phone", phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub blacklisted: Option<bool>,
    /// Case-insensitive match on name or email
    pub q: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.role.is_some_and(|role| role != user.role) {
            return false;
        }
        if self.blacklisted.is_some_and(|b| b != user.blacklisted) {
            return false;
        }
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                user.name.to_lowercase().contains(&q) || user.email.to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlacklistRequest {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn identity() -> Identity {
        Identity {
            subject: "idp|123".to_string(),
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
        }
    }

    #[test]
    fn test_role_strings() {
        assert_eq!(Role::Owner.to_string(), "owner");
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    }

    #[test]
    fn test_from_identity_defaults_to_student() {
        let user = User::from_identity(&identity());
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.external_id, "idp|123");
        assert!(!user.blacklisted);
        assert!(!user.can_list_properties());
    }

    #[test]
    fn test_filter() {
        let mut user = User::from_identity(&identity());
        assert!(UserFilter::default().matches(&user));
        let by_q = UserFilter {
            q: Some("ASHA@".to_string()),
            ..Default::default()
        };
        assert!(by_q.matches(&user));
        user.blacklisted = true;
        let active = UserFilter {
            blacklisted: Some(false),
            ..Default::default()
        };
        assert!(!active.matches(&user));
        let owners = UserFilter {
            role: Some(Role::Owner),
            ..Default::default()
        };
        assert!(!owners.matches(&user));
    }

    #[test]
    fn test_profile_update_validation() {
        let ok = ProfileUpdate {
            name: Some("Asha K".to_string()),
            phone: Some("9876543210".to_string()),
        };
        assert!(ok.validate().is_ok());
        let bad = ProfileUpdate {
            name: Some(" ".to_string()),
            phone: None,
        };
        assert_eq!(bad.validate().unwrap_err().field, "name");
    }
}
