//! User accounts merged from the auth-admin listing and the profiles collection.

use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Banned,
}

/// Free-form metadata the auth service stores alongside an identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// An identity as returned by the privileged auth-admin listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: AuthMetadata,
    /// Set while a ban is in effect
    #[serde(default)]
    pub banned_until: Option<DateTime<Utc>>,
}

/// A row of the `profiles` collection. All fields besides the id are optional:
/// profiles are created lazily and may lag behind the auth identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial profile update (role or display name changes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Ban setting applied through the auth-admin API. The dashboard only ever
/// sets a permanent ban or lifts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanDuration {
    None,
    Permanent,
}

impl BanDuration {
    /// Wire value for the auth-admin update call. The auth service has no
    /// literal "forever", so permanent bans use a 100-year duration.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            BanDuration::None => "none",
            BanDuration::Permanent => "876000h",
        }
    }
}

/// The merged user record the dashboard displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Merge an auth identity with its profile row. Profile fields take
    /// precedence over auth metadata when present.
    pub fn merge(auth: &AuthIdentity, profile: Option<&Profile>) -> Self {
        let email = profile
            .and_then(|p| p.email.clone())
            .or_else(|| auth.email.clone())
            .unwrap_or_default();
        let full_name = profile
            .and_then(|p| p.full_name.clone())
            .or_else(|| auth.user_metadata.full_name.clone());
        let role = profile
            .and_then(|p| p.role)
            .or(auth.user_metadata.role)
            .unwrap_or(Role::User);
        let status = profile.and_then(|p| p.status).unwrap_or(if auth.banned_until.is_some() {
            AccountStatus::Banned
        } else {
            AccountStatus::Active
        });
        Self {
            id: auth.id,
            email,
            full_name,
            role,
            status,
            created_at: auth.created_at,
            last_sign_in_at: auth.last_sign_in_at,
        }
    }

    /// Build an account from a profile row alone (the degraded listing tier,
    /// used when the privileged auth-admin call is unavailable).
    pub fn from_profile(profile: &Profile, fallback_created_at: DateTime<Utc>) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone().unwrap_or_default(),
            full_name: profile.full_name.clone(),
            role: profile.role.unwrap_or(Role::User),
            status: profile.status.unwrap_or(AccountStatus::Active),
            created_at: profile.created_at.unwrap_or(fallback_created_at),
            last_sign_in_at: None,
        }
    }

    /// Whether the account signed in within the trailing 30-day window ending
    /// at `now`.
    pub fn is_recently_active(&self, now: DateTime<Utc>) -> bool {
        match self.last_sign_in_at {
            Some(at) => now.signed_duration_since(at) <= chrono::Duration::days(30),
            None => false,
        }
    }
}
