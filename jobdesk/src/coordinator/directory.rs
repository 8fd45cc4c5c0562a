//! User listing as an ordered chain of capability providers.
//!
//! Three tiers, tried in order until one succeeds:
//!
//! 1. [`AdminDirectory`] - privileged auth-admin listing merged with profiles
//! 2. [`ProfileDirectory`] - the profiles collection alone
//! 3. [`SelfDirectory`] - a single record for the authenticated caller
//!
//! Each downgrade trades completeness for availability: the users view is
//! populated from whichever tier answered, and the caller is told which one.

use super::AdminContext;
use crate::errors::Result;
use crate::gateway::IdentityAdmin;
use crate::models::{AccountStatus, Profile, Role, UserAccount};
use std::collections::HashMap;
use std::sync::Arc;

use super::ProfilesCollection;

/// A source able to produce the user listing.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Short label identifying the tier, for logs and the degraded-view notice.
    fn tier(&self) -> &'static str;

    async fn list_users(&self) -> Result<Vec<UserAccount>>;
}

/// Full listing through the privileged auth-admin API, merged with profile
/// rows by identity. Profile fields take precedence where present.
pub struct AdminDirectory {
    identity_admin: Arc<dyn IdentityAdmin>,
    profiles: ProfilesCollection,
}

impl AdminDirectory {
    pub fn new(identity_admin: Arc<dyn IdentityAdmin>, profiles: ProfilesCollection) -> Self {
        Self { identity_admin, profiles }
    }
}

#[async_trait::async_trait]
impl UserDirectory for AdminDirectory {
    fn tier(&self) -> &'static str {
        "admin"
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let identities = self.identity_admin.list_identities().await?;
        // A profile fetch failure degrades the merge, not the whole tier.
        let profiles = match self.profiles.list().await {
            Ok(profiles) => profiles,
            Err(error) => {
                tracing::warn!(%error, "profiles unavailable, listing identities without profile data");
                Vec::new()
            }
        };
        let by_id: HashMap<_, _> = profiles.iter().map(|p| (p.id, p)).collect();
        Ok(identities
            .iter()
            .map(|auth| UserAccount::merge(auth, by_id.get(&auth.id).copied()))
            .collect())
    }
}

/// Degraded listing from the profiles collection alone. Sign-in activity is
/// unknown at this tier.
pub struct ProfileDirectory {
    profiles: ProfilesCollection,
}

impl ProfileDirectory {
    pub fn new(profiles: ProfilesCollection) -> Self {
        Self { profiles }
    }
}

#[async_trait::async_trait]
impl UserDirectory for ProfileDirectory {
    fn tier(&self) -> &'static str {
        "profiles"
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let now = chrono::Utc::now();
        let profiles = self.profiles.list().await?;
        Ok(profiles.iter().map(|p: &Profile| UserAccount::from_profile(p, now)).collect())
    }
}

/// Last resort: a single synthetic record for the authenticated caller, so the
/// users view is never empty while the gateway itself is reachable.
pub struct SelfDirectory {
    admin: AdminContext,
}

impl SelfDirectory {
    pub fn new(admin: AdminContext) -> Self {
        Self { admin }
    }
}

#[async_trait::async_trait]
impl UserDirectory for SelfDirectory {
    fn tier(&self) -> &'static str {
        "self"
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        Ok(vec![UserAccount {
            id: self.admin.id,
            email: self.admin.email.clone(),
            full_name: self.admin.full_name.clone(),
            role: Role::Admin,
            status: AccountStatus::Active,
            created_at: chrono::Utc::now(),
            last_sign_in_at: None,
        }])
    }
}

/// Try each directory in order, returning the first successful listing and
/// the tier that produced it. Failures short of the last tier are logged and
/// skipped; the last tier's error is the chain's error.
pub async fn list_with_fallback(directories: &[Arc<dyn UserDirectory>]) -> Result<(Vec<UserAccount>, &'static str)> {
    let mut last_error = None;
    for directory in directories {
        match directory.list_users().await {
            Ok(users) => return Ok((users, directory.tier())),
            Err(error) => {
                tracing::warn!(tier = directory.tier(), %error, "user directory tier failed, trying next");
                last_error = Some(error);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| crate::errors::Error::Other(anyhow::anyhow!("no user directory configured"))))
}
