//! Privileged auth-admin operations.
//!
//! These calls need the service-role key. When it is not configured every
//! call fails with a capability error, which the user-directory fallback
//! chain translates into the degraded profiles-only listing.

use super::{Gateway, IdentityAdmin};
use crate::errors::{GatewayOperation, Result};
use crate::models::{AuthIdentity, BanDuration};
use crate::types::UserId;
use serde::Deserialize;

const IDENTITIES: &str = "identities";

#[derive(Debug, Deserialize)]
struct IdentityListing {
    users: Vec<AuthIdentity>,
}

#[async_trait::async_trait]
impl IdentityAdmin for Gateway {
    async fn list_identities(&self) -> Result<Vec<AuthIdentity>> {
        let key = self.service_role_key("list identities")?;
        let response = self
            .http()
            .get(self.endpoint("auth/v1/admin/users")?)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| Gateway::transport_error(IDENTITIES, e))?;
        let response = Gateway::check(response, GatewayOperation::Fetch, IDENTITIES).await?;
        let listing: IdentityListing = response.json().await.map_err(|e| Gateway::transport_error(IDENTITIES, e))?;
        Ok(listing.users)
    }

    async fn delete_identity(&self, id: UserId) -> Result<()> {
        let key = self.service_role_key("delete identity")?;
        let response = self
            .http()
            .delete(self.endpoint(&format!("auth/v1/admin/users/{id}"))?)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| Gateway::transport_error(IDENTITIES, e))?;
        Gateway::check(response, GatewayOperation::Delete, IDENTITIES).await?;
        Ok(())
    }

    async fn set_ban(&self, id: UserId, duration: BanDuration) -> Result<()> {
        let key = self.service_role_key("update ban status")?;
        let response = self
            .http()
            .put(self.endpoint(&format!("auth/v1/admin/users/{id}"))?)
            .header("apikey", key)
            .bearer_auth(key)
            .json(&serde_json::json!({ "ban_duration": duration.as_wire_str() }))
            .send()
            .await
            .map_err(|e| Gateway::transport_error(IDENTITIES, e))?;
        Gateway::check(response, GatewayOperation::Update, IDENTITIES).await?;
        Ok(())
    }
}
