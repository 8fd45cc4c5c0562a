//! Client for the managed backend ("the gateway").
//!
//! The gateway exposes four surfaces, all consumed as plain request/response
//! calls with no retries, backoff, or caller-side timeouts:
//!
//! - collection endpoints under `/rest/v1` ([`rest`])
//! - the privileged auth-admin API under `/auth/v1/admin` ([`admin`])
//! - object storage under `/storage/v1` ([`storage`])
//! - invocable functions under `/functions/v1` ([`functions`])
//!
//! Each surface is reached through a trait seam so the mutation coordinator
//! can be exercised against in-memory fakes. [`Collection`] generalizes
//! list/insert/update/delete over a remote collection; [`IdentityAdmin`],
//! [`ObjectStore`] and [`FunctionInvoker`] cover the other three surfaces.

pub mod admin;
pub mod functions;
pub mod rest;
pub mod storage;

use crate::config::GatewayConfig;
use crate::errors::{Error, GatewayOperation, Result};
use crate::models::{
    Application, ApplicationMessage, ApplicationStatusUpdate, AuthIdentity, BanDuration, Job, JobCreate, JobUpdate,
    MessageCreate, MessageReadUpdate, Profile,
};
use crate::models::users::ProfileUpdate;
use crate::types::{CollectionKind, UserId};
use bon::bon;
use bytes::Bytes;
use reqwest::Response;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

pub use rest::RestCollection;

/// A remote record collection supporting the four pass-through operations the
/// dashboard needs. Inserts and updates request the stored representation
/// back, so callers can reconcile optimistic patches against authoritative
/// rows.
#[async_trait::async_trait]
pub trait Collection: Send + Sync {
    type Record: Send;
    type CreateRequest: Send + Sync;
    type UpdateRequest: Send + Sync;

    /// Which of the four snapshots this collection owns.
    fn kind(&self) -> CollectionKind;

    /// Full collection read, newest records first.
    async fn list(&self) -> Result<Vec<Self::Record>>;

    async fn insert(&self, request: &Self::CreateRequest) -> Result<Self::Record>;

    async fn update(&self, id: Uuid, request: &Self::UpdateRequest) -> Result<Self::Record>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Privileged identity operations. Only available when a service-role key is
/// configured; every call fails with [`Error::MissingCapability`] otherwise.
#[async_trait::async_trait]
pub trait IdentityAdmin: Send + Sync {
    async fn list_identities(&self) -> Result<Vec<AuthIdentity>>;

    async fn delete_identity(&self, id: UserId) -> Result<()>;

    async fn set_ban(&self, id: UserId, duration: BanDuration) -> Result<()>;
}

/// Binary upload into a named bucket, returning the public reference URL.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String>;
}

/// Fire a named remote function with a JSON payload.
#[async_trait::async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(&self, name: &str, payload: &serde_json::Value) -> Result<()>;
}

struct GatewayInner {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    service_role_key: Option<String>,
}

/// Handle on the managed backend. Cheap to clone; all typed surface handles
/// borrow the same underlying HTTP client.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

#[bon]
impl Gateway {
    #[builder]
    pub fn new(base_url: Url, api_key: String, service_role_key: Option<String>) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                http: reqwest::Client::new(),
                base_url,
                api_key,
                service_role_key,
            }),
        }
    }
}

impl Gateway {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Gateway::builder()
            .base_url(config.base_url.clone())
            .api_key(config.api_key.clone())
            .maybe_service_role_key(config.service_role_key.clone())
            .build()
    }

    /// Typed handle on the `jobs` collection.
    pub fn jobs(&self) -> RestCollection<Job, JobCreate, JobUpdate> {
        RestCollection::new(self.clone(), CollectionKind::Jobs, "*", "created_at.desc")
    }

    /// Typed handle on `applications`, with the referenced job embedded.
    pub fn applications(&self) -> RestCollection<Application, serde_json::Value, ApplicationStatusUpdate> {
        RestCollection::new(
            self.clone(),
            CollectionKind::Applications,
            "*,job:jobs(id,title)",
            "created_at.desc",
        )
    }

    /// Typed handle on the `profiles` collection.
    pub fn profiles(&self) -> RestCollection<Profile, Profile, ProfileUpdate> {
        RestCollection::new(self.clone(), CollectionKind::Profiles, "*", "created_at.desc")
    }

    /// Typed handle on `application_messages`.
    pub fn messages(&self) -> RestCollection<ApplicationMessage, MessageCreate, MessageReadUpdate> {
        RestCollection::new(self.clone(), CollectionKind::Messages, "*", "created_at.desc")
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    /// Service-role key, or the capability error the fallback chain reacts to.
    pub(crate) fn service_role_key(&self, operation: &str) -> Result<&str> {
        self.inner.service_role_key.as_deref().ok_or_else(|| Error::MissingCapability {
            operation: operation.to_string(),
        })
    }

    /// Join a path onto the gateway base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| Error::Other(anyhow::anyhow!("invalid gateway path {path}: {e}")))
    }

    /// Map a transport-level failure on `collection` to a crate error.
    pub(crate) fn transport_error(collection: impl Into<String>, source: reqwest::Error) -> Error {
        Error::Transport {
            collection: collection.into(),
            source,
        }
    }

    /// Turn a non-success response into a gateway error, capturing a bounded
    /// slice of the body for the logs.
    pub(crate) async fn check(response: Response, operation: GatewayOperation, collection: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        body.truncate(300);
        tracing::warn!(%status, %operation, collection, body, "gateway call failed");
        Err(Error::Gateway {
            operation,
            collection: collection.to_string(),
            message: format!("{status}: {body}"),
        })
    }
}
