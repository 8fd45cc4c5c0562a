//! Generic PostgREST-style collection handle.
//!
//! Every collection call is a single request/response round trip. Inserts and
//! updates set `Prefer: return=representation` so the authoritative row comes
//! back with the response and can be handed to the caller for reconciliation.

use super::{Collection, Gateway};
use crate::errors::{Error, GatewayOperation, Result};
use crate::types::CollectionKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use uuid::Uuid;

pub struct RestCollection<R, C, U> {
    gateway: Gateway,
    kind: CollectionKind,
    select: &'static str,
    order: &'static str,
    _types: PhantomData<fn() -> (R, C, U)>,
}

impl<R, C, U> RestCollection<R, C, U> {
    pub(crate) fn new(gateway: Gateway, kind: CollectionKind, select: &'static str, order: &'static str) -> Self {
        Self {
            gateway,
            kind,
            select,
            order,
            _types: PhantomData,
        }
    }

    fn url(&self) -> Result<url::Url> {
        self.gateway.endpoint(&format!("rest/v1/{}", self.kind))
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.gateway.api_key())
            .bearer_auth(self.gateway.api_key())
    }
}

#[async_trait::async_trait]
impl<R, C, U> Collection for RestCollection<R, C, U>
where
    R: DeserializeOwned + Send + Sync,
    C: Serialize + Send + Sync,
    U: Serialize + Send + Sync,
{
    type Record = R;
    type CreateRequest = C;
    type UpdateRequest = U;

    fn kind(&self) -> CollectionKind {
        self.kind
    }

    async fn list(&self) -> Result<Vec<R>> {
        let request = self
            .authed(self.gateway.http().get(self.url()?))
            .query(&[("select", self.select), ("order", self.order)]);
        let response = request
            .send()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        let response = Gateway::check(response, GatewayOperation::Fetch, self.kind.as_str()).await?;
        response
            .json::<Vec<R>>()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))
    }

    async fn insert(&self, create: &C) -> Result<R> {
        let request = self
            .authed(self.gateway.http().post(self.url()?))
            .header("Prefer", "return=representation")
            .query(&[("select", self.select)])
            .json(create);
        let response = request
            .send()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        let response = Gateway::check(response, GatewayOperation::Create, self.kind.as_str()).await?;
        // Representation responses are arrays, one row per inserted record
        let mut rows: Vec<R> = response
            .json()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        rows.pop().ok_or_else(|| {
            Error::gateway(GatewayOperation::Create, self.kind, "empty representation returned")
        })
    }

    async fn update(&self, id: Uuid, update: &U) -> Result<R> {
        let request = self
            .authed(self.gateway.http().patch(self.url()?))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}").as_str()), ("select", self.select)])
            .json(update);
        let response = request
            .send()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        let response = Gateway::check(response, GatewayOperation::Update, self.kind.as_str()).await?;
        let mut rows: Vec<R> = response
            .json()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        rows.pop().ok_or_else(|| Error::NotFound {
            resource: self.kind.as_str().to_string(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let request = self
            .authed(self.gateway.http().delete(self.url()?))
            .query(&[("id", format!("eq.{id}"))]);
        let response = request
            .send()
            .await
            .map_err(|e| Gateway::transport_error(self.kind.as_str(), e))?;
        Gateway::check(response, GatewayOperation::Delete, self.kind.as_str()).await?;
        Ok(())
    }
}
