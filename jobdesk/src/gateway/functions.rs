//! Remote function invocation.

use super::{FunctionInvoker, Gateway};
use crate::errors::{GatewayOperation, Result};

#[async_trait::async_trait]
impl FunctionInvoker for Gateway {
    async fn invoke(&self, name: &str, payload: &serde_json::Value) -> Result<()> {
        let response = self
            .http()
            .post(self.endpoint(&format!("functions/v1/{name}"))?)
            .header("apikey", self.api_key())
            .bearer_auth(self.api_key())
            .json(payload)
            .send()
            .await
            .map_err(|e| Gateway::transport_error(name.to_string(), e))?;
        Gateway::check(response, GatewayOperation::Invoke, name).await?;
        Ok(())
    }
}
