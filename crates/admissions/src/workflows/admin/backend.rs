use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::query::{ListQuery, PageEnvelope};
use crate::backend::{BackendClient, BackendError, ResponseBody};

/// Generic CRUD surface shared by every admin endpoint.
///
/// Rows travel as raw JSON so one backend can serve every resource type; the
/// collection view decodes them into its own row type.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn list(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Result<PageEnvelope<Value>, BackendError>;

    async fn create(&self, endpoint: &str, body: Value) -> Result<Value, BackendError>;

    async fn update(&self, endpoint: &str, id: &str, patch: Value) -> Result<Value, BackendError>;

    async fn delete(&self, endpoint: &str, id: &str) -> Result<(), BackendError>;
}

/// Read a mutation reply, honouring a `success: false` flag on a 2xx body.
fn mutation_result(response: ResponseBody) -> Result<Value, BackendError> {
    let body: Value = response.json_opt().unwrap_or(Value::Null);
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or("Request was not accepted")
            .to_string();
        return Err(BackendError::Rejected {
            status: response.status,
            message,
        });
    }
    Ok(body)
}

#[derive(Debug, Clone)]
pub struct HttpAdminBackend {
    client: BackendClient,
}

impl HttpAdminBackend {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdminBackend for HttpAdminBackend {
    async fn list(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Result<PageEnvelope<Value>, BackendError> {
        debug!(endpoint, page = query.page, "listing admin collection");
        let request = self
            .client
            .authorized(Method::GET, endpoint)
            .query(&query.to_pairs());
        self.client.execute(request).await?.json()
    }

    async fn create(&self, endpoint: &str, body: Value) -> Result<Value, BackendError> {
        let request = self.client.authorized(Method::POST, endpoint).json(&body);
        mutation_result(self.client.execute(request).await?)
    }

    async fn update(&self, endpoint: &str, id: &str, patch: Value) -> Result<Value, BackendError> {
        let url = self.client.item_url(endpoint, id)?;
        let request = self.client.authorized_url(Method::PATCH, url).json(&patch);
        mutation_result(self.client.execute(request).await?)
    }

    async fn delete(&self, endpoint: &str, id: &str) -> Result<(), BackendError> {
        let url = self.client.item_url(endpoint, id)?;
        let request = self.client.authorized_url(Method::DELETE, url);
        mutation_result(self.client.execute(request).await?)?;
        Ok(())
    }
}
