use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::payload::IntakePayload;
use crate::backend::{BackendClient, BackendError};

pub const INTAKE_PATH: &str = "/api/apply";

/// Whatever the intake endpoint chose to echo back on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeReceipt {
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outbound hook for delivering a finished draft.
#[async_trait]
pub trait IntakeGateway: Send + Sync {
    async fn submit(&self, payload: IntakePayload) -> Result<IntakeReceipt, BackendError>;
}

/// Posts the draft as one multipart request to the intake endpoint.
#[derive(Debug, Clone)]
pub struct HttpIntakeGateway {
    client: BackendClient,
}

impl HttpIntakeGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntakeGateway for HttpIntakeGateway {
    async fn submit(&self, payload: IntakePayload) -> Result<IntakeReceipt, BackendError> {
        let files = payload.files.len();
        let request = self
            .client
            .request(Method::POST, INTAKE_PATH)
            .multipart(payload.into_form());

        let response = self.client.execute(request).await?;
        let receipt = response.json_opt::<IntakeReceipt>().unwrap_or_default();
        info!(
            files,
            application_id = receipt.application_id.as_deref().unwrap_or("-"),
            "intake payload accepted"
        );
        Ok(receipt)
    }
}
