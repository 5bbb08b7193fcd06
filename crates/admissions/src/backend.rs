//! Thin HTTP client shared by the intake, admin, and email gateways.
//!
//! Every response is read to completion and classified into the portal's error
//! taxonomy: transport failures, structured rejections (`{ "error": ... }`),
//! unstructured non-2xx bodies, and 401s, which admin screens treat as a
//! sign-in redirect rather than a failure.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::BackendConfig;

/// Error raised by any call against the portal backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("authentication required")]
    Unauthorized,
    #[error("unexpected response payload: {0}")]
    Decode(String),
    #[error("unable to build http client: {0}")]
    Client(String),
    #[error("invalid backend url: {0}")]
    Url(String),
}

impl BackendError {
    /// Message supplied by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Rejected { status, .. } | BackendError::Status { status, .. } => {
                Some(*status)
            }
            BackendError::Unauthorized => Some(StatusCode::UNAUTHORIZED.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Map a non-2xx response onto the error taxonomy.
pub fn classify_failure(status: u16, body: &str) -> BackendError {
    if status == StatusCode::UNAUTHORIZED.as_u16() {
        return BackendError::Unauthorized;
    }

    let message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"].iter().find_map(|key| {
            value
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        })
    });

    match message {
        Some(message) => BackendError::Rejected { status, message },
        None => BackendError::Status {
            status,
            body: body.chars().take(512).collect(),
        },
    }
}

/// A fully read 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub status: u16,
    pub text: String,
}

impl ResponseBody {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        serde_json::from_str(&self.text).map_err(|err| BackendError::Decode(err.to_string()))
    }

    /// Decode the body if present; empty or non-JSON success bodies yield `None`.
    pub fn json_opt<T: DeserializeOwned>(&self) -> Option<T> {
        if self.text.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.text).ok()
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| BackendError::Client(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_token: config.admin_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Unauthenticated request, used by the public intake and email routes.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// URL of one record under a collection path; the id is a single encoded segment.
    pub fn item_url(&self, path: &str, id: &str) -> Result<Url, BackendError> {
        let mut url =
            Url::parse(&self.url(path)).map_err(|err| BackendError::Url(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Url(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Request carrying the admin bearer token when one is configured.
    pub fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        self.with_token(self.request(method, path))
    }

    pub fn authorized_url(&self, method: Method, url: Url) -> RequestBuilder {
        self.with_token(self.http.request(method, url))
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn execute(&self, request: RequestBuilder) -> Result<ResponseBody, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "backend response");

        if status.is_success() {
            Ok(ResponseBody {
                status: status.as_u16(),
                text,
            })
        } else {
            Err(classify_failure(status.as_u16(), &text))
        }
    }
}
