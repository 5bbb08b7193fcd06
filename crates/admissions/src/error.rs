use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admin::ExportError;
use crate::workflows::email::EmailError;
use crate::workflows::intake::{FieldParseError, SubmitBlocked};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Backend(BackendError),
    Email(EmailError),
    Export(ExportError),
    Field(FieldParseError),
    Submission(SubmitBlocked),
    /// Operator input that could not be interpreted, e.g. a malformed draft file.
    Invalid(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Backend(err) => write!(f, "backend error: {}", err),
            AppError::Email(err) => write!(f, "email error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Field(err) => write!(f, "invalid field: {}", err),
            AppError::Submission(err) => write!(f, "submission blocked: {}", err),
            AppError::Invalid(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Backend(err) => Some(err),
            AppError::Email(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Field(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Invalid(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Field(_) | AppError::Submission(_) | AppError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Email(EmailError::Invalid(_)) => StatusCode::BAD_REQUEST,
            AppError::Backend(err) | AppError::Email(EmailError::Backend(err)) => err
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<BackendError> for AppError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<EmailError> for AppError {
    fn from(value: EmailError) -> Self {
        Self::Email(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<FieldParseError> for AppError {
    fn from(value: FieldParseError) -> Self {
        Self::Field(value)
    }
}

impl From<SubmitBlocked> for AppError {
    fn from(value: SubmitBlocked) -> Self {
        Self::Submission(value)
    }
}
