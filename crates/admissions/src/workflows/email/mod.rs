//! Outbound email used by admin reply and notify screens.

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Method;
use tracing::info;

use crate::backend::{BackendClient, BackendError};
use crate::files::FileHandle;

pub const ADMIN_EMAIL_PATH: &str = "/api/admin/email";
pub const PUBLIC_EMAIL_PATH: &str = "/api/email/send";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    Html(String),
}

impl EmailBody {
    pub fn content(&self) -> &str {
        match self {
            EmailBody::Text(body) | EmailBody::Html(body) => body,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, EmailBody::Html(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: EmailBody,
    pub attachments: Vec<FileHandle>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: EmailBody) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            body,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, file: FileHandle) -> Self {
        self.attachments.push(file);
        self
    }

    pub fn validate(&self) -> Result<(), EmailValidationError> {
        if self.to.is_empty() {
            return Err(EmailValidationError::NoRecipients);
        }
        if let Some(bad) = self
            .to
            .iter()
            .find(|address| !crate::workflows::intake::fields::looks_like_email(address))
        {
            return Err(EmailValidationError::InvalidRecipient(bad.clone()));
        }
        if self.subject.trim().is_empty() {
            return Err(EmailValidationError::EmptySubject);
        }
        if self.body.content().trim().is_empty() {
            return Err(EmailValidationError::EmptyBody);
        }
        Ok(())
    }

    fn into_form(self) -> Form {
        let form = Form::new()
            .text("to", self.to.join(","))
            .text("subject", self.subject)
            .text("isHtml", self.body.is_html().to_string())
            .text("message", self.body.content().to_string());

        self.attachments
            .iter()
            .fold(form, |form, file| form.part("attachments", file.to_part()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    #[error("at least one recipient is required")]
    NoRecipients,
    #[error("'{0}' is not a valid email address")]
    InvalidRecipient(String),
    #[error("subject is required")]
    EmptySubject,
    #[error("message body is required")]
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error(transparent)]
    Invalid(#[from] EmailValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Which email-send endpoint a message goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailRoute {
    Admin,
    Public,
}

impl EmailRoute {
    pub const fn path(self) -> &'static str {
        match self {
            EmailRoute::Admin => ADMIN_EMAIL_PATH,
            EmailRoute::Public => PUBLIC_EMAIL_PATH,
        }
    }
}

#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

#[derive(Debug, Clone)]
pub struct HttpEmailGateway {
    client: BackendClient,
    route: EmailRoute,
}

impl HttpEmailGateway {
    pub fn new(client: BackendClient, route: EmailRoute) -> Self {
        Self { client, route }
    }
}

#[async_trait]
impl EmailGateway for HttpEmailGateway {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        message.validate()?;

        let recipients = message.to.len();
        let attachments = message.attachments.len();
        let request = match self.route {
            EmailRoute::Admin => self.client.authorized(Method::POST, self.route.path()),
            EmailRoute::Public => self.client.request(Method::POST, self.route.path()),
        }
        .multipart(message.into_form());

        self.client.execute(request).await?;
        info!(recipients, attachments, route = self.route.path(), "email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_checks_recipients_subject_and_body() {
        let message = EmailMessage::new("ada@example.edu", "Welcome", EmailBody::Text("Hi".into()));
        assert_eq!(message.validate(), Ok(()));

        let mut no_one = message.clone();
        no_one.to.clear();
        assert_eq!(no_one.validate(), Err(EmailValidationError::NoRecipients));

        let mut typo = message.clone();
        typo.to.push("grace.example.edu".to_string());
        assert_eq!(
            typo.validate(),
            Err(EmailValidationError::InvalidRecipient(
                "grace.example.edu".to_string()
            ))
        );

        let blank_subject = EmailMessage::new("ada@example.edu", " ", EmailBody::Text("Hi".into()));
        assert_eq!(
            blank_subject.validate(),
            Err(EmailValidationError::EmptySubject)
        );

        let blank_body =
            EmailMessage::new("ada@example.edu", "Welcome", EmailBody::Html("  ".into()));
        assert_eq!(blank_body.validate(), Err(EmailValidationError::EmptyBody));
    }

    #[tokio::test]
    async fn invalid_messages_are_rejected_before_any_request() {
        let client = BackendClient::new(&crate::config::BackendConfig::new(
            "http://127.0.0.1:9",
        ))
        .expect("client builds");
        let gateway = HttpEmailGateway::new(client, EmailRoute::Admin);
        let message = EmailMessage::new("not-an-address", "Hello", EmailBody::Text("Hi".into()));

        let result = gateway.send(message).await;

        assert!(matches!(
            result,
            Err(EmailError::Invalid(EmailValidationError::InvalidRecipient(_)))
        ));
    }
}
