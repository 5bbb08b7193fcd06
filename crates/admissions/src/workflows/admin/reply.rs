use serde_json::json;
use tracing::warn;

use super::backend::AdminBackend;
use super::collection::{RemoteCollection, ViewEvent};
use super::resource::{ContactMessage, ContactStatus};
use crate::workflows::email::{EmailBody, EmailError, EmailGateway, EmailMessage};
use crate::workflows::Notice;

/// Build the reply email for a contact message, quoting the original.
pub fn compose_reply(contact: &ContactMessage, reply: &str) -> EmailMessage {
    let subject = if contact.subject.to_ascii_lowercase().starts_with("re:") {
        contact.subject.clone()
    } else {
        format!("Re: {}", contact.subject)
    };

    let quoted = contact
        .message
        .lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "Dear {},\n\n{}\n\nOn {}, you wrote:\n{}",
        contact.name,
        reply.trim(),
        contact.created_at.format("%B %-d, %Y"),
        quoted
    );

    EmailMessage::new(contact.email.clone(), subject, EmailBody::Text(body))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Sent,
    UnknownContact,
    AlreadySending,
    EmailFailed(EmailError),
    /// The email route rejected the session; the view now holds the redirect.
    RedirectToSignIn(String),
    /// The email went out but marking the message replied did not succeed.
    StatusNotUpdated(ViewEvent),
}

/// Contact-message screen with its reply composer.
pub struct ContactInbox<B: ?Sized> {
    view: RemoteCollection<ContactMessage, B>,
    sending_email: bool,
}

impl<B> ContactInbox<B>
where
    B: AdminBackend + ?Sized,
{
    pub fn new(view: RemoteCollection<ContactMessage, B>) -> Self {
        Self {
            view,
            sending_email: false,
        }
    }

    pub fn view(&self) -> &RemoteCollection<ContactMessage, B> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RemoteCollection<ContactMessage, B> {
        &mut self.view
    }

    pub fn is_sending_email(&self) -> bool {
        self.sending_email
    }

    /// Email a reply, then mark the message replied and refetch.
    pub async fn reply<E>(&mut self, email: &E, contact_id: &str, reply: &str) -> ReplyOutcome
    where
        E: EmailGateway + ?Sized,
    {
        if self.sending_email {
            return ReplyOutcome::AlreadySending;
        }
        let Some(contact) = self.view.find(contact_id).cloned() else {
            return ReplyOutcome::UnknownContact;
        };

        self.sending_email = true;
        let sent = email.send(compose_reply(&contact, reply)).await;
        self.sending_email = false;

        if let Err(EmailError::Backend(error)) = &sent {
            if error.is_unauthorized() {
                let event = self.view.fail("send reply", error.clone());
                if let ViewEvent::RedirectToSignIn(route) = event {
                    return ReplyOutcome::RedirectToSignIn(route);
                }
            }
        }
        if let Err(error) = sent {
            warn!(contact_id, error = %error, "reply email failed");
            self.view
                .push_notice(Notice::error(format!("Failed to send reply: {error}")));
            return ReplyOutcome::EmailFailed(error);
        }

        self.view
            .push_notice(Notice::success(format!("Reply sent to {}", contact.email)));

        let status = json!({ "status": ContactStatus::Replied.label() });
        match self.view.update(contact_id, status).await {
            ViewEvent::Saved => ReplyOutcome::Sent,
            other => ReplyOutcome::StatusNotUpdated(other),
        }
    }
}
