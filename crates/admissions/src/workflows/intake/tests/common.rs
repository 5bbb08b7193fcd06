use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::backend::BackendError;
use crate::files::FileHandle;
use crate::workflows::intake::domain::{
    CampusChoice, DocumentSlot, Gender, Nationality, ProgramChoice,
};
use crate::workflows::intake::fields::FieldUpdate;
use crate::workflows::intake::gateway::{IntakeGateway, IntakeReceipt};
use crate::workflows::intake::payload::IntakePayload;
use crate::workflows::intake::wizard::IntakeWizard;

/// Gateway double that records every payload and answers with a canned result.
pub(super) struct RecordingGateway {
    response: Result<IntakeReceipt, BackendError>,
    payloads: Mutex<Vec<IntakePayload>>,
}

impl RecordingGateway {
    pub(super) fn accepting() -> Self {
        Self::answering(Ok(IntakeReceipt {
            application_id: Some("app-000001".to_string()),
            message: None,
        }))
    }

    pub(super) fn answering(response: Result<IntakeReceipt, BackendError>) -> Self {
        Self {
            response,
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.payloads.lock().expect("payload mutex poisoned").len()
    }

    pub(super) fn last_payload(&self) -> Option<IntakePayload> {
        self.payloads
            .lock()
            .expect("payload mutex poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl IntakeGateway for RecordingGateway {
    async fn submit(&self, payload: IntakePayload) -> Result<IntakeReceipt, BackendError> {
        self.payloads
            .lock()
            .expect("payload mutex poisoned")
            .push(payload);
        self.response.clone()
    }
}

pub(super) fn pdf(name: &str) -> FileHandle {
    FileHandle::new(name, mime::APPLICATION_PDF, format!("%PDF {name}").into_bytes())
}

pub(super) fn fill_identity(wizard: &mut IntakeWizard) {
    wizard.update_field(FieldUpdate::FirstName("Ada".to_string()));
    wizard.update_field(FieldUpdate::LastName("Lovelace".to_string()));
    wizard.update_field(FieldUpdate::Email("ada@example.edu".to_string()));
    wizard.update_field(FieldUpdate::Phone("+1 555 0100".to_string()));
    wizard.update_field(FieldUpdate::DateOfBirth(NaiveDate::from_ymd_opt(2006, 4, 12)));
    wizard.update_field(FieldUpdate::Nationality(Some(Nationality::International)));
    wizard.update_field(FieldUpdate::Gender(Some(Gender::Female)));
}

pub(super) fn fill_academic(wizard: &mut IntakeWizard) {
    wizard.update_field(FieldUpdate::PreviousEducation(
        "Riverside High School".to_string(),
    ));
    wizard.update_field(FieldUpdate::Gpa("3.8".to_string()));
    wizard.update_field(FieldUpdate::GraduationYear(Some(2024)));
    wizard.update_field(FieldUpdate::ProgramChoice(Some(
        ProgramChoice::ComputerScience,
    )));
    wizard.update_field(FieldUpdate::CampusChoice(Some(CampusChoice::Main)));
}

pub(super) fn fill_documents(wizard: &mut IntakeWizard) {
    wizard.attach_file(DocumentSlot::Transcript, pdf("transcript.pdf"));
    wizard.attach_file(DocumentSlot::Recommendation, pdf("recommendation.pdf"));
    wizard.update_field(FieldUpdate::PersonalStatement(
        "I want to build analytical engines.".to_string(),
    ));
}

/// Wizard with every step filled, consent given, sitting on the review step.
pub(super) fn ready_wizard() -> IntakeWizard {
    let mut wizard = IntakeWizard::new();
    fill_identity(&mut wizard);
    wizard.next().expect("to academic");
    fill_academic(&mut wizard);
    wizard.next().expect("to documents");
    fill_documents(&mut wizard);
    wizard.next().expect("to review");
    wizard.set_consent(true);
    wizard
}
