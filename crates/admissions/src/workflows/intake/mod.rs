//! Applicant intake: the four-step wizard, its draft model, and the gateway that
//! delivers a finished draft to the intake endpoint as one multipart request.

pub mod domain;
pub mod fields;
pub mod gateway;
pub mod payload;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicHistory, ApplicationDraft, CampusChoice, DocumentSlot, Gender, IdentityDetails,
    Nationality, PersonalStatement, ProgramChoice, SupportingDocuments,
};
pub use fields::{DraftField, FieldParseError, FieldUpdate};
pub use gateway::{HttpIntakeGateway, IntakeGateway, IntakeReceipt, INTAKE_PATH};
pub use payload::IntakePayload;
pub use wizard::{
    DraftValidationError, IntakeWizard, SubmitBlocked, SubmitOutcome, TransitionError, WizardStep,
    SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE,
};
