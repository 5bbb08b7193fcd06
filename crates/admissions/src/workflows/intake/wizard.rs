use std::fmt;

use tracing::{info, warn};

use super::domain::{ApplicationDraft, DocumentSlot};
use super::fields::{looks_like_email, DraftField, FieldUpdate};
use super::gateway::{IntakeGateway, IntakeReceipt};
use super::payload::IntakePayload;
use crate::backend::BackendError;
use crate::files::FileHandle;
use crate::workflows::Notice;

pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Application submitted successfully! We will be in touch soon.";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit application. Please try again.";

/// The four ordered wizard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Identity,
    Academic,
    Documents,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Identity,
        WizardStep::Academic,
        WizardStep::Documents,
        WizardStep::Review,
    ];

    /// 1-based position shown in the step counter.
    pub const fn index(self) -> u8 {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Academic => 2,
            WizardStep::Documents => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.index() == index)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Personal Information",
            WizardStep::Academic => "Academic Background",
            WizardStep::Documents => "Documents & Statement",
            WizardStep::Review => "Review & Submit",
        }
    }

    /// Inputs carrying the required attribute on this screen.
    pub const fn required_fields(self) -> &'static [DraftField] {
        match self {
            WizardStep::Identity => &[
                DraftField::FirstName,
                DraftField::LastName,
                DraftField::Email,
                DraftField::Phone,
                DraftField::DateOfBirth,
                DraftField::Nationality,
                DraftField::Gender,
            ],
            WizardStep::Academic => &[
                DraftField::PreviousEducation,
                DraftField::Gpa,
                DraftField::GraduationYear,
                DraftField::ProgramChoice,
                DraftField::CampusChoice,
            ],
            WizardStep::Documents => &[DraftField::Transcript, DraftField::PersonalStatement],
            WizardStep::Review => &[DraftField::Consent],
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of 4: {}", self.index(), self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("already on the last step")]
    AtLastStep,
    #[error("already on the first step")]
    AtFirstStep,
}

/// Required-field failures found when the final form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftValidationError {
    pub missing: Vec<DraftField>,
    pub invalid: Vec<DraftField>,
}

impl DraftValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    pub fn summary(&self) -> String {
        let labels = |fields: &[DraftField]| {
            fields
                .iter()
                .map(|field| field.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        match (self.missing.is_empty(), self.invalid.is_empty()) {
            (false, true) => format!("Please complete the required fields: {}", labels(&self.missing)),
            (true, false) => format!("Please correct: {}", labels(&self.invalid)),
            _ => format!(
                "Please complete the required fields: {}; please correct: {}",
                labels(&self.missing),
                labels(&self.invalid)
            ),
        }
    }
}

impl fmt::Display for DraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for DraftValidationError {}

/// Why `submit` did nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("submission is only available from the review step (currently on step {})", .step.index())]
    NotOnReview { step: WizardStep },
    #[error("consent has not been given")]
    ConsentRequired,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error(transparent)]
    Incomplete(DraftValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(IntakeReceipt),
    Failed(BackendError),
    Blocked(SubmitBlocked),
}

/// Client-side state machine behind the four-step application form.
///
/// Moving between steps never consults field validity; required-field checks
/// run only when the final submission is attempted.
#[derive(Debug, Clone)]
pub struct IntakeWizard {
    draft: ApplicationDraft,
    step: WizardStep,
    submitting: bool,
    notices: Vec<Notice>,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self {
            draft: ApplicationDraft::default(),
            step: WizardStep::Identity,
            submitting: false,
            notices: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn next(&mut self) -> Result<WizardStep, TransitionError> {
        let next = self.step.next().ok_or(TransitionError::AtLastStep)?;
        self.step = next;
        Ok(next)
    }

    pub fn previous(&mut self) -> Result<WizardStep, TransitionError> {
        let previous = self.step.previous().ok_or(TransitionError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    pub fn update_field(&mut self, update: FieldUpdate) {
        update.apply(&mut self.draft);
    }

    /// Stage a file, handing back whatever the slot held before.
    pub fn attach_file(&mut self, slot: DocumentSlot, file: FileHandle) -> Option<FileHandle> {
        self.draft.documents.slot_mut(slot).replace(file)
    }

    pub fn detach_file(&mut self, slot: DocumentSlot) -> Option<FileHandle> {
        self.draft.documents.slot_mut(slot).take()
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.draft.consent = consent;
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Review && self.draft.consent && !self.submitting
    }

    /// Leaving the page now would abandon an in-flight upload.
    pub fn warn_before_unload(&self) -> bool {
        self.submitting
    }

    pub fn missing_required(&self, step: WizardStep) -> Vec<DraftField> {
        step.required_fields()
            .iter()
            .copied()
            .filter(|field| !field.is_filled(&self.draft))
            .collect()
    }

    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let missing = WizardStep::ALL
            .into_iter()
            .flat_map(|step| self.missing_required(step))
            .collect();

        let mut invalid = Vec::new();
        let email = &self.draft.identity.email;
        if !email.trim().is_empty() && !looks_like_email(email) {
            invalid.push(DraftField::Email);
        }

        let error = DraftValidationError { missing, invalid };
        if error.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Guard the terminal action and snapshot the draft for upload.
    ///
    /// On success the wizard is marked as submitting until
    /// [`finish_submission`](Self::finish_submission) is called.
    pub fn begin_submission(&mut self) -> Result<IntakePayload, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::AlreadySubmitting);
        }
        if self.step != WizardStep::Review {
            return Err(SubmitBlocked::NotOnReview { step: self.step });
        }
        if !self.draft.consent {
            return Err(SubmitBlocked::ConsentRequired);
        }
        if let Err(error) = self.validate() {
            self.notices.push(Notice::error(error.to_string()));
            return Err(SubmitBlocked::Incomplete(error));
        }

        self.submitting = true;
        Ok(IntakePayload::from_draft(&self.draft))
    }

    pub fn finish_submission(
        &mut self,
        result: Result<IntakeReceipt, BackendError>,
    ) -> SubmitOutcome {
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.draft = ApplicationDraft::default();
                self.step = WizardStep::Identity;
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| SUBMIT_SUCCESS_MESSAGE.to_string());
                self.notices.push(Notice::success(message));
                info!("application submitted; wizard reset");
                SubmitOutcome::Submitted(receipt)
            }
            Err(error) => {
                warn!(error = %error, "application submission failed");
                let message = error
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| SUBMIT_FAILURE_MESSAGE.to_string());
                self.notices.push(Notice::error(message));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Run the whole guarded submission against a gateway. Never retries.
    pub async fn submit<G>(&mut self, gateway: &G) -> SubmitOutcome
    where
        G: IntakeGateway + ?Sized,
    {
        let payload = match self.begin_submission() {
            Ok(payload) => payload,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };

        info!(files = payload.files.len(), "submitting application");
        let result = gateway.submit(payload).await;
        self.finish_submission(result)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
