use super::common::*;
use crate::backend::{classify_failure, BackendError};
use crate::workflows::intake::domain::ApplicationDraft;
use crate::workflows::intake::wizard::{
    IntakeWizard, SubmitBlocked, SubmitOutcome, WizardStep, SUBMIT_FAILURE_MESSAGE,
    SUBMIT_SUCCESS_MESSAGE,
};
use crate::workflows::NoticeKind;

#[tokio::test]
async fn successful_submit_resets_draft_and_step() {
    let gateway = RecordingGateway::accepting();
    let mut wizard = ready_wizard();

    let outcome = wizard.submit(&gateway).await;

    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(gateway.calls(), 1);
    assert_eq!(wizard.draft(), &ApplicationDraft::default());
    assert_eq!(wizard.step(), WizardStep::Identity);
    assert!(!wizard.is_submitting());

    let notices = wizard.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, SUBMIT_SUCCESS_MESSAGE);
}

#[tokio::test]
async fn submitted_payload_covers_the_whole_draft() {
    let gateway = RecordingGateway::accepting();
    let mut wizard = ready_wizard();

    wizard.submit(&gateway).await;

    let payload = gateway.last_payload().expect("payload recorded");
    assert_eq!(payload.field("firstName"), Some("Ada"));
    assert_eq!(payload.field("email"), Some("ada@example.edu"));
    assert_eq!(payload.field("dateOfBirth"), Some("2006-04-12"));
    assert_eq!(payload.field("nationality"), Some("international"));
    assert_eq!(payload.field("previousEducation"), Some("Riverside High School"));
    assert_eq!(payload.field("gpa"), Some("3.8"));
    assert_eq!(payload.field("programChoice"), Some("computer_science"));
    assert_eq!(payload.field("campusChoice"), Some("main"));
    assert_eq!(
        payload.file("transcript").map(|file| file.file_name()),
        Some("transcript.pdf")
    );
    assert_eq!(
        payload.file("recommendation").map(|file| file.file_name()),
        Some("recommendation.pdf")
    );
}

#[tokio::test]
async fn submit_without_consent_never_reaches_the_gateway() {
    let gateway = RecordingGateway::accepting();
    let mut wizard = ready_wizard();
    wizard.set_consent(false);
    let before = wizard.draft().clone();

    let outcome = wizard.submit(&gateway).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Blocked(SubmitBlocked::ConsentRequired)
    );
    assert_eq!(gateway.calls(), 0);
    assert_eq!(wizard.draft(), &before);
    assert_eq!(wizard.step(), WizardStep::Review);
}

#[tokio::test]
async fn submit_is_only_evaluated_on_review() {
    let gateway = RecordingGateway::accepting();
    let mut wizard = ready_wizard();
    wizard.previous().expect("back to documents");

    let outcome = wizard.submit(&gateway).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Blocked(SubmitBlocked::NotOnReview {
            step: WizardStep::Documents
        })
    );
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn failed_submit_keeps_the_draft_for_retry() {
    let gateway = RecordingGateway::answering(Err(classify_failure(
        400,
        r#"{"error":"Transcript exceeds the 10 MB limit"}"#,
    )));
    let mut wizard = ready_wizard();
    let before = wizard.draft().clone();

    let outcome = wizard.submit(&gateway).await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(BackendError::Rejected { status: 400, .. })
    ));
    assert_eq!(wizard.draft(), &before);
    assert_eq!(wizard.step(), WizardStep::Review);
    assert!(wizard.can_submit(), "user may retry manually");
    assert_eq!(gateway.calls(), 1, "no automatic retry");

    let notices = wizard.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Transcript exceeds the 10 MB limit");
}

#[tokio::test]
async fn failures_without_server_message_use_generic_text() {
    for error in [
        BackendError::Transport("connection refused".to_string()),
        classify_failure(500, "Internal Server Error"),
    ] {
        let gateway = RecordingGateway::answering(Err(error));
        let mut wizard = ready_wizard();

        wizard.submit(&gateway).await;

        let notices = wizard.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, SUBMIT_FAILURE_MESSAGE);
    }
}

#[tokio::test]
async fn incomplete_draft_is_rejected_client_side() {
    let gateway = RecordingGateway::accepting();
    let mut wizard = IntakeWizard::new();
    fill_identity(&mut wizard);
    for _ in 0..3 {
        wizard.next().expect("advance");
    }
    wizard.set_consent(true);

    let outcome = wizard.submit(&gateway).await;

    match outcome {
        SubmitOutcome::Blocked(SubmitBlocked::Incomplete(error)) => {
            assert!(!error.missing.is_empty());
        }
        other => panic!("expected incomplete draft, got {other:?}"),
    }
    assert_eq!(gateway.calls(), 0);
    assert_eq!(wizard.notices().len(), 1);
    assert_eq!(wizard.notices()[0].kind, NoticeKind::Error);
}

#[test]
fn in_flight_flag_blocks_double_submission() {
    let mut wizard = ready_wizard();

    let payload = wizard.begin_submission().expect("first submission starts");
    assert_eq!(payload.fields.len(), 13);
    assert!(wizard.is_submitting());
    assert!(wizard.warn_before_unload());
    assert!(!wizard.can_submit());

    assert_eq!(
        wizard.begin_submission(),
        Err(SubmitBlocked::AlreadySubmitting)
    );

    wizard.finish_submission(Err(BackendError::Transport("timed out".to_string())));
    assert!(!wizard.is_submitting());
    assert!(!wizard.warn_before_unload());
    assert!(wizard.begin_submission().is_ok());
}
