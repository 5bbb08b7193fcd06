use crate::cli::{client_config, print_notices};
use admissions::backend::BackendClient;
use admissions::error::AppError;
use admissions::files::FileHandle;
use admissions::workflows::intake::{
    DocumentSlot, DraftField, FieldUpdate, HttpIntakeGateway, IntakeWizard, SubmitOutcome,
};
use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// JSON object mapping form field names (e.g. `firstName`) to answers
    #[arg(long)]
    pub(crate) draft: PathBuf,
    /// Transcript to attach on the documents step
    #[arg(long)]
    pub(crate) transcript: Option<PathBuf>,
    /// Optional recommendation letter
    #[arg(long)]
    pub(crate) recommendation: Option<PathBuf>,
    /// Tick the consent box on the review step
    #[arg(long)]
    pub(crate) consent: bool,
}

#[derive(Debug, Deserialize)]
struct DraftFile {
    #[serde(default)]
    consent: bool,
    #[serde(flatten)]
    answers: BTreeMap<String, Value>,
}

#[derive(Debug)]
pub(crate) struct ParsedDraft {
    pub(crate) updates: Vec<FieldUpdate>,
    pub(crate) consent: bool,
}

pub(crate) fn parse_draft(raw: &str) -> Result<ParsedDraft, AppError> {
    let file: DraftFile = serde_json::from_str(raw)
        .map_err(|err| AppError::Invalid(format!("draft is not a JSON object: {err}")))?;

    let mut updates = Vec::with_capacity(file.answers.len());
    for (name, value) in file.answers {
        let field = DraftField::from_wire_name(&name)
            .filter(|field| DraftField::TEXT_FIELDS.contains(field))
            .ok_or_else(|| AppError::Invalid(format!("'{name}' is not a form text field")))?;
        let text = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Null => String::new(),
            other => {
                return Err(AppError::Invalid(format!(
                    "'{name}' must be text or a number, got {other}"
                )))
            }
        };
        updates.push(FieldUpdate::parse(field, &text)?);
    }

    Ok(ParsedDraft {
        updates,
        consent: file.consent,
    })
}

/// Enter the answers and files, clicking Next until the review step.
pub(crate) fn fill_wizard(
    wizard: &mut IntakeWizard,
    draft: ParsedDraft,
    documents: Vec<(DocumentSlot, FileHandle)>,
    consent: bool,
) {
    for update in draft.updates {
        wizard.update_field(update);
    }
    for (slot, file) in documents {
        wizard.attach_file(slot, file);
    }
    while let Ok(step) = wizard.next() {
        println!("{step}");
    }
    wizard.set_consent(consent || draft.consent);
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let config = client_config()?;
    let draft = parse_draft(&std::fs::read_to_string(&args.draft)?)?;

    let mut documents = Vec::new();
    if let Some(path) = &args.transcript {
        documents.push((DocumentSlot::Transcript, FileHandle::from_path(path)?));
    }
    if let Some(path) = &args.recommendation {
        documents.push((DocumentSlot::Recommendation, FileHandle::from_path(path)?));
    }

    let mut wizard = IntakeWizard::new();
    println!("{}", wizard.step());
    fill_wizard(&mut wizard, draft, documents, args.consent);

    let gateway = HttpIntakeGateway::new(BackendClient::new(&config.backend)?);
    let outcome = wizard.submit(&gateway).await;
    print_notices(wizard.take_notices());

    match outcome {
        SubmitOutcome::Submitted(receipt) => {
            info!(
                application_id = receipt.application_id.as_deref().unwrap_or("-"),
                "application accepted"
            );
            if let Some(id) = receipt.application_id {
                println!("application id: {id}");
            }
            Ok(())
        }
        SubmitOutcome::Failed(error) => Err(error.into()),
        SubmitOutcome::Blocked(blocked) => Err(blocked.into()),
    }
}
