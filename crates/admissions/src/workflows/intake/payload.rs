use reqwest::multipart::Form;

use super::domain::{ApplicationDraft, DocumentSlot};
use super::fields::DraftField;
use crate::files::FileHandle;

/// Snapshot of a draft laid out as the intake endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePayload {
    pub fields: Vec<(&'static str, String)>,
    pub files: Vec<(&'static str, FileHandle)>,
}

impl IntakePayload {
    pub fn from_draft(draft: &ApplicationDraft) -> Self {
        let fields = DraftField::TEXT_FIELDS
            .into_iter()
            .map(|field| (field.wire_name(), field.wire_value(draft)))
            .collect();

        let files = DocumentSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                draft
                    .documents
                    .slot(slot)
                    .map(|file| (slot.part_name(), file.clone()))
            })
            .collect();

        Self { fields, files }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn file(&self, name: &str) -> Option<&FileHandle> {
        self.files
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, file)| file)
    }

    pub fn into_form(self) -> Form {
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        self.files
            .into_iter()
            .fold(form, |form, (name, file)| form.part(name, file.to_part()))
    }
}
