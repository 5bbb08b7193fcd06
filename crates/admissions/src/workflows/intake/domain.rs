use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::files::FileHandle;

/// Applicant identity collected on the first step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<Nationality>,
    pub gender: Option<Gender>,
}

/// Academic history collected on the second step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcademicHistory {
    pub previous_institution_name: String,
    /// Free-form, e.g. "3.8" or "85%".
    pub grade_average: String,
    pub graduation_year: Option<i32>,
    pub program_choice: Option<ProgramChoice>,
    pub campus_choice: Option<CampusChoice>,
}

/// Staged supporting documents. Each slot holds at most one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportingDocuments {
    pub transcript: Option<FileHandle>,
    pub recommendation: Option<FileHandle>,
}

impl SupportingDocuments {
    pub fn slot(&self, slot: DocumentSlot) -> Option<&FileHandle> {
        match slot {
            DocumentSlot::Transcript => self.transcript.as_ref(),
            DocumentSlot::Recommendation => self.recommendation.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: DocumentSlot) -> &mut Option<FileHandle> {
        match slot {
            DocumentSlot::Transcript => &mut self.transcript,
            DocumentSlot::Recommendation => &mut self.recommendation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    Transcript,
    Recommendation,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 2] = [DocumentSlot::Transcript, DocumentSlot::Recommendation];

    /// Multipart part name used by the intake endpoint.
    pub const fn part_name(self) -> &'static str {
        match self {
            DocumentSlot::Transcript => "transcript",
            DocumentSlot::Recommendation => "recommendation",
        }
    }
}

/// Personal statement with its length tracked as the applicant types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalStatement {
    text: String,
}

impl PersonalStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Everything the applicant has entered so far. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub identity: IdentityDetails,
    pub academic: AcademicHistory,
    pub documents: SupportingDocuments,
    pub personal_statement: PersonalStatement,
    pub consent: bool,
}

impl ApplicationDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nationality {
    Domestic,
    International,
}

impl Nationality {
    pub const ALL: [Nationality; 2] = [Nationality::Domestic, Nationality::International];

    pub const fn label(self) -> &'static str {
        match self {
            Nationality::Domestic => "domestic",
            Nationality::International => "international",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramChoice {
    BusinessAdministration,
    ComputerScience,
    Engineering,
    Nursing,
    Education,
    Law,
}

impl ProgramChoice {
    pub const ALL: [ProgramChoice; 6] = [
        ProgramChoice::BusinessAdministration,
        ProgramChoice::ComputerScience,
        ProgramChoice::Engineering,
        ProgramChoice::Nursing,
        ProgramChoice::Education,
        ProgramChoice::Law,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProgramChoice::BusinessAdministration => "business_administration",
            ProgramChoice::ComputerScience => "computer_science",
            ProgramChoice::Engineering => "engineering",
            ProgramChoice::Nursing => "nursing",
            ProgramChoice::Education => "education",
            ProgramChoice::Law => "law",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampusChoice {
    Main,
    City,
    Online,
}

impl CampusChoice {
    pub const ALL: [CampusChoice; 3] = [CampusChoice::Main, CampusChoice::City, CampusChoice::Online];

    pub const fn label(self) -> &'static str {
        match self {
            CampusChoice::Main => "main",
            CampusChoice::City => "city",
            CampusChoice::Online => "online",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.label() == raw)
    }
}
