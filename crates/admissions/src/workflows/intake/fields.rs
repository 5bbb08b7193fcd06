use chrono::NaiveDate;

use super::domain::{
    ApplicationDraft, CampusChoice, Gender, Nationality, PersonalStatement, ProgramChoice,
};

/// Every input the wizard renders, including the file and consent controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Nationality,
    Gender,
    PreviousEducation,
    Gpa,
    GraduationYear,
    ProgramChoice,
    CampusChoice,
    Transcript,
    Recommendation,
    PersonalStatement,
    Consent,
}

impl DraftField {
    /// Text fields submitted to the intake endpoint, in wire order.
    pub const TEXT_FIELDS: [DraftField; 13] = [
        DraftField::FirstName,
        DraftField::LastName,
        DraftField::Email,
        DraftField::Phone,
        DraftField::DateOfBirth,
        DraftField::Nationality,
        DraftField::Gender,
        DraftField::PreviousEducation,
        DraftField::Gpa,
        DraftField::GraduationYear,
        DraftField::ProgramChoice,
        DraftField::CampusChoice,
        DraftField::PersonalStatement,
    ];

    /// Form field name on the wire.
    pub const fn wire_name(self) -> &'static str {
        match self {
            DraftField::FirstName => "firstName",
            DraftField::LastName => "lastName",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::DateOfBirth => "dateOfBirth",
            DraftField::Nationality => "nationality",
            DraftField::Gender => "gender",
            DraftField::PreviousEducation => "previousEducation",
            DraftField::Gpa => "gpa",
            DraftField::GraduationYear => "graduationYear",
            DraftField::ProgramChoice => "programChoice",
            DraftField::CampusChoice => "campusChoice",
            DraftField::Transcript => "transcript",
            DraftField::Recommendation => "recommendation",
            DraftField::PersonalStatement => "personalStatement",
            DraftField::Consent => "consent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DraftField::FirstName => "First name",
            DraftField::LastName => "Last name",
            DraftField::Email => "Email",
            DraftField::Phone => "Phone",
            DraftField::DateOfBirth => "Date of birth",
            DraftField::Nationality => "Nationality",
            DraftField::Gender => "Gender",
            DraftField::PreviousEducation => "Previous institution",
            DraftField::Gpa => "Grade average",
            DraftField::GraduationYear => "Graduation year",
            DraftField::ProgramChoice => "Program",
            DraftField::CampusChoice => "Campus",
            DraftField::Transcript => "Transcript",
            DraftField::Recommendation => "Recommendation letter",
            DraftField::PersonalStatement => "Personal statement",
            DraftField::Consent => "Consent",
        }
    }

    pub fn from_wire_name(raw: &str) -> Option<Self> {
        Self::TEXT_FIELDS
            .into_iter()
            .chain([
                DraftField::Transcript,
                DraftField::Recommendation,
                DraftField::Consent,
            ])
            .find(|field| field.wire_name() == raw)
    }

    /// The text value as sent in the multipart payload; empty when unset.
    pub fn wire_value(self, draft: &ApplicationDraft) -> String {
        let identity = &draft.identity;
        let academic = &draft.academic;
        match self {
            DraftField::FirstName => identity.first_name.clone(),
            DraftField::LastName => identity.last_name.clone(),
            DraftField::Email => identity.email.clone(),
            DraftField::Phone => identity.phone.clone(),
            DraftField::DateOfBirth => identity
                .date_of_birth
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            DraftField::Nationality => identity
                .nationality
                .map(|value| value.label().to_string())
                .unwrap_or_default(),
            DraftField::Gender => identity
                .gender
                .map(|value| value.label().to_string())
                .unwrap_or_default(),
            DraftField::PreviousEducation => academic.previous_institution_name.clone(),
            DraftField::Gpa => academic.grade_average.clone(),
            DraftField::GraduationYear => academic
                .graduation_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
            DraftField::ProgramChoice => academic
                .program_choice
                .map(|value| value.label().to_string())
                .unwrap_or_default(),
            DraftField::CampusChoice => academic
                .campus_choice
                .map(|value| value.label().to_string())
                .unwrap_or_default(),
            DraftField::PersonalStatement => draft.personal_statement.text().to_string(),
            DraftField::Transcript => draft
                .documents
                .transcript
                .as_ref()
                .map(|file| file.file_name().to_string())
                .unwrap_or_default(),
            DraftField::Recommendation => draft
                .documents
                .recommendation
                .as_ref()
                .map(|file| file.file_name().to_string())
                .unwrap_or_default(),
            DraftField::Consent => draft.consent.to_string(),
        }
    }

    /// Required-attribute semantics: present and not just whitespace.
    pub fn is_filled(self, draft: &ApplicationDraft) -> bool {
        match self {
            DraftField::Transcript => draft.documents.transcript.is_some(),
            DraftField::Recommendation => draft.documents.recommendation.is_some(),
            DraftField::Consent => draft.consent,
            DraftField::PersonalStatement => !draft.personal_statement.is_blank(),
            other => !other.wire_value(draft).trim().is_empty(),
        }
    }
}

/// A typed assignment to one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    DateOfBirth(Option<NaiveDate>),
    Nationality(Option<Nationality>),
    Gender(Option<Gender>),
    PreviousEducation(String),
    Gpa(String),
    GraduationYear(Option<i32>),
    ProgramChoice(Option<ProgramChoice>),
    CampusChoice(Option<CampusChoice>),
    PersonalStatement(String),
}

impl FieldUpdate {
    pub fn field(&self) -> DraftField {
        match self {
            FieldUpdate::FirstName(_) => DraftField::FirstName,
            FieldUpdate::LastName(_) => DraftField::LastName,
            FieldUpdate::Email(_) => DraftField::Email,
            FieldUpdate::Phone(_) => DraftField::Phone,
            FieldUpdate::DateOfBirth(_) => DraftField::DateOfBirth,
            FieldUpdate::Nationality(_) => DraftField::Nationality,
            FieldUpdate::Gender(_) => DraftField::Gender,
            FieldUpdate::PreviousEducation(_) => DraftField::PreviousEducation,
            FieldUpdate::Gpa(_) => DraftField::Gpa,
            FieldUpdate::GraduationYear(_) => DraftField::GraduationYear,
            FieldUpdate::ProgramChoice(_) => DraftField::ProgramChoice,
            FieldUpdate::CampusChoice(_) => DraftField::CampusChoice,
            FieldUpdate::PersonalStatement(_) => DraftField::PersonalStatement,
        }
    }

    /// Convert raw form input into a typed update. Blank input clears typed fields.
    pub fn parse(field: DraftField, raw: &str) -> Result<Self, FieldParseError> {
        let trimmed = raw.trim();
        let update = match field {
            DraftField::FirstName => FieldUpdate::FirstName(raw.to_string()),
            DraftField::LastName => FieldUpdate::LastName(raw.to_string()),
            DraftField::Email => FieldUpdate::Email(trimmed.to_string()),
            DraftField::Phone => FieldUpdate::Phone(raw.to_string()),
            DraftField::PreviousEducation => FieldUpdate::PreviousEducation(raw.to_string()),
            DraftField::Gpa => FieldUpdate::Gpa(raw.to_string()),
            DraftField::PersonalStatement => FieldUpdate::PersonalStatement(raw.to_string()),
            DraftField::DateOfBirth => FieldUpdate::DateOfBirth(parse_optional(
                field,
                trimmed,
                |value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
            )?),
            DraftField::GraduationYear => FieldUpdate::GraduationYear(parse_optional(
                field,
                trimmed,
                |value| value.parse::<i32>().ok(),
            )?),
            DraftField::Nationality => FieldUpdate::Nationality(parse_optional(
                field,
                trimmed,
                Nationality::from_label,
            )?),
            DraftField::Gender => {
                FieldUpdate::Gender(parse_optional(field, trimmed, Gender::from_label)?)
            }
            DraftField::ProgramChoice => FieldUpdate::ProgramChoice(parse_optional(
                field,
                trimmed,
                ProgramChoice::from_label,
            )?),
            DraftField::CampusChoice => FieldUpdate::CampusChoice(parse_optional(
                field,
                trimmed,
                CampusChoice::from_label,
            )?),
            DraftField::Transcript | DraftField::Recommendation | DraftField::Consent => {
                return Err(FieldParseError::NotATextField { field });
            }
        };
        Ok(update)
    }

    pub(crate) fn apply(self, draft: &mut ApplicationDraft) {
        let identity = &mut draft.identity;
        let academic = &mut draft.academic;
        match self {
            FieldUpdate::FirstName(value) => identity.first_name = value,
            FieldUpdate::LastName(value) => identity.last_name = value,
            FieldUpdate::Email(value) => identity.email = value,
            FieldUpdate::Phone(value) => identity.phone = value,
            FieldUpdate::DateOfBirth(value) => identity.date_of_birth = value,
            FieldUpdate::Nationality(value) => identity.nationality = value,
            FieldUpdate::Gender(value) => identity.gender = value,
            FieldUpdate::PreviousEducation(value) => academic.previous_institution_name = value,
            FieldUpdate::Gpa(value) => academic.grade_average = value,
            FieldUpdate::GraduationYear(value) => academic.graduation_year = value,
            FieldUpdate::ProgramChoice(value) => academic.program_choice = value,
            FieldUpdate::CampusChoice(value) => academic.campus_choice = value,
            FieldUpdate::PersonalStatement(value) => {
                draft.personal_statement = PersonalStatement::new(value)
            }
        }
    }
}

fn parse_optional<T>(
    field: DraftField,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, FieldParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .ok_or_else(|| FieldParseError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}

/// Raised when form input cannot be turned into a field update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("{} does not accept '{value}'", field.label())]
    InvalidValue { field: DraftField, value: String },
    #[error("{} is not a text field", field.label())]
    NotATextField { field: DraftField },
}

/// Loose `local@domain` check matching an email input's built-in validation.
pub(crate) fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !raw.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_converts_typed_fields() {
        assert_eq!(
            FieldUpdate::parse(DraftField::DateOfBirth, "2006-04-12"),
            Ok(FieldUpdate::DateOfBirth(NaiveDate::from_ymd_opt(2006, 4, 12)))
        );
        assert_eq!(
            FieldUpdate::parse(DraftField::GraduationYear, " 2024 "),
            Ok(FieldUpdate::GraduationYear(Some(2024)))
        );
        assert_eq!(
            FieldUpdate::parse(DraftField::ProgramChoice, "computer_science"),
            Ok(FieldUpdate::ProgramChoice(Some(ProgramChoice::ComputerScience)))
        );
    }

    #[test]
    fn blank_input_clears_typed_fields() {
        assert_eq!(
            FieldUpdate::parse(DraftField::Gender, "  "),
            Ok(FieldUpdate::Gender(None))
        );
    }

    #[test]
    fn malformed_input_is_reported() {
        let error = FieldUpdate::parse(DraftField::DateOfBirth, "12/04/2006")
            .expect_err("slash dates are rejected");
        assert_eq!(error.to_string(), "Date of birth does not accept '12/04/2006'");
        assert!(matches!(
            FieldUpdate::parse(DraftField::Transcript, "file.pdf"),
            Err(FieldParseError::NotATextField { .. })
        ));
    }

    #[test]
    fn email_check_matches_input_semantics() {
        assert!(looks_like_email("ada@example.edu"));
        assert!(!looks_like_email("ada.example.edu"));
        assert!(!looks_like_email("@example.edu"));
        assert!(!looks_like_email("ada@"));
        assert!(!looks_like_email("ada lovelace@example.edu"));
    }
}
