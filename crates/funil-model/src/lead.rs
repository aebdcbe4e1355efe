use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const NAME_MAX_LEN: usize = 120;
pub const PHONE_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 120;
pub const COMPANY_MAX_LEN: usize = 160;

fn parse_required(field: &str, input: &str, max_len: usize) -> Result<String, ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    if s.chars().count() > max_len {
        return Err(ValidationError(format!(
            "{field} exceeds max length {max_len}"
        )));
    }
    Ok(s.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct LeadName(String);

impl LeadName {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse_required("name", input, NAME_MAX_LEN).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for LeadName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct LeadPhone(String);

impl LeadPhone {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse_required("phone", input, PHONE_MAX_LEN).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for LeadPhone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Captured as given. Address shape is deliberately NOT validated; the
/// capture flow only requires the field to be present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct LeadEmail(String);

impl LeadEmail {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse_required("email", input, EMAIL_MAX_LEN).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for LeadEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct LeadCompany(String);

impl LeadCompany {
    /// Blank input means "not provided" rather than an error.
    pub fn parse_optional(input: &str) -> Result<Option<Self>, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Ok(None);
        }
        if s.chars().count() > COMPANY_MAX_LEN {
            return Err(ValidationError(format!(
                "company exceeds max length {COMPANY_MAX_LEN}"
            )));
        }
        Ok(Some(Self(s.to_string())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for LeadCompany {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier, strictly positive and monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LeadId(i64);

impl LeadId {
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw <= 0 {
            return Err(ValidationError(format!(
                "lead id must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for LeadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Raw capture submission, fields exactly as they arrived (possibly absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

impl LeadDraft {
    /// Validates every field and reports all failures at once, so the
    /// capture form can annotate each offending field in a single round trip.
    pub fn validate(&self) -> Result<NewLead, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match LeadName::parse(self.name.as_deref().unwrap_or_default()) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(FieldError {
                    field: "name",
                    message: e.0,
                });
                None
            }
        };
        let phone = match LeadPhone::parse(self.phone.as_deref().unwrap_or_default()) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(FieldError {
                    field: "phone",
                    message: e.0,
                });
                None
            }
        };
        let email = match LeadEmail::parse(self.email.as_deref().unwrap_or_default()) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(FieldError {
                    field: "email",
                    message: e.0,
                });
                None
            }
        };
        let company = match LeadCompany::parse_optional(self.company.as_deref().unwrap_or_default())
        {
            Ok(v) => v,
            Err(e) => {
                errors.push(FieldError {
                    field: "company",
                    message: e.0,
                });
                None
            }
        };

        match (name, phone, email) {
            (Some(name), Some(phone), Some(email)) if errors.is_empty() => Ok(NewLead {
                name,
                phone,
                email,
                company,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated lead that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: LeadName,
    pub phone: LeadPhone,
    pub email: LeadEmail,
    pub company: Option<LeadCompany>,
}

/// A persisted lead. `created_at_unix_ms` is assigned once by the store at
/// insert time and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: LeadName,
    pub phone: LeadPhone,
    pub email: LeadEmail,
    pub company: Option<LeadCompany>,
    pub created_at_unix_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, phone: &str, email: &str, company: &str) -> LeadDraft {
        LeadDraft {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
            company: Some(company.to_string()),
        }
    }

    #[test]
    fn required_fields_are_trimmed_and_non_empty() {
        let name = LeadName::parse("  Ana Souza  ").expect("valid name");
        assert_eq!(name.as_str(), "Ana Souza");
        assert!(LeadName::parse("   ").is_err());
        assert!(LeadPhone::parse("").is_err());
        assert!(LeadEmail::parse("\t").is_err());
    }

    #[test]
    fn email_shape_is_not_validated() {
        let email = LeadEmail::parse("not-an-address").expect("shape is accepted");
        assert_eq!(email.as_str(), "not-an-address");
    }

    #[test]
    fn length_caps_are_enforced() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        let err = LeadName::parse(&long).expect_err("over cap");
        assert!(err.0.contains("max length"));
        assert!(LeadCompany::parse_optional(&"y".repeat(COMPANY_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn blank_company_means_absent() {
        assert_eq!(LeadCompany::parse_optional("   ").expect("blank ok"), None);
        let company = LeadCompany::parse_optional(" ACME ")
            .expect("valid")
            .expect("present");
        assert_eq!(company.as_str(), "ACME");
    }

    #[test]
    fn draft_validation_collects_every_field_error() {
        let draft = LeadDraft {
            name: None,
            phone: Some(String::new()),
            email: Some("  ".to_string()),
            company: None,
        };
        let errors = draft.validate().expect_err("three missing fields");
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "phone", "email"]);
    }

    #[test]
    fn draft_validation_accepts_complete_submission() {
        let lead = draft("Ana", "+55 11 91234-5678", "ana@example.com", "ACME")
            .validate()
            .expect("valid draft");
        assert_eq!(lead.name.as_str(), "Ana");
        assert_eq!(lead.company.as_ref().map(LeadCompany::as_str), Some("ACME"));
    }

    #[test]
    fn lead_id_must_be_positive() {
        assert!(LeadId::new(0).is_err());
        assert!(LeadId::new(-3).is_err());
        assert_eq!(LeadId::new(7).expect("positive").as_i64(), 7);
    }

    #[test]
    fn newtypes_serialize_transparently() {
        let id = LeadId::new(42).expect("id");
        assert_eq!(serde_json::to_string(&id).expect("json"), "42");
        let name = LeadName::parse("Ana").expect("name");
        assert_eq!(serde_json::to_string(&name).expect("json"), "\"Ana\"");
    }
}
