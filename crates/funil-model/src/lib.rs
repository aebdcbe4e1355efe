#![forbid(unsafe_code)]
//! Funil domain model SSOT.
//!
//! Every lead field that crosses the persistence or wire boundary is a
//! parse-constructed newtype; a raw form submission only becomes a
//! [`NewLead`] after `LeadDraft::validate` accepts every required field.

mod lead;

pub use lead::{
    FieldError, Lead, LeadCompany, LeadDraft, LeadEmail, LeadId, LeadName, LeadPhone, NewLead,
    ValidationError, COMPANY_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN,
};

pub const CRATE_NAME: &str = "funil-model";
