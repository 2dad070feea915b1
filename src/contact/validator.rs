//! Field-level validation rules for the contact form.
//!
//! Rules are checked in a fixed precedence and the first failing rule wins:
//! required, then email shape, then Sri Lankan phone shape.

use crate::i18n::{Language, LanguageStrings};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

/// What kind of value a field holds, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
}

impl FieldKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "email" => FieldKind::Email,
            "phone" => FieldKind::Phone,
            _ => FieldKind::Text,
        }
    }
}

/// One form control as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required,
        }
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_name(&self.name)
    }
}

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }
}

/// Validate one field, with the error message in `language`.
pub fn validate_field(field: &FormField, language: Language) -> FieldValidationResult {
    let strings = LanguageStrings::for_language(language);
    let value = field.value.trim();

    if field.required && value.is_empty() {
        return FieldValidationResult::invalid(strings.field_required);
    }

    if value.is_empty() {
        return FieldValidationResult::ok();
    }

    match field.kind() {
        FieldKind::Email if !is_valid_email(value) => {
            FieldValidationResult::invalid(strings.invalid_email)
        }
        FieldKind::Phone if !is_valid_phone(value) => {
            FieldValidationResult::invalid(strings.invalid_phone)
        }
        _ => FieldValidationResult::ok(),
    }
}

/// `local@domain.tld` shape: no whitespace and exactly the separators needed.
pub fn is_valid_email(value: &str) -> bool {
    let regex = EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    regex.is_match(value)
}

/// Sri Lankan number: `0` + 9 digits locally, or `94`/`+94` + 9 digits.
/// Whitespace anywhere is ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^(\+?94[0-9]{9}|0[0-9]{9})$").unwrap());
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    regex.is_match(&compact)
}
