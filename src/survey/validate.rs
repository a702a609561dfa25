//! Validation engine for survey steps and whole records.
//!
//! Checks are driven by the bindings in the schema, never by field names, and
//! failures are data: callers always get a `ValidationResult` back.
use super::record::SurveyRecord;
use super::schema::{find_step, Binding, Field, Role, Rule, StepKey};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex for email shape"));

static WHATSAPP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+234|234|0)?[789][01]\d{8}$").expect("regex for national phone shape")
});

pub const ROLE_REQUIRED: &str = "Role selection is required";
pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const WHATSAPP_REQUIRED: &str = "WhatsApp number is required";
pub const WHATSAPP_INVALID: &str = "Please enter a valid Nigerian phone number";
pub const FIELD_REQUIRED: &str = "This field is required";

/// One validation failure, optionally tied to a field identifier.
///
/// The field stays a plain string so failures reported by a remote gateway
/// with identifiers this build does not know can still be carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        FieldError {
            field: Some(field.as_str().to_string()),
            message: message.into(),
        }
    }

    /// Resolve the field identifier against the schema.
    pub fn known_field(&self) -> Option<Field> {
        self.field.as_deref().and_then(Field::parse)
    }
}

/// Outcome of one validation call; replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check a national WhatsApp number; whitespace is ignored, empty fails.
pub fn validate_whatsapp(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
    WHATSAPP_RE.is_match(&compact)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Step,
    Record,
}

/// Validate only the fields bound to `step` for `role`.
///
/// Role-specific steps fail with a role error while no role is selected.
pub fn validate_step(record: &SurveyRecord, step: StepKey, role: Option<Role>) -> ValidationResult {
    let mut errors = Vec::new();
    match find_step(step, role) {
        Some(descriptor) => {
            for binding in descriptor.bindings {
                check_binding(record, binding, Scope::Step, &mut errors);
            }
        }
        None if role.is_none() => errors.push(FieldError::new(Field::Role, ROLE_REQUIRED)),
        None => {}
    }
    ValidationResult::from_errors(errors)
}

/// Validate everything a submission needs, independent of the current step.
///
/// The WhatsApp number is optional here but must be well formed when given.
pub fn validate_record(record: &SurveyRecord) -> ValidationResult {
    let mut errors = Vec::new();
    let role = record.role();
    if role.is_none() {
        errors.push(FieldError::new(Field::Role, ROLE_REQUIRED));
    }
    if !record.is_filled(Field::Name) {
        errors.push(FieldError::new(Field::Name, NAME_REQUIRED));
    }
    match role {
        Some(role) => {
            for step in role.steps() {
                for binding in step.bindings {
                    check_binding(record, binding, Scope::Record, &mut errors);
                }
            }
        }
        None => check_contact(record, &mut errors),
    }
    ValidationResult::from_errors(errors)
}

fn check_contact(record: &SurveyRecord, errors: &mut Vec<FieldError>) {
    check_binding(
        record,
        &Binding {
            field: Field::Email,
            rule: Rule::Email,
        },
        Scope::Record,
        errors,
    );
    check_binding(
        record,
        &Binding {
            field: Field::Whatsapp,
            rule: Rule::Phone,
        },
        Scope::Record,
        errors,
    );
}

fn check_binding(
    record: &SurveyRecord,
    binding: &Binding,
    scope: Scope,
    errors: &mut Vec<FieldError>,
) {
    let field = binding.field;
    let value = record.value(field);
    let filled = !value.trim().is_empty();
    match binding.rule {
        Rule::Email => {
            if !filled {
                errors.push(FieldError::new(field, EMAIL_REQUIRED));
            } else if !validate_email(&value) {
                errors.push(FieldError::new(field, EMAIL_INVALID));
            }
        }
        Rule::Phone => {
            if !filled {
                if scope == Scope::Step {
                    errors.push(FieldError::new(field, WHATSAPP_REQUIRED));
                }
            } else if !validate_whatsapp(&value) {
                errors.push(FieldError::new(field, WHATSAPP_INVALID));
            }
        }
        Rule::Required => {
            if filled {
                return;
            }
            let message = match (scope, field) {
                (_, Field::Role) => ROLE_REQUIRED.to_string(),
                (Scope::Step, Field::Name) => NAME_REQUIRED.to_string(),
                (Scope::Step, _) => FIELD_REQUIRED.to_string(),
                (Scope::Record, _) => format!("{} is required", field.label()),
            };
            errors.push(FieldError::new(field, message));
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
