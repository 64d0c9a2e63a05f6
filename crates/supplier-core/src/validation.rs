//! Field-level validation
//!
//! Rules live in an explicit table: each field has an accessor and a list of
//! predicate/message pairs. Evaluation is a pure function that gathers every
//! failing message per field.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use supplier_shared::constants::{SUPPLIER_DOCUMENT_MAX_LENGTH, SUPPLIER_NAME_MAX_LENGTH};

use crate::domain::SupplierDraft;

/// Field name → messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = ValidationErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

type Predicate = Box<dyn Fn(Option<&str>) -> bool + Send + Sync>;

pub struct FieldRule {
    predicate: Predicate,
    message: String,
}

impl FieldRule {
    pub fn new(
        predicate: impl Fn(Option<&str>) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            message: message.into(),
        }
    }

    /// Present and non-blank.
    pub fn required(field_label: &str) -> Self {
        Self::new(
            |value| value.is_some_and(|v| !v.trim().is_empty()),
            format!("The {} field is required.", field_label),
        )
    }

    /// At most `max` characters, surrounding whitespace included. Absent values pass.
    pub fn max_length(field_label: &str, max: usize) -> Self {
        Self::new(
            move |value| value.map_or(true, |v| v.chars().count() <= max),
            format!(
                "The field {} must be a string with a maximum length of {}.",
                field_label, max
            ),
        )
    }

    /// Matches `pattern`. Absent or blank values pass; `required` reports those.
    pub fn pattern(regex: &'static Regex, message: impl Into<String>) -> Self {
        Self::new(
            move |value| match value {
                Some(v) if !v.trim().is_empty() => regex.is_match(v),
                _ => true,
            },
            message,
        )
    }
}

pub struct FieldRules<T> {
    field: &'static str,
    accessor: fn(&T) -> Option<&str>,
    rules: Vec<FieldRule>,
}

pub struct RuleTable<T> {
    fields: Vec<FieldRules<T>>,
}

impl<T> RuleTable<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(
        mut self,
        field: &'static str,
        accessor: fn(&T) -> Option<&str>,
        rules: Vec<FieldRule>,
    ) -> Self {
        self.fields.push(FieldRules { field, accessor, rules });
        self
    }

    pub fn validate(&self, target: &T) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            let value = (field.accessor)(target);
            for rule in &field.rules {
                if !(rule.predicate)(value) {
                    errors.add(field.field, rule.message.clone());
                }
            }
        }
        errors.into_result()
    }
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

static DOCUMENT_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9./-]+$").expect("document pattern is valid"));

fn supplier_name(draft: &SupplierDraft) -> Option<&str> {
    draft.name.as_deref()
}

fn supplier_document(draft: &SupplierDraft) -> Option<&str> {
    draft.document.as_deref()
}

static SUPPLIER_RULES: Lazy<RuleTable<SupplierDraft>> = Lazy::new(|| {
    RuleTable::new()
        .field(
            "name",
            supplier_name,
            vec![
                FieldRule::required("Name"),
                FieldRule::max_length("Name", SUPPLIER_NAME_MAX_LENGTH),
            ],
        )
        .field(
            "document",
            supplier_document,
            vec![
                FieldRule::required("Document"),
                FieldRule::max_length("Document", SUPPLIER_DOCUMENT_MAX_LENGTH),
                FieldRule::pattern(
                    &DOCUMENT_FORMAT,
                    "The field Document may only contain letters, digits, '.', '-' and '/'.",
                ),
            ],
        )
});

/// Checks a supplier payload against the supplier rule table.
pub fn validate_supplier(draft: &SupplierDraft) -> Result<(), ValidationErrors> {
    SUPPLIER_RULES.validate(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_supplier() {
        let draft = SupplierDraft::new("Acme Ltd", "12345678901234", true);
        assert!(validate_supplier(&draft).is_ok());
    }

    #[test]
    fn test_formatted_document_is_accepted() {
        let draft = SupplierDraft::new("Acme Ltd", "12.345.678/01", true);
        assert!(validate_supplier(&draft).is_ok());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate_supplier(&SupplierDraft::default()).unwrap_err();
        assert_eq!(errors.field("name"), Some(&["The Name field is required.".to_string()][..]));
        assert_eq!(
            errors.field("document"),
            Some(&["The Document field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_blank_name_is_required() {
        let draft = SupplierDraft::new("   ", "12345678901234", true);
        let errors = validate_supplier(&draft).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_length_bounds() {
        let ok = SupplierDraft::new("a".repeat(200), "1".repeat(14), false);
        assert!(validate_supplier(&ok).is_ok());

        let too_long = SupplierDraft::new("a".repeat(201), "1".repeat(15), false);
        let errors = validate_supplier(&too_long).unwrap_err();
        assert_eq!(
            errors.field("name").unwrap(),
            &["The field Name must be a string with a maximum length of 200.".to_string()]
        );
        assert_eq!(
            errors.field("document").unwrap(),
            &["The field Document must be a string with a maximum length of 14.".to_string()]
        );
    }

    #[test]
    fn test_length_counts_surrounding_whitespace() {
        let draft = SupplierDraft::new(format!("{} ", "a".repeat(200)), " 12345678901234 ", true);
        let errors = validate_supplier(&draft).unwrap_err();
        assert_eq!(
            errors.field("name").unwrap(),
            &["The field Name must be a string with a maximum length of 200.".to_string()]
        );
        assert!(errors
            .field("document")
            .unwrap()
            .contains(&"The field Document must be a string with a maximum length of 14.".to_string()));
    }

    #[test]
    fn test_document_format() {
        let draft = SupplierDraft::new("Acme Ltd", "123 456", true);
        let errors = validate_supplier(&draft).unwrap_err();
        assert_eq!(errors.field("document").map(|m| m.len()), Some(1));
        assert!(errors.field("name").is_none());
    }

    #[test]
    fn test_display_lists_every_message() {
        let errors = validate_supplier(&SupplierDraft::default()).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "document: The Document field is required.; name: The Name field is required."
        );
    }

    #[test]
    fn test_from_validator_errors() {
        use validator::Validate;

        let request = crate::domain::LoginUser {
            email: "nope".to_string(),
            password: "Sup9lier!".to_string(),
        };
        let errors: ValidationErrors = request.validate().unwrap_err().into();
        assert_eq!(
            errors.field("email").unwrap(),
            &["The Email field is not a valid e-mail address.".to_string()]
        );
    }
}
