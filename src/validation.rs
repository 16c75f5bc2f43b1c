//! Payload validation run after a request body parses successfully.

use std::collections::BTreeMap;

/// Field name -> reason. Logged, never returned to the client.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Collects field failures for one payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.insert(field, "This field is required");
        }
        self
    }

    pub fn email(mut self, field: &'static str, value: &str) -> Self {
        if let Err(reason) = validate_email_format(value) {
            self.errors.insert(field, reason);
        }
        self
    }

    pub fn quantity(mut self, field: &'static str, value: Option<i64>) -> Self {
        match value {
            None => {
                self.errors.insert(field, "This field is required");
            }
            Some(q) if q < 0 => {
                self.errors.insert(field, "Must not be negative");
            }
            Some(_) => {}
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Basic email validation: one `@`, non-empty local part, dotted domain.
pub fn validate_email_format(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email cannot be empty");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err("Invalid email format");
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err("Invalid email format");
    }

    Ok(())
}
