use std::fmt;

use serde::Serialize;

pub(crate) const REQUIRED: &str = "This field is required.";

/// A single problem with one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set holding exactly one error.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record a "required" error when `value` is blank. Returns true if it was.
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        let blank = value.trim().is_empty();
        if blank {
            self.add(field, REQUIRED);
        }
        blank
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against `field`.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when no errors were collected.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_flags_blank_values() {
        let mut errors = FieldErrors::new();
        assert!(errors.require("title", "   "));
        assert!(!errors.require("body", "text"));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.messages_for("title").collect::<Vec<_>>(), vec![REQUIRED]);
        assert!(!errors.has("body"));
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = FieldErrors::single("title", "bad");
        errors.add("body", "worse");
        assert_eq!(errors.to_string(), "title: bad; body: worse");
        assert!(errors.into_result().is_err());
    }
}
