//! Inbound DTO constraints.
//!
//! Bodies are first decoded into a draft where every required member is optional, then
//! checked into the typed DTO. Constraint checks run in the HTTP extractor, before any
//! handler logic, and report every violated field at once.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Error)]
#[error("request validation failed")]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Records `message` when the member is missing.
    pub fn required<T>(&mut self, field: impl Into<String>, value: Option<T>, message: &str) -> Option<T> {
        if value.is_none() {
            self.add(field, message);
        }
        value
    }

    /// Missing and whitespace-only strings are both blank.
    pub fn not_blank(
        &mut self,
        field: impl Into<String>,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn non_negative(&mut self, field: impl Into<String>, value: i32, message: &str) -> Option<i32> {
        if value < 0 {
            self.add(field, message);
            None
        } else {
            Some(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

pub trait Validate: Sized {
    /// Leniently decoded shape of the body.
    type Draft: DeserializeOwned;

    fn validate(draft: Self::Draft) -> Result<Self, ValidationErrors>;
}
