//! Field-level validation shared by every request payload.

use crate::domain::error::DomainError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Collects `field -> message` pairs; the first message recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }

    pub fn require_text(&mut self, field: &str, value: &str, label: &str, max_chars: usize) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", label));
        } else if value.chars().count() > max_chars {
            self.add(
                field,
                format!("{} must be at most {} characters", label, max_chars),
            );
        }
    }

    pub fn limit_text(&mut self, field: &str, value: Option<&str>, label: &str, max_chars: usize) {
        if let Some(value) = value {
            if value.chars().count() > max_chars {
                self.add(
                    field,
                    format!("{} must be at most {} characters", label, max_chars),
                );
            }
        }
    }

    /// Positive amount with at most `integer` whole digits and `fraction` decimal places.
    pub fn check_decimal(
        &mut self,
        field: &str,
        value: Decimal,
        label: &str,
        integer: u32,
        fraction: u32,
    ) {
        if value <= Decimal::ZERO {
            self.add(field, format!("{} must be positive", label));
            return;
        }
        let integer_digits = value.trunc().to_string().trim_start_matches('-').len() as u32;
        if integer_digits > integer || value.normalize().scale() > fraction {
            self.add(
                field,
                format!(
                    "{} must have at most {} integer digits and {} decimal places",
                    label, integer, fraction
                ),
            );
        }
    }
}
