// Per-field and per-object validation results

use crate::rule::Rule;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every rule evaluated against one field.
#[derive(Debug, Clone)]
pub struct FieldResult {
    field_name: String,
    display_name: String,
    rules: Vec<Box<dyn Rule>>,
}

impl FieldResult {
    pub fn new(field_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            display_name: display_name.into(),
            rules: Vec::new(),
        }
    }

    /// Record an already-evaluated rule.
    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// `true` when every rule passed.
    pub fn is_valid(&self) -> bool {
        self.rules.iter().all(|rule| rule.is_valid())
    }

    /// Messages of the failed rules, in rule order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.failed_rules()
            .into_iter()
            .flat_map(|rule| rule.error_messages())
            .collect()
    }

    pub fn failed_rules(&self) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .filter(|rule| !rule.is_valid())
            .map(|rule| &**rule)
            .collect()
    }

    /// One [`FieldError`] per failure message.
    pub fn errors(&self) -> Vec<FieldError> {
        self.failed_rules()
            .into_iter()
            .flat_map(|rule| {
                rule.error_messages().into_iter().map(move |message| FieldError {
                    field: self.field_name.clone(),
                    display_name: self.display_name.clone(),
                    message: message.to_string(),
                    rule: rule.name().to_string(),
                    value: rule.input().as_text().map(|text| text.into_owned()),
                })
            })
            .collect()
    }
}

/// A single failure, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field key used for lookup
    pub field: String,

    pub display_name: String,

    /// Full message, subject included
    pub message: String,

    /// Name of the rule that failed
    pub rule: String,

    /// Textual form of the rejected value, when it has one
    pub value: Option<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating an object: one [`FieldResult`] per validated field,
/// in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    fields: IndexMap<String, FieldResult>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// The result for `field_name`, created on first use.
    pub fn entry(&mut self, field_name: &str, display_name: &str) -> &mut FieldResult {
        self.fields
            .entry(field_name.to_string())
            .or_insert_with(|| FieldResult::new(field_name, display_name))
    }

    /// `true` when every field passed.
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(FieldResult::is_valid)
    }

    /// All failure messages, by field then by rule.
    pub fn error_messages(&self) -> Vec<&str> {
        self.fields
            .values()
            .flat_map(FieldResult::error_messages)
            .collect()
    }

    /// Failure messages keyed by field; passing fields are omitted.
    pub fn field_error_messages(&self) -> IndexMap<&str, Vec<&str>> {
        self.fields
            .iter()
            .filter(|(_, result)| !result.is_valid())
            .map(|(name, result)| (name.as_str(), result.error_messages()))
            .collect()
    }

    pub fn get_field_result(&self, field_name: &str) -> Option<&FieldResult> {
        self.fields.get(field_name)
    }

    /// Like [`get_field_result`](Self::get_field_result), for callers that
    /// treat a missing field as an error.
    pub fn field(&self, field_name: &str) -> Result<&FieldResult> {
        self.get_field_result(field_name)
            .ok_or_else(|| Error::UnknownField(field_name.to_string()))
    }

    pub fn field_results(&self) -> impl Iterator<Item = &FieldResult> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every failure, flattened.
    pub fn errors(&self) -> Vec<FieldError> {
        self.fields.values().flat_map(FieldResult::errors).collect()
    }

    /// JSON summary of the verdict and failures.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "valid": self.is_valid(),
            "errors": self.errors(),
        })
    }

    /// [`to_json`](Self::to_json) rendered as a string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in self.errors() {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}
