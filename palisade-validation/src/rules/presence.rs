// Presence rules: the only rules that reject absent input

use crate::rule::{Check, Outcome};
use crate::Value;

fn is_blank(input: &Value) -> bool {
    match input {
        Value::List(items) => items.is_empty(),
        other => other.is_null_or_empty_text(),
    }
}

/// Passes only for `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNull;

impl Check for IsNull {
    fn check(&self, input: &Value) -> Outcome {
        Outcome::valid_if(input.is_null(), "should be null")
    }

    fn name(&self) -> &str {
        "is_null"
    }
}

/// Rejects `Null`; empty text passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl Check for NotNull {
    fn check(&self, input: &Value) -> Outcome {
        Outcome::valid_if(!input.is_null(), "requires a value")
    }

    fn name(&self) -> &str {
        "not_null"
    }
}

/// Passes for `Null`, empty text and empty lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl Check for Empty {
    fn check(&self, input: &Value) -> Outcome {
        Outcome::valid_if(is_blank(input), "is not empty")
    }

    fn name(&self) -> &str {
        "empty"
    }
}

/// Rejects `Null`, empty text and empty lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Check for NotEmpty {
    fn check(&self, input: &Value) -> Outcome {
        Outcome::valid_if(!is_blank(input), "requires a value")
    }

    fn name(&self) -> &str {
        "not_empty"
    }
}
