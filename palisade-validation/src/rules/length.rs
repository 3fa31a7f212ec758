// Length rules over text (characters) and lists (items)

use crate::rule::{Check, Outcome};
use crate::{Error, Result, Value};

/// Inclusive length bounds; `max: None` leaves the upper end open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    min: usize,
    max: Option<usize>,
}

impl Length {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Like [`Length::new`] but rejects bounds that no input can satisfy.
    pub fn try_new(min: usize, max: Option<usize>) -> Result<Self> {
        match max {
            Some(max) if min > max => Err(Error::InvalidBounds { min, max }),
            _ => Ok(Self::new(min, max)),
        }
    }

    pub fn exact(len: usize) -> Self {
        Self::new(len, Some(len))
    }

    fn range_text(&self) -> String {
        match self.max {
            Some(max) if max == self.min => format!("of {}", max),
            Some(max) => format!("of between {} and {}", self.min, max),
            None => format!("of at least {}", self.min),
        }
    }

    fn within(&self, len: usize) -> bool {
        len >= self.min && self.max.is_none_or(|max| len <= max)
    }
}

impl Check for Length {
    fn check(&self, input: &Value) -> Outcome {
        match input {
            Value::Null if self.min == 0 => Outcome::Valid,
            Value::Null => Outcome::fail(format!(
                "has no data (null) and is not valid. Must have a length {}.",
                self.range_text()
            )),
            Value::List(items) => Outcome::valid_if(
                self.within(items.len()),
                format!("is not valid. Must have a length {}.", self.range_text()),
            ),
            other => Outcome::valid_if(
                other.len().is_some_and(|len| self.within(len)),
                format!("is not a valid length. Must have a length {}.", self.range_text()),
            ),
        }
    }

    fn name(&self) -> &str {
        "length"
    }
}

/// Minimum length; `Null` passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(pub usize);

impl Check for MinLength {
    fn check(&self, input: &Value) -> Outcome {
        match input.len() {
            None if input.is_null() => Outcome::Valid,
            Some(len) if len >= self.0 => Outcome::Valid,
            _ => Outcome::fail(format!(
                "does not meet the minimum length requirement of {}",
                self.0
            )),
        }
    }

    fn name(&self) -> &str {
        "min_length"
    }
}

/// Maximum length; `Null` passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength(pub usize);

impl Check for MaxLength {
    fn check(&self, input: &Value) -> Outcome {
        match input.len() {
            None if input.is_null() => Outcome::Valid,
            Some(len) if len <= self.0 => Outcome::Valid,
            _ => Outcome::fail(format!("is more than the maximum length of {}", self.0)),
        }
    }

    fn name(&self) -> &str {
        "max_length"
    }
}
