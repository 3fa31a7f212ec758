// Imperative per-object validator built from fluent sessions

use crate::builder::Eval;
use std::fmt;

/// A named group of [`Eval`] sessions validated together.
///
/// Useful when a type's rules depend on each other or on runtime data and so
/// cannot be expressed as a declarative schema.
///
/// ```
/// use palisade_validation::{Fluent, ObjectValidator, eval};
///
/// let mut order = ObjectValidator::new("Order");
/// order
///     .check(eval(0, "Quantity").min(1))
///     .check(eval("EXPRESS", "Shipping").is_in(["STANDARD", "EXPRESS"]));
///
/// assert!(!order.is_valid());
/// assert_eq!(order.to_string(), "Order is Invalid Errors: Quantity is not greater than 1");
/// ```
#[derive(Debug, Clone)]
pub struct ObjectValidator {
    name: String,
    checks: Vec<Eval>,
    verdict: Option<bool>,
    messages: Vec<String>,
}

impl ObjectValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
            verdict: None,
            messages: Vec::new(),
        }
    }

    /// Named after the last path segment of `T`.
    pub fn for_type<T>() -> Self {
        let full = std::any::type_name::<T>();
        Self::new(full.rsplit("::").next().unwrap_or(full))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a session; the next query re-validates.
    pub fn check(&mut self, eval: Eval) -> &mut Self {
        self.checks.push(eval);
        self.verdict = None;
        self
    }

    pub fn checks(&self) -> &[Eval] {
        &self.checks
    }

    /// Run every session and collect their messages in order.
    pub fn validate(&mut self) -> bool {
        let mut messages = Vec::new();
        for check in &mut self.checks {
            if !check.validate() {
                messages.extend_from_slice(check.error_messages());
            }
        }
        let valid = messages.is_empty();
        tracing::debug!(
            target: "palisade::object",
            object = %self.name,
            checks = self.checks.len(),
            valid,
            "object validator evaluated"
        );
        self.messages = messages;
        self.verdict = Some(valid);
        valid
    }

    /// The last verdict, validating first if anything changed since.
    pub fn is_valid(&mut self) -> bool {
        match self.verdict {
            Some(valid) => valid,
            None => self.validate(),
        }
    }

    pub fn error_messages(&mut self) -> &[String] {
        self.is_valid();
        &self.messages
    }

    /// Drop every session and cached result.
    pub fn reset(&mut self) {
        self.checks.clear();
        self.messages.clear();
        self.verdict = None;
    }
}

impl fmt::Display for ObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let evaluated;
        let (valid, messages) = match self.verdict {
            Some(valid) => (valid, &self.messages),
            None => {
                let mut snapshot = self.clone();
                let valid = snapshot.validate();
                evaluated = snapshot.messages;
                (valid, &evaluated)
            }
        };
        if valid {
            write!(f, "{} is Valid", self.name)
        } else {
            write!(f, "{} is Invalid Errors: {}", self.name, messages.join(", "))
        }
    }
}
