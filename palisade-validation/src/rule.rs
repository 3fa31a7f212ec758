// Rule engine primitives: outcomes, bound state, and the leaf wrapper

use crate::Value;
use crate::config;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Result of a single check, before it is attached to a field.
///
/// A failing check carries only the predicate ("is not a valid number.");
/// the subject is prepended when the outcome is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid(Cow<'static, str>),
}

impl Outcome {
    pub fn fail(predicate: impl Into<Cow<'static, str>>) -> Self {
        Outcome::Invalid(predicate.into())
    }

    /// `Valid` when `condition` holds, otherwise a failure with `predicate`.
    pub fn valid_if(condition: bool, predicate: impl Into<Cow<'static, str>>) -> Self {
        if condition {
            Outcome::Valid
        } else {
            Outcome::Invalid(predicate.into())
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }
}

/// The pure evaluation hook implemented by every leaf rule.
///
/// Implementations inspect the input and report an [`Outcome`]; they never
/// see or mutate the bound field, validity, or message.
pub trait Check: fmt::Debug + Clone + Send + Sync + 'static {
    fn check(&self, input: &Value) -> Outcome;

    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;
}

/// The field a rule is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    display_name: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The name used at the start of failure messages.
    pub fn subject(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(config::config().default_field_name.clone())
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

/// Tri-state verdict of the last evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Pending,
    Valid,
    Invalid,
}

/// Mutable state carried by every rule between evaluations.
#[derive(Debug, Clone, Default)]
pub struct RuleState {
    input: Value,
    field: Field,
    validity: Validity,
    message: String,
}

impl RuleState {
    pub fn bind(&mut self, input: &Value, field: &Field) {
        self.input = input.clone();
        self.field = field.clone();
    }

    pub fn succeed(&mut self) {
        self.validity = Validity::Valid;
        self.message.clear();
    }

    /// Record a failure as `"{subject} {predicate}"`.
    pub fn fail(&mut self, predicate: &str) {
        self.validity = Validity::Invalid;
        self.message = format!("{} {}", self.field.subject(), predicate);
    }

    /// Record a failure whose message is already composed.
    pub(crate) fn fail_with_message(&mut self, message: String) {
        self.validity = Validity::Invalid;
        self.message = message;
    }

    /// Apply `outcome` and return the resulting validity.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Valid => self.succeed(),
            Outcome::Invalid(predicate) => self.fail(&predicate),
        }
        self.validity == Validity::Valid
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A bound, evaluable constraint.
///
/// Every `validate*` entry point binds the input and field, runs the check,
/// records validity plus message, and returns the verdict. The message is
/// non-empty exactly when the last evaluation failed.
///
/// A rule holds the state of its last evaluation and must not be evaluated
/// from two places at once.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Bind `input` to `field` and evaluate.
    fn evaluate(&mut self, input: &Value, field: &Field) -> bool;

    fn state(&self) -> &RuleState;

    fn name(&self) -> &str;

    /// Deep copy, including any child rules.
    fn clone_rule(&self) -> Box<dyn Rule>;

    /// Flattened failure messages; aggregates list one entry per failed child.
    fn error_messages(&self) -> Vec<&str> {
        let message = self.error_message();
        if message.is_empty() {
            Vec::new()
        } else {
            vec![message]
        }
    }

    /// Evaluate against the last bound (or default) field.
    fn validate(&mut self, input: &Value) -> bool {
        let field = self.state().field().clone();
        self.evaluate(input, &field)
    }

    fn validate_field(&mut self, input: &Value, field_name: &str) -> bool {
        self.evaluate(input, &Field::new(field_name))
    }

    fn validate_display(&mut self, input: &Value, field_name: &str, display_name: &str) -> bool {
        self.evaluate(input, &Field::new(field_name).with_display_name(display_name))
    }

    /// Evaluate and hand back the message alongside the verdict.
    fn validate_message(&mut self, input: &Value, field_name: &str) -> (bool, String) {
        let valid = self.validate_field(input, field_name);
        (valid, self.error_message().to_string())
    }

    fn is_valid(&self) -> bool {
        self.state().validity() == Validity::Valid
    }

    fn validity(&self) -> Validity {
        self.state().validity()
    }

    fn error_message(&self) -> &str {
        self.state().message()
    }

    fn field_name(&self) -> &str {
        self.state().field().name()
    }

    fn display_name(&self) -> Option<&str> {
        self.state().field().display_name()
    }

    fn input(&self) -> &Value {
        self.state().input()
    }
}

impl Clone for Box<dyn Rule> {
    fn clone(&self) -> Self {
        self.clone_rule()
    }
}

/// Wraps a [`Check`] with the bind, evaluate, record cycle.
#[derive(Debug, Clone)]
pub struct Leaf<C> {
    check: C,
    state: RuleState,
}

impl<C: Check> Leaf<C> {
    pub fn new(check: C) -> Self {
        Self {
            check,
            state: RuleState::default(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.check
    }
}

impl<C: Check + Default> Default for Leaf<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: Check> Rule for Leaf<C> {
    fn evaluate(&mut self, input: &Value, field: &Field) -> bool {
        self.state.bind(input, field);
        let outcome = self.check.check(input);
        let valid = self.state.record(outcome);
        if !valid {
            tracing::trace!(
                target: "palisade::rule",
                rule = self.check.name(),
                field = field.name(),
                "{}",
                self.state.message()
            );
        }
        valid
    }

    fn state(&self) -> &RuleState {
        &self.state
    }

    fn name(&self) -> &str {
        self.check.name()
    }

    fn clone_rule(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }
}

type CheckFn = Arc<dyn Fn(&Value) -> Outcome + Send + Sync>;

/// Closure-backed check for one-off constraints.
#[derive(Clone)]
pub struct Custom {
    name: Cow<'static, str>,
    check: CheckFn,
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("name", &self.name).finish()
    }
}

impl Check for Custom {
    fn check(&self, input: &Value) -> Outcome {
        (self.check)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build a rule from a closure.
///
/// ```
/// use palisade_validation::{Outcome, Rule, Value, custom};
///
/// let mut even = custom("even", |v: &Value| match v {
///     Value::Int(i) => Outcome::valid_if(i % 2 == 0, "must be even."),
///     _ => Outcome::Valid,
/// });
/// assert!(!even.validate_field(&Value::from(3), "Count"));
/// assert_eq!(even.error_message(), "Count must be even.");
/// ```
pub fn custom<F>(name: impl Into<Cow<'static, str>>, check: F) -> Leaf<Custom>
where
    F: Fn(&Value) -> Outcome + Send + Sync + 'static,
{
    Leaf::new(Custom {
        name: name.into(),
        check: Arc::new(check),
    })
}

/// Run a default-constructed check once.
///
/// ```
/// use palisade_validation::{is_valid, rules::Numeric};
///
/// assert!(is_valid::<Numeric>("12345", "Account"));
/// ```
pub fn is_valid<C: Check + Default>(input: impl Into<Value>, field_name: &str) -> bool {
    Leaf::new(C::default()).validate_field(&input.into(), field_name)
}

/// Like [`is_valid`] but returns the failure message when the input is rejected.
pub fn is_not_valid<C: Check + Default>(input: impl Into<Value>, field_name: &str) -> Option<String> {
    let (valid, message) = Leaf::new(C::default()).validate_message(&input.into(), field_name);
    (!valid).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Positive;

    impl Check for Positive {
        fn check(&self, input: &Value) -> Outcome {
            match input {
                Value::Null => Outcome::Valid,
                Value::Int(i) => Outcome::valid_if(*i > 0, "must be positive."),
                _ => Outcome::fail("is not a number."),
            }
        }

        fn name(&self) -> &str {
            "positive"
        }
    }

    #[test]
    fn test_pending_before_evaluation() {
        let rule = Leaf::new(Positive);
        assert_eq!(rule.validity(), Validity::Pending);
        assert!(!rule.is_valid());
        assert_eq!(rule.error_message(), "");
    }

    #[test]
    fn test_default_field_name_in_message() {
        let mut rule = Leaf::new(Positive);
        assert!(!rule.validate(&Value::from(-1)));
        assert_eq!(rule.error_message(), "The Field must be positive.");
        assert_eq!(rule.field_name(), "The Field");
    }

    #[test]
    fn test_display_name_overrides_subject() {
        let mut rule = Leaf::new(Positive);
        assert!(!rule.validate_field(&Value::from(-5), "Age"));
        assert!(rule.error_message().starts_with("Age "));

        assert!(!rule.validate_display(&Value::from(-5), "Age", "User Age"));
        assert!(rule.error_message().starts_with("User Age "));
        assert_eq!(rule.field_name(), "Age");
        assert_eq!(rule.display_name(), Some("User Age"));
    }

    #[test]
    fn test_message_cleared_on_success() {
        let mut rule = Leaf::new(Positive);
        rule.validate_field(&Value::from(-1), "Count");
        assert!(!rule.error_message().is_empty());

        assert!(rule.validate_field(&Value::from(1), "Count"));
        assert_eq!(rule.validity(), Validity::Valid);
        assert_eq!(rule.error_message(), "");
        assert!(rule.error_messages().is_empty());
    }

    #[test]
    fn test_validate_reuses_last_field() {
        let mut rule = Leaf::new(Positive);
        rule.validate_field(&Value::from(1), "Quantity");
        rule.validate(&Value::from(0));
        assert_eq!(rule.error_message(), "Quantity must be positive.");
        assert!(matches!(rule.input(), Value::Int(0)));
    }

    #[test]
    fn test_validate_message() {
        let mut rule = Leaf::new(Positive);
        let (valid, message) = rule.validate_message(&Value::from("x"), "Count");
        assert!(!valid);
        assert_eq!(message, "Count is not a number.");
    }

    #[test]
    fn test_clone_rule_is_independent() {
        let mut rule = Leaf::new(Positive);
        rule.validate_field(&Value::from(-1), "A");
        let mut copy = rule.clone_rule();
        copy.validate_field(&Value::from(1), "B");

        assert!(!rule.is_valid());
        assert!(copy.is_valid());
        assert_eq!(rule.field_name(), "A");
    }

    #[test]
    fn test_custom_rule() {
        let mut rule = custom("non_zero", |v: &Value| {
            Outcome::valid_if(!matches!(v, Value::Int(0)), "cannot be zero.")
        });
        assert!(rule.validate_field(&Value::from(4), "Divisor"));
        assert!(!rule.validate_field(&Value::from(0), "Divisor"));
        assert_eq!(rule.error_message(), "Divisor cannot be zero.");
        assert_eq!(rule.name(), "non_zero");
    }

    #[test]
    fn test_static_helpers() {
        assert!(is_valid::<Positive>(5, "Count"));
        assert_eq!(
            is_not_valid::<Positive>(-2, "Count").as_deref(),
            Some("Count must be positive.")
        );
        assert_eq!(is_not_valid::<Positive>(2, "Count"), None);
    }
}
