// Fluent builder and reusable rule sets

use crate::aggregate::Aggregate;
use crate::rule::{Field, Rule};
use crate::rules::{self, Bound};
use crate::Value;
use chrono::NaiveDateTime;

/// Chainable rule registration.
///
/// [`add_rule`](Fluent::add_rule) is the one required method; every other
/// verb is sugar over it. Host crates add their own verbs with an extension
/// trait:
///
/// ```
/// use palisade_validation::{Aggregate, Eval, Fluent, rules};
///
/// trait PostCode: Fluent {
///     fn is_post_code(self) -> Self {
///         self.add_rule(
///             Aggregate::new("post_code")
///                 .with_rule(rules::exact_length(4))
///                 .with_rule(rules::numeric()),
///         )
///     }
/// }
///
/// impl<T: Fluent> PostCode for T {}
///
/// assert!(Eval::new("4000").field("Post Code").is_post_code().is_valid());
/// ```
pub trait Fluent: Sized {
    /// Append a rule; it runs after every rule already registered.
    fn add_rule<R: Rule + 'static>(self, rule: R) -> Self;

    // Presence

    /// At least one character or item.
    fn required(self) -> Self {
        self.add_rule(rules::required())
    }

    fn is_null(self) -> Self {
        self.add_rule(rules::is_null())
    }

    fn is_not_null(self) -> Self {
        self.add_rule(rules::not_null())
    }

    fn is_empty(self) -> Self {
        self.add_rule(rules::empty())
    }

    fn is_not_empty(self) -> Self {
        self.add_rule(rules::not_empty())
    }

    // Length

    /// Inclusive bounds on character (or item) count.
    fn has_length(self, min: usize, max: usize) -> Self {
        self.add_rule(rules::has_length(min, Some(max)))
    }

    fn has_exact_length(self, len: usize) -> Self {
        self.add_rule(rules::exact_length(len))
    }

    fn has_min_length(self, len: usize) -> Self {
        self.add_rule(rules::min_length(len))
    }

    fn has_max_length(self, len: usize) -> Self {
        self.add_rule(rules::max_length(len))
    }

    // Text

    fn is_numeric(self) -> Self {
        self.add_rule(rules::numeric())
    }

    fn is_alpha_text(self) -> Self {
        self.add_rule(rules::alpha_text())
    }

    fn is_alpha_numeric(self) -> Self {
        self.add_rule(rules::alpha_numeric())
    }

    fn is_alpha_numeric_hyphen(self) -> Self {
        self.add_rule(rules::alpha_numeric_hyphen())
    }

    fn is_name_text(self) -> Self {
        self.add_rule(rules::name_text())
    }

    fn is_email_address(self) -> Self {
        self.add_rule(rules::email())
    }

    fn is_url(self) -> Self {
        self.add_rule(rules::url())
    }

    fn is_phone_number(self) -> Self {
        self.add_rule(rules::phone())
    }

    fn is_hex_color(self) -> Self {
        self.add_rule(rules::hex_color())
    }

    fn is_credit_card(self) -> Self {
        self.add_rule(rules::credit_card())
    }

    fn is_us_state(self) -> Self {
        self.add_rule(rules::us_state())
    }

    fn is_safe_text(self) -> Self {
        self.add_rule(rules::safe_text())
    }

    fn is_xss_safe(self) -> Self {
        self.add_rule(rules::xss_safe())
    }

    fn is_sql_safe(self) -> Self {
        self.add_rule(rules::sql_safe())
    }

    /// Match a caller-supplied regular expression.
    fn matches(self, pattern: impl Into<String>) -> Self {
        self.add_rule(rules::pattern(pattern))
    }

    // Membership and equality

    /// Input (or every item of a list input) must be one of `items`.
    fn is_in<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_rule(rules::in_collection(items))
    }

    fn is_in_ignore_case<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_rule(rules::in_collection_ignore_case(items))
    }

    fn equals(self, expected: impl Into<String>) -> Self {
        self.add_rule(rules::string_equals(expected))
    }

    fn equals_ignore_case(self, expected: impl Into<String>) -> Self {
        self.add_rule(rules::string_equals_ignore_case(expected))
    }

    fn not_equals(self, expected: impl Into<String>) -> Self {
        self.add_rule(rules::string_not_equals(expected))
    }

    fn not_equals_ignore_case(self, expected: impl Into<String>) -> Self {
        self.add_rule(rules::string_not_equals_ignore_case(expected))
    }

    fn contains(self, needle: impl Into<String>) -> Self {
        self.add_rule(rules::contains(needle))
    }

    fn contains_any<I, S>(self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_rule(rules::contains_any(needles))
    }

    fn contains_ignore_case(self, needle: impl Into<String>) -> Self {
        self.add_rule(rules::contains_ignore_case(needle))
    }

    fn not_contains(self, needle: impl Into<String>) -> Self {
        self.add_rule(rules::not_contains(needle))
    }

    fn not_contains_any<I, S>(self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_rule(rules::not_contains_any(needles))
    }

    fn not_contains_ignore_case(self, needle: impl Into<String>) -> Self {
        self.add_rule(rules::not_contains_ignore_case(needle))
    }

    fn is_traversal_safe(self) -> Self {
        self.add_rule(rules::traversal_safe())
    }

    // Numbers

    fn min(self, bound: impl Into<Bound>) -> Self {
        self.add_rule(rules::min(bound))
    }

    fn max(self, bound: impl Into<Bound>) -> Self {
        self.add_rule(rules::max(bound))
    }

    fn is_int(self) -> Self {
        self.add_rule(rules::int())
    }

    fn is_double(self) -> Self {
        self.add_rule(rules::double())
    }

    fn is_decimal(self) -> Self {
        self.add_rule(rules::decimal())
    }

    fn is_bool(self) -> Self {
        self.add_rule(rules::boolean())
    }

    fn is_bool_equal(self, expected: bool) -> Self {
        self.add_rule(rules::bool_equals(expected))
    }

    fn is_guid(self) -> Self {
        self.add_rule(rules::guid())
    }

    fn is_currency(self, require_symbol: bool) -> Self {
        self.add_rule(rules::currency(require_symbol))
    }

    // Dates

    fn min_date(self, min: NaiveDateTime) -> Self {
        self.add_rule(rules::min_date(min))
    }

    fn max_date(self, max: NaiveDateTime) -> Self {
        self.add_rule(rules::max_date(max))
    }

    fn is_after(self, date: NaiveDateTime) -> Self {
        self.add_rule(rules::is_after(date))
    }

    fn is_before(self, date: NaiveDateTime) -> Self {
        self.add_rule(rules::is_before(date))
    }

    fn is_between_dates(self, min: NaiveDateTime, max: NaiveDateTime) -> Self {
        self.add_rule(rules::between_dates(min, max))
    }

    fn is_sql_safe_date(self) -> Self {
        self.add_rule(rules::sql_safe_date())
    }

    fn is_date(self) -> Self {
        self.add_rule(rules::date())
    }

    fn is_iso_date(self) -> Self {
        self.add_rule(rules::iso_date())
    }

    fn is_iso_time(self) -> Self {
        self.add_rule(rules::iso_time())
    }

    fn is_iso_date_time(self) -> Self {
        self.add_rule(rules::iso_date_time())
    }

    // Files and identifiers

    fn is_jpg(self) -> Self {
        self.add_rule(rules::jpg())
    }

    fn is_png(self) -> Self {
        self.add_rule(rules::png())
    }

    fn is_gif(self) -> Self {
        self.add_rule(rules::gif())
    }

    fn is_abn(self) -> Self {
        self.add_rule(rules::abn())
    }
}

/// A reusable, value-free list of rules.
///
/// Cloning copies every rule, so builders seeded from the same set never
/// share rule state.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Wrap the rules in a single aggregate.
    pub fn into_aggregate(self, name: &'static str) -> Aggregate {
        self.rules
            .into_iter()
            .fold(Aggregate::new(name), |mut aggregate, rule| {
                aggregate.add_boxed(rule);
                aggregate
            })
    }
}

impl Fluent for RuleSet {
    fn add_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

#[derive(Debug, Clone)]
struct Verdict {
    valid: bool,
    messages: Vec<String>,
}

/// One validation session for one captured value.
///
/// Rules run in registration order. [`validate`](Eval::validate) and
/// [`apply`](Eval::apply) always re-run them; [`is_valid`](Eval::is_valid),
/// [`error_messages`](Eval::error_messages) and the callbacks reuse the last
/// verdict until a rule is added, the rule list is replaced, or the field or
/// display name changes.
///
/// ```
/// use palisade_validation::{Eval, Fluent};
///
/// let mut name = Eval::new("ABCD")
///     .field("Name")
///     .required()
///     .has_length(0, 3)
///     .is_alpha_text();
///
/// assert!(!name.validate());
/// assert_eq!(
///     name.error_messages(),
///     ["Name is not a valid length. Must have a length of between 0 and 3."]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Eval {
    value: Value,
    field: Field,
    rules: Vec<Box<dyn Rule>>,
    verdict: Option<Verdict>,
}

/// Start a session for `value` bound to `field_name`.
pub fn eval(value: impl Into<Value>, field_name: impl Into<String>) -> Eval {
    Eval::new(value).field(field_name)
}

impl Eval {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            field: Field::default(),
            rules: Vec::new(),
            verdict: None,
        }
    }

    /// Start a session pre-loaded with a copy of `set`.
    pub fn from_set(value: impl Into<Value>, set: &RuleSet) -> Self {
        Self::new(value).seed(set)
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field.set_name(name);
        self.verdict = None;
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.field.set_display_name(Some(name.into()));
        self.verdict = None;
        self
    }

    /// Append a copy of every rule in `set`.
    pub fn seed(mut self, set: &RuleSet) -> Self {
        self.rules.extend(set.rules.iter().cloned());
        self.verdict = None;
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn field_name(&self) -> &str {
        self.field.name()
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Snapshot the registered rules as a reusable set.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            rules: self.rules.clone(),
        }
    }

    /// Run every rule and return the combined verdict.
    pub fn validate(&mut self) -> bool {
        self.run().valid
    }

    /// Replace the rule list with a copy of `set`, then validate.
    pub fn validate_with(&mut self, set: &RuleSet) -> bool {
        self.rules = set.rules.clone();
        self.validate()
    }

    /// Like [`validate`](Eval::validate); always re-runs.
    pub fn apply(&mut self) -> bool {
        self.validate()
    }

    /// The last verdict, evaluating first if needed.
    pub fn is_valid(&mut self) -> bool {
        self.verdict().valid
    }

    /// Failure messages in rule order, evaluating first if needed.
    pub fn error_messages(&mut self) -> &[String] {
        &self.verdict().messages
    }

    /// Rules that failed the last evaluation, evaluating first if needed.
    pub fn failed_rules(&mut self) -> Vec<&dyn Rule> {
        self.verdict();
        self.failed()
    }

    /// Call `on_success` when the value is valid.
    pub fn success<F: FnOnce()>(mut self, on_success: F) -> Self {
        if self.verdict().valid {
            on_success();
        }
        self
    }

    /// Call `on_fail` with the messages and failed rules when the value is invalid.
    pub fn fail<F: FnOnce(&[String], &[&dyn Rule])>(mut self, on_fail: F) -> Self {
        if !self.verdict().valid {
            let messages = self
                .verdict
                .as_ref()
                .map(|verdict| verdict.messages.as_slice())
                .unwrap_or_default();
            on_fail(messages, &self.failed());
        }
        self
    }

    fn failed(&self) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .filter(|rule| !rule.is_valid())
            .map(|rule| &**rule)
            .collect()
    }

    fn verdict(&mut self) -> &Verdict {
        if self.verdict.is_none() {
            self.run();
        }
        self.verdict.get_or_insert_with(|| Verdict {
            valid: true,
            messages: Vec::new(),
        })
    }

    fn run(&mut self) -> &Verdict {
        let mut valid = true;
        for rule in &mut self.rules {
            valid &= rule.evaluate(&self.value, &self.field);
        }

        let messages: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| !rule.is_valid())
            .flat_map(|rule| rule.error_messages())
            .map(str::to_string)
            .collect();

        tracing::debug!(
            target: "palisade::builder",
            field = self.field.name(),
            rules = self.rules.len(),
            valid,
            "value evaluated"
        );

        self.verdict.insert(Verdict { valid, messages })
    }
}

impl Fluent for Eval {
    fn add_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self.verdict = None;
        self
    }
}
