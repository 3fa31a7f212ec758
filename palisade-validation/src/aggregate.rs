// Rule combinator: every child must pass

use crate::rule::{Field, Rule, RuleState};
use crate::Value;
use std::borrow::Cow;

/// A rule composed of child rules.
///
/// Children run in registration order against the same input and field, with
/// no short-circuiting. The aggregate is valid only when every child is, and
/// its messages are the failed children's messages in registration order,
/// rebuilt on every evaluation.
///
/// ```
/// use palisade_validation::{Aggregate, Rule, Value, rules};
///
/// let mut post_code = Aggregate::new("post_code")
///     .with_rule(rules::has_length(4, Some(4)))
///     .with_rule(rules::numeric());
///
/// assert!(post_code.validate_field(&Value::from("4000"), "Post Code"));
/// assert!(!post_code.validate_field(&Value::from("40a"), "Post Code"));
/// assert_eq!(post_code.error_messages().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Aggregate {
    name: Cow<'static, str>,
    rules: Vec<Box<dyn Rule>>,
    state: RuleState,
}

impl Aggregate {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            state: RuleState::default(),
        }
    }

    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    pub fn add_boxed(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rule for Aggregate {
    fn evaluate(&mut self, input: &Value, field: &Field) -> bool {
        self.state.bind(input, field);

        let mut all_valid = true;
        for rule in &mut self.rules {
            all_valid &= rule.evaluate(input, field);
        }

        if all_valid {
            self.state.succeed();
        } else {
            let message = self.error_messages().join("\n");
            self.state.fail_with_message(message);
        }

        tracing::trace!(
            target: "palisade::aggregate",
            aggregate = %self.name,
            children = self.rules.len(),
            valid = all_valid,
            "aggregate evaluated"
        );

        all_valid
    }

    fn state(&self) -> &RuleState {
        &self.state
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clone_rule(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn error_messages(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| !rule.is_valid())
            .flat_map(|rule| rule.error_messages())
            .collect()
    }
}
