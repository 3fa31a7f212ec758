//! Declarative object validation.
//!
//! A [`Schema`] is a registration table mapping each field of a type to an
//! accessor and a list of rule factories. [`resolve_and_validate`] walks the
//! table, builds fresh rules for every field, evaluates them against the
//! field's current value and collects a [`ValidationResult`].
//!
//! Types usually get their schema from `#[derive(Validate)]`; writing one by
//! hand looks like this:
//!
//! ```
//! use palisade_validation::{Schema, Validate, rules};
//!
//! struct Person {
//!     first_name: String,
//!     age: u32,
//! }
//!
//! impl Validate for Person {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .field("first_name", |p: &Person| p.first_name.clone(), |f| {
//!                 f.rule(rules::required).rule(|| rules::max_length(10))
//!             })
//!             .field("age", |p: &Person| p.age, |f| {
//!                 f.display_name("User Age").rule(|| rules::min(18))
//!             })
//!     }
//! }
//!
//! let person = Person { first_name: "Christopher".into(), age: 16 };
//! let result = person.validate();
//! assert!(!result.is_valid());
//! assert_eq!(
//!     result.error_messages(),
//!     [
//!         "First Name is more than the maximum length of 10",
//!         "User Age is not greater than 18",
//!     ]
//! );
//! ```

use crate::config;
use crate::result::ValidationResult;
use crate::rule::{Field, Rule};
use crate::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type Factory = Arc<dyn Fn() -> Box<dyn Rule> + Send + Sync>;

/// Registration for one field: how to read it and which rules apply.
pub struct FieldSpec<T> {
    name: String,
    display_name: Option<String>,
    accessor: Accessor<T>,
    factories: Vec<Factory>,
}

impl<T> FieldSpec<T> {
    fn new(name: String, accessor: Accessor<T>) -> Self {
        Self {
            name,
            display_name: None,
            accessor,
            factories: Vec::new(),
        }
    }

    /// Attach a rule factory; it is called once per validation run.
    pub fn rule<F, R>(mut self, factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Rule + 'static,
    {
        self.factories
            .push(Arc::new(move || Box::new(factory()) as Box<dyn Rule>));
        self
    }

    /// Override the name used in messages.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule_count(&self) -> usize {
        self.factories.len()
    }

    /// Explicit override, else the humanized field name (unless disabled in config).
    pub fn resolved_display_name(&self) -> Cow<'_, str> {
        match &self.display_name {
            Some(name) => Cow::Borrowed(name),
            None if config::config().humanize_field_names => Cow::Owned(humanize(&self.name)),
            None => Cow::Borrowed(&self.name),
        }
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("rules", &self.factories.len())
            .finish()
    }
}

/// Ordered registration table for the fields of `T`.
pub struct Schema<T> {
    fields: Vec<FieldSpec<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("fields", &self.fields).finish()
    }
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field.
    ///
    /// `accessor` snapshots the field's current value; `configure` attaches
    /// rules and an optional display name.
    pub fn field<A, V, C>(mut self, name: impl Into<String>, accessor: A, configure: C) -> Self
    where
        A: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
        C: FnOnce(FieldSpec<T>) -> FieldSpec<T>,
    {
        let accessor: Accessor<T> = Arc::new(move |target: &T| accessor(target).into());
        self.fields
            .push(configure(FieldSpec::new(name.into(), accessor)));
        self
    }

    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    /// Validate `target`, optionally restricted to the named fields.
    ///
    /// Fields without rules never appear in the result. Every rule of every
    /// selected field runs, whatever the outcome of the others.
    pub fn validate(&self, target: &T, only: Option<&[&str]>) -> ValidationResult {
        let mut result = ValidationResult::new();

        let selected = self
            .fields
            .iter()
            .filter(|spec| !spec.factories.is_empty())
            .filter(|spec| only.is_none_or(|names| names.contains(&spec.name.as_str())));

        for spec in selected {
            let display_name = spec.resolved_display_name();
            let field = Field::new(spec.name.as_str()).with_display_name(&*display_name);
            let value = (spec.accessor)(target);
            let field_result = result.entry(&spec.name, &display_name);

            for factory in &spec.factories {
                let mut rule = factory();
                rule.evaluate(&value, &field);
                field_result.push(rule);
            }
        }

        tracing::debug!(
            target: "palisade::object",
            object = std::any::type_name::<T>(),
            fields = result.len(),
            valid = result.is_valid(),
            "object validated"
        );

        result
    }
}

/// Types that carry a declarative validation schema.
pub trait Validate: Sized {
    fn schema() -> Schema<Self>;

    /// Validate every field that has rules.
    fn validate(&self) -> ValidationResult {
        resolve_and_validate(self, None)
    }

    /// Validate only the named fields.
    fn validate_only(&self, fields: &[&str]) -> ValidationResult {
        resolve_and_validate(self, Some(fields))
    }
}

/// Build `T`'s schema and validate `target` against it.
pub fn resolve_and_validate<T: Validate>(target: &T, only: Option<&[&str]>) -> ValidationResult {
    T::schema().validate(target, only)
}

/// Turn an identifier into words: `"FirstName"` and `"first_name"` both become
/// `"First Name"`, `"HTMLParser"` becomes `"HTML Parser"`.
pub fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| {
                p.is_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
            });

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
