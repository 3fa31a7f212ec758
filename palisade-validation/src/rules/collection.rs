// Membership, containment and string equality rules

use crate::rule::{Check, Outcome};
use crate::Value;

/// Sequences rejected by the directory traversal shortcut, matched case-insensitively.
pub const TRAVERSAL_SEQUENCES: &[&str] = &["..", "/", "\\", "%2e%2e", "%2f", "%5c"];

fn fold(text: &str, ignore_case: bool) -> String {
    if ignore_case {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}

fn to_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Input must be one of a fixed set of values.
///
/// A list input passes only when every element is a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InCollection {
    items: Vec<String>,
    ignore_case: bool,
}

impl InCollection {
    pub fn new<I, S>(items: I, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = to_strings(items)
            .into_iter()
            .map(|item| fold(&item, ignore_case))
            .collect();
        Self { items, ignore_case }
    }

    fn is_member(&self, value: &Value) -> bool {
        value
            .as_text()
            .is_some_and(|text| self.items.contains(&fold(&text, self.ignore_case)))
    }
}

impl Check for InCollection {
    fn check(&self, input: &Value) -> Outcome {
        let valid = match input {
            _ if input.is_null_or_empty_text() => true,
            Value::List(values) => values.iter().all(|v| self.is_member(v)),
            other => self.is_member(other),
        };
        Outcome::valid_if(valid, "is not a valid selection.")
    }

    fn name(&self) -> &str {
        "in_collection"
    }
}

/// Text or list contents matched against a set of needles.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Needles {
    originals: Vec<String>,
    folded: Vec<String>,
    ignore_case: bool,
}

impl Needles {
    fn new(needles: Vec<String>, ignore_case: bool) -> Self {
        let folded = needles.iter().map(|n| fold(n, ignore_case)).collect();
        Self {
            originals: needles,
            folded,
            ignore_case,
        }
    }

    /// The first needle present in `input`, by original spelling.
    fn first_found(&self, input: &Value) -> Option<&str> {
        let found = |needle: &String| match input {
            Value::List(values) => values.iter().any(|v| {
                v.as_text()
                    .is_some_and(|text| fold(&text, self.ignore_case) == *needle)
            }),
            other => other
                .as_text()
                .is_some_and(|text| fold(&text, self.ignore_case).contains(needle.as_str())),
        };
        self.folded
            .iter()
            .position(found)
            .map(|i| self.originals[i].as_str())
    }
}

/// Passes when any needle occurs in the input text or list.
///
/// With no needles there is nothing to require, so every input passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains(Needles);

impl Contains {
    pub fn new<I, S>(needles: I, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Needles::new(to_strings(needles), ignore_case))
    }
}

impl Check for Contains {
    fn check(&self, input: &Value) -> Outcome {
        if input.is_null_or_empty_text() || self.0.originals.is_empty() {
            return Outcome::Valid;
        }
        Outcome::valid_if(
            self.0.first_found(input).is_some(),
            format!("must contain {}", self.0.originals.join(" or ")),
        )
    }

    fn name(&self) -> &str {
        "contains"
    }
}

/// Fails when any needle occurs in the input text or list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotContains(Needles);

impl NotContains {
    pub fn new<I, S>(needles: I, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Needles::new(to_strings(needles), ignore_case))
    }

    /// Rejects directory traversal sequences, including percent-encoded forms.
    pub fn traversal() -> Self {
        Self::new(TRAVERSAL_SEQUENCES.iter().copied(), true)
    }
}

impl Check for NotContains {
    fn check(&self, input: &Value) -> Outcome {
        if input.is_null_or_empty_text() {
            return Outcome::Valid;
        }
        match self.0.first_found(input) {
            Some(found) => Outcome::fail(format!("cannot contain {}", found)),
            None => Outcome::Valid,
        }
    }

    fn name(&self) -> &str {
        "not_contains"
    }
}

/// Text equal to an expected string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEquals {
    expected: String,
    ignore_case: bool,
    negate: bool,
}

impl StringEquals {
    pub fn new(expected: impl Into<String>, ignore_case: bool) -> Self {
        Self {
            expected: expected.into(),
            ignore_case,
            negate: false,
        }
    }

    /// Inverse: text must differ from `expected`.
    pub fn not(expected: impl Into<String>, ignore_case: bool) -> Self {
        Self {
            negate: true,
            ..Self::new(expected, ignore_case)
        }
    }
}

impl Check for StringEquals {
    fn check(&self, input: &Value) -> Outcome {
        let text = match input {
            _ if input.is_null_or_empty_text() => return Outcome::Valid,
            Value::Text(text) => text,
            _ => return Outcome::fail("is not a string"),
        };
        let equal = fold(text, self.ignore_case) == fold(&self.expected, self.ignore_case);
        if self.negate {
            Outcome::valid_if(!equal, format!("is equal to {}", self.expected))
        } else {
            Outcome::valid_if(equal, format!("is not equal to {}", self.expected))
        }
    }

    fn name(&self) -> &str {
        if self.negate {
            "string_not_equals"
        } else {
            "string_equals"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_collection() {
        let rule = InCollection::new(["Red", "Green", "Blue"], false);
        assert!(rule.check(&Value::from("Red")).is_valid());
        assert!(rule.check(&Value::Null).is_valid());
        assert_eq!(
            rule.check(&Value::from("red")),
            Outcome::fail("is not a valid selection.")
        );

        let folded = InCollection::new(["Red", "Green"], true);
        assert!(folded.check(&Value::from("GREEN")).is_valid());
    }

    #[test]
    fn test_in_collection_list_requires_all_members() {
        let rule = InCollection::new(["a", "b", "c"], false);
        assert!(rule.check(&Value::from(vec!["a", "c"])).is_valid());
        assert!(!rule.check(&Value::from(vec!["a", "z"])).is_valid());
    }

    #[test]
    fn test_in_collection_numbers() {
        let rule = InCollection::new(["1", "2"], false);
        assert!(rule.check(&Value::from(2)).is_valid());
        assert!(!rule.check(&Value::from(3)).is_valid());
    }

    #[test]
    fn test_contains() {
        let rule = Contains::new(["@"], false);
        assert!(rule.check(&Value::from("a@b")).is_valid());
        assert_eq!(rule.check(&Value::from("ab")), Outcome::fail("must contain @"));

        let any = Contains::new(["cat", "dog"], true);
        assert!(any.check(&Value::from("Hot DOG")).is_valid());
        assert_eq!(
            any.check(&Value::from("bird")),
            Outcome::fail("must contain cat or dog")
        );
    }

    #[test]
    fn test_contains_without_needles() {
        let rule = Contains::new(Vec::<String>::new(), false);
        assert!(rule.check(&Value::from("anything")).is_valid());
        assert!(rule.check(&Value::from(vec!["a", "b"])).is_valid());
        assert!(NotContains::new(Vec::<String>::new(), false)
            .check(&Value::from("anything"))
            .is_valid());
    }

    #[test]
    fn test_contains_list_items() {
        let rule = Contains::new(["admin"], true);
        assert!(rule.check(&Value::from(vec!["user", "Admin"])).is_valid());
        assert!(!rule.check(&Value::from(vec!["administrator"])).is_valid());
    }

    #[test]
    fn test_not_contains() {
        let rule = NotContains::new(["drop", "delete"], true);
        assert!(rule.check(&Value::from("select")).is_valid());
        assert_eq!(
            rule.check(&Value::from("DELETE me")),
            Outcome::fail("cannot contain delete")
        );
    }

    #[test]
    fn test_traversal() {
        let rule = NotContains::traversal();
        assert!(rule.check(&Value::from("report.pdf")).is_valid());
        assert!(!rule.check(&Value::from("../etc/passwd")).is_valid());
        assert!(!rule.check(&Value::from("dir\\file")).is_valid());
        assert!(!rule.check(&Value::from("%2E%2E%2Fsecret")).is_valid());
    }

    #[test]
    fn test_string_equals() {
        let rule = StringEquals::new("yes", false);
        assert!(rule.check(&Value::from("yes")).is_valid());
        assert_eq!(rule.check(&Value::from("Yes")), Outcome::fail("is not equal to yes"));
        assert_eq!(rule.check(&Value::from(1)), Outcome::fail("is not a string"));
        assert!(StringEquals::new("yes", true).check(&Value::from("YES")).is_valid());
    }

    #[test]
    fn test_string_not_equals() {
        let rule = StringEquals::not("admin", true);
        assert!(rule.check(&Value::from("guest")).is_valid());
        assert_eq!(rule.check(&Value::from("ADMIN")), Outcome::fail("is equal to admin"));
        assert_eq!(rule.name(), "string_not_equals");
    }
}
