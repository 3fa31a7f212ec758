// Numeric, boolean, GUID and currency rules

use crate::rule::{Check, Outcome};
use crate::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

static CURRENCY_SYMBOL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\d\-+.,(]+").unwrap());

static GROUPED_AMOUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?[-+]?(?:\d{1,3}(?:[,\s\x{a0}]\d{3})+|\d+)(?:\.\d+)?\)?$").unwrap()
});

/// Recognised leading currency symbols and ISO codes.
const CURRENCY_SYMBOLS: &[&str] = &[
    "$", "US$", "A$", "AU$", "C$", "CA$", "NZ$", "HK$", "S$", "R$", "€", "£", "¥", "₹", "₩", "₽",
    "₺", "₪", "₫", "₱", "฿", "₦", "₴", "kr", "Kč", "zł", "CHF", "R", "USD", "AUD", "CAD",
    "NZD", "EUR", "GBP", "JPY", "CNY", "INR", "HKD", "SGD", "SEK", "NOK", "DKK",
];

/// A numeric bound for [`Min`] and [`Max`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Decimal(Decimal),
    Float(f64),
}

macro_rules! bound_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Bound {
                fn from(value: $ty) -> Self {
                    Bound::$variant(value.into())
                }
            }
        )+
    };
}

bound_from!(Int: i8, i16, i32, i64, u8, u16, u32);
bound_from!(Float: f32, f64);
bound_from!(Decimal: Decimal);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{}", i),
            Bound::Decimal(d) => write!(f, "{}", d),
            Bound::Float(x) => write!(f, "{}", x),
        }
    }
}

enum Number {
    Exact(Decimal),
    Float(f64),
}

impl Number {
    fn cmp_to(&self, bound: Bound) -> Option<Ordering> {
        match (self, bound) {
            (Number::Float(a), b) => a.partial_cmp(&bound_as_f64(b)?),
            (Number::Exact(a), Bound::Float(b)) => a.to_f64()?.partial_cmp(&b),
            (Number::Exact(a), Bound::Int(b)) => Some(a.cmp(&Decimal::from(b))),
            (Number::Exact(a), Bound::Decimal(b)) => Some(a.cmp(&b)),
        }
    }
}

fn bound_as_f64(bound: Bound) -> Option<f64> {
    match bound {
        Bound::Int(i) => Some(i as f64),
        Bound::Decimal(d) => d.to_f64(),
        Bound::Float(f) => Some(f),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::Exact(Decimal::from(i)));
    }
    if let Ok(d) = Decimal::from_str(text) {
        return Some(Number::Exact(d));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

enum Measured {
    Native(Number),
    Parsed(Number),
    Count(usize),
    NotNumber,
    Unsupported,
}

fn measure(input: &Value) -> Measured {
    match input {
        Value::Int(i) => Measured::Native(Number::Exact(Decimal::from(*i))),
        Value::Decimal(d) => Measured::Native(Number::Exact(*d)),
        Value::Float(f) if f.is_finite() => Measured::Native(Number::Float(*f)),
        Value::Float(_) => Measured::NotNumber,
        Value::Text(s) => parse_number(s).map_or(Measured::NotNumber, Measured::Parsed),
        Value::List(items) => Measured::Count(items.len()),
        _ => Measured::Unsupported,
    }
}

/// Inclusive lower bound over numbers, numeric text and list sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min(pub Bound);

impl Min {
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self(bound.into())
    }
}

impl Check for Min {
    fn check(&self, input: &Value) -> Outcome {
        if input.is_null_or_empty_text() {
            return Outcome::Valid;
        }
        let at_least =
            |n: &Number| matches!(n.cmp_to(self.0), Some(Ordering::Greater | Ordering::Equal));
        match measure(input) {
            Measured::Native(n) | Measured::Parsed(n) => {
                Outcome::valid_if(at_least(&n), format!("is not greater than {}", self.0))
            }
            Measured::Count(count) => Outcome::valid_if(
                at_least(&Number::Exact(Decimal::from(count))),
                format!("does not contain at least {} items", self.0),
            ),
            Measured::NotNumber => Outcome::fail("is not a valid number"),
            Measured::Unsupported => Outcome::fail("cannot be validated using the Min method"),
        }
    }

    fn name(&self) -> &str {
        "min"
    }
}

/// Inclusive upper bound over numbers, numeric text and list sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max(pub Bound);

impl Max {
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self(bound.into())
    }
}

impl Check for Max {
    fn check(&self, input: &Value) -> Outcome {
        if input.is_null_or_empty_text() {
            return Outcome::Valid;
        }
        let within =
            |n: &Number| matches!(n.cmp_to(self.0), Some(Ordering::Less | Ordering::Equal));
        match measure(input) {
            Measured::Native(n) => Outcome::valid_if(within(&n), format!("is more than {}", self.0)),
            Measured::Parsed(n) => {
                Outcome::valid_if(within(&n), format!("is not less than {}", self.0))
            }
            Measured::Count(count) => Outcome::valid_if(
                within(&Number::Exact(Decimal::from(count))),
                format!("contains more than {} items", self.0),
            ),
            Measured::NotNumber => Outcome::fail("is not a valid number"),
            Measured::Unsupported => Outcome::fail("cannot be validated using the Max method"),
        }
    }

    fn name(&self) -> &str {
        "max"
    }
}

macro_rules! parse_check {
    (
        $(#[$meta:meta])* $ty:ident, $id:literal, $predicate:literal,
        text: |$text:ident| $parses:expr,
        native: |$native:ident| $accepts:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Check for $ty {
            fn check(&self, input: &Value) -> Outcome {
                if input.is_null_or_empty_text() {
                    return Outcome::Valid;
                }
                let valid = match input {
                    Value::Text($text) => $parses,
                    $native => $accepts,
                };
                Outcome::valid_if(valid, $predicate)
            }

            fn name(&self) -> &str {
                $id
            }
        }
    };
}

parse_check!(
    /// 32-bit integer.
    Int,
    "int",
    "is not a valid Integer.",
    text: |s| s.trim().parse::<i32>().is_ok(),
    native: |v| matches!(v, Value::Int(i) if i32::try_from(*i).is_ok()),
);

parse_check!(
    /// Finite double precision number.
    Double,
    "double",
    "is not a valid Decimal.",
    text: |s| s.trim().parse::<f64>().is_ok_and(f64::is_finite),
    native: |v| match v {
        Value::Float(f) => f.is_finite(),
        other => matches!(other, Value::Int(_) | Value::Decimal(_)),
    },
);

parse_check!(
    /// Exact decimal number.
    DecimalNumber,
    "decimal",
    "is not a valid decimal value",
    text: |s| Decimal::from_str(s.trim()).is_ok(),
    native: |v| matches!(v, Value::Int(_) | Value::Decimal(_)),
);

parse_check!(
    /// Native boolean or `true` / `false` in any case.
    Bool,
    "bool",
    "is not valid.",
    text: |s| parse_bool(s).is_some(),
    native: |v| matches!(v, Value::Bool(_)),
);

parse_check!(
    /// Native GUID or any textual UUID form.
    Guid,
    "guid",
    "is not a valid GUID.",
    text: |s| Uuid::parse_str(s.trim()).is_ok(),
    native: |v| matches!(v, Value::Guid(_)),
);

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Boolean that must equal the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolEquals(pub bool);

impl Check for BoolEquals {
    fn check(&self, input: &Value) -> Outcome {
        let actual = match input {
            _ if input.is_null_or_empty_text() => return Outcome::Valid,
            Value::Bool(b) => Some(*b),
            Value::Text(s) => parse_bool(s),
            _ => None,
        };
        let expected = if self.0 { "True" } else { "False" };
        Outcome::valid_if(
            actual == Some(self.0),
            format!("is not valid and must be {}.", expected),
        )
    }

    fn name(&self) -> &str {
        "bool_equals"
    }
}

/// Monetary amount, optionally prefixed by a currency symbol.
///
/// The amount may use thousands separators and parentheses for negatives.
/// With `require_symbol` set, a bare number is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub require_symbol: bool,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            require_symbol: true,
        }
    }
}

impl Currency {
    fn is_valid_amount(&self, text: &str) -> bool {
        let text = text.trim();
        // "($5.00)": parentheses may wrap the symbol as well as the amount
        let text = match text.strip_prefix('(') {
            Some(rest) => match rest.strip_suffix(')') {
                Some(inner) => inner.trim(),
                None => return false,
            },
            None => text,
        };
        let symbol = CURRENCY_SYMBOL_REGEX
            .find(text)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        if symbol.is_empty() {
            return !self.require_symbol && GROUPED_AMOUNT_REGEX.is_match(text);
        }
        if !CURRENCY_SYMBOLS.contains(&symbol) {
            return false;
        }

        let amount = text[symbol.len()..].trim_start();
        GROUPED_AMOUNT_REGEX.is_match(amount)
    }
}

impl Check for Currency {
    fn check(&self, input: &Value) -> Outcome {
        let valid = match input {
            _ if input.is_null_or_empty_text() => true,
            Value::Decimal(_) | Value::Int(_) | Value::Float(_) => !self.require_symbol,
            Value::Text(s) => self.is_valid_amount(s),
            _ => false,
        };
        Outcome::valid_if(valid, "is not a valid currency value.")
    }

    fn name(&self) -> &str {
        "currency"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_on_native_numbers() {
        assert!(Min::new(50).check(&Value::from(100)).is_valid());
        assert!(Min::new(50).check(&Value::from(50)).is_valid());
        assert_eq!(
            Min::new(50).check(&Value::from(49)),
            Outcome::fail("is not greater than 50")
        );
        assert!(Min::new(1.5).check(&Value::from(1.5)).is_valid());
        assert!(!Min::new(Decimal::new(1025, 2)).check(&Value::from(Decimal::new(1024, 2))).is_valid());
    }

    #[test]
    fn test_max_on_native_numbers() {
        assert!(Max::new(100).check(&Value::from(100)).is_valid());
        assert_eq!(
            Max::new(100).check(&Value::from(101)),
            Outcome::fail("is more than 100")
        );
        assert!(!Max::new(0.5).check(&Value::from(0.75)).is_valid());
    }

    #[test]
    fn test_numeric_text() {
        assert!(Min::new(10).check(&Value::from("10.5")).is_valid());
        assert_eq!(
            Max::new(10).check(&Value::from("11")),
            Outcome::fail("is not less than 10")
        );
        assert_eq!(
            Min::new(10).check(&Value::from("ten")),
            Outcome::fail("is not a valid number")
        );
    }

    #[test]
    fn test_list_counts() {
        let items = Value::from(vec!["a", "b"]);
        assert!(Min::new(2).check(&items).is_valid());
        assert_eq!(
            Min::new(3).check(&items),
            Outcome::fail("does not contain at least 3 items")
        );
        assert_eq!(
            Max::new(1).check(&items),
            Outcome::fail("contains more than 1 items")
        );
    }

    #[test]
    fn test_min_max_null_and_unsupported() {
        assert!(Min::new(1).check(&Value::Null).is_valid());
        assert!(Max::new(1).check(&Value::from("")).is_valid());
        assert_eq!(
            Min::new(1).check(&Value::from(true)),
            Outcome::fail("cannot be validated using the Min method")
        );
        assert_eq!(
            Max::new(1).check(&Value::from(true)),
            Outcome::fail("cannot be validated using the Max method")
        );
    }

    #[test]
    fn test_non_finite_floats_fail_bounds() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(Min::new(0).check(&Value::from(x)), Outcome::fail("is not a valid number"));
            assert_eq!(Max::new(10).check(&Value::from(x)), Outcome::fail("is not a valid number"));
        }
        assert!(!Min::new(0.5).check(&Value::from(f64::NAN)).is_valid());
    }

    #[test]
    fn test_int() {
        assert!(Int.check(&Value::from("123")).is_valid());
        assert!(Int.check(&Value::from(-5)).is_valid());
        assert!(!Int.check(&Value::from("12.5")).is_valid());
        assert!(!Int.check(&Value::from("9999999999")).is_valid());
        assert!(Int.check(&Value::Null).is_valid());
    }

    #[test]
    fn test_double_and_decimal() {
        assert!(Double.check(&Value::from("123.45")).is_valid());
        assert!(!Double.check(&Value::from("abc")).is_valid());
        assert!(Double.check(&Value::from(2.5)).is_valid());
        assert!(!Double.check(&Value::from(f64::NAN)).is_valid());
        assert!(!Double.check(&Value::from(f64::INFINITY)).is_valid());
        assert!(DecimalNumber.check(&Value::from("-0.001")).is_valid());
        assert_eq!(
            DecimalNumber.check(&Value::from("1.2.3")),
            Outcome::fail("is not a valid decimal value")
        );
    }

    #[test]
    fn test_bool() {
        assert!(Bool.check(&Value::from("True")).is_valid());
        assert!(Bool.check(&Value::from(false)).is_valid());
        assert!(!Bool.check(&Value::from("yes")).is_valid());

        assert!(BoolEquals(true).check(&Value::from("true")).is_valid());
        assert_eq!(
            BoolEquals(true).check(&Value::from(false)),
            Outcome::fail("is not valid and must be True.")
        );
    }

    #[test]
    fn test_guid() {
        assert!(Guid.check(&Value::from("936DA01F-9ABD-4D9D-80C7-02AF85C822A8")).is_valid());
        assert!(Guid.check(&Value::from(Uuid::new_v4())).is_valid());
        assert_eq!(
            Guid.check(&Value::from("not-a-guid")),
            Outcome::fail("is not a valid GUID.")
        );
    }

    #[test]
    fn test_currency_with_symbol() {
        let rule = Currency::default();
        assert!(rule.check(&Value::from("$1,234.56")).is_valid());
        assert!(rule.check(&Value::from("€ 99")).is_valid());
        assert!(rule.check(&Value::from("GBP 1 000")).is_valid());
        assert!(!rule.check(&Value::from("1234.56")).is_valid());
        assert!(!rule.check(&Value::from("$12,34")).is_valid());
        assert!(!rule.check(&Value::from("@100")).is_valid());
    }

    #[test]
    fn test_currency_parenthesised_negative() {
        let rule = Currency::default();
        assert!(rule.check(&Value::from("($5.00)")).is_valid());
        assert!(rule.check(&Value::from("$(5.00)")).is_valid());
        assert!(!rule.check(&Value::from("($5.00")).is_valid());
    }

    #[test]
    fn test_currency_without_symbol() {
        let rule = Currency {
            require_symbol: false,
        };
        assert!(rule.check(&Value::from("1234.56")).is_valid());
        assert!(rule.check(&Value::from("1,234.56")).is_valid());
        assert!(rule.check(&Value::from("(1,234.56)")).is_valid());
        assert!(!rule.check(&Value::from("12,34")).is_valid());
        assert!(rule.check(&Value::from(Decimal::new(105, 1))).is_valid());
        assert_eq!(
            rule.check(&Value::from("abc")),
            Outcome::fail("is not a valid currency value.")
        );
    }
}
