// Text shape rules backed by regular expressions

use crate::config;
use crate::rule::{Check, Outcome};
use crate::{Error, Result, Value};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static ALPHA_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());

static ALPHA_NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").unwrap());

static ALPHA_NUMERIC_HYPHEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-]+$").unwrap());

static NAME_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:https?|ftps?|gopher|telnet|nntp)://|mailto:|news:)(?:%[0-9A-Fa-f]{2}|[-()_.!~*';/?:@&=+$,A-Za-z0-9])+$").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s()\-]*$").unwrap());

static HEX_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[A-Fa-f0-9]{3}(?:[A-Fa-f0-9]{3})?$").unwrap());

static CREDIT_CARD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:4\d{3}|5[1-5]\d{2}|6011|7\d{3})-?\d{4}-?\d{4}-?\d{4}|3[47]\d{13})$").unwrap()
});

static US_STATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:AA|AE|AP|AL|AK|AS|AZ|AR|CA|CO|CT|DE|DC|FM|FL|GA|GU|HI|ID|IL|IN|IA|KS|KY|LA|ME|MH|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|MP|OH|OK|OR|PW|PA|PR|RI|SC|SD|TN|TX|UT|VT|VI|VA|WA|WV|WI|WY)$").unwrap()
});

// Markup delimiters, raw or percent-encoded, plus script-capable URL schemes
static MARKUP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)%3C|<|%3E|>").unwrap());

static SCRIPT_SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:|vbscript:|data:text/html").unwrap());

static SQL_PROCEDURE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)exec(?:\s|\+)+[sx]p\w+").unwrap());

static SQL_META_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)%27|'|--|%23|#|%3B|;|=").unwrap());

/// Text form of the input, or `None` when the rule should pass untouched.
fn present_text(input: &Value) -> Option<String> {
    if input.is_null_or_empty_text() {
        return None;
    }
    Some(input.as_text().map(|s| s.into_owned()).unwrap_or_default())
}

macro_rules! pattern_check {
    ($(#[$meta:meta])* $ty:ident, $id:literal, $regex:ident, $predicate:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Check for $ty {
            fn check(&self, input: &Value) -> Outcome {
                match present_text(input) {
                    None => Outcome::Valid,
                    Some(text) => Outcome::valid_if($regex.is_match(&text), $predicate),
                }
            }

            fn name(&self) -> &str {
                $id
            }
        }
    };
}

pattern_check!(
    /// Digits only.
    Numeric,
    "numeric",
    NUMERIC_REGEX,
    "is not a valid number. It can only contain numeric values."
);

pattern_check!(
    /// Letters and whitespace.
    AlphaText,
    "alpha_text",
    ALPHA_TEXT_REGEX,
    "does not contain correct values"
);

pattern_check!(
    /// Letters, digits and whitespace.
    AlphaNumeric,
    "alpha_numeric",
    ALPHA_NUMERIC_REGEX,
    "does not contain correct values"
);

pattern_check!(
    /// Letters, digits, whitespace and hyphens.
    AlphaNumericHyphen,
    "alpha_numeric_hyphen",
    ALPHA_NUMERIC_HYPHEN_REGEX,
    "does not contain correct values"
);

pattern_check!(
    /// Personal names: letters, whitespace, hyphens and apostrophes.
    NameText,
    "name_text",
    NAME_TEXT_REGEX,
    "does not contain correct values"
);

pattern_check!(Email, "email", EMAIL_REGEX, "is not a valid email address.");

pattern_check!(Url, "url", URL_REGEX, "is not a valid url.");

pattern_check!(
    /// Digits, spaces, parentheses and hyphens.
    Phone,
    "phone",
    PHONE_REGEX,
    "is not a valid phone number, it can only contain left and right brace, spaces, hyphens and digits."
);

pattern_check!(
    HexColor,
    "hex_color",
    HEX_COLOR_REGEX,
    "is not a hex colour value, eg #FFFFFF."
);

pattern_check!(
    /// Card number shape only; no Luhn checksum.
    CreditCard,
    "credit_card",
    CREDIT_CARD_REGEX,
    "is not a valid credit card number."
);

pattern_check!(
    /// Two-letter USPS state, territory and military codes.
    UsState,
    "us_state",
    US_STATE_REGEX,
    "is not a valid State."
);

/// Rejects markup delimiters and script-capable URL schemes.
#[derive(Debug, Clone, Copy, Default)]
pub struct XssSafe;

impl XssSafe {
    pub fn contains_xss(text: &str) -> bool {
        MARKUP_PATTERN.is_match(text) || SCRIPT_SCHEME_PATTERN.is_match(text)
    }
}

impl Check for XssSafe {
    fn check(&self, input: &Value) -> Outcome {
        match present_text(input) {
            None => Outcome::Valid,
            Some(text) => Outcome::valid_if(!Self::contains_xss(&text), "contains invalid characters."),
        }
    }

    fn name(&self) -> &str {
        "xss_safe"
    }
}

/// Rejects SQL meta characters and extended stored procedure calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlSafe;

impl SqlSafe {
    pub fn contains_sql(text: &str) -> bool {
        SQL_PROCEDURE_PATTERN.is_match(text) || SQL_META_PATTERN.is_match(text)
    }
}

impl Check for SqlSafe {
    fn check(&self, input: &Value) -> Outcome {
        match present_text(input) {
            None => Outcome::Valid,
            Some(text) => Outcome::valid_if(!Self::contains_sql(&text), "contains invalid characters."),
        }
    }

    fn name(&self) -> &str {
        "sql_safe"
    }
}

/// Caller-supplied regular expression.
///
/// A pattern that fails to compile does not panic or error at evaluation
/// time; every non-empty input is reported as unverifiable instead.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: std::result::Result<Regex, regex::Error>,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let compiled = RegexBuilder::new(&source)
            .size_limit(config::config().regex_size_limit)
            .build();
        if let Err(ref e) = compiled {
            tracing::warn!(target: "palisade::rules", pattern = %source, "Invalid pattern: {}", e);
        }
        Self { source, compiled }
    }

    /// Compile eagerly and surface syntax errors to the caller.
    pub fn try_new(pattern: impl Into<String>) -> Result<Self> {
        let rule = Self::new(pattern);
        match rule.compiled {
            Ok(_) => Ok(rule),
            Err(source) => Err(Error::InvalidPattern {
                pattern: rule.source,
                source,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Check for Pattern {
    fn check(&self, input: &Value) -> Outcome {
        let Some(text) = present_text(input) else {
            return Outcome::Valid;
        };
        match &self.compiled {
            Ok(regex) => Outcome::valid_if(regex.is_match(&text), "is not valid."),
            Err(_) => Outcome::fail("could not be validated due to a Regular Expression error."),
        }
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes<C: Check>(check: C, input: &str) -> bool {
        check.check(&Value::from(input)).is_valid()
    }

    #[test]
    fn test_null_and_empty_pass() {
        assert!(Numeric.check(&Value::Null).is_valid());
        assert!(passes(Numeric, ""));
        assert!(passes(Email, ""));
        assert!(passes(Url, ""));
        assert!(passes(CreditCard, ""));
        assert!(passes(XssSafe, ""));
        assert!(passes(Pattern::new("^x$"), ""));
    }

    #[test]
    fn test_numeric() {
        assert!(passes(Numeric, "0123456789"));
        assert!(!passes(Numeric, "123ABC"));
        assert!(!passes(Numeric, "-1"));
        assert!(Numeric.check(&Value::from(42)).is_valid());
    }

    #[test]
    fn test_alpha_family() {
        assert!(passes(AlphaText, "Hello World"));
        assert!(!passes(AlphaText, "abc1"));
        assert!(passes(AlphaNumeric, "abc 123"));
        assert!(!passes(AlphaNumeric, "abc-123"));
        assert!(passes(AlphaNumericHyphen, "abc-123"));
        assert!(passes(NameText, "Mary-Jane O'Brien"));
        assert!(!passes(NameText, "R2D2"));
    }

    #[test]
    fn test_email() {
        assert!(passes(Email, "user@example.com"));
        assert!(passes(Email, "test.user+tag@domain.co.uk"));
        assert!(!passes(Email, "invalid-email"));
        assert!(!passes(Email, "@example.com"));
        assert!(!passes(Email, "user@localhost"));
    }

    #[test]
    fn test_url() {
        assert!(passes(Url, "https://example.com/path?query=value"));
        assert!(passes(Url, "ftp://files.example.com"));
        assert!(passes(Url, "mailto:someone@example.com"));
        assert!(!passes(Url, "example.com"));
        assert!(!passes(Url, "https://exa mple.com"));
    }

    #[test]
    fn test_phone() {
        assert!(passes(Phone, "(07) 3333-4444"));
        assert!(!passes(Phone, "call me"));
    }

    #[test]
    fn test_hex_color() {
        assert!(passes(HexColor, "#FFF"));
        assert!(passes(HexColor, "#a1b2c3"));
        assert!(!passes(HexColor, "FFFFFF"));
        assert!(!passes(HexColor, "#FFFF"));
    }

    #[test]
    fn test_credit_card() {
        assert!(passes(CreditCard, "4111-1111-1111-1111"));
        assert!(passes(CreditCard, "5500000000000004"));
        assert!(passes(CreditCard, "340000000000009"));
        assert!(!passes(CreditCard, "1234-5678"));
    }

    #[test]
    fn test_us_state() {
        assert!(passes(UsState, "CA"));
        assert!(!passes(UsState, "ca"));
        assert!(!passes(UsState, "ZZ"));
    }

    #[test]
    fn test_xss_safe() {
        assert!(passes(XssSafe, "plain text"));
        assert!(!passes(XssSafe, "<script>alert(1)</script>"));
        assert!(!passes(XssSafe, "%3Cb%3E"));
        assert!(!passes(XssSafe, "javascript:alert(1)"));
    }

    #[test]
    fn test_sql_safe() {
        assert!(passes(SqlSafe, "Robert"));
        assert!(!passes(SqlSafe, "Robert'); DROP TABLE Students;--"));
        assert!(!passes(SqlSafe, "exec xp_cmdshell"));
        assert!(!passes(SqlSafe, "1=1"));
    }

    #[test]
    fn test_pattern() {
        let rule = Pattern::new(r"^[A-Z]{3}$");
        assert!(passes(rule.clone(), "ABC"));
        assert_eq!(rule.check(&Value::from("abc")), Outcome::fail("is not valid."));
        assert_eq!(rule.as_str(), "^[A-Z]{3}$");
    }

    #[test]
    fn test_bad_pattern_degrades_to_failure() {
        let rule = Pattern::new("([a-z");
        assert_eq!(
            rule.check(&Value::from("abc")),
            Outcome::fail("could not be validated due to a Regular Expression error.")
        );
        assert!(rule.check(&Value::Null).is_valid());
    }

    #[test]
    fn test_try_new_reports_syntax_error() {
        assert!(matches!(
            Pattern::try_new("([a-z"),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(Pattern::try_new("^ok$").is_ok());
    }
}
