// Date rules: parsing, ISO 8601 shapes, and range bounds

use crate::rule::{Check, Outcome};
use crate::Value;
use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])$").unwrap()
});

static ISO_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d:[0-5]\d(?:\.\d+)?(?:Z|[+\-][01]\d:[0-5]\d)?$").unwrap()
});

static ISO_DATE_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])T(?:[01]\d|2[0-3]):[0-5]\d:[0-5]\d(?:\.\d+)?(?:Z|[+\-][01]\d:[0-5]\d)?$").unwrap()
});

// Offset suffix on a time-of-day: "Z" or "+hh:mm" / "-hh:mm"
static TIME_OFFSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Z|[+\-]\d{2}:\d{2})$").unwrap());

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d %B %Y", "%d %b %Y"];

/// Parse the textual date forms accepted by the date rules.
///
/// Offsets are honoured by keeping the wall-clock time as written.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let local = TIME_OFFSET_REGEX.replace(text, "");
    NaiveTime::parse_from_str(&local, "%H:%M:%S%.f").ok()
}

/// Date of the input, `Ok(None)` when the rule should pass untouched.
fn input_date(input: &Value) -> Result<Option<NaiveDateTime>, ()> {
    match input {
        _ if input.is_null_or_empty_text() => Ok(None),
        Value::Date(d) => Ok(Some(*d)),
        Value::Text(s) => parse_date(s).map(Some).ok_or(()),
        _ => Err(()),
    }
}

fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

macro_rules! bound_check {
    ($(#[$meta:meta])* $ty:ident, $id:literal, |$actual:ident, $limit:ident| $holds:expr, $predicate:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $ty(pub NaiveDateTime);

        impl Check for $ty {
            fn check(&self, input: &Value) -> Outcome {
                match input_date(input) {
                    Ok(None) => Outcome::Valid,
                    Ok(Some($actual)) => {
                        let $limit = self.0;
                        Outcome::valid_if($holds, $predicate)
                    }
                    Err(()) => Outcome::fail("is not a date data type."),
                }
            }

            fn name(&self) -> &str {
                $id
            }
        }
    };
}

bound_check!(
    /// On or after the bound.
    MinDate,
    "min_date",
    |actual, limit| actual >= limit,
    "does not meet the minimum date range."
);

bound_check!(
    /// On or before the bound.
    MaxDate,
    "max_date",
    |actual, limit| actual <= limit,
    "does not meet the maximum date range."
);

bound_check!(
    /// Strictly after the bound.
    IsAfter,
    "is_after",
    |actual, limit| actual > limit,
    format!("is not after {}.", format_date(&limit))
);

bound_check!(
    /// Strictly before the bound.
    IsBefore,
    "is_before",
    |actual, limit| actual < limit,
    format!("is not before {}.", format_date(&limit))
);

/// Any parseable date or time value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParse;

impl Check for DateParse {
    fn check(&self, input: &Value) -> Outcome {
        match input {
            _ if input.is_null_or_empty_text() => Outcome::Valid,
            Value::Date(_) => Outcome::Valid,
            Value::Text(s) => Outcome::valid_if(
                parse_date(s).is_some() || parse_time(s).is_some(),
                "is not a valid date.",
            ),
            _ => Outcome::fail("is not a valid date."),
        }
    }

    fn name(&self) -> &str {
        "date"
    }
}

macro_rules! iso_shape_check {
    ($ty:ident, $id:literal, $regex:ident, $predicate:literal) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Check for $ty {
            fn check(&self, input: &Value) -> Outcome {
                match input {
                    _ if input.is_null_or_empty_text() => Outcome::Valid,
                    Value::Text(s) => Outcome::valid_if($regex.is_match(s), $predicate),
                    _ => Outcome::fail($predicate),
                }
            }

            fn name(&self) -> &str {
                $id
            }
        }
    };
}

iso_shape_check!(
    IsoDateShape,
    "iso_date",
    ISO_DATE_REGEX,
    "is not an Iso8601 Date value, eg '2025-05-03'."
);

iso_shape_check!(
    IsoTimeShape,
    "iso_time",
    ISO_TIME_REGEX,
    "is not an Iso8601 Time value, eg '23:59:59Z' or '15:30:45.123+02:00'."
);

iso_shape_check!(
    IsoDateTimeShape,
    "iso_date_time",
    ISO_DATE_TIME_REGEX,
    "is not an Iso8601 DateTime value, eg '2025-05-03T14:30:15Z' or '1999-12-31T23:59:59.999+02:00'."
);

/// Earliest value a SQL Server `datetime` column accepts.
pub fn sql_min_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1753, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Latest value a SQL Server `datetime` column accepts.
pub fn sql_max_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 997))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Reference point for relative date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAnchor {
    /// Local wall-clock time.
    Now,
    UtcNow,
    /// Local midnight.
    Today,
}

/// Signed distance from a [`DateAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOffset {
    Seconds(i64),
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Months(i32),
    Years(i32),
}

impl DateAnchor {
    pub fn now(self) -> NaiveDateTime {
        match self {
            DateAnchor::Now => Local::now().naive_local(),
            DateAnchor::UtcNow => Utc::now().naive_utc(),
            DateAnchor::Today => Local::now().date_naive().and_time(NaiveTime::MIN),
        }
    }

    /// Resolve the anchor against the clock and apply `offset`.
    ///
    /// Offsets that overflow the calendar saturate at the anchor.
    pub fn resolve(self, offset: DateOffset) -> NaiveDateTime {
        let base = self.now();
        offset.apply(base).unwrap_or(base)
    }
}

impl DateOffset {
    pub fn apply(self, base: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateOffset::Seconds(n) => base.checked_add_signed(Duration::try_seconds(n)?),
            DateOffset::Minutes(n) => base.checked_add_signed(Duration::try_minutes(n)?),
            DateOffset::Hours(n) => base.checked_add_signed(Duration::try_hours(n)?),
            DateOffset::Days(n) => base.checked_add_signed(Duration::try_days(n)?),
            DateOffset::Months(n) => add_months(base, n),
            DateOffset::Years(n) => add_months(base, n.checked_mul(12)?),
        }
    }
}

fn add_months(base: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        base.checked_add_months(magnitude)
    } else {
        base.checked_sub_months(magnitude)
    }
}
