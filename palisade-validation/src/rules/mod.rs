//! Leaf rules and their constructors.
//!
//! Every content rule treats `Null` and empty text as valid; pair it with
//! [`required`] or [`not_null`] to demand a value. The constructor functions
//! below are what `#[rule(...)]` attributes call, so each returns a ready
//! rule rather than a bare check.

mod abn;
mod collection;
mod date;
mod length;
mod number;
mod presence;
mod signature;
mod text;

pub use abn::AbnChecksum;
pub use collection::{Contains, InCollection, NotContains, StringEquals, TRAVERSAL_SEQUENCES};
pub use date::{
    DateAnchor, DateOffset, DateParse, IsAfter, IsBefore, IsoDateShape, IsoDateTimeShape,
    IsoTimeShape, MaxDate, MinDate, parse_date, sql_max_date, sql_min_date,
};
pub use length::{Length, MaxLength, MinLength};
pub use number::{
    Bool, BoolEquals, Bound, Currency, DecimalNumber, Double, Guid, Int, Max, Min,
};
pub use presence::{Empty, IsNull, NotEmpty, NotNull};
pub use signature::{FileSignature, GIF87A, GIF89A, JPG, PNG, Signature};
pub use text::{
    AlphaNumeric, AlphaNumericHyphen, AlphaText, CreditCard, Email, HexColor, NameText, Numeric,
    Pattern, Phone, SqlSafe, Url, UsState, XssSafe,
};

use crate::aggregate::Aggregate;
use crate::rule::Leaf;
use chrono::NaiveDateTime;

// Presence

/// At least one character (or item).
pub fn required() -> Leaf<Length> {
    Leaf::new(Length::new(1, None))
}

pub fn is_null() -> Leaf<IsNull> {
    Leaf::new(IsNull)
}

pub fn not_null() -> Leaf<NotNull> {
    Leaf::new(NotNull)
}

pub fn empty() -> Leaf<Empty> {
    Leaf::new(Empty)
}

pub fn not_empty() -> Leaf<NotEmpty> {
    Leaf::new(NotEmpty)
}

// Length

/// Inclusive length bounds; `None` leaves the maximum open.
pub fn has_length(min: usize, max: Option<usize>) -> Leaf<Length> {
    Leaf::new(Length::new(min, max))
}

pub fn exact_length(len: usize) -> Leaf<Length> {
    Leaf::new(Length::exact(len))
}

pub fn min_length(len: usize) -> Leaf<MinLength> {
    Leaf::new(MinLength(len))
}

pub fn max_length(len: usize) -> Leaf<MaxLength> {
    Leaf::new(MaxLength(len))
}

// Text patterns

pub fn numeric() -> Leaf<Numeric> {
    Leaf::new(Numeric)
}

pub fn alpha_text() -> Leaf<AlphaText> {
    Leaf::new(AlphaText)
}

pub fn alpha_numeric() -> Leaf<AlphaNumeric> {
    Leaf::new(AlphaNumeric)
}

pub fn alpha_numeric_hyphen() -> Leaf<AlphaNumericHyphen> {
    Leaf::new(AlphaNumericHyphen)
}

pub fn name_text() -> Leaf<NameText> {
    Leaf::new(NameText)
}

pub fn email() -> Leaf<Email> {
    Leaf::new(Email)
}

pub fn url() -> Leaf<Url> {
    Leaf::new(Url)
}

pub fn phone() -> Leaf<Phone> {
    Leaf::new(Phone)
}

/// Phone number characters within inclusive length bounds.
pub fn phone_and_length(min: usize, max: usize) -> Aggregate {
    Aggregate::new("phone_and_length")
        .with_rule(has_length(min, Some(max)))
        .with_rule(phone())
}

pub fn hex_color() -> Leaf<HexColor> {
    Leaf::new(HexColor)
}

pub fn credit_card() -> Leaf<CreditCard> {
    Leaf::new(CreditCard)
}

pub fn us_state() -> Leaf<UsState> {
    Leaf::new(UsState)
}

/// Caller-supplied regular expression; a bad pattern fails at evaluation.
pub fn pattern(pattern: impl Into<String>) -> Leaf<Pattern> {
    Leaf::new(Pattern::new(pattern))
}

pub fn xss_safe() -> Leaf<XssSafe> {
    Leaf::new(XssSafe)
}

pub fn sql_safe() -> Leaf<SqlSafe> {
    Leaf::new(SqlSafe)
}

/// Free text with neither markup nor SQL metacharacters.
pub fn safe_text() -> Aggregate {
    Aggregate::new("safe_text")
        .with_rule(xss_safe())
        .with_rule(sql_safe())
}

// Numbers

pub fn min(bound: impl Into<Bound>) -> Leaf<Min> {
    Leaf::new(Min::new(bound))
}

pub fn max(bound: impl Into<Bound>) -> Leaf<Max> {
    Leaf::new(Max::new(bound))
}

pub fn int() -> Leaf<Int> {
    Leaf::new(Int)
}

pub fn double() -> Leaf<Double> {
    Leaf::new(Double)
}

pub fn decimal() -> Leaf<DecimalNumber> {
    Leaf::new(DecimalNumber)
}

pub fn boolean() -> Leaf<Bool> {
    Leaf::new(Bool)
}

pub fn bool_equals(expected: bool) -> Leaf<BoolEquals> {
    Leaf::new(BoolEquals(expected))
}

pub fn guid() -> Leaf<Guid> {
    Leaf::new(Guid)
}

pub fn currency(require_symbol: bool) -> Leaf<Currency> {
    Leaf::new(Currency { require_symbol })
}

// Dates

pub fn min_date(min: NaiveDateTime) -> Leaf<MinDate> {
    Leaf::new(MinDate(min))
}

pub fn max_date(max: NaiveDateTime) -> Leaf<MaxDate> {
    Leaf::new(MaxDate(max))
}

pub fn is_after(date: NaiveDateTime) -> Leaf<IsAfter> {
    Leaf::new(IsAfter(date))
}

pub fn is_before(date: NaiveDateTime) -> Leaf<IsBefore> {
    Leaf::new(IsBefore(date))
}

/// Inclusive date range.
pub fn between_dates(min: NaiveDateTime, max: NaiveDateTime) -> Aggregate {
    Aggregate::new("between_dates")
        .with_rule(min_date(min))
        .with_rule(max_date(max))
}

/// Dates a SQL Server `datetime` column can store.
pub fn sql_safe_date() -> Aggregate {
    between_dates(sql_min_date(), sql_max_date())
}

/// Lower bound relative to the clock, resolved when the rule is built.
pub fn min_date_from(anchor: DateAnchor, offset: DateOffset) -> Leaf<MinDate> {
    min_date(anchor.resolve(offset))
}

/// Upper bound relative to the clock, resolved when the rule is built.
pub fn max_date_from(anchor: DateAnchor, offset: DateOffset) -> Leaf<MaxDate> {
    max_date(anchor.resolve(offset))
}

pub fn between_dates_from(anchor: DateAnchor, min: DateOffset, max: DateOffset) -> Aggregate {
    between_dates(anchor.resolve(min), anchor.resolve(max))
}

/// Any date or time the date rules can parse.
pub fn date() -> Leaf<DateParse> {
    Leaf::new(DateParse)
}

/// `YYYY-MM-DD` naming a real calendar date.
pub fn iso_date() -> Aggregate {
    Aggregate::new("iso_date")
        .with_rule(Leaf::new(IsoDateShape))
        .with_rule(date())
}

pub fn iso_time() -> Aggregate {
    Aggregate::new("iso_time")
        .with_rule(Leaf::new(IsoTimeShape))
        .with_rule(date())
}

pub fn iso_date_time() -> Aggregate {
    Aggregate::new("iso_date_time")
        .with_rule(Leaf::new(IsoDateTimeShape))
        .with_rule(date())
}

// Collections and string comparison

pub fn in_collection<I, S>(items: I) -> Leaf<InCollection>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Leaf::new(InCollection::new(items, false))
}

pub fn in_collection_ignore_case<I, S>(items: I) -> Leaf<InCollection>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Leaf::new(InCollection::new(items, true))
}

pub fn contains(needle: impl Into<String>) -> Leaf<Contains> {
    Leaf::new(Contains::new([needle.into()], false))
}

pub fn contains_ignore_case(needle: impl Into<String>) -> Leaf<Contains> {
    Leaf::new(Contains::new([needle.into()], true))
}

/// Passes when any of `needles` is present.
pub fn contains_any<I, S>(needles: I) -> Leaf<Contains>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Leaf::new(Contains::new(needles, false))
}

pub fn not_contains(needle: impl Into<String>) -> Leaf<NotContains> {
    Leaf::new(NotContains::new([needle.into()], false))
}

pub fn not_contains_ignore_case(needle: impl Into<String>) -> Leaf<NotContains> {
    Leaf::new(NotContains::new([needle.into()], true))
}

/// Fails when any of `needles` is present.
pub fn not_contains_any<I, S>(needles: I) -> Leaf<NotContains>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Leaf::new(NotContains::new(needles, false))
}

/// Rejects path traversal sequences such as `..` and `%2f`.
pub fn traversal_safe() -> Leaf<NotContains> {
    Leaf::new(NotContains::traversal())
}

pub fn string_equals(expected: impl Into<String>) -> Leaf<StringEquals> {
    Leaf::new(StringEquals::new(expected, false))
}

pub fn string_equals_ignore_case(expected: impl Into<String>) -> Leaf<StringEquals> {
    Leaf::new(StringEquals::new(expected, true))
}

pub fn string_not_equals(expected: impl Into<String>) -> Leaf<StringEquals> {
    Leaf::new(StringEquals::not(expected, false))
}

pub fn string_not_equals_ignore_case(expected: impl Into<String>) -> Leaf<StringEquals> {
    Leaf::new(StringEquals::not(expected, true))
}

// Files and identifiers

pub fn jpg() -> Leaf<FileSignature> {
    Leaf::new(FileSignature::jpg())
}

pub fn png() -> Leaf<FileSignature> {
    Leaf::new(FileSignature::png())
}

pub fn gif() -> Leaf<FileSignature> {
    Leaf::new(FileSignature::gif())
}

/// Australian Business Number: eleven digits with a valid checksum.
pub fn abn() -> Aggregate {
    Aggregate::new("abn")
        .with_rule(numeric())
        .with_rule(exact_length(11))
        .with_rule(Leaf::new(AbnChecksum))
}
