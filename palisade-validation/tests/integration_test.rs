//! Integration tests for palisade-validation
//!
//! Exercises the public surface the way a host crate does: fluent sessions,
//! reusable rule sets, derived schemas and structured results.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use palisade_macros::Validate;
use palisade_validation::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

// ========================================================================
// Fluent sessions
// ========================================================================

#[test]
fn test_numeric_range_chain() {
    init_tracing();

    let mut quantity = eval(100, "Quantity").required().min(50).max(100);
    assert!(quantity.validate());
    assert!(quantity.error_messages().is_empty());
}

#[test]
fn test_required_length_alpha_chain() {
    let mut name = eval("ABCD", "Name").required().has_length(0, 3).is_alpha_text();
    assert!(!name.validate());
    assert_eq!(
        name.error_messages(),
        ["Name is not a valid length. Must have a length of between 0 and 3."]
    );
    assert_eq!(name.failed_rules().len(), 1);
}

#[test]
fn test_length_bounds_are_inclusive() {
    for (input, expected) in [("ab", false), ("abc", true), ("abcde", true), ("abcdef", false)] {
        assert_eq!(
            eval(input, "Code").has_length(3, 5).is_valid(),
            expected,
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_messages_are_stable_without_mutation() {
    let mut email = eval("not-an-email", "Email").is_email_address();
    email.validate();
    let first = email.error_messages().to_vec();
    let second = email.error_messages().to_vec();
    assert_eq!(first, second);
    assert_eq!(first, ["Email is not a valid email address."]);
}

#[test]
fn test_display_name_replaces_subject() {
    let mut age = eval(12, "Age").display_name("User Age").min(18);
    assert!(!age.is_valid());
    assert_eq!(age.error_messages(), ["User Age is not greater than 18"]);
    assert_eq!(age.failed_rules()[0].field_name(), "Age");
}

#[test]
fn test_success_and_fail_callbacks() {
    let mut succeeded = false;
    let mut reported = Vec::new();

    eval("4000", "Post Code")
        .is_numeric()
        .success(|| succeeded = true)
        .fail(|messages, _| reported.extend_from_slice(messages));
    assert!(succeeded);
    assert!(reported.is_empty());

    eval("ABC", "Post Code")
        .is_numeric()
        .fail(|messages, rules| {
            assert_eq!(rules.len(), 1);
            reported.extend_from_slice(messages);
        });
    assert_eq!(
        reported,
        ["Post Code is not a valid number. It can only contain numeric values."]
    );
}

// ========================================================================
// Rule sets
// ========================================================================

#[test]
fn test_rule_set_seed_isolation() {
    let set = RuleSet::new().required().is_numeric();

    let first = Eval::from_set("12345", &set).field("PIN").has_max_length(4);
    let second = Eval::from_set("12345", &set).field("PIN");

    assert_eq!(first.rules().len(), 3);
    assert_eq!(second.rules().len(), 2);
    assert_eq!(set.rules().len(), 2);
}

#[test]
fn test_validate_with_replaces_rules() {
    let strict = RuleSet::new().required().has_exact_length(4).is_numeric();
    let mut pin = eval("12a4", "PIN").is_alpha_numeric();

    assert!(pin.validate());
    assert!(!pin.validate_with(&strict));
    assert_eq!(pin.rules().len(), 3);
}

trait PostCode: Fluent {
    fn is_post_code(self) -> Self {
        self.add_rule(
            Aggregate::new("post_code")
                .with_rule(rules::exact_length(4))
                .with_rule(rules::numeric()),
        )
    }
}

impl<T: Fluent> PostCode for T {}

#[test]
fn test_host_defined_verb() {
    assert!(eval("4000", "Post Code").is_post_code().is_valid());

    let mut bad = eval("40a", "Post Code").is_post_code();
    assert!(!bad.is_valid());
    assert_eq!(
        bad.error_messages(),
        [
            "Post Code is not a valid length. Must have a length of 4.",
            "Post Code is not a valid number. It can only contain numeric values.",
        ]
    );

    let set = RuleSet::new().is_post_code();
    assert!(Eval::from_set("2000", &set).is_valid());
}

// ========================================================================
// Leaf rules through the public API
// ========================================================================

#[test]
fn test_null_and_empty_pass_content_rules() {
    let mut content: Vec<Box<dyn Rule>> = vec![
        Box::new(rules::numeric()),
        Box::new(rules::alpha_text()),
        Box::new(rules::email()),
        Box::new(rules::url()),
        Box::new(rules::phone()),
        Box::new(rules::decimal()),
        Box::new(rules::guid()),
        Box::new(rules::date()),
        Box::new(rules::iso_date()),
        Box::new(rules::hex_color()),
        Box::new(rules::xss_safe()),
        Box::new(rules::sql_safe()),
        Box::new(rules::currency(true)),
        Box::new(rules::boolean()),
        Box::new(rules::int()),
        Box::new(rules::double()),
        Box::new(rules::min(1)),
        Box::new(rules::max(10)),
        Box::new(rules::in_collection(["a", "b"])),
        Box::new(rules::contains("x")),
        Box::new(rules::string_equals("x")),
    ];

    for rule in &mut content {
        assert!(rule.validate(&Value::Null), "{} rejected null", rule.name());
        assert!(rule.validate(&Value::from("")), "{} rejected empty", rule.name());
    }
}

#[test]
fn test_presence_rules_reject_missing_values() {
    assert!(!rules::required().validate(&Value::Null));
    assert!(!rules::not_null().validate(&Value::Null));
    assert!(!rules::not_empty().validate(&Value::from("")));
    assert!(!rules::not_empty().validate(&Value::from(Vec::<String>::new())));
    assert!(rules::not_empty().validate(&Value::from("x")));
}

#[test]
fn test_abn_checksum() {
    let mut abn = rules::abn();
    assert!(abn.validate_field(&Value::from("29002589460"), "ABN"));
    assert!(!abn.validate_field(&Value::from("23005085616"), "ABN"));
    assert_eq!(abn.error_messages(), vec!["ABN has failed the ABN Checksum Validation."]);
}

#[test]
fn test_iso_date_and_date_time_shapes() {
    let date_only = Value::from("2025-05-03");
    let date_time = Value::from("2025-05-03T14:30:15Z");

    assert!(rules::iso_date().validate(&date_only));
    assert!(!rules::iso_date_time().validate(&date_only));
    assert!(!rules::iso_date().validate(&date_time));
    assert!(rules::iso_date_time().validate(&date_time));
}

#[test]
fn test_date_bounds() {
    let latest = datetime(2008, 1, 1);
    let mut dob = eval(datetime(2015, 6, 1), "DateOfBirth")
        .display_name("Date of Birth")
        .max_date(latest);
    assert!(!dob.is_valid());
    assert_eq!(dob.error_messages(), ["Date of Birth does not meet the maximum date range."]);

    assert!(eval("2001-02-03", "Start").min_date(datetime(2000, 1, 1)).is_valid());
    assert!(!eval("not a date", "Start").min_date(datetime(2000, 1, 1)).is_valid());
}

#[test]
fn test_file_signatures() {
    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    let stream = ByteStream::seekable(Cursor::new(png.to_vec()));
    assert!(eval(stream.clone(), "Avatar").is_png().is_valid());

    let mut as_jpg = eval(stream, "Avatar").is_jpg();
    assert!(!as_jpg.is_valid());
    assert_eq!(as_jpg.error_messages(), ["Avatar is not a valid JPG"]);

    let jpg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];
    let stream = ByteStream::seekable(Cursor::new(jpg.to_vec()));
    assert!(eval(stream, "Photo").is_jpg().is_valid());

    let mut text = eval("not a stream", "Photo").is_gif();
    assert!(!text.is_valid());
    assert_eq!(text.error_messages(), ["Photo must be a Stream"]);
}

#[test]
fn test_custom_rule() {
    let mut even = eval(7, "Count").add_rule(custom("even", |input: &Value| match input {
        Value::Int(n) => Outcome::valid_if(n % 2 == 0, "must be even"),
        _ => Outcome::fail("must be a whole number"),
    }));
    assert!(!even.is_valid());
    assert_eq!(even.error_messages(), ["Count must be even"]);
}

// ========================================================================
// Declarative validation
// ========================================================================

#[derive(Validate)]
struct Customer {
    #[rule(max_length(10), required)]
    first_name: String,

    #[rule(max_length(15))]
    last_name: String,

    #[rule(email)]
    email: Option<String>,

    #[rule(max_date_from(DateAnchor::Today, DateOffset::Years(-18)))]
    #[display_name("Date of Birth")]
    date_of_birth: NaiveDateTime,

    #[allow(dead_code)]
    notes: String,
}

fn customer() -> Customer {
    Customer {
        first_name: "Jane".to_string(),
        last_name: "Smith".to_string(),
        email: None,
        date_of_birth: datetime(1980, 6, 1),
        notes: "x".repeat(200),
    }
}

#[test]
fn test_derived_schema_valid() {
    init_tracing();

    let result = customer().validate();
    assert!(result.is_valid());
    assert_eq!(result.len(), 4);
    assert!(result.get_field_result("notes").is_none());
}

#[test]
fn test_derived_schema_field_isolation() {
    let mut target = customer();
    target.first_name = "Christopher".to_string();

    let result = target.validate();
    assert!(!result.is_valid());
    assert!(!result.field("first_name").unwrap().is_valid());
    assert!(result.field("last_name").unwrap().is_valid());
    assert_eq!(
        result.error_messages(),
        vec!["First Name is more than the maximum length of 10"]
    );

    let only_last = target.validate_only(&["last_name"]);
    assert!(only_last.is_valid());
    assert_eq!(only_last.len(), 1);
    assert!(only_last.get_field_result("first_name").is_none());
}

#[test]
fn test_derived_display_name_and_relative_date() {
    let mut target = customer();
    target.date_of_birth = (Local::now() - Duration::days(365)).naive_local();

    let result = target.validate();
    let dob = result.field("date_of_birth").unwrap();
    assert_eq!(dob.display_name(), "Date of Birth");
    assert_eq!(
        dob.error_messages(),
        vec!["Date of Birth does not meet the maximum date range."]
    );
}

#[test]
fn test_unknown_field_lookup() {
    let result = customer().validate();
    assert!(matches!(
        result.field("middle_name"),
        Err(Error::UnknownField(name)) if name == "middle_name"
    ));
}

#[test]
fn test_result_json_report() {
    let mut target = customer();
    target.email = Some("jane.example.com".to_string());

    let report = target.validate().to_json();
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"][0]["field"], "email");
    assert_eq!(report["errors"][0]["message"], "Email is not a valid email address.");
    assert_eq!(report["errors"][0]["value"], "jane.example.com");
}

#[test]
fn test_object_validator() {
    let mut order = ObjectValidator::new("Order");
    order
        .check(eval(0, "Quantity").min(1))
        .check(eval("EXPRESS", "Shipping").is_in(["STANDARD", "EXPRESS"]));

    assert!(!order.is_valid());
    assert_eq!(order.to_string(), "Order is Invalid Errors: Quantity is not greater than 1");
}
