//! Derive macros for palisade validation
//!
//! `#[derive(Validate)]` turns field attributes into the declarative
//! registration table consumed by `palisade_validation::resolve_and_validate`.
//!
//! ## Field attributes
//!
//! - `#[rule(a, b(1), ...)]` - each entry is a rule constructor from
//!   `palisade_validation::rules`; bare names are called with no arguments.
//!   The attribute may be repeated and entries run in declaration order.
//! - `#[display_name("...")]` - name used in messages instead of the
//!   humanized field name.
//!
//! ## Container attributes
//!
//! - `#[palisade(crate = "path")]` - path to the validation crate when it is
//!   not a direct dependency named `palisade_validation` (for example
//!   `crate = "palisade"` when using the umbrella crate).

use proc_macro::TokenStream;

mod validate;

/// Derive `Validate` for a struct with named fields.
///
/// # Examples
///
/// ```ignore
/// #[derive(Validate)]
/// struct Customer {
///     #[rule(required, max_length(10))]
///     first_name: String,
///
///     #[rule(max_length(15))]
///     last_name: String,
///
///     #[rule(max_date_from(DateAnchor::Today, DateOffset::Years(-18)))]
///     #[display_name("Date of Birth")]
///     date_of_birth: chrono::NaiveDateTime,
///
///     // Not validated
///     notes: String,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(rule, display_name, palisade))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    validate::derive_validate_impl(input)
}
