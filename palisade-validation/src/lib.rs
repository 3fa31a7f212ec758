//! Composable input validation
//!
//! Rules check one value each and report a verdict plus a ready-to-display
//! message built from the field name and the rule's predicate. Rules compose
//! three ways:
//!
//! - [`Aggregate`] groups rules into one rule that passes only when all do.
//! - [`Eval`] is a fluent, per-value session; [`RuleSet`] is its reusable,
//!   value-free counterpart.
//! - [`Schema`] and the [`Validate`] trait (usually derived) validate every
//!   annotated field of an object into a [`ValidationResult`].
//!
//! Content rules accept `Null` and empty text, so optional fields only fail
//! when a value is present and malformed. Add `required()` to demand a value.
//!
//! # Examples
//!
//! ## Fluent validation
//!
//! ```
//! use palisade_validation::{Fluent, eval};
//!
//! let mut quantity = eval(100, "Quantity").required().min(50).max(100);
//! assert!(quantity.validate());
//!
//! let mut name = eval("ABCD", "Name").required().has_length(0, 3).is_alpha_text();
//! assert!(!name.validate());
//! assert_eq!(
//!     name.error_messages(),
//!     ["Name is not a valid length. Must have a length of between 0 and 3."]
//! );
//! ```
//!
//! ## Reusable rule sets
//!
//! ```
//! use palisade_validation::{Eval, Fluent, RuleSet};
//!
//! let pin = RuleSet::new().required().is_numeric().has_exact_length(4);
//!
//! assert!(Eval::from_set("1234", &pin).field("PIN").is_valid());
//! assert!(!Eval::from_set("12a4", &pin).field("PIN").is_valid());
//! ```
//!
//! ## Single rules
//!
//! ```
//! use palisade_validation::{Rule, Value, rules};
//!
//! let mut abn = rules::abn();
//! assert!(abn.validate_field(&Value::from("29002589460"), "ABN"));
//! assert!(!abn.validate_field(&Value::from("23005085616"), "ABN"));
//! assert_eq!(abn.error_message(), "ABN has failed the ABN Checksum Validation.");
//! ```

mod aggregate;
mod builder;
pub mod config;
mod error;
pub mod object;
mod object_validator;
mod result;
pub mod rule;
pub mod rules;
pub mod value;

pub use aggregate::Aggregate;
pub use builder::{Eval, Fluent, RuleSet, eval};
pub use config::{ValidationConfig, config};
pub use error::{Error, Result};
pub use object::{FieldSpec, Schema, Validate, humanize, resolve_and_validate};
pub use object_validator::ObjectValidator;
pub use result::{FieldError, FieldResult, ValidationResult};
pub use rule::{Check, Field, Leaf, Outcome, Rule, Validity, custom, is_not_valid, is_valid};
pub use value::{ByteStream, ToValue, Value};

#[cfg(feature = "derive")]
pub use palisade_macros::Validate;
