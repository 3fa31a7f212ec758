// Palisade - composable input validation for Rust
//
// Reusable rules, fluent per-value builders, reusable rule sets, and
// declarative object validation with structured per-field results.

// Re-export the rule engine (and the derive macro when `derive` is enabled)
pub use palisade_validation::*;

pub use palisade_validation;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Aggregate,
        Eval,
        FieldResult,
        Fluent,
        ObjectValidator,
        Outcome,
        Rule,
        RuleSet,
        Schema,
        Validate,
        ValidationResult,
        Value,
        custom,
        eval,
        rules,
    };
}
