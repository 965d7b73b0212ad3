//! Core runtime for specfilter: the filter-to-predicate compiler.
//!
//! A filter value declares, per field, how it should constrain an entity
//! (equality, pattern match, range, join, group, period). This crate resolves
//! those declarations against the entity's property schema and folds them
//! into one [`predicate::Predicate`] tree. It never executes queries; the tree
//! is handed to an external evaluator.
#![warn(unreachable_pub)]

pub(crate) mod logging;

// public exports are one module level down
pub mod builder;
pub mod config;
pub mod eval;
pub mod factory;
pub mod metadata;
pub mod predicate;
pub mod schema;
pub mod taxonomy;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Domain vocabulary only; errors and diagnostics stay in their modules.
///

pub mod prelude {
    pub use crate::{
        builder::PredicateBuilder,
        metadata::{DatePeriod, EntityFilter, Filter, PeriodBounds},
        predicate::Predicate,
        schema::{EntityModel, PropertyKind, PropertyModel},
        taxonomy::{Operation, Operator},
        traits::{EntityKind, FieldValue},
        value::Value,
    };
}
