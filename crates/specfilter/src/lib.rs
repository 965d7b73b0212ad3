//! ## Crate layout
//! - `core`: value model, schemas, predicate tree, factory and builder.
//! - `Filter` (derive): turns `#[filter(...)]` field attributes into a
//!   static descriptor table plus a typed accessor.
//!
//! The `prelude` covers the surface needed to declare entity schemas and
//! filters and to translate them.

pub use specfilter_core as core;
pub use specfilter_core::{
    builder, config, eval, factory, metadata, predicate, schema, taxonomy, traits, value,
};
pub use specfilter_derive::Filter;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        builder::PredicateBuilder,
        config::BuilderConfig,
        metadata::{DatePeriod, EntityFilter, Filter, PeriodBounds},
        predicate::Predicate,
        schema::{EntityModel, PropertyKind, PropertyModel},
        taxonomy::{Operation, Operator},
        traits::{EntityKind, FieldValue},
        value::Value,
    };
    pub use specfilter_derive::Filter;
}
