//! Module: factory
//! Responsibility: type-directed construction of one predicate node.
//! Does not own: field iteration, folding, or skip policy.
//! Boundary: takes already-resolved property references; only `join`
//! resolves paths itself.

mod normalize;


use crate::{
    config::BuilderConfig,
    predicate::{CompareOp, FieldExpr, Predicate},
    schema::{EntityModel, PropertyPath, PropertyRef, ResolveError, resolve_join},
    taxonomy::Operation,
    value::{Value, ValueKind},
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;
use time::{Date, Time, macros::time};

pub use normalize::{Normalizer, StripDiacritics};

/// Last instant of a calendar day, at second precision.
const END_OF_DAY: Time = time!(23:59:59);

///
/// BuildError
///
/// Why the factory could not produce a predicate for a value.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuildError {
    #[error("{kind:?} values are not supported by {context}")]
    UnsupportedValueKind {
        kind: ValueKind,
        context: &'static str,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

///
/// PredicateFactory
///
/// Stateless apart from its collaborators; safe to share between builders.
///

#[derive(Clone)]
pub struct PredicateFactory {
    normalizer: Arc<dyn Normalizer>,
    wildcard: char,
}

impl PredicateFactory {
    #[must_use]
    pub fn new(normalizer: Arc<dyn Normalizer>, wildcard: char) -> Self {
        Self {
            normalizer,
            wildcard,
        }
    }

    #[must_use]
    pub fn from_config(config: &BuilderConfig, normalizer: Arc<dyn Normalizer>) -> Self {
        Self::new(normalizer, config.wildcard)
    }

    #[must_use]
    pub const fn wildcard(&self) -> char {
        self.wildcard
    }

    #[must_use]
    pub const fn normalizer(&self) -> &Arc<dyn Normalizer> {
        &self.normalizer
    }

    /// Build the predicate for `value` against `property`, dispatching on
    /// the value's kind and then on `operation`.
    pub fn create(
        &self,
        property: PropertyRef,
        value: &Value,
        operation: Operation,
    ) -> Result<Predicate, BuildError> {
        let expr = FieldExpr::Property(property);

        let predicate = match value {
            Value::Null => Predicate::is_null(expr),
            Value::Text(text) => self.text(expr, text, operation),
            Value::List(values) => Self::membership(expr, values)?,
            Value::Date(date) if operation == Operation::DateTimeToDate => {
                Self::calendar_day(expr, *date)
            }
            Value::Timestamp(at) if operation == Operation::DateTimeToDate => {
                Self::calendar_day(expr, at.date())
            }
            Value::Int(_)
            | Value::Uint(_)
            | Value::Float64(_)
            | Value::Date(_)
            | Value::Timestamp(_) => Self::ordered(expr, value.clone(), operation),
            Value::Bool(_) | Value::Enum(_) => Predicate::eq(expr, value.clone()),
        };

        Ok(predicate)
    }

    /// Text dispatch. Operations without a text meaning fall back to
    /// exact equality.
    #[must_use]
    pub fn text(&self, expr: FieldExpr, text: &str, operation: Operation) -> Predicate {
        match operation {
            Operation::EqualIgnoreCase => {
                Predicate::eq(expr.lower(), Value::Text(text.to_lowercase()))
            }
            Operation::Like => Predicate::Like {
                expr,
                pattern: self.like_pattern(text),
            },
            Operation::LikeIgnoreCase => Predicate::Like {
                expr: expr.lower(),
                pattern: self.like_pattern(&text.to_lowercase()),
            },
            Operation::EqualIgnoreCaseUnaccent => Predicate::eq(
                expr.lower().unaccent(),
                Value::Text(self.normalizer.unaccent(&text.to_lowercase())),
            ),
            Operation::LikeIgnoreCaseUnaccent => Predicate::Like {
                expr: expr.lower().unaccent(),
                pattern: self.like_pattern(&self.normalizer.unaccent(&text.to_lowercase())),
            },
            _ => Predicate::eq(expr, Value::Text(text.to_string())),
        }
    }

    /// Comparison dispatch for numbers, dates and timestamps.
    #[must_use]
    pub const fn ordered(expr: FieldExpr, value: Value, operation: Operation) -> Predicate {
        let op = match operation {
            Operation::GreaterThan => CompareOp::Gt,
            Operation::GreaterThanOrEqual => CompareOp::Gte,
            Operation::LessThan => CompareOp::Lt,
            Operation::LessThanOrEqual => CompareOp::Lte,
            _ => CompareOp::Eq,
        };

        Predicate::compare(expr, op, value)
    }

    /// Range over the whole calendar day `date`, both ends inclusive.
    #[must_use]
    pub const fn calendar_day(expr: FieldExpr, date: Date) -> Predicate {
        Predicate::Between {
            expr,
            lower: Value::Timestamp(date.midnight()),
            upper: Value::Timestamp(date.with_time(END_OF_DAY)),
        }
    }

    /// Membership over a flat list of values.
    pub fn membership(expr: FieldExpr, values: &[Value]) -> Result<Predicate, BuildError> {
        if let Some(nested) = values.iter().find(|value| value.kind() == ValueKind::Set) {
            return Err(BuildError::UnsupportedValueKind {
                kind: nested.kind(),
                context: "list membership",
            });
        }

        Ok(Predicate::In {
            expr,
            values: values.to_vec(),
        })
    }

    /// Stored `property` must lie between two literal bounds.
    #[must_use]
    pub fn between(property: PropertyRef, lower: Value, upper: Value) -> Predicate {
        Predicate::Between {
            expr: FieldExpr::Property(property),
            lower,
            upper,
        }
    }

    /// Literal `value` must lie between the stored values of `lower` and
    /// `upper`. Only numeric and date-like literals have a range meaning.
    pub fn between_properties(
        lower: PropertyRef,
        upper: PropertyRef,
        value: &Value,
    ) -> Result<Predicate, BuildError> {
        if !value.is_numeric() && !value.is_temporal() {
            return Err(BuildError::UnsupportedValueKind {
                kind: value.kind(),
                context: "property range",
            });
        }

        Ok(Predicate::WithinProperties {
            value: value.clone(),
            lower: FieldExpr::Property(lower),
            upper: FieldExpr::Property(upper),
        })
    }

    /// Resolve `path` as a join chain and build the leaf for its last
    /// segment inside the innermost join.
    pub fn join(
        &self,
        model: &EntityModel,
        path: &PropertyPath,
        value: &Value,
        operation: Operation,
    ) -> Result<Predicate, BuildError> {
        let resolved = resolve_join(model, path)?;

        self.create(resolved.reference, value, operation)
    }

    /// Wrap `text` in wildcards, collapsing each whitespace run into one
    /// wildcard so the tokens match non-adjacently.
    #[must_use]
    pub fn like_pattern(&self, text: &str) -> String {
        let mut pattern = String::with_capacity(text.len() + 2);
        let mut in_whitespace = false;

        pattern.push(self.wildcard);
        for c in text.chars() {
            if c.is_whitespace() {
                if !in_whitespace {
                    pattern.push(self.wildcard);
                }
                in_whitespace = true;
            } else {
                pattern.push(c);
                in_whitespace = false;
            }
        }
        pattern.push(self.wildcard);

        pattern
    }
}

impl Default for PredicateFactory {
    fn default() -> Self {
        Self::new(Arc::new(StripDiacritics), BuilderConfig::DEFAULT_WILDCARD)
    }
}

impl fmt::Debug for PredicateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFactory")
            .field("wildcard", &self.wildcard)
            .finish_non_exhaustive()
    }
}
