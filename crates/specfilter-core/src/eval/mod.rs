//! Module: eval
//! Responsibility: reference in-memory semantics for predicate trees.
//! Does not own: storage access, joins, or result sets.
//! Boundary: rows expose already-joined property values by reference.

mod like;


use crate::{
    config::BuilderConfig,
    factory::{Normalizer, PredicateFactory, StripDiacritics},
    predicate::{CompareOp, ComparePredicate, FieldExpr, Predicate},
    schema::PropertyRef,
    value::Value,
};
use std::{cmp::Ordering, fmt, sync::Arc};

///
/// Row
///
/// One record as seen by the evaluator. `None` and `Value::Null` both mean
/// the property holds no value.
///

pub trait Row {
    fn property(&self, property: &PropertyRef) -> Option<Value>;
}

///
/// Evaluator
///
/// SQL-like three-valued logic collapsed to `bool`: any comparison against
/// a missing value is false.
///

#[derive(Clone)]
pub struct Evaluator {
    normalizer: Arc<dyn Normalizer>,
    wildcard: char,
}

impl Evaluator {
    #[must_use]
    pub fn new(normalizer: Arc<dyn Normalizer>, wildcard: char) -> Self {
        Self {
            normalizer,
            wildcard,
        }
    }

    /// Evaluator agreeing with the patterns and normalization `factory`
    /// produces.
    #[must_use]
    pub fn for_factory(factory: &PredicateFactory) -> Self {
        Self::new(Arc::clone(factory.normalizer()), factory.wildcard())
    }

    #[must_use]
    pub fn matches(&self, predicate: &Predicate, row: &dyn Row) -> bool {
        match predicate {
            Predicate::And(children) => children.iter().all(|child| self.matches(child, row)),
            Predicate::Or(children) => children.iter().any(|child| self.matches(child, row)),
            Predicate::Compare(compare) => self.compare(compare, row),
            Predicate::Like { expr, pattern } => match self.field(expr, row) {
                Some(Value::Text(text)) => like::like_matches(&text, pattern, self.wildcard),
                _ => false,
            },
            Predicate::In { expr, values } => match self.field(expr, row) {
                Some(Value::List(stored)) => stored
                    .iter()
                    .any(|item| values.iter().any(|value| item.matches(value))),
                Some(stored) => values.iter().any(|value| stored.matches(value)),
                None => false,
            },
            Predicate::IsNull { expr } => self.field(expr, row).is_none(),
            Predicate::Between { expr, lower, upper } => self
                .field(expr, row)
                .is_some_and(|stored| within(&stored, lower, upper)),
            Predicate::WithinProperties {
                value,
                lower,
                upper,
            } => match (self.field(lower, row), self.field(upper, row)) {
                (Some(lower), Some(upper)) => within(value, &lower, &upper),
                _ => false,
            },
        }
    }

    fn compare(&self, compare: &ComparePredicate, row: &dyn Row) -> bool {
        let Some(stored) = self.field(&compare.expr, row) else {
            return false;
        };

        if compare.op == CompareOp::Eq {
            return stored.matches(&compare.value);
        }

        stored
            .compare(&compare.value)
            .is_some_and(|ordering| match compare.op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Lte => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Gte => ordering != Ordering::Less,
                CompareOp::Eq => ordering == Ordering::Equal,
            })
    }

    // Stored-side value after applying the expression's functions.
    // Functions pass non-text values through untouched.
    fn field(&self, expr: &FieldExpr, row: &dyn Row) -> Option<Value> {
        let value = match expr {
            FieldExpr::Property(property) => row.property(property)?,
            FieldExpr::Lower(inner) => match self.field(inner, row)? {
                Value::Text(text) => Value::Text(text.to_lowercase()),
                other => other,
            },
            FieldExpr::Unaccent(inner) => match self.field(inner, row)? {
                Value::Text(text) => Value::Text(self.normalizer.unaccent(&text)),
                other => other,
            },
        };

        (!value.is_null()).then_some(value)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Arc::new(StripDiacritics), BuilderConfig::DEFAULT_WILDCARD)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("wildcard", &self.wildcard)
            .finish_non_exhaustive()
    }
}

// Inclusive on both ends; unordered operands never match.
fn within(value: &Value, lower: &Value, upper: &Value) -> bool {
    matches!(
        value.compare(lower),
        Some(Ordering::Greater | Ordering::Equal)
    ) && matches!(value.compare(upper), Some(Ordering::Less | Ordering::Equal))
}
