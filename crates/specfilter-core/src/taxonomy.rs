use crate::predicate::Predicate;
use serde::Deserialize;

///
/// Operation
///
/// Comparison kind declared on a filter field. Drives leaf construction in
/// the predicate factory; unrelated value kinds fall back to equality.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    Equal,
    EqualIgnoreCase,
    Like,
    LikeIgnoreCase,
    /// Requires an accent normalization function on the storage side.
    EqualIgnoreCaseUnaccent,
    /// Requires an accent normalization function on the storage side.
    LikeIgnoreCaseUnaccent,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    DateTimeToDate,
}

///
/// Operator
///
/// Logical combinator for sibling predicates within a group or at the top
/// level of a translation.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    /// Combine an accumulated predicate with the next one.
    /// Always produces a two-child node; no flattening or rebalancing.
    #[must_use]
    pub fn combine(self, acc: Predicate, next: Predicate) -> Predicate {
        match self {
            Self::And => Predicate::And(vec![acc, next]),
            Self::Or => Predicate::Or(vec![acc, next]),
        }
    }

    /// Fold predicates left to right: `((p1 op p2) op p3) ...`.
    /// A single predicate is returned unwrapped; an empty input yields `None`.
    #[must_use]
    pub fn fold(self, predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
        predicates
            .into_iter()
            .reduce(|acc, next| self.combine(acc, next))
    }
}
