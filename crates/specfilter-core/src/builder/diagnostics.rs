use crate::{
    factory::BuildError,
    metadata::AccessError,
    schema::ResolveError,
    value::ValueKind,
};
use derive_more::{Deref, IntoIterator};
use thiserror::Error as ThisError;
use time::Date;

///
/// SkipReason
///
/// Why a filter field contributed no predicate. Every reason is recovered
/// locally; the field is left out and translation continues.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SkipReason {
    #[error("property path did not resolve: {0}")]
    PropertyNotFound(ResolveError),

    #[error("{kind:?} values are not supported by {context}")]
    UnsupportedValueKind {
        kind: ValueKind,
        context: &'static str,
    },

    #[error("period start {start} is after end {end}")]
    InvalidPeriod { start: Date, end: Date },

    #[error("period is missing a start or end bound")]
    IncompletePeriod,

    #[error(transparent)]
    AccessorFailure(#[from] AccessError),

    #[error("expected a {expected} input, found a {found} input")]
    UnexpectedInput {
        expected: &'static str,
        found: &'static str,
    },

    #[error("group nesting exceeds {limit} levels")]
    GroupTooDeep { limit: usize },
}

impl From<ResolveError> for SkipReason {
    fn from(err: ResolveError) -> Self {
        Self::PropertyNotFound(err)
    }
}

impl From<BuildError> for SkipReason {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::UnsupportedValueKind { kind, context } => {
                Self::UnsupportedValueKind { kind, context }
            }
            BuildError::Resolve(err) => Self::PropertyNotFound(err),
        }
    }
}

///
/// FieldSkip
///
/// One skipped field. Fields inside groups are prefixed with the group
/// field's name: `parent.child`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSkip {
    pub field: String,
    pub reason: SkipReason,
}

///
/// Diagnostics
///
/// Skipped fields of one translation pass, in encounter order.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct Diagnostics(Vec<FieldSkip>);

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn record(&mut self, field: impl Into<String>, reason: SkipReason) {
        self.0.push(FieldSkip {
            field: field.into(),
            reason,
        });
    }

    /// Append `child`'s entries, prefixing each field with `prefix`.
    pub fn absorb(&mut self, prefix: &str, child: Self) {
        self.0.extend(child.0.into_iter().map(|skip| FieldSkip {
            field: format!("{prefix}.{}", skip.field),
            reason: skip.reason,
        }));
    }

    /// First recorded skip for `field`, if any.
    #[must_use]
    pub fn reason_for(&self, field: &str) -> Option<&SkipReason> {
        self.0
            .iter()
            .find(|skip| skip.field == field)
            .map(|skip| &skip.reason)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
