
use std::cmp::Ordering;
use time::{Date, PrimitiveDateTime};

///
/// ValueKind
///
/// Coarse classification used by the predicate factory to pick a
/// construction rule. Every `Value` maps to exactly one kind.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Null,
    Text,
    /// Numbers, dates and timestamps.
    Ordered,
    /// Container of values; translated to membership.
    Set,
    Flag,
    /// Categorical (enum-like) value.
    Tag,
}

///
/// Value
///
/// Runtime literal read from a filter field.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Uint(u64),
    Float64(f64),
    Bool(bool),
    Date(Date),
    Timestamp(PrimitiveDateTime),
    /// Enum variant name.
    Enum(String),
    List(Vec<Self>),
}

impl Value {
    #[must_use]
    pub fn enum_variant(variant: impl Into<String>) -> Self {
        Self::Enum(variant.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
            Self::Int(_)
            | Self::Uint(_)
            | Self::Float64(_)
            | Self::Date(_)
            | Self::Timestamp(_) => ValueKind::Ordered,
            Self::Bool(_) => ValueKind::Flag,
            Self::Enum(_) => ValueKind::Tag,
            Self::List(_) => ValueKind::Set,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float64(_))
    }

    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::Timestamp(_))
    }

    /// A list with no elements; an unset collection field reads as this.
    #[must_use]
    pub const fn is_empty_list(&self) -> bool {
        matches!(self, Self::List(values) if values.is_empty())
    }

    /// Ordering between two literals.
    ///
    /// Numbers widen across `Int`/`Uint`/`Float64`; a `Date` compares against
    /// a `Timestamp` as midnight of that date. Mixed families and `Null`
    /// have no ordering.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) | (Self::Enum(a), Self::Enum(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Uint(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Uint(a), Self::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Timestamp(b)) => Some(a.midnight().cmp(b)),
            (Self::Timestamp(a), Self::Date(b)) => Some(a.cmp(&b.midnight())),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    /// Equality under the same widening rules as [`Value::compare`].
    /// `Null` never equals anything, including another `Null`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(l, r)| l.matches(r))
            }
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Uint(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}
