//! Module: metadata
//! Responsibility: static per-field filter declarations and their defaults.
//! Does not own: reading schemas or constructing predicates.
//! Boundary: the builder only ever sees `FieldMetadata`, never raw tags.


use crate::{
    builder::PredicateBuilder,
    predicate::Predicate,
    taxonomy::{Operation, Operator},
    traits::EntityKind,
    value::Value,
};
use std::fmt;
use thiserror::Error as ThisError;
use time::Date;

///
/// FilterDescriptor
///
/// Static declaration table for one filter type, in field declaration order.
///

#[derive(Debug)]
pub struct FilterDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

///
/// FieldDescriptor
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    /// Field name on the filter type; also the accessor key.
    pub name: &'static str,
    pub tags: FieldTags,
}

///
/// FieldTags
///
/// Raw declarations attached to one filter field. Role tags may conflict;
/// `FieldMetadata::extract` settles which one wins.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldTags {
    /// Property path override; blank means "use the field name".
    pub property: Option<&'static str>,
    pub operation: Option<Operation>,
    /// Null values produce an `IS NULL` predicate instead of being skipped.
    pub nullable: bool,
    pub between: Option<BetweenTag>,
    pub join: bool,
    pub group: Option<Operator>,
    pub period: Option<PeriodTag>,
}

impl FieldTags {
    pub const EMPTY: Self = Self {
        property: None,
        operation: None,
        nullable: false,
        between: None,
        join: false,
        group: None,
        period: None,
    };
}

/// Literal must lie between the values of two stored properties.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BetweenTag {
    pub left: &'static str,
    pub right: &'static str,
}

/// Requested period is checked against a stored start/end property pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PeriodTag {
    pub start: &'static str,
    pub end: &'static str,
}

///
/// FieldRole
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldRole {
    Leaf,
    Between { left: &'static str, right: &'static str },
    Join,
    Group { operator: Operator },
    Period { start: &'static str, end: &'static str },
}

///
/// FieldMetadata
///
/// Resolved declaration for one field, defaults applied.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldMetadata {
    pub field: &'static str,
    pub property: &'static str,
    pub operation: Operation,
    pub nullable: bool,
    pub role: FieldRole,
}

impl FieldMetadata {
    /// Apply defaults and settle the field role.
    ///
    /// Role priority is between > join > group > period > leaf.
    #[must_use]
    pub fn extract(descriptor: &FieldDescriptor) -> Self {
        let tags = &descriptor.tags;

        let property = tags
            .property
            .filter(|property| !property.trim().is_empty())
            .unwrap_or(descriptor.name);

        let role = if let Some(BetweenTag { left, right }) = tags.between {
            FieldRole::Between { left, right }
        } else if tags.join {
            FieldRole::Join
        } else if let Some(operator) = tags.group {
            FieldRole::Group { operator }
        } else if let Some(PeriodTag { start, end }) = tags.period {
            FieldRole::Period { start, end }
        } else {
            FieldRole::Leaf
        };

        Self {
            field: descriptor.name,
            property,
            operation: tags.operation.unwrap_or_default(),
            nullable: tags.nullable,
            role,
        }
    }
}

///
/// AccessError
///
/// Failure reading a field's runtime value from a filter.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AccessError {
    #[error("filter '{filter}' has no readable field '{field}'")]
    UnknownField { filter: &'static str, field: String },

    #[error("field '{field}' could not be read: {message}")]
    Unreadable { field: String, message: String },
}

///
/// FieldInput
///
/// Runtime content of one filter field.
///

pub enum FieldInput<'a> {
    Value(Value),
    Group(Option<&'a dyn Filter>),
    Period(Option<DatePeriod>),
}

impl FieldInput<'_> {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        match self {
            Self::Value(value) => value.is_null(),
            Self::Group(group) => group.is_none(),
            Self::Period(period) => period.is_none(),
        }
    }

    /// Value input holding an empty collection.
    #[must_use]
    pub const fn is_empty_list(&self) -> bool {
        match self {
            Self::Value(value) => value.is_empty_list(),
            Self::Group(_) | Self::Period(_) => false,
        }
    }

    /// Shape name of this input, for diagnostics.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Group(_) => "group",
            Self::Period(_) => "period",
        }
    }
}

impl fmt::Debug for FieldInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Group(group) => f
                .debug_tuple("Group")
                .field(&group.map(|filter| filter.descriptor().name))
                .finish(),
            Self::Period(period) => f.debug_tuple("Period").field(period).finish(),
        }
    }
}

///
/// Filter
///
/// A filter value: a static declaration table plus typed access to each
/// declared field. Object safe so groups can nest arbitrary filter types.
///

pub trait Filter {
    fn descriptor(&self) -> &'static FilterDescriptor;

    fn read(&self, field: &str) -> Result<FieldInput<'_>, AccessError>;
}

impl<T: Filter + ?Sized> Filter for Box<T> {
    fn descriptor(&self) -> &'static FilterDescriptor {
        (**self).descriptor()
    }

    fn read(&self, field: &str) -> Result<FieldInput<'_>, AccessError> {
        (**self).read(field)
    }
}

///
/// EntityFilter
///
/// A filter bound to the entity its paths are resolved against.
///

pub trait EntityFilter: Filter + Sized {
    type Entity: EntityKind;

    /// Translate this filter alone with the default configuration.
    /// `None` means "no constraint".
    fn to_predicate(&self) -> Option<Predicate> {
        PredicateBuilder::<Self::Entity>::new().add(self).build()
    }
}

///
/// PeriodBounds
///
/// A nested value carrying the start and end dates of a requested period.
///

pub trait PeriodBounds {
    fn start(&self) -> Option<Date>;

    fn end(&self) -> Option<Date>;
}

///
/// DatePeriod
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DatePeriod {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DatePeriod {
    #[must_use]
    pub const fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn from_bounds<P: PeriodBounds + ?Sized>(bounds: &P) -> Self {
        Self {
            start: bounds.start(),
            end: bounds.end(),
        }
    }
}

impl PeriodBounds for DatePeriod {
    fn start(&self) -> Option<Date> {
        self.start
    }

    fn end(&self) -> Option<Date> {
        self.end
    }
}
