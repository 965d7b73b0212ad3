//! Module: schema
//! Responsibility: entity property schemas and property path resolution.
//! Does not own: predicate construction or filter metadata.
//! Boundary: every property a predicate names is resolved here first.

mod resolve;


use std::fmt;

pub use resolve::{ResolveError, ResolvedProperty, resolve, resolve_join};

///
/// EntityModel
///
/// Declared property schema for one entity type. Associations point at the
/// target entity's model, so nested schemas are reachable recursively.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Stable entity name used in diagnostics.
    pub name: &'static str,
    /// Ordered property list.
    pub properties: &'static [PropertyModel],
}

impl EntityModel {
    #[must_use]
    pub const fn new(name: &'static str, properties: &'static [PropertyModel]) -> Self {
        Self { name, properties }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyModel> {
        self.properties.iter().find(|property| property.name == name)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

///
/// PropertyModel
///

#[derive(Debug)]
pub struct PropertyModel {
    pub name: &'static str,
    pub kind: PropertyKind,
}

impl PropertyModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self { name, kind }
    }
}

///
/// PropertyKind
///
/// Declared type of one property. Only `Relation` and `Embedded` can be
/// traversed by a multi-segment path, and only `Relation` can be joined.
///

#[derive(Clone, Copy)]
pub enum PropertyKind {
    Text,
    Int,
    Uint,
    Float,
    Bool,
    Date,
    Timestamp,
    Enum,
    List(&'static Self),
    /// Nested record stored inline with its owner.
    Embedded(&'static EntityModel),
    /// Association to another entity.
    Relation(&'static EntityModel),
}

impl PropertyKind {
    /// Nested model reachable through this property, if any.
    #[must_use]
    pub const fn nested(&self) -> Option<&'static EntityModel> {
        match self {
            Self::Embedded(model) | Self::Relation(model) => Some(*model),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_association(&self) -> bool {
        matches!(self, Self::Relation(_))
    }
}

// Nested models are printed by name; schemas may be cyclic.
impl fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Int => f.write_str("Int"),
            Self::Uint => f.write_str("Uint"),
            Self::Float => f.write_str("Float"),
            Self::Bool => f.write_str("Bool"),
            Self::Date => f.write_str("Date"),
            Self::Timestamp => f.write_str("Timestamp"),
            Self::Enum => f.write_str("Enum"),
            Self::List(inner) => f.debug_tuple("List").field(inner).finish(),
            Self::Embedded(model) => f.debug_tuple("Embedded").field(&model.name).finish(),
            Self::Relation(model) => f.debug_tuple("Relation").field(&model.name).finish(),
        }
    }
}

impl PartialEq for PropertyKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Embedded(a), Self::Embedded(b)) | (Self::Relation(a), Self::Relation(b)) => {
                a.name == b.name
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for PropertyKind {}

///
/// PropertyPath
///
/// Dot-separated property reference as declared on a filter field.
/// Always holds at least one non-empty segment.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let segments = raw.split('.').map(str::to_string).collect::<Vec<_>>();

        if segments.iter().any(String::is_empty) {
            return Err(ResolveError::EmptySegment {
                path: raw.to_string(),
            });
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

///
/// PropertyRef
///
/// Resolved reference to a stored property. `joins` lists association
/// joins in traversal order; `path` is navigated from the innermost join
/// context (or the root when there are no joins).
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PropertyRef {
    joins: Vec<String>,
    path: Vec<String>,
}

impl PropertyRef {
    /// Reference reached by plain navigation from the root.
    #[must_use]
    pub const fn navigate(path: Vec<String>) -> Self {
        Self {
            joins: Vec::new(),
            path,
        }
    }

    /// Reference reached through a chain of association joins.
    #[must_use]
    pub const fn joined(joins: Vec<String>, path: Vec<String>) -> Self {
        Self { joins, path }
    }

    #[must_use]
    pub fn joins(&self) -> &[String] {
        &self.joins
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// All segments from the root, joins first.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.joins
            .iter()
            .chain(&self.path)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for join in &self.joins {
            write!(f, "{join}>")?;
        }
        f.write_str(&self.path.join("."))
    }
}
