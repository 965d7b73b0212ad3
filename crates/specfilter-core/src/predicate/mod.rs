use crate::{schema::PropertyRef, value::Value};

///
/// Predicate AST
///
/// Schema-resolved, storage-agnostic predicate tree handed to an external
/// evaluator. Property references are already validated; nothing here
/// executes or renders a query language.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// FieldExpr
///
/// Stored-side operand. `Lower` and `Unaccent` are applied by the storage
/// layer before comparing.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FieldExpr {
    Property(PropertyRef),
    Lower(Box<Self>),
    /// Accent normalization function supplied by the storage layer.
    Unaccent(Box<Self>),
}

impl FieldExpr {
    #[must_use]
    pub fn lower(self) -> Self {
        Self::Lower(Box::new(self))
    }

    #[must_use]
    pub fn unaccent(self) -> Self {
        Self::Unaccent(Box::new(self))
    }

    /// Property at the bottom of the expression.
    #[must_use]
    pub fn property(&self) -> &PropertyRef {
        match self {
            Self::Property(property) => property,
            Self::Lower(inner) | Self::Unaccent(inner) => inner.property(),
        }
    }
}

impl From<PropertyRef> for FieldExpr {
    fn from(property: PropertyRef) -> Self {
        Self::Property(property)
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub expr: FieldExpr,
    pub op: CompareOp,
    pub value: Value,
}

///
/// Predicate
///
/// Composite nodes produced by folding always hold exactly two children.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare(ComparePredicate),
    /// SQL-style pattern; `%` and `_` are wildcards.
    Like {
        expr: FieldExpr,
        pattern: String,
    },
    /// Stored value is one of `values`.
    In {
        expr: FieldExpr,
        values: Vec<Value>,
    },
    IsNull {
        expr: FieldExpr,
    },
    /// `lower <= expr <= upper`, bounds inclusive.
    Between {
        expr: FieldExpr,
        lower: Value,
        upper: Value,
    },
    /// `lower <= value <= upper` where the bounds are stored properties.
    WithinProperties {
        value: Value,
        lower: FieldExpr,
        upper: FieldExpr,
    },
}

impl Predicate {
    #[must_use]
    pub const fn compare(expr: FieldExpr, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate { expr, op, value })
    }

    #[must_use]
    pub const fn eq(expr: FieldExpr, value: Value) -> Self {
        Self::compare(expr, CompareOp::Eq, value)
    }

    #[must_use]
    pub const fn is_null(expr: FieldExpr) -> Self {
        Self::IsNull { expr }
    }

    /// Number of leaf predicates in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }
}
