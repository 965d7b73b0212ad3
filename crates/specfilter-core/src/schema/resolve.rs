use super::{EntityModel, PropertyKind, PropertyModel, PropertyPath, PropertyRef};
use thiserror::Error as ThisError;

///
/// ResolveError
///
/// Why a property path failed to resolve against an entity schema.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    #[error("property '{segment}' not found on '{entity}' (path '{path}')")]
    PropertyNotFound {
        entity: &'static str,
        segment: String,
        path: String,
    },

    #[error("property '{segment}' on '{entity}' has no nested properties (path '{path}')")]
    NotNavigable {
        entity: &'static str,
        segment: String,
        path: String,
    },

    #[error("property '{segment}' on '{entity}' is not an association (path '{path}')")]
    NotAnAssociation {
        entity: &'static str,
        segment: String,
        path: String,
    },

    #[error("join path '{path}' needs at least two segments")]
    JoinTooShort { path: String },

    #[error("property path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

///
/// ResolvedProperty
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedProperty {
    pub reference: PropertyRef,
    pub kind: PropertyKind,
    /// Entity declaring the final segment.
    pub owner: &'static str,
}

/// Resolve `path` by navigation from `model`.
///
/// Every segment but the last must be an association or embedded record;
/// a missing segment at any depth fails the whole path.
pub fn resolve(model: &EntityModel, path: &PropertyPath) -> Result<ResolvedProperty, ResolveError> {
    let (kind, owner) = walk(model, path, 0)?;

    Ok(ResolvedProperty {
        reference: PropertyRef::navigate(path.segments().to_vec()),
        kind,
        owner,
    })
}

/// Resolve `path` as a join chain: segments `1..N-1` become association
/// joins and the last segment is read inside the innermost join context.
pub fn resolve_join(
    model: &EntityModel,
    path: &PropertyPath,
) -> Result<ResolvedProperty, ResolveError> {
    let Some((leaf, joins)) = path.segments().split_last() else {
        return Err(ResolveError::EmptySegment {
            path: path.to_string(),
        });
    };
    if joins.is_empty() {
        return Err(ResolveError::JoinTooShort {
            path: path.to_string(),
        });
    }

    let (kind, owner) = walk(model, path, joins.len())?;

    Ok(ResolvedProperty {
        reference: PropertyRef::joined(joins.to_vec(), vec![leaf.clone()]),
        kind,
        owner,
    })
}

// Walk the path segment by segment. The first `join_depth` parent segments
// must be associations; any later parent may also be an embedded record.
fn walk(
    model: &EntityModel,
    path: &PropertyPath,
    join_depth: usize,
) -> Result<(PropertyKind, &'static str), ResolveError> {
    let Some((leaf, parents)) = path.segments().split_last() else {
        return Err(ResolveError::EmptySegment {
            path: path.to_string(),
        });
    };

    let mut entity = model;
    let mut owner = model.name;

    for (depth, segment) in parents.iter().enumerate() {
        let property = lookup(entity, segment, path)?;

        entity = match property.kind {
            PropertyKind::Relation(target) => target,
            PropertyKind::Embedded(target) if depth >= join_depth => target,
            PropertyKind::Embedded(_) => {
                return Err(ResolveError::NotAnAssociation {
                    entity: entity.name,
                    segment: segment.clone(),
                    path: path.to_string(),
                });
            }
            _ if depth < join_depth => {
                return Err(ResolveError::NotAnAssociation {
                    entity: entity.name,
                    segment: segment.clone(),
                    path: path.to_string(),
                });
            }
            _ => {
                return Err(ResolveError::NotNavigable {
                    entity: entity.name,
                    segment: segment.clone(),
                    path: path.to_string(),
                });
            }
        };
        owner = entity.name;
    }

    let property = lookup(entity, leaf, path)?;

    Ok((property.kind, owner))
}

fn lookup<'a>(
    entity: &'a EntityModel,
    segment: &str,
    path: &PropertyPath,
) -> Result<&'a PropertyModel, ResolveError> {
    entity
        .property(segment)
        .ok_or_else(|| ResolveError::PropertyNotFound {
            entity: entity.name,
            segment: segment.to_string(),
            path: path.to_string(),
        })
}
