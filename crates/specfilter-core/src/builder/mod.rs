//! Module: builder
//! Responsibility: walk a filter's fields and fold their predicates.
//! Does not own: leaf construction rules or path resolution.
//! Boundary: per-field failures stop here; nothing escapes `add`.

mod diagnostics;

#[cfg(test)]
mod tests;

use crate::{
    config::BuilderConfig,
    factory::{Normalizer, PredicateFactory, StripDiacritics},
    logging::LOG_TARGET,
    metadata::{DatePeriod, FieldInput, FieldMetadata, FieldRole, Filter},
    predicate::Predicate,
    schema::{EntityModel, PropertyPath, PropertyRef, resolve},
    taxonomy::Operator,
    traits::EntityKind,
    value::Value,
};
use std::{fmt, marker::PhantomData, mem, sync::Arc};
use tracing::{debug, trace};

pub use diagnostics::{Diagnostics, FieldSkip, SkipReason};

///
/// PredicateBuilder
///
/// Accumulates predicates for one entity type across `add` calls.
/// Owned by a single translation; call `clear` before reuse.
///

pub struct PredicateBuilder<E: EntityKind> {
    factory: PredicateFactory,
    config: BuilderConfig,
    predicates: Vec<Predicate>,
    diagnostics: Diagnostics,
    depth: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntityKind> PredicateBuilder<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    #[must_use]
    pub fn with_config(config: BuilderConfig) -> Self {
        Self::with_normalizer(config, Arc::new(StripDiacritics))
    }

    #[must_use]
    pub fn with_normalizer(config: BuilderConfig, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            factory: PredicateFactory::from_config(&config, normalizer),
            config,
            predicates: Vec::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        E::MODEL
    }

    #[must_use]
    pub const fn factory(&self) -> &PredicateFactory {
        &self.factory
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Fields skipped since the last `clear`.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Translate every field of `filter`, in declaration order.
    pub fn add(&mut self, filter: &dyn Filter) -> &mut Self {
        let descriptor = filter.descriptor();

        for field in descriptor.fields {
            let meta = FieldMetadata::extract(field);

            match self.translate(filter, &meta) {
                Ok(Some(predicate)) => {
                    trace!(target: LOG_TARGET, field = meta.field, ?predicate, "predicate emitted");
                    self.predicates.push(predicate);
                }
                Ok(None) => {}
                Err(reason) => self.skip(meta.field, reason),
            }
        }

        self
    }

    /// Append a predicate built outside the field walk.
    pub fn add_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.predicates.clear();
        self.diagnostics.clear();
        self
    }

    /// Fold with `AND`. `None` means "no constraint".
    #[must_use]
    pub fn build(&self) -> Option<Predicate> {
        self.build_with(Operator::And)
    }

    /// Fold left to right with `operator`.
    #[must_use]
    pub fn build_with(&self, operator: Operator) -> Option<Predicate> {
        trace!(
            target: LOG_TARGET,
            entity = E::MODEL.name,
            ?operator,
            count = self.predicates.len(),
            "folding predicates"
        );

        operator.fold(self.predicates.iter().cloned())
    }

    // Translate one field. `Ok(None)` is a deliberate non-contribution
    // (null input, empty group), not a failure.
    fn translate(
        &mut self,
        filter: &dyn Filter,
        meta: &FieldMetadata,
    ) -> Result<Option<Predicate>, SkipReason> {
        let input = filter.read(meta.field)?;

        // an empty collection is an unset field, never `IN ()`
        if input.is_empty_list() || (input.is_null() && !meta.nullable) {
            return Ok(None);
        }

        match meta.role {
            FieldRole::Between { left, right } => {
                if input.is_null() {
                    return Ok(None);
                }

                let value = expect_value(input)?;
                let lower = Self::resolve_property(left)?;
                let upper = Self::resolve_property(right)?;

                Ok(Some(PredicateFactory::between_properties(
                    lower, upper, &value,
                )?))
            }
            FieldRole::Join => {
                let value = expect_value(input)?;
                let path = PropertyPath::parse(meta.property)?;

                Ok(Some(self.factory.join(
                    E::MODEL,
                    &path,
                    &value,
                    meta.operation,
                )?))
            }
            FieldRole::Group { operator } => match input {
                FieldInput::Group(Some(nested)) => self.group(meta.field, nested, operator),
                FieldInput::Group(None) => Ok(None),
                other => Err(unexpected("group", &other)),
            },
            FieldRole::Period { start, end } => match input {
                FieldInput::Period(Some(period)) => Self::period(start, end, period).map(Some),
                FieldInput::Period(None) => Ok(None),
                other => Err(unexpected("period", &other)),
            },
            FieldRole::Leaf => {
                let value = expect_value(input)?;
                let property = Self::resolve_property(meta.property)?;

                Ok(Some(self.factory.create(property, &value, meta.operation)?))
            }
        }
    }

    // Translate a nested filter with a fresh builder and fold it with the
    // group's operator. Its skips are merged under the group field's name.
    fn group(
        &mut self,
        field: &str,
        nested: &dyn Filter,
        operator: Operator,
    ) -> Result<Option<Predicate>, SkipReason> {
        if self.depth >= self.config.max_group_depth {
            return Err(SkipReason::GroupTooDeep {
                limit: self.config.max_group_depth,
            });
        }

        let mut child = Self {
            factory: self.factory.clone(),
            config: self.config.clone(),
            predicates: Vec::new(),
            diagnostics: Diagnostics::new(),
            depth: self.depth + 1,
            _entity: PhantomData,
        };
        child.add(nested);

        self.diagnostics
            .absorb(field, mem::take(&mut child.diagnostics));

        Ok(child.build_with(operator))
    }

    // The stored record's period overlaps the requested one when either of
    // its bounds falls inside `[start, end]`.
    fn period(
        start_property: &str,
        end_property: &str,
        period: DatePeriod,
    ) -> Result<Predicate, SkipReason> {
        let (Some(start), Some(end)) = (period.start, period.end) else {
            return Err(SkipReason::IncompletePeriod);
        };
        if start > end {
            return Err(SkipReason::InvalidPeriod { start, end });
        }

        let stored_start = Self::resolve_property(start_property)?;
        let stored_end = Self::resolve_property(end_property)?;

        Ok(Operator::Or.combine(
            PredicateFactory::between(stored_start, Value::Date(start), Value::Date(end)),
            PredicateFactory::between(stored_end, Value::Date(start), Value::Date(end)),
        ))
    }

    fn resolve_property(raw: &str) -> Result<PropertyRef, SkipReason> {
        let path = PropertyPath::parse(raw)?;

        Ok(resolve(E::MODEL, &path)?.reference)
    }

    fn skip(&mut self, field: &'static str, reason: SkipReason) {
        debug!(
            target: LOG_TARGET,
            entity = E::MODEL.name,
            field,
            %reason,
            "filter field skipped"
        );

        if self.config.collect_diagnostics {
            self.diagnostics.record(field, reason);
        }
    }
}

impl<E: EntityKind> Default for PredicateBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> fmt::Debug for PredicateBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateBuilder")
            .field("entity", &E::MODEL.name)
            .field("predicates", &self.predicates)
            .field("diagnostics", &self.diagnostics)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn expect_value(input: FieldInput<'_>) -> Result<Value, SkipReason> {
    match input {
        FieldInput::Value(value) => Ok(value),
        other => Err(unexpected("value", &other)),
    }
}

const fn unexpected(expected: &'static str, found: &FieldInput<'_>) -> SkipReason {
    SkipReason::UnexpectedInput {
        expected,
        found: found.shape(),
    }
}
