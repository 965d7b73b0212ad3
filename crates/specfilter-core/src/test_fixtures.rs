//! Shared schemas, filters and rows for unit tests.

use crate::{
    eval::Row,
    metadata::{
        AccessError, DatePeriod, EntityFilter, FieldDescriptor, FieldInput, FieldTags, Filter,
        FilterDescriptor,
    },
    schema::{EntityModel, PropertyKind, PropertyModel, PropertyRef},
    traits::{EntityKind, FieldValue},
    value::Value,
};
use std::collections::HashMap;

///
/// Schemas
///
/// Person -> address (relation) -> country (relation)
/// Person -> profile (embedded)
///

pub(crate) static COUNTRY: EntityModel = EntityModel {
    name: "Country",
    properties: &[
        PropertyModel {
            name: "code",
            kind: PropertyKind::Text,
        },
        PropertyModel {
            name: "name",
            kind: PropertyKind::Text,
        },
    ],
};

pub(crate) static ADDRESS: EntityModel = EntityModel {
    name: "Address",
    properties: &[
        PropertyModel {
            name: "city",
            kind: PropertyKind::Text,
        },
        PropertyModel {
            name: "zip",
            kind: PropertyKind::Text,
        },
        PropertyModel {
            name: "country",
            kind: PropertyKind::Relation(&COUNTRY),
        },
    ],
};

pub(crate) static PROFILE: EntityModel = EntityModel {
    name: "Profile",
    properties: &[
        PropertyModel {
            name: "nickname",
            kind: PropertyKind::Text,
        },
        PropertyModel {
            name: "verified",
            kind: PropertyKind::Bool,
        },
    ],
};

pub(crate) static PERSON: EntityModel = EntityModel {
    name: "Person",
    properties: &[
        PropertyModel {
            name: "id",
            kind: PropertyKind::Uint,
        },
        PropertyModel {
            name: "name",
            kind: PropertyKind::Text,
        },
        PropertyModel {
            name: "age",
            kind: PropertyKind::Int,
        },
        PropertyModel {
            name: "score",
            kind: PropertyKind::Float,
        },
        PropertyModel {
            name: "active",
            kind: PropertyKind::Bool,
        },
        PropertyModel {
            name: "status",
            kind: PropertyKind::Enum,
        },
        PropertyModel {
            name: "born_on",
            kind: PropertyKind::Date,
        },
        PropertyModel {
            name: "created_at",
            kind: PropertyKind::Timestamp,
        },
        PropertyModel {
            name: "tags",
            kind: PropertyKind::List(&PropertyKind::Text),
        },
        PropertyModel {
            name: "min_age",
            kind: PropertyKind::Int,
        },
        PropertyModel {
            name: "max_age",
            kind: PropertyKind::Int,
        },
        PropertyModel {
            name: "contract_start",
            kind: PropertyKind::Date,
        },
        PropertyModel {
            name: "contract_end",
            kind: PropertyKind::Date,
        },
        PropertyModel {
            name: "address",
            kind: PropertyKind::Relation(&ADDRESS),
        },
        PropertyModel {
            name: "profile",
            kind: PropertyKind::Embedded(&PROFILE),
        },
    ],
};

pub(crate) struct Person;

impl EntityKind for Person {
    const MODEL: &'static EntityModel = &PERSON;
}

///
/// Slot
///
/// Runtime content of one fixture field.
///

pub(crate) enum Slot {
    Value(Value),
    Group(Option<FixtureFilter>),
    Period(Option<DatePeriod>),
    Broken(&'static str),
}

///
/// FixtureFilter
///
/// Filter assembled at test time; the descriptor is leaked to get the
/// `'static` table a derived filter would have.
///

pub(crate) struct FixtureFilter {
    descriptor: &'static FilterDescriptor,
    slots: Vec<(&'static str, Slot)>,
}

impl FixtureFilter {
    pub(crate) fn named(name: &'static str) -> FixtureFilterBuilder {
        FixtureFilterBuilder {
            name,
            fields: Vec::new(),
            slots: Vec::new(),
        }
    }
}

impl Filter for FixtureFilter {
    fn descriptor(&self) -> &'static FilterDescriptor {
        self.descriptor
    }

    fn read(&self, field: &str) -> Result<FieldInput<'_>, AccessError> {
        let Some((_, slot)) = self.slots.iter().find(|(name, _)| *name == field) else {
            return Err(AccessError::UnknownField {
                filter: self.descriptor.name,
                field: field.to_string(),
            });
        };

        match slot {
            Slot::Value(value) => Ok(FieldInput::Value(value.clone())),
            Slot::Group(group) => Ok(FieldInput::Group(
                group.as_ref().map(|filter| filter as &dyn Filter),
            )),
            Slot::Period(period) => Ok(FieldInput::Period(*period)),
            Slot::Broken(message) => Err(AccessError::Unreadable {
                field: field.to_string(),
                message: (*message).to_string(),
            }),
        }
    }
}

impl EntityFilter for FixtureFilter {
    type Entity = Person;
}

pub(crate) struct FixtureFilterBuilder {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    slots: Vec<(&'static str, Slot)>,
}

impl FixtureFilterBuilder {
    pub(crate) fn slot(mut self, name: &'static str, tags: FieldTags, slot: Slot) -> Self {
        self.fields.push(FieldDescriptor { name, tags });
        self.slots.push((name, slot));
        self
    }

    pub(crate) fn value(self, name: &'static str, tags: FieldTags, value: impl FieldValue) -> Self {
        self.slot(name, tags, Slot::Value(value.to_value()))
    }

    /// Plain leaf with default tags.
    pub(crate) fn leaf(self, name: &'static str, value: impl FieldValue) -> Self {
        self.value(name, FieldTags::EMPTY, value)
    }

    /// Declared in the descriptor but with no readable slot.
    pub(crate) fn undeclared(mut self, name: &'static str, tags: FieldTags) -> Self {
        self.fields.push(FieldDescriptor { name, tags });
        self
    }

    pub(crate) fn build(self) -> FixtureFilter {
        let descriptor = Box::leak(Box::new(FilterDescriptor {
            name: self.name,
            fields: Box::leak(self.fields.into_boxed_slice()),
        }));

        FixtureFilter {
            descriptor,
            slots: self.slots,
        }
    }
}

///
/// MapRow
///
/// Row keyed by the dotted form of a property reference.
///

#[derive(Debug, Default)]
pub(crate) struct MapRow(HashMap<String, Value>);

impl MapRow {
    pub(crate) fn with(mut self, dotted: &str, value: impl FieldValue) -> Self {
        self.0.insert(dotted.to_string(), value.to_value());
        self
    }
}

impl Row for MapRow {
    fn property(&self, property: &PropertyRef) -> Option<Value> {
        self.0.get(&property.dotted()).cloned()
    }
}

pub(crate) fn prop(dotted: &str) -> PropertyRef {
    PropertyRef::navigate(dotted.split('.').map(str::to_string).collect())
}
