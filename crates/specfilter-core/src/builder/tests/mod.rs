
use super::*;
use crate::{
    eval::Evaluator,
    metadata::{AccessError, BetweenTag, EntityFilter, FieldTags, PeriodTag},
    predicate::{CompareOp, FieldExpr},
    schema::ResolveError,
    taxonomy::Operation,
    test_fixtures::{FixtureFilter, MapRow, Person, Slot, prop},
    value::ValueKind,
};
use time::macros::{date, datetime};

fn builder() -> PredicateBuilder<Person> {
    PredicateBuilder::new()
}

fn field(dotted: &str) -> FieldExpr {
    FieldExpr::Property(prop(dotted))
}

fn op(operation: Operation) -> FieldTags {
    FieldTags {
        operation: Some(operation),
        ..FieldTags::EMPTY
    }
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

const CONTRACT: FieldTags = FieldTags {
    period: Some(PeriodTag {
        start: "contract_start",
        end: "contract_end",
    }),
    ..FieldTags::EMPTY
};

///
/// Empty / null handling
///

#[test]
fn empty_filter_yields_no_predicate() {
    let filter = FixtureFilter::named("Empty").build();

    assert_eq!(builder().add(&filter).build(), None);
    assert_eq!(filter.to_predicate(), None);
}

#[test]
fn null_fields_are_skipped_without_diagnostics() {
    let filter = FixtureFilter::named("Nulls")
        .leaf("name", Option::<String>::None)
        .leaf("age", Option::<i32>::None)
        .slot("search", FieldTags::EMPTY, Slot::Group(None))
        .slot("contract", CONTRACT, Slot::Period(None))
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(b.diagnostics().is_empty());
}

#[test]
fn empty_collections_are_unset() {
    let nullable = FieldTags {
        nullable: true,
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("NoTags")
        .leaf("tags", Vec::<String>::new())
        .value("status", nullable, Vec::<String>::new())
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(b.diagnostics().is_empty());
    assert_eq!(filter.to_predicate(), None);
}

#[test]
fn empty_collection_beside_set_field_adds_nothing() {
    let filter = FixtureFilter::named("Mixed")
        .leaf("tags", Vec::<String>::new())
        .leaf("name", "Ana")
        .build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::eq(field("name"), text("Ana")))
    );
}

#[test]
fn nullable_null_field_yields_is_null() {
    let tags = FieldTags {
        nullable: true,
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Nullable")
        .value("name", tags, Option::<String>::None)
        .build();

    assert_eq!(filter.to_predicate(), Some(Predicate::is_null(field("name"))));
}

///
/// Leaves and folding
///

#[test]
fn single_predicate_is_returned_unfolded() {
    let filter = FixtureFilter::named("One").leaf("name", "ann").build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::eq(field("name"), text("ann")))
    );
}

#[test]
fn fields_fold_with_and_in_declaration_order() {
    let filter = FixtureFilter::named("Three")
        .leaf("name", "ann")
        .value("age", op(Operation::GreaterThanOrEqual), 18_i32)
        .leaf("active", true)
        .build();

    let expected = Predicate::And(vec![
        Predicate::And(vec![
            Predicate::eq(field("name"), text("ann")),
            Predicate::compare(field("age"), CompareOp::Gte, Value::Int(18)),
        ]),
        Predicate::eq(field("active"), Value::Bool(true)),
    ]);

    assert_eq!(builder().add(&filter).build(), Some(expected));
}

#[test]
fn build_with_or_folds_disjunction() {
    let filter = FixtureFilter::named("Either")
        .leaf("name", "ann")
        .leaf("age", 30_i32)
        .build();

    assert_eq!(
        builder().add(&filter).build_with(Operator::Or),
        Some(Predicate::Or(vec![
            Predicate::eq(field("name"), text("ann")),
            Predicate::eq(field("age"), Value::Int(30)),
        ]))
    );
}

#[test]
fn property_override_and_nested_navigation() {
    let tags = FieldTags {
        property: Some("profile.nickname"),
        operation: Some(Operation::LikeIgnoreCase),
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Nick").value("nick", tags, "The Kid").build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::Like {
            expr: field("profile.nickname").lower(),
            pattern: "%the%kid%".into(),
        })
    );
}

#[test]
fn date_time_to_date_leaf() {
    let filter = FixtureFilter::named("Created")
        .value(
            "created_at",
            op(Operation::DateTimeToDate),
            date!(2024 - 03 - 05),
        )
        .build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::Between {
            expr: field("created_at"),
            lower: Value::Timestamp(datetime!(2024-03-05 00:00:00)),
            upper: Value::Timestamp(datetime!(2024-03-05 23:59:59)),
        })
    );
}

///
/// Fail-soft skips
///

#[test]
fn unknown_property_is_skipped_and_recorded() {
    let filter = FixtureFilter::named("Unknown")
        .leaf("nickname", "kid")
        .leaf("name", "ann")
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), Some(Predicate::eq(field("name"), text("ann"))));
    assert_eq!(b.diagnostics().len(), 1);
    assert!(matches!(
        b.diagnostics().reason_for("nickname"),
        Some(SkipReason::PropertyNotFound(ResolveError::PropertyNotFound { .. }))
    ));
}

#[test]
fn accessor_failure_skips_only_that_field() {
    let filter = FixtureFilter::named("Broken")
        .slot("name", FieldTags::EMPTY, Slot::Broken("getter panicked"))
        .undeclared("age", FieldTags::EMPTY)
        .leaf("active", false)
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(
        b.build(),
        Some(Predicate::eq(field("active"), Value::Bool(false)))
    );
    assert!(matches!(
        b.diagnostics().reason_for("name"),
        Some(SkipReason::AccessorFailure(AccessError::Unreadable { .. }))
    ));
    assert!(matches!(
        b.diagnostics().reason_for("age"),
        Some(SkipReason::AccessorFailure(AccessError::UnknownField { .. }))
    ));
}

#[test]
fn unsupported_value_kind_fails_open() {
    let nested = Value::List(vec![Value::List(vec![Value::Int(1)])]);
    let filter = FixtureFilter::named("Nested").leaf("tags", nested).build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert_eq!(
        b.diagnostics().reason_for("tags"),
        Some(&SkipReason::UnsupportedValueKind {
            kind: ValueKind::Set,
            context: "list membership",
        })
    );
}

#[test]
fn mismatched_input_shape_is_skipped() {
    let group = FieldTags {
        group: Some(Operator::Or),
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Shape")
        .value("search", group, "not a group")
        .slot("name", FieldTags::EMPTY, Slot::Period(Some(DatePeriod::default())))
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert_eq!(
        b.diagnostics().reason_for("search"),
        Some(&SkipReason::UnexpectedInput {
            expected: "group",
            found: "value",
        })
    );
    assert_eq!(
        b.diagnostics().reason_for("name"),
        Some(&SkipReason::UnexpectedInput {
            expected: "value",
            found: "period",
        })
    );
}

#[test]
fn diagnostics_can_be_disabled() {
    let config = BuilderConfig {
        collect_diagnostics: false,
        ..BuilderConfig::default()
    };
    let filter = FixtureFilter::named("Quiet").leaf("nickname", "kid").build();

    let mut b = PredicateBuilder::<Person>::with_config(config);
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(b.diagnostics().is_empty());
}

///
/// Between
///

#[test]
fn between_role_checks_literal_against_two_properties() {
    let tags = FieldTags {
        between: Some(BetweenTag {
            left: "min_age",
            right: "max_age",
        }),
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Eligible").value("age", tags, 30_i32).build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::WithinProperties {
            value: Value::Int(30),
            lower: field("min_age"),
            upper: field("max_age"),
        })
    );
}

#[test]
fn nullable_between_with_null_input_is_skipped_silently() {
    let tags = FieldTags {
        nullable: true,
        between: Some(BetweenTag {
            left: "min_age",
            right: "max_age",
        }),
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Eligible")
        .value("age", tags, Option::<i32>::None)
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(b.diagnostics().is_empty());
}

#[test]
fn between_with_unknown_bound_is_skipped() {
    let tags = FieldTags {
        between: Some(BetweenTag {
            left: "min_age",
            right: "oldest",
        }),
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("Eligible").value("age", tags, 30_i32).build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(matches!(
        b.diagnostics().reason_for("age"),
        Some(SkipReason::PropertyNotFound(_))
    ));
}

///
/// Join
///

#[test]
fn join_resolves_through_associations() {
    let tags = FieldTags {
        property: Some("address.city"),
        join: true,
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("ByCity").value("city", tags, "Recife").build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::eq(
            FieldExpr::Property(PropertyRef::joined(
                vec!["address".into()],
                vec!["city".into()],
            )),
            text("Recife"),
        ))
    );
}

#[test]
fn join_through_scalar_is_skipped() {
    let tags = FieldTags {
        property: Some("address.zip.code"),
        join: true,
        ..FieldTags::EMPTY
    };
    let filter = FixtureFilter::named("ByZip").value("zip", tags, "50000").build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert!(matches!(
        b.diagnostics().reason_for("zip"),
        Some(SkipReason::PropertyNotFound(ResolveError::NotAnAssociation { .. }))
    ));
}

///
/// Group
///

fn or_group() -> FieldTags {
    FieldTags {
        group: Some(Operator::Or),
        ..FieldTags::EMPTY
    }
}

#[test]
fn group_folds_with_its_own_operator() {
    let search = FixtureFilter::named("Search")
        .value("name", op(Operation::LikeIgnoreCase), "ann")
        .value("age", op(Operation::LessThan), 18_i32)
        .build();
    let filter = FixtureFilter::named("Outer")
        .leaf("active", true)
        .slot("search", or_group(), Slot::Group(Some(search)))
        .build();

    let expected = Predicate::And(vec![
        Predicate::eq(field("active"), Value::Bool(true)),
        Predicate::Or(vec![
            Predicate::Like {
                expr: field("name").lower(),
                pattern: "%ann%".into(),
            },
            Predicate::compare(field("age"), CompareOp::Lt, Value::Int(18)),
        ]),
    ]);

    assert_eq!(filter.to_predicate(), Some(expected));
}

#[test]
fn group_matches_either_condition() {
    let search = FixtureFilter::named("Search")
        .leaf("name", "ann")
        .value("age", op(Operation::LessThan), 18_i32)
        .build();
    let filter = FixtureFilter::named("Outer")
        .slot("search", or_group(), Slot::Group(Some(search)))
        .build();

    let predicate = filter.to_predicate().expect("group predicate");
    let evaluator = Evaluator::default();

    let ann = MapRow::default().with("name", "ann").with("age", 40_i32);
    let kid = MapRow::default().with("name", "bob").with("age", 10_i32);
    let neither = MapRow::default().with("name", "bob").with("age", 40_i32);

    assert!(evaluator.matches(&predicate, &ann));
    assert!(evaluator.matches(&predicate, &kid));
    assert!(!evaluator.matches(&predicate, &neither));
}

#[test]
fn empty_group_contributes_nothing() {
    let search = FixtureFilter::named("Search")
        .leaf("name", Option::<String>::None)
        .build();
    let filter = FixtureFilter::named("Outer")
        .leaf("age", 30_i32)
        .slot("search", or_group(), Slot::Group(Some(search)))
        .build();

    assert_eq!(
        filter.to_predicate(),
        Some(Predicate::eq(field("age"), Value::Int(30)))
    );
}

#[test]
fn group_skips_are_prefixed_with_group_field() {
    let search = FixtureFilter::named("Search")
        .leaf("nickname", "kid")
        .leaf("name", "ann")
        .build();
    let filter = FixtureFilter::named("Outer")
        .slot("search", or_group(), Slot::Group(Some(search)))
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), Some(Predicate::eq(field("name"), text("ann"))));
    assert_eq!(b.diagnostics()[0].field, "search.nickname");
}

#[test]
fn group_depth_is_bounded() {
    let config = BuilderConfig {
        max_group_depth: 1,
        ..BuilderConfig::default()
    };
    let inner = FixtureFilter::named("Inner").leaf("age", 1_i32).build();
    let middle = FixtureFilter::named("Middle")
        .slot("inner", or_group(), Slot::Group(Some(inner)))
        .leaf("name", "ann")
        .build();
    let outer = FixtureFilter::named("Outer")
        .slot("middle", or_group(), Slot::Group(Some(middle)))
        .build();

    let mut b = PredicateBuilder::<Person>::with_config(config);
    b.add(&outer);

    assert_eq!(b.build(), Some(Predicate::eq(field("name"), text("ann"))));
    assert_eq!(
        b.diagnostics().reason_for("middle.inner"),
        Some(&SkipReason::GroupTooDeep { limit: 1 })
    );
}

///
/// Period
///

#[test]
fn period_overlap_is_or_of_two_ranges() {
    let period = DatePeriod::new(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 01 - 31)));
    let filter = FixtureFilter::named("Contract")
        .slot("contract", CONTRACT, Slot::Period(Some(period)))
        .build();

    let lower = Value::Date(date!(2024 - 01 - 01));
    let upper = Value::Date(date!(2024 - 01 - 31));
    let expected = Predicate::Or(vec![
        Predicate::Between {
            expr: field("contract_start"),
            lower: lower.clone(),
            upper: upper.clone(),
        },
        Predicate::Between {
            expr: field("contract_end"),
            lower,
            upper,
        },
    ]);

    assert_eq!(filter.to_predicate(), Some(expected));
}

#[test]
fn inverted_period_is_dropped() {
    let period = DatePeriod::new(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 01)));
    let filter = FixtureFilter::named("Contract")
        .slot("contract", CONTRACT, Slot::Period(Some(period)))
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert_eq!(
        b.diagnostics().reason_for("contract"),
        Some(&SkipReason::InvalidPeriod {
            start: date!(2024 - 01 - 10),
            end: date!(2024 - 01 - 01),
        })
    );
}

#[test]
fn single_day_period_is_kept() {
    let day = Some(date!(2024 - 01 - 10));
    let filter = FixtureFilter::named("Contract")
        .slot("contract", CONTRACT, Slot::Period(Some(DatePeriod::new(day, day))))
        .build();

    assert!(filter.to_predicate().is_some());
}

#[test]
fn incomplete_period_is_dropped() {
    let period = DatePeriod::new(None, Some(date!(2024 - 01 - 01)));
    let filter = FixtureFilter::named("Contract")
        .slot("contract", CONTRACT, Slot::Period(Some(period)))
        .build();

    let mut b = builder();
    b.add(&filter);

    assert_eq!(b.build(), None);
    assert_eq!(
        b.diagnostics().reason_for("contract"),
        Some(&SkipReason::IncompletePeriod)
    );
}

///
/// Reuse
///

#[test]
fn add_predicate_and_clear() {
    let filter = FixtureFilter::named("One").leaf("name", "ann").build();
    let extra = Predicate::is_null(field("born_on"));

    let mut b = builder();
    b.add(&filter).add_predicate(extra.clone());
    assert_eq!(b.len(), 2);
    assert_eq!(
        b.build(),
        Some(Predicate::And(vec![
            Predicate::eq(field("name"), text("ann")),
            extra,
        ]))
    );

    b.clear();
    assert!(b.is_empty());
    assert_eq!(b.build(), None);
}

#[test]
fn builder_accumulates_across_filters() {
    let first = FixtureFilter::named("First").leaf("name", "ann").build();
    let second = FixtureFilter::named("Second").leaf("age", 30_i32).build();

    let mut b = builder();
    b.add(&first).add(&second);

    assert_eq!(b.predicates().len(), 2);
}

#[test]
fn custom_normalizer_is_used_for_unaccent() {
    struct Upper;

    impl Normalizer for Upper {
        fn unaccent(&self, lowered: &str) -> String {
            lowered.to_uppercase()
        }
    }

    let filter = FixtureFilter::named("Name")
        .value("name", op(Operation::EqualIgnoreCaseUnaccent), "Ann")
        .build();

    let mut b = PredicateBuilder::<Person>::with_normalizer(BuilderConfig::default(), Arc::new(Upper));
    b.add(&filter);

    assert_eq!(
        b.build(),
        Some(Predicate::eq(field("name").lower().unaccent(), text("ANN")))
    );
}
