use super::*;
use crate::{EnumType, EnumValue, OptionSetType, PrimitiveKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn strict() -> CoercionRules {
    CoercionRules::default()
}

fn lenient() -> CoercionRules {
    CoercionRules::default().with_strict_numeric(false)
}

fn week() -> Type {
    Type::Enum(EnumType::new(
        "StartOfWeek",
        PrimitiveKind::Number,
        [("Sunday", EnumValue::Number(1)), ("Monday", EnumValue::Number(2))],
    ))
}

#[test]
fn number_accepts_decimal_by_widening() {
    assert_eq!(
        Type::NUMBER.check_accepts(&Type::DECIMAL, false, &strict()),
        Acceptance::Coerced
    );
    assert_eq!(
        Type::NUMBER.check_accepts(&Type::DECIMAL, false, &lenient()),
        Acceptance::Coerced
    );
    assert!(!Type::NUMBER.accepts(&Type::DECIMAL, true));
}

#[test]
fn decimal_accepts_number_only_when_lenient() {
    assert!(!Type::DECIMAL.accepts_with(&Type::NUMBER, false, &strict()));
    assert!(Type::DECIMAL.accepts_with(&Type::NUMBER, false, &lenient()));
}

#[test]
fn sentinels_are_accepted_both_ways() {
    for ty in [Type::NUMBER, Type::empty_table(), week(), Type::Void] {
        assert_eq!(ty.check_accepts(&Type::Error, true, &strict()), Acceptance::Exact);
        assert_eq!(Type::Error.check_accepts(&ty, true, &strict()), Acceptance::Exact);
        assert_eq!(ty.check_accepts(&Type::Unknown, true, &strict()), Acceptance::Exact);
        assert_eq!(Type::Unknown.check_accepts(&ty, true, &strict()), Acceptance::Exact);
    }
}

#[test]
fn void_rules() {
    assert!(Type::Void.accepts(&Type::TEXT, true));
    assert!(Type::Void.accepts(&Type::empty_record(), true));
    assert!(!Type::TEXT.accepts(&Type::Void, false));
    assert!(!Type::empty_table().accepts(&Type::Void, false));
}

#[test]
fn everything_accepts_blank() {
    for ty in [Type::NUMBER, Type::TEXT, Type::empty_record(), week()] {
        assert_eq!(ty.check_accepts(&Type::BLANK, true, &strict()), Acceptance::Exact);
    }
}

#[test]
fn primitive_accepts_enum_with_matching_backing() {
    assert_eq!(Type::NUMBER.check_accepts(&week(), true, &strict()), Acceptance::Exact);
    assert_eq!(Type::TEXT.check_accepts(&week(), false, &strict()), Acceptance::Coerced);
    assert_eq!(Type::TEXT.check_accepts(&week(), true, &strict()), Acceptance::Rejected);
    assert!(!week().accepts(&Type::NUMBER, false));
}

#[test]
fn named_types_accept_only_themselves() {
    let other = Type::Enum(EnumType::new("Other", PrimitiveKind::Number, [("A", EnumValue::Number(1))]));
    assert!(!week().accepts(&other, false));

    let colors = Type::OptionSet(OptionSetType::new("Colors", [("Red", "Red")]));
    let sizes = Type::OptionSet(OptionSetType::new("Sizes", [("Big", "Big")]));
    assert!(colors.accepts(&colors.clone(), true));
    assert!(!colors.accepts(&sizes, false));
    assert!(!Type::TEXT.accepts(&colors, false));
}

#[test]
fn record_accepts_field_superset() {
    let target = Type::record([("a", Type::NUMBER)]).unwrap();
    let wider = Type::record([("a", Type::NUMBER), ("b", Type::TEXT)]).unwrap();
    let missing = Type::record([("b", Type::TEXT)]).unwrap();

    assert_eq!(target.check_accepts(&wider, true, &strict()), Acceptance::Exact);
    assert_eq!(target.check_accepts(&missing, false, &strict()), Acceptance::Rejected);
    assert!(!wider.accepts(&target, false));
}

#[test]
fn aggregate_with_coerced_field_is_coerced() {
    let target = Type::table([("a", Type::NUMBER)]).unwrap();
    let source = Type::table([("a", Type::DECIMAL)]).unwrap();

    assert_eq!(target.check_accepts(&source, false, &strict()), Acceptance::Coerced);
    assert_eq!(target.check_accepts(&source, true, &strict()), Acceptance::Rejected);
}

#[test]
fn record_and_table_do_not_mix() {
    let record = Type::record([("a", Type::NUMBER)]).unwrap();
    let table = record.to_table().unwrap();
    assert!(!record.accepts(&table, false));
    assert!(!table.accepts(&record, false));
}

#[test]
fn partial_acceptance_allows_missing_fields() {
    let options = Type::record([("name", Type::TEXT), ("active", Type::BOOLEAN)]).unwrap();
    let only_name = Type::record([("name", Type::TEXT)]).unwrap();
    let undeclared = Type::record([("color", Type::TEXT)]).unwrap();

    assert_eq!(options.check_accepts_partial(&only_name, false, &strict()), Acceptance::Exact);
    assert_eq!(options.check_accepts(&only_name, false, &strict()), Acceptance::Rejected);
    assert_eq!(options.check_accepts_partial(&undeclared, false, &strict()), Acceptance::Rejected);
    assert_eq!(
        options.check_accepts_partial(&Type::empty_record(), false, &strict()),
        Acceptance::Exact
    );
}

#[test]
fn acceptance_orders_best_first() {
    assert!(Acceptance::Exact < Acceptance::Coerced);
    assert!(Acceptance::Coerced < Acceptance::Rejected);
    assert_eq!(Acceptance::Exact.worst(Acceptance::Coerced), Acceptance::Coerced);
}

fn any_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        proptest::sample::select(PrimitiveKind::ALL.to_vec()).prop_map(Type::Primitive),
        Just(Type::Error),
        Just(Type::Unknown),
        Just(Type::Void),
        Just(week()),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        proptest::collection::btree_map("[a-d]", inner, 0..4).prop_flat_map(|fields| {
            let record = Type::record(fields.clone()).unwrap();
            let table = Type::table(fields).unwrap();
            prop_oneof![Just(record), Just(table)]
        })
    })
}

proptest! {
    #[test]
    fn accepts_is_reflexive(ty in any_type()) {
        prop_assert!(ty.accepts(&ty, true));
        prop_assert_eq!(ty.check_accepts(&ty, true, &strict()), Acceptance::Exact);
    }

    #[test]
    fn exact_never_reports_coercion(a in any_type(), b in any_type()) {
        prop_assert_ne!(a.check_accepts(&b, true, &strict()), Acceptance::Coerced);
    }
}
