use super::*;
use crate::Type;
use pretty_assertions::assert_eq;

use PrimitiveKind::{Color, Untyped};

const STRICT: CoercionRules = CoercionRules {
    strict_numeric: true,
    loose_unification: false,
};

const LENIENT: CoercionRules = CoercionRules {
    strict_numeric: false,
    loose_unification: false,
};

fn both(from: PrimitiveKind, to: PrimitiveKind) -> (Option<CoercionKind>, Option<CoercionKind>) {
    (lookup(from, to, &STRICT), lookup(from, to, &LENIENT))
}

#[test]
fn widening_entries() {
    let w = Some(CoercionKind::Widening);
    assert_eq!(both(Decimal, Number), (w, w));
    assert_eq!(both(Date, DateTime), (w, w));
}

#[test]
fn number_to_decimal_only_when_lenient() {
    assert_eq!(both(Number, Decimal), (None, Some(CoercionKind::Conversion)));
}

#[test]
fn numeric_temporal_pairs_only_when_lenient() {
    let c = Some(CoercionKind::Conversion);
    for (from, to) in [
        (Date, Number),
        (DateTime, Number),
        (Time, Number),
        (Number, Date),
        (Number, DateTime),
        (Number, Time),
    ] {
        assert_eq!(both(from, to), (None, c), "{from} -> {to}");
    }
}

#[test]
fn strict_conversions() {
    let c = Some(CoercionKind::Conversion);
    for (from, to) in [
        (Text, Number),
        (Boolean, Number),
        (Text, Decimal),
        (Boolean, Decimal),
        (Number, Text),
        (Decimal, Text),
        (Boolean, Text),
        (Date, Text),
        (DateTime, Text),
        (Time, Text),
        (Guid, Text),
        (Hyperlink, Text),
        (Number, Boolean),
        (Decimal, Boolean),
        (Text, Boolean),
        (DateTime, Date),
        (Text, Date),
        (Text, DateTime),
        (Text, Time),
        (Text, Hyperlink),
        (Text, Image),
        (Text, Media),
        (Text, Blob),
        (Text, Guid),
        (Hyperlink, Image),
        (Hyperlink, Media),
    ] {
        assert_eq!(both(from, to), (c, c), "{from} -> {to}");
    }
}

#[test]
fn pairs_absent_from_the_table() {
    for (from, to) in [
        (DateTime, Time),
        (Time, Date),
        (Image, Text),
        (Media, Hyperlink),
        (Blob, Text),
        (Color, Text),
        (Text, Color),
        (Untyped, Text),
        (Text, Untyped),
        (Guid, Number),
    ] {
        assert_eq!(both(from, to), (None, None), "{from} -> {to}");
    }
}

#[test]
fn table_has_no_duplicate_pairs() {
    for (i, a) in COERCION_TABLE.iter().enumerate() {
        for b in &COERCION_TABLE[i + 1..] {
            assert!(!(a.from == b.from && a.to == b.to), "{:?}", a);
        }
        assert_ne!(a.from, a.to);
    }
}

#[test]
fn only_listed_pairs_widen() {
    assert!(widens_to(Decimal, Number));
    assert!(!widens_to(Number, Decimal));
    assert!(!widens_to(Text, Number));
}

#[test]
fn plan_for_primitive_coercion() {
    assert_eq!(
        coercion_plan(&Type::NUMBER, &Type::DECIMAL, &STRICT),
        Some(CoercionPlan::Primitive {
            from: Decimal,
            to: Number
        })
    );
    assert_eq!(coercion_plan(&Type::NUMBER, &Type::NUMBER, &STRICT), None);
    assert_eq!(coercion_plan(&Type::DECIMAL, &Type::NUMBER, &STRICT), None);
}

#[test]
fn plan_lists_only_coerced_fields() {
    let target = Type::record([("a", Type::NUMBER), ("b", Type::TEXT)]).unwrap();
    let source = Type::record([("a", Type::DECIMAL), ("b", Type::TEXT), ("c", Type::BOOLEAN)])
        .unwrap();

    let plan = coercion_plan(&target, &source, &STRICT).unwrap();
    assert_eq!(
        plan,
        CoercionPlan::Aggregate {
            table: false,
            fields: vec![(
                fx_ir::Name::new("a"),
                CoercionPlan::Primitive {
                    from: Decimal,
                    to: Number
                }
            )],
        }
    );
    assert_eq!(plan.conversion_count(), 1);
}
