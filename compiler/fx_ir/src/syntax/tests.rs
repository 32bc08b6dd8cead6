use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_assigns_increasing_leaf_spans() {
    let mut b = SyntaxTreeBuilder::new();
    let one = b.number(1.0);
    let two = b.number(2.0);
    let sum = b.binary(BinaryOp::Add, one, two);
    let tree = b.finish(sum);

    assert!(tree.span(one).end < tree.span(two).start);
    assert_eq!(tree.span(sum), tree.span(one).merge(tree.span(two)));
    assert_eq!(tree.root(), sum);
}

#[test]
fn call_children_are_args_in_order() {
    let mut b = SyntaxTreeBuilder::new();
    let t = b.ident("T");
    let pred = b.boolean(true);
    let call = b.call_ns(&["Data"], "Filter", vec![t, pred]);
    let tree = b.finish(call);

    let NodeKind::Call {
        namespace, name, ..
    } = tree.kind(call)
    else {
        panic!("expected a call node");
    };
    assert_eq!(namespace.as_slice(), &[Name::new("Data")]);
    assert_eq!(name.as_str(), "Filter");
    assert_eq!(tree.kind(call).children().as_slice(), &[t, pred]);
}

#[test]
fn record_field_name_spans_point_at_values() {
    let mut b = SyntaxTreeBuilder::new();
    let v = b.number(1.0);
    let rec = b.record(vec![("a", v)]);
    let tree = b.finish(rec);

    let NodeKind::Record { fields } = tree.kind(rec) else {
        panic!("expected a record node");
    };
    assert_eq!(fields[0].name_span.start, tree.span(v).start);
}

#[test]
fn decimal_display() {
    assert_eq!(DecimalValue::new(15, 1).to_string(), "1.5");
    assert_eq!(DecimalValue::new(-5, 2).to_string(), "-0.05");
    assert_eq!(DecimalValue::new(42, 0).to_string(), "42");
}

#[test]
fn number_literals_round_trip_bits() {
    let lit = Literal::number(2.5);
    assert_eq!(lit.as_f64(), Some(2.5));
    assert_eq!(Literal::Boolean(true).as_f64(), None);
}

#[test]
fn invalid_node_id() {
    assert!(!NodeId::INVALID.is_valid());
    assert!(NodeId::new(0).is_valid());
    assert_eq!(NodeId::default(), NodeId::INVALID);
}
