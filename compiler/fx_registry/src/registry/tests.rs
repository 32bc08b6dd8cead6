use super::*;
use crate::{ParamSpec, ReturnType};
use fx_types::Type;
use pretty_assertions::assert_eq;

fn unary(name: &str, ty: Type, ret: Type) -> FunctionDescriptor {
    FunctionDescriptor::builtin(name, vec![ParamSpec::value("x", ty)], ReturnType::Static(ret))
}

fn n(s: &str) -> Name {
    Name::new(s)
}

#[test]
fn overloads_keep_registration_order() {
    let mut registry = FunctionRegistry::new();
    let a = registry.register(unary("Abs", Type::NUMBER, Type::NUMBER)).unwrap();
    let b = registry.register(unary("Abs", Type::DECIMAL, Type::DECIMAL)).unwrap();

    let ids: Vec<_> = registry
        .resolve_overloads(&[], &n("Abs"), 1)
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![a, b]);
    assert!(registry.resolve_overloads(&[], &n("Abs"), 2).is_empty());
    assert!(registry.contains(&[], &n("Abs")));
}

#[test]
fn duplicate_signature_is_rejected() {
    let mut registry = FunctionRegistry::new();
    registry.register(unary("Len", Type::TEXT, Type::NUMBER)).unwrap();
    let err = registry
        .register(unary("Len", Type::TEXT, Type::BOOLEAN))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateFunction {
            function: "Len".to_owned(),
            signature: "(s) 1..=1".to_owned(),
        }
    );
}

#[test]
fn overwrite_keeps_id_and_position() {
    let mut registry = FunctionRegistry::new();
    let first = registry.register(unary("F", Type::TEXT, Type::NUMBER)).unwrap();
    let second = registry.register(unary("F", Type::NUMBER, Type::NUMBER)).unwrap();
    let before = registry.generation();

    let replaced = registry
        .register_with(unary("F", Type::TEXT, Type::BOOLEAN), RegisterMode::Overwrite)
        .unwrap();

    assert_eq!(replaced, first);
    assert!(registry.generation() > before);
    let overloads = registry.resolve_overloads(&[], &n("F"), 1);
    assert_eq!(overloads[0].id, first);
    assert_eq!(overloads[1].id, second);
    assert!(matches!(&overloads[0].returns, ReturnType::Static(t) if *t == Type::BOOLEAN));
}

#[test]
fn overwrite_without_match_registers() {
    let mut registry = FunctionRegistry::new();
    let id = registry
        .register_with(unary("G", Type::TEXT, Type::TEXT), RegisterMode::Overwrite)
        .unwrap();
    assert_eq!(registry.get(id).map(|d| d.name.clone()), Some(n("G")));
}

#[test]
fn conflicting_lambda_layout_is_rejected() {
    let mut registry = FunctionRegistry::new();
    registry
        .register(FunctionDescriptor::builtin(
            "Sum",
            vec![
                ParamSpec::value("source", Type::empty_table()),
                ParamSpec::lambda("expr", Type::NUMBER, 0),
            ],
            ReturnType::Static(Type::NUMBER),
        ))
        .unwrap();

    let err = registry
        .register(FunctionDescriptor::builtin(
            "Sum",
            vec![ParamSpec::value("a", Type::NUMBER), ParamSpec::value("b", Type::NUMBER)],
            ReturnType::Static(Type::NUMBER),
        ))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::ConflictingLambdaLayout {
            function: "Sum".to_owned()
        }
    );
}

#[test]
fn namespaces_exclude_operators() {
    let mut registry = FunctionRegistry::new();
    registry
        .register(unary("+", Type::NUMBER, Type::NUMBER).in_namespace(operator_namespace()))
        .unwrap();
    registry
        .register(
            unary("Send", Type::TEXT, Type::Void).in_namespace(smallvec::smallvec![n("Mail")]),
        )
        .unwrap();

    let namespaces: Vec<_> = registry.namespaces().map(Name::as_str).collect();
    assert_eq!(namespaces, vec!["Mail"]);
    assert!(registry.is_namespace("Mail"));
    assert!(!registry.is_namespace(OPERATOR_NAMESPACE));
}

#[test]
fn disabled_functions_are_remembered_until_registered() {
    let mut registry = FunctionRegistry::new();
    let namespace: NamespacePath = smallvec::smallvec![n("Svc")];
    registry.mark_disabled(DisabledFunction {
        namespace: namespace.clone(),
        name: n("Op"),
        reason: "unsupported schema".to_owned(),
    });
    assert!(registry.disabled(&namespace, &n("Op")).is_some());
    assert!(registry.is_namespace("Svc"));

    registry
        .register(unary("Op", Type::TEXT, Type::TEXT).in_namespace(namespace.clone()))
        .unwrap();
    assert!(registry.disabled(&namespace, &n("Op")).is_none());
}
