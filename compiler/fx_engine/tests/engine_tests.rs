#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end behavior of the engine: binding, IR and connector services.

use fx_engine::{Engine, EngineConfig, MessageKey};
use fx_ir::{BinaryOp, Name, SyntaxTree, SyntaxTreeBuilder};
use fx_registry::{ConnectorParam, ConnectorSignature, FunctionDescriptor, RegisterMode};
use fx_types::{Acceptance, CoercionRules, Type};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn engine_with(config: EngineConfig) -> Engine {
    fx_engine::init_tracing();
    Engine::with_builtins(config).unwrap()
}

fn engine() -> Engine {
    engine_with(EngineConfig::default())
}

fn keys(diagnostics: &[fx_engine::Diagnostic]) -> Vec<MessageKey> {
    diagnostics.iter().map(|d| d.key).collect()
}

fn users() -> Vec<ConnectorSignature> {
    let user = Type::record([("id", Type::TEXT), ("name", Type::TEXT)]).unwrap();
    let people = Type::table([("id", Type::TEXT), ("age", Type::NUMBER)]).unwrap();
    vec![
        ConnectorSignature::new("GetUser", user)
            .required(ConnectorParam::new("id", Type::TEXT))
            .optional(ConnectorParam::new("name", Type::TEXT))
            .optional(ConnectorParam::new("active", Type::BOOLEAN)),
        ConnectorSignature::new("List", people),
    ]
}

fn single(engine: &Engine, namespace: &str, name: &str) -> Arc<FunctionDescriptor> {
    let overloads: Vec<_> = engine
        .registry()
        .overloads(&[Name::new(namespace)], &Name::new(name))
        .cloned()
        .collect();
    assert_eq!(overloads.len(), 1);
    overloads.into_iter().next().unwrap()
}

// ========================================================================
// Error locality
// ========================================================================

#[test]
fn one_unknown_function_one_diagnostic() {
    // UnknownFn(1) + Abs(2)
    let mut b = SyntaxTreeBuilder::new();
    let one = b.number(1.0);
    let unknown = b.call("UnknownFn", vec![one]);
    let two = b.number(2.0);
    let abs = b.call("Abs", vec![two]);
    let root = b.binary(BinaryOp::Add, unknown, abs);
    let tree = b.finish(root);

    let result = engine().bind(&tree);
    assert_eq!(keys(&result.diagnostics), vec![MessageKey::UnknownIdentifier]);

    let compiled = engine().compile(&tree).unwrap();
    assert_eq!(compiled.ir.to_string(), "(+ <error> (Abs 2))");
}

#[test]
fn mismatched_if_branches() {
    // If(true, 1, "text")
    let build = || {
        let mut b = SyntaxTreeBuilder::new();
        let cond = b.boolean(true);
        let one = b.number(1.0);
        let text = b.text("text");
        let root = b.call("If", vec![cond, one, text]);
        b.finish(root)
    };

    let strict = engine().bind(&build());
    assert_eq!(strict.root_type(), &Type::Error);
    assert_eq!(
        keys(&strict.diagnostics),
        vec![MessageKey::IncompatibleBranchTypes]
    );

    let loose_engine = engine_with(EngineConfig::default().loose_unification(true));
    let loose = loose_engine.bind(&build());
    assert_eq!(loose.root_type(), &Type::TEXT);
    assert!(loose.diagnostics.is_empty());
    let compiled = loose_engine.compile(&build()).unwrap();
    assert_eq!(compiled.ir.to_string(), "(If true (as-s 1) \"text\")");
}

#[test]
fn if_branch_values_match_the_result_type() {
    // If(true, 1, 2.5w)
    let mut b = SyntaxTreeBuilder::new();
    let cond = b.boolean(true);
    let one = b.number(1.0);
    let w = b.decimal(25, 1);
    let root = b.call("If", vec![cond, one, w]);
    let compiled = engine().compile(&b.finish(root)).unwrap();
    assert_eq!(compiled.ty, Type::NUMBER);
    assert_eq!(compiled.ir.to_string(), "(If true 1 (as-n 2.5))");
}

// ========================================================================
// Scoped lambdas
// ========================================================================

#[test]
fn filter_over_table_constructor() {
    // Filter([{a:1},{a:2}], a > 1)
    let mut b = SyntaxTreeBuilder::new();
    let one = b.number(1.0);
    let r1 = b.record(vec![("a", one)]);
    let two = b.number(2.0);
    let r2 = b.record(vec![("a", two)]);
    let source = b.table(vec![r1, r2]);
    let a = b.ident("a");
    let limit = b.number(1.0);
    let predicate = b.binary(BinaryOp::Gt, a, limit);
    let root = b.call("Filter", vec![source, predicate]);

    let compiled = engine().compile(&b.finish(root)).unwrap();
    assert_eq!(compiled.ty, Type::table([("a", Type::NUMBER)]).unwrap());
    assert!(compiled.diagnostics.is_empty());
    assert_eq!(
        compiled.ir.to_string(),
        "(Filter [{a: 1}, {a: 2}] (lambda (> @0.a 1)))"
    );
}

#[test]
fn side_effects_need_configuration() {
    let build = || {
        let mut b = SyntaxTreeBuilder::new();
        let x = b.ident("x");
        let one = b.number(1.0);
        let set = b.call("Set", vec![x, one]);
        let done = b.boolean(true);
        let root = b.chain(vec![set, done]);
        b.finish(root)
    };
    assert!(!engine().check(&build()).is_empty());
    let permissive = engine_with(EngineConfig::default().allow_side_effects(true));
    assert!(permissive.check(&build()).is_empty());
}

// ========================================================================
// Connector services
// ========================================================================

#[test]
fn connector_descriptor_shape() {
    let mut engine = engine();
    engine
        .add_service(&Name::new("Users"), &users(), RegisterMode::Reject)
        .unwrap();

    let d = single(&engine, "Users", "GetUser");
    assert_eq!(d.min_arity, 1);
    assert_eq!(d.max_arity, Some(2));
    let supplied = Type::record([("name", Type::TEXT), ("active", Type::BOOLEAN)]).unwrap();
    assert_eq!(
        d.params[1]
            .ty
            .check_accepts_partial(&supplied, false, &CoercionRules::default()),
        Acceptance::Exact
    );
}

#[test]
fn connector_calls_bind() {
    let mut engine = engine();
    engine
        .add_service(&Name::new("Users"), &users(), RegisterMode::Reject)
        .unwrap();

    // Users.GetUser("1", {active: true}).name
    let mut b = SyntaxTreeBuilder::new();
    let id = b.text("1");
    let yes = b.boolean(true);
    let options = b.record(vec![("active", yes)]);
    let call = b.call_ns(&["Users"], "GetUser", vec![id, options]);
    let root = b.dotted(call, "name");
    let result = engine.bind(&b.finish(root));
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.root_type(), &Type::TEXT);

    // Users.GetUser() is below the minimum arity.
    let mut b = SyntaxTreeBuilder::new();
    let root = b.call_ns(&["Users"], "GetUser", vec![]);
    let result = engine.bind(&b.finish(root));
    assert_eq!(keys(&result.diagnostics), vec![MessageKey::ArityMismatch]);
}

#[test]
fn renaming_is_stable_across_registrations() {
    let signature = ConnectorSignature::new("Find", Type::TEXT)
        .required(ConnectorParam::new("Foo", Type::TEXT))
        .optional(ConnectorParam::new("Foo", Type::NUMBER));

    let mut engine = engine();
    engine
        .add_service(&Name::new("Svc"), &[signature.clone()], RegisterMode::Reject)
        .unwrap();
    let first = single(&engine, "Svc", "Find");
    engine
        .add_service(&Name::new("Svc"), &[signature], RegisterMode::Overwrite)
        .unwrap();
    let second = single(&engine, "Svc", "Find");

    assert_eq!(first.signature(), second.signature());
    assert_eq!(
        second.params[1].ty,
        Type::record([("Foo_1", Type::NUMBER)]).unwrap()
    );
}

#[test]
fn service_values_are_injected() {
    let mut engine = engine();
    engine
        .add_service(&Name::new("Users"), &users(), RegisterMode::Reject)
        .unwrap();

    // CountRows(Filter(Users.List(), age > 18))
    let mut b = SyntaxTreeBuilder::new();
    let list = b.call_ns(&["Users"], "List", vec![]);
    let age = b.ident("age");
    let limit = b.number(18.0);
    let predicate = b.binary(BinaryOp::Gt, age, limit);
    let filter = b.call("Filter", vec![list, predicate]);
    let root = b.call("CountRows", vec![filter]);

    let compiled = engine.compile(&b.finish(root)).unwrap();
    assert_eq!(compiled.ty, Type::NUMBER);
    assert_eq!(
        compiled.ir.to_string(),
        "(CountRows (inject Users (Filter (Users.List) (lambda (> @0.age 18)))))"
    );
    assert_eq!(keys(&compiled.diagnostics), vec![MessageKey::ServiceInjected]);
    assert!(!compiled.has_errors());
}

#[test]
fn unsupported_connector_function_is_disabled() {
    let mut engine = engine();
    let upload = ConnectorSignature::new("Upload", Type::BOOLEAN).required(ConnectorParam::new(
        "file",
        fx_registry::TypeTranslation::Unsupported("binary".to_owned()),
    ));
    let report = engine
        .add_service(&Name::new("Files"), &[upload], RegisterMode::Reject)
        .unwrap();
    assert_eq!(report.disabled.len(), 1);

    let mut b = SyntaxTreeBuilder::new();
    let arg = b.text("x");
    let root = b.call_ns(&["Files"], "Upload", vec![arg]);
    let diagnostics = engine.check(&b.finish(root));
    assert_eq!(keys(&diagnostics), vec![MessageKey::FunctionDisabled]);
}

// ========================================================================
// Batch binding
// ========================================================================

fn sample_trees() -> Vec<SyntaxTree> {
    (0..32)
        .map(|i| {
            let mut b = SyntaxTreeBuilder::new();
            let root = match i % 4 {
                0 => {
                    let x = b.number(f64::from(i));
                    b.call("Abs", vec![x])
                }
                1 => {
                    let x = b.text("abc");
                    b.call("Len", vec![x])
                }
                2 => {
                    let x = b.ident("missing");
                    b.call("Upper", vec![x])
                }
                _ => {
                    let x = b.number(1.0);
                    let y = b.text("a");
                    b.binary(BinaryOp::Concat, x, y)
                }
            };
            b.finish(root)
        })
        .collect()
}

#[test]
fn parallel_binding_matches_sequential() {
    let engine = engine();
    let trees = sample_trees();
    let sequential: Vec<_> = trees.iter().map(|t| engine.bind(t)).collect();
    let parallel = engine.bind_many(&trees);
    assert_eq!(parallel, sequential);
}
