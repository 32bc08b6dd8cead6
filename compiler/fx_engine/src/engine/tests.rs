use super::*;
use fx_canon::{IrError, IrKind, IrPass};
use fx_diagnostic::{DiagnosticSink, MessageKey, Severity};
use fx_ir::{BinaryOp, SyntaxTreeBuilder};
use fx_registry::{ConnectorError, ConnectorParam, RegistryError};
use fx_types::{EnumValue, PrimitiveKind};
use pretty_assertions::assert_eq;

fn engine() -> Engine {
    let mut engine = Engine::with_builtins(EngineConfig::default()).unwrap();
    engine.set_ambient(&Type::record([("Price", Type::NUMBER), ("Name", Type::TEXT)]).unwrap());
    engine
}

fn get_user() -> ConnectorSignature {
    let user = Type::record([("id", Type::TEXT), ("name", Type::TEXT)]).unwrap();
    ConnectorSignature::new("GetUser", user)
        .required(ConnectorParam::new("id", Type::TEXT))
        .optional(ConnectorParam::new("active", Type::BOOLEAN))
}

// ========================================================================
// Configuration
// ========================================================================

#[test]
fn ambient_fields_become_globals() {
    let engine = engine();
    assert_eq!(engine.symbols().global("Price"), Some(&Type::NUMBER));
    assert_eq!(engine.symbols().global("Name"), Some(&Type::TEXT));
}

#[test]
fn non_record_ambient_adds_nothing() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_ambient(&Type::NUMBER);
    assert_eq!(engine.symbols().globals().count(), 0);
}

#[test]
fn enums_resolve_after_registration() {
    let mut engine = engine();
    engine.add_enum(EnumType::new(
        "Color",
        PrimitiveKind::Text,
        [("Red", EnumValue::Text(Name::new("red")))],
    ));
    let mut b = SyntaxTreeBuilder::new();
    let ns = b.ident("Color");
    let root = b.dotted(ns, "Red");
    assert!(engine.check(&b.finish(root)).is_empty());
}

#[test]
fn service_namespace_is_visible_after_add_service() {
    let mut engine = engine();
    let mut b = SyntaxTreeBuilder::new();
    let id = b.text("42");
    let root = b.call_ns(&["Users"], "GetUser", vec![id]);
    let tree = b.finish(root);

    let before = engine.check(&tree);
    assert_eq!(before[0].key, MessageKey::UnknownIdentifier);

    let report = engine
        .add_service(&Name::new("Users"), &[get_user()], RegisterMode::Reject)
        .unwrap();
    assert_eq!(report.registered.len(), 1);
    assert!(engine.check(&tree).is_empty());
    assert!(engine.symbols().has_namespace("Users"));
}

#[test]
fn failed_service_is_atomic() {
    let mut engine = engine();
    let functions = engine.registry().len();
    let err = engine
        .add_service(
            &Name::new("Users"),
            &[get_user(), get_user()],
            RegisterMode::Reject,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Connector(ConnectorError::Registry(
            RegistryError::DuplicateFunction { .. }
        ))
    ));
    assert_eq!(engine.registry().len(), functions);
    assert!(!engine.symbols().has_namespace("Users"));
}

// ========================================================================
// Compilation
// ========================================================================

#[test]
fn compile_returns_ir_and_type() {
    let engine = engine();
    let mut b = SyntaxTreeBuilder::new();
    let price = b.ident("Price");
    let one = b.number(1.0);
    let root = b.binary(BinaryOp::Add, price, one);
    let compiled = engine.compile(&b.finish(root)).unwrap();
    assert_eq!(compiled.ir.to_string(), "(+ Price 1)");
    assert_eq!(compiled.ty, Type::NUMBER);
    assert!(!compiled.has_errors());
}

#[test]
fn type_errors_are_diagnostics_not_failures() {
    let engine = engine();
    let mut b = SyntaxTreeBuilder::new();
    let missing = b.ident("Missing");
    let root = b.call("Abs", vec![missing]);
    let compiled = engine.compile(&b.finish(root)).unwrap();
    assert!(compiled.has_errors());
    assert_eq!(compiled.diagnostics[0].key, MessageKey::UnknownIdentifier);
}

#[test]
fn pass_diagnostics_are_merged_in_source_order() {
    let mut engine = engine();
    engine
        .add_service(&Name::new("Users"), &[get_user()], RegisterMode::Reject)
        .unwrap();
    // {a: Missing, b: Users.GetUser("1")}: an error on the left, an
    // injection on the right.
    let mut b = SyntaxTreeBuilder::new();
    let missing = b.ident("Missing");
    let id = b.text("1");
    let user = b.call_ns(&["Users"], "GetUser", vec![id]);
    let root = b.record(vec![("a", missing), ("b", user)]);
    let compiled = engine.compile(&b.finish(root)).unwrap();

    let keys: Vec<MessageKey> = compiled.diagnostics.iter().map(|d| d.key).collect();
    assert_eq!(
        keys,
        vec![MessageKey::UnknownIdentifier, MessageKey::ServiceInjected]
    );
    assert_eq!(compiled.diagnostics[1].severity, Severity::Info);
}

/// Replaces a root call with its last argument.
struct UnwrapCalls;

impl IrPass for UnwrapCalls {
    fn name(&self) -> &str {
        "unwrap-calls"
    }

    fn transform(&self, root: IrNode, _sink: &mut dyn DiagnosticSink) -> IrNode {
        if let IrKind::Call { args, .. } = &root.kind {
            if let Some(last) = args.last() {
                return last.clone();
            }
        }
        root
    }
}

#[test]
fn broken_pass_is_an_internal_error() {
    let mut engine = engine();
    engine.add_pass(Box::new(UnwrapCalls));
    let mut b = SyntaxTreeBuilder::new();
    let r = b.number(1.0);
    let row = b.record(vec![("a", r)]);
    let source = b.table(vec![row]);
    let a = b.ident("a");
    let zero = b.number(0.0);
    let predicate = b.binary(BinaryOp::Gt, a, zero);
    let root = b.call("Filter", vec![source, predicate]);

    let err = engine.compile(&b.finish(root)).unwrap_err();
    let EngineError::Internal(IrError::InvalidPassOutput { pass, .. }) = &err else {
        panic!("expected an invalid pass output, got {err:?}");
    };
    assert_eq!(pass, "unwrap-calls");
}

#[test]
fn error_limit_applies() {
    let engine = Engine::with_builtins(EngineConfig::default().error_limit(1)).unwrap();
    let mut b = SyntaxTreeBuilder::new();
    let x = b.ident("x");
    let y = b.ident("y");
    let root = b.binary(BinaryOp::Add, x, y);
    assert_eq!(engine.check(&b.finish(root)).len(), 1);
}

#[test]
fn compile_many_keeps_order() {
    let engine = engine();
    let trees: Vec<SyntaxTree> = (0..8)
        .map(|i| {
            let mut b = SyntaxTreeBuilder::new();
            let root = if i % 2 == 0 {
                b.ident("Price")
            } else {
                b.ident("Name")
            };
            b.finish(root)
        })
        .collect();
    let types: Vec<Type> = engine
        .compile_many(&trees)
        .into_iter()
        .map(|c| c.unwrap().ty)
        .collect();
    for (i, ty) in types.iter().enumerate() {
        let expected = if i % 2 == 0 { Type::NUMBER } else { Type::TEXT };
        assert_eq!(ty, &expected);
    }
}

#[test]
fn debug_output_is_summarized() {
    let rendered = format!("{:?}", Engine::new(EngineConfig::default()));
    assert!(rendered.starts_with("Engine {"));
    assert!(rendered.contains("functions: 0"));
}
