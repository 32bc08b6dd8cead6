use super::*;
use crate::{FunctionDescriptor, RegistryError, ReturnType};
use fx_ir::Literal;
use fx_types::{Acceptance, CoercionRules, Type};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn n(s: &str) -> Name {
    Name::new(s)
}

fn single(registry: &FunctionRegistry, service: &str, name: &str) -> Arc<FunctionDescriptor> {
    let overloads: Vec<_> = registry.overloads(&[n(service)], &n(name)).cloned().collect();
    assert_eq!(overloads.len(), 1);
    overloads.into_iter().next().unwrap()
}

fn get_user() -> ConnectorSignature {
    let user = Type::record([("id", Type::TEXT), ("name", Type::TEXT)]).unwrap();
    ConnectorSignature::new("GetUser", user)
        .required(ConnectorParam::new("id", Type::TEXT))
        .optional(ConnectorParam::new("name", Type::TEXT))
        .optional(ConnectorParam::new("active", Type::BOOLEAN))
}

#[test]
fn optional_params_collapse_into_record() {
    let mut registry = FunctionRegistry::new();
    let report = registry
        .add_service(&n("Users"), &[get_user()], RegisterMode::Reject)
        .unwrap();
    assert_eq!(report.registered.len(), 1);
    assert!(report.disabled.is_empty());

    let d = single(&registry, "Users", "GetUser");
    assert_eq!(d.min_arity, 1);
    assert_eq!(d.max_arity, Some(2));
    assert!(d.options_record);
    assert!(d.flags.contains(FunctionFlags::CONNECTOR));
    assert_eq!(d.origin, crate::FunctionOrigin::Service(n("Users")));

    let options = &d.params[1].ty;
    let rules = CoercionRules::default();
    let supplied = Type::record([("name", Type::TEXT), ("active", Type::BOOLEAN)]).unwrap();
    assert_eq!(
        options.check_accepts_partial(&supplied, false, &rules),
        Acceptance::Exact
    );
    let partial = Type::record([("active", Type::BOOLEAN)]).unwrap();
    assert_eq!(
        options.check_accepts_partial(&partial, false, &rules),
        Acceptance::Exact
    );
    let stray = Type::record([("other", Type::TEXT)]).unwrap();
    assert_eq!(
        options.check_accepts_partial(&stray, false, &rules),
        Acceptance::Rejected
    );
}

#[test]
fn return_types_carry_the_service_tag() {
    let mut registry = FunctionRegistry::new();
    registry
        .add_service(&n("Users"), &[get_user()], RegisterMode::Reject)
        .unwrap();
    let d = single(&registry, "Users", "GetUser");
    let ReturnType::Static(ty) = &d.returns else {
        panic!("connector returns are static");
    };
    assert_eq!(ty.service().map(|s| s.name().as_str()), Some("Users"));
}

#[test]
fn colliding_optional_names_get_suffixes() {
    let signature = ConnectorSignature::new("Find", Type::TEXT)
        .required(ConnectorParam::new("Foo", Type::TEXT))
        .optional(ConnectorParam::new("Foo", Type::NUMBER))
        .optional(ConnectorParam::new("Foo", Type::BOOLEAN))
        .optional(ConnectorParam::new("Foo_1", Type::TEXT));

    let Adapted::Function(d) = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap()
    else {
        panic!("expected a function");
    };
    let options = d.params[1].ty.aggregate().unwrap();
    let names: Vec<&str> = options.names().map(Name::as_str).collect();
    assert_eq!(names, vec!["Foo_1", "Foo_1_1", "Foo_2"]);
    assert_eq!(options.get("Foo_1"), Some(&Type::NUMBER));
    assert_eq!(options.get("Foo_2"), Some(&Type::BOOLEAN));
}

#[test]
fn renaming_is_idempotent() {
    let signature = ConnectorSignature::new("Find", Type::TEXT)
        .required(ConnectorParam::new("Foo", Type::TEXT))
        .optional(ConnectorParam::new("Foo", Type::NUMBER));

    let first = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap();
    let second = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap();
    let (Adapted::Function(a), Adapted::Function(b)) = (first, second) else {
        panic!("expected functions");
    };
    assert_eq!(a.signature(), b.signature());
    assert_eq!(
        a.params[1].ty,
        Type::record([("Foo_1", Type::NUMBER)]).unwrap()
    );
}

#[test]
fn options_param_avoids_required_names() {
    let signature = ConnectorSignature::new("Run", Type::TEXT)
        .required(ConnectorParam::new("options", Type::TEXT))
        .optional(ConnectorParam::new("verbose", Type::BOOLEAN));
    let Adapted::Function(d) = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap()
    else {
        panic!("expected a function");
    };
    assert_eq!(d.params[1].name.as_str(), "options_1");
}

#[test]
fn hidden_required_params_count_toward_min_arity() {
    let signature = ConnectorSignature::new("Send", Type::Void)
        .required(ConnectorParam::new("to", Type::TEXT))
        .required(ConnectorParam::new("region", Type::TEXT).hidden(Literal::Text(n("eu"))));
    let Adapted::Function(d) = ConnectorDescriptorBuilder::adapt(&n("Mail"), &signature).unwrap()
    else {
        panic!("expected a function");
    };
    assert_eq!(d.min_arity, 2);
    assert_eq!(d.max_arity, Some(2));
    assert_eq!(d.hidden_required, vec![n("region")]);
    assert!(!d.options_record);
}

#[test]
fn unsupported_types_disable_the_function() {
    let signature = ConnectorSignature::new("Upload", Type::Void)
        .required(ConnectorParam::new("file", TypeTranslation::Unsupported("binary".into())));
    let mut registry = FunctionRegistry::new();
    let report = registry
        .add_service(&n("Files"), &[signature, get_user()], RegisterMode::Reject)
        .unwrap();

    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.disabled.len(), 1);
    assert_eq!(report.disabled[0].reason, "binary");
    assert!(!registry.contains(&[n("Files")], &n("Upload")));
    assert!(registry.disabled(&[n("Files")], &n("Upload")).is_some());
    assert!(registry.is_namespace("Files"));
}

#[test]
fn unsupported_return_type_disables() {
    let signature = ConnectorSignature::new("Stream", TypeTranslation::Unsupported("stream".into()));
    let adapted = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap();
    assert!(matches!(adapted, Adapted::Disabled(d) if d.reason == "stream"));
}

#[test]
fn duplicate_required_param_is_a_configuration_error() {
    let signature = ConnectorSignature::new("Bad", Type::TEXT)
        .required(ConnectorParam::new("x", Type::TEXT))
        .required(ConnectorParam::new("x", Type::NUMBER));
    let err = ConnectorDescriptorBuilder::adapt(&n("Svc"), &signature).unwrap_err();
    assert_eq!(
        err,
        ConnectorError::DuplicateRequiredParam {
            function: "Svc.Bad".to_owned(),
            param: "x".to_owned(),
        }
    );
}

#[test]
fn failed_service_leaves_registry_unchanged() {
    let mut registry = FunctionRegistry::new();
    let generation = registry.generation();
    let err = registry
        .add_service(&n("Users"), &[get_user(), get_user()], RegisterMode::Reject)
        .unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::Registry(RegistryError::DuplicateFunction { .. })
    ));
    assert!(registry.is_empty());
    assert_eq!(registry.generation(), generation);
    assert!(!registry.is_namespace("Users"));
}

#[test]
fn overwrite_mode_replaces_service_functions() {
    let mut registry = FunctionRegistry::new();
    let first = registry
        .add_service(&n("Users"), &[get_user()], RegisterMode::Reject)
        .unwrap();
    let second = registry
        .add_service(&n("Users"), &[get_user()], RegisterMode::Overwrite)
        .unwrap();
    assert_eq!(first.registered, second.registered);
    assert_eq!(registry.len(), 1);
}

#[test]
fn explicit_namespace_overrides_service_name() {
    let mut signature = get_user();
    signature.namespace = smallvec::smallvec![n("Directory")];
    let mut registry = FunctionRegistry::new();
    registry
        .add_service(&n("Users"), &[signature], RegisterMode::Reject)
        .unwrap();
    assert!(registry.contains(&[n("Directory")], &n("GetUser")));
    assert!(registry.is_namespace("Directory"));
}
