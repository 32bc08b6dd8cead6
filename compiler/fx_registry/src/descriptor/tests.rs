use super::*;
use pretty_assertions::assert_eq;

fn if_like() -> FunctionDescriptor {
    FunctionDescriptor::builtin(
        "If",
        vec![
            ParamSpec::value("condition", Type::BOOLEAN),
            ParamSpec::value("then", Type::Unknown),
        ],
        ReturnType::Static(Type::Unknown),
    )
    .repeating_with_tail(2, ParamSpec::value("else", Type::Unknown))
}

fn filter_like() -> FunctionDescriptor {
    FunctionDescriptor::builtin(
        "Filter",
        vec![
            ParamSpec::value("source", Type::empty_table()),
            ParamSpec::lambda("predicate", Type::BOOLEAN, 0),
        ],
        ReturnType::Static(Type::empty_table()),
    )
    .repeating(1)
}

#[test]
fn repeating_group_with_tail_maps_positions() {
    let d = if_like();
    let names = |n: usize| -> Vec<String> {
        (0..n)
            .map(|i| d.param_at(i, n).map(|p| p.name.to_string()).unwrap_or_default())
            .collect()
    };
    assert_eq!(names(2), vec!["condition", "then"]);
    assert_eq!(names(3), vec!["condition", "then", "else"]);
    assert_eq!(names(4), vec!["condition", "then", "condition", "then"]);
    assert_eq!(names(5), vec!["condition", "then", "condition", "then", "else"]);
}

#[test]
fn arity_respects_groups() {
    let d = if_like();
    assert!(!d.accepts_arity(1));
    assert!((2..8).all(|n| d.accepts_arity(n)));

    let columns = FunctionDescriptor::builtin(
        "AddColumns",
        vec![
            ParamSpec::value("source", Type::empty_table()),
            ParamSpec::identifier("column"),
            ParamSpec::lambda("value", Type::Unknown, 0),
        ],
        ReturnType::Static(Type::empty_table()),
    )
    .repeating(2);
    assert!(columns.accepts_arity(3));
    assert!(!columns.accepts_arity(4));
    assert!(columns.accepts_arity(5));
}

#[test]
fn optional_trailing_parameter() {
    let d = FunctionDescriptor::builtin(
        "Text",
        vec![
            ParamSpec::value("value", Type::NUMBER),
            ParamSpec::value("format", Type::TEXT),
        ],
        ReturnType::Static(Type::TEXT),
    )
    .with_min_arity(1);
    assert!(d.accepts_arity(1));
    assert!(d.accepts_arity(2));
    assert!(!d.accepts_arity(3));
    assert_eq!(d.param_at(2, 3), None);
}

#[test]
fn lambda_sources_follow_repeats() {
    let d = filter_like();
    assert_eq!(d.lambda_source(0, 3), None);
    assert_eq!(d.lambda_source(1, 3), Some(0));
    assert_eq!(d.lambda_source(2, 3), Some(0));
}

#[test]
fn lambda_layout_comparison() {
    let other_filter = FunctionDescriptor::builtin(
        "Filter",
        vec![
            ParamSpec::value("source", Type::empty_record()),
            ParamSpec::lambda("predicate", Type::BOOLEAN, 0),
        ],
        ReturnType::Static(Type::empty_record()),
    );
    assert!(filter_like().same_lambda_layout(&other_filter));

    let value_second = FunctionDescriptor::builtin(
        "Filter",
        vec![
            ParamSpec::value("a", Type::NUMBER),
            ParamSpec::value("b", Type::NUMBER),
        ],
        ReturnType::Static(Type::NUMBER),
    );
    assert!(!filter_like().same_lambda_layout(&value_second));
}

#[test]
fn signature_display() {
    assert_eq!(filter_like().signature().to_string(), "(*[], b) 2..");
    assert_eq!(if_like().signature().to_string(), "(b, ?, ?) 2..");
}

#[test]
fn validate_rejects_forward_scope_source() {
    let d = FunctionDescriptor::builtin(
        "Bad",
        vec![
            ParamSpec::lambda("predicate", Type::BOOLEAN, 1),
            ParamSpec::value("source", Type::empty_table()),
        ],
        ReturnType::Static(Type::BOOLEAN),
    );
    assert!(matches!(
        d.validate(),
        Err(RegistryError::InvalidDescriptor { .. })
    ));
}

#[test]
fn validate_rejects_options_record_of_wrong_type() {
    let mut d = FunctionDescriptor::builtin(
        "Bad",
        vec![ParamSpec::value("options", Type::TEXT)],
        ReturnType::Static(Type::BOOLEAN),
    );
    d.options_record = true;
    assert!(d.validate().is_err());
    assert!(filter_like().validate().is_ok());
    assert!(if_like().validate().is_ok());
}

#[test]
fn computed_return_type_sees_arguments() {
    fn first_arg(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
        ctx.args
            .first()
            .cloned()
            .ok_or_else(|| ReturnTypeError::new(MessageKey::ArityMismatch))
    }
    let d = FunctionDescriptor::builtin(
        "Id",
        vec![ParamSpec::value("x", Type::Unknown)],
        ReturnType::Computed(first_arg),
    );
    let rules = CoercionRules::default();
    let ctx = ReturnContext {
        args: &[Type::TEXT],
        identifiers: &[None],
        rules: &rules,
    };
    assert_eq!(d.return_type(&ctx), Ok(Type::TEXT));
}

#[test]
fn joined_branch_positions_skip_conditions() {
    assert_eq!(JoinedArgs::Branches.positions(2), vec![1]);
    assert_eq!(JoinedArgs::Branches.positions(3), vec![1, 2]);
    assert_eq!(JoinedArgs::Branches.positions(4), vec![1, 3]);
    assert_eq!(JoinedArgs::Branches.positions(5), vec![1, 3, 4]);
    assert_eq!(JoinedArgs::All.positions(3), vec![0, 1, 2]);
    assert!(JoinedArgs::None.positions(3).is_empty());
}
