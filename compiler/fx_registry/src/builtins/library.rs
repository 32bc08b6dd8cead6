//! Built-in function library.

use fx_types::Type;

use super::returns;
use crate::{
    DelegationCapability, FunctionDescriptor, FunctionFlags, JoinedArgs, ParamSpec, ReturnType,
};

use ReturnType::{Computed, Static};

fn value(name: &str, ty: Type) -> ParamSpec {
    ParamSpec::value(name, ty)
}

fn lambda(name: &str, ty: Type) -> ParamSpec {
    ParamSpec::lambda(name, ty, 0)
}

fn any(name: &str) -> ParamSpec {
    ParamSpec::value(name, Type::Unknown)
}

fn table(name: &str) -> ParamSpec {
    ParamSpec::value(name, Type::empty_table())
}

fn record(name: &str) -> ParamSpec {
    ParamSpec::value(name, Type::empty_record())
}

fn f(name: &str, params: Vec<ParamSpec>, returns: ReturnType) -> FunctionDescriptor {
    FunctionDescriptor::builtin(name, params, returns)
}

/// Every built-in function, in registration order.
pub(super) fn library() -> Vec<FunctionDescriptor> {
    let filter = DelegationCapability::FILTER;
    let mut fns = Vec::new();

    // Logical
    fns.extend([
        f(
            "If",
            vec![value("condition", Type::BOOLEAN), any("then")],
            Computed(returns::if_branches),
        )
        .repeating_with_tail(2, any("else"))
        .joining(JoinedArgs::Branches),
        f("IsBlank", vec![any("value")], Static(Type::BOOLEAN)),
        f("Blank", vec![], Static(Type::BLANK)),
        f("Coalesce", vec![any("value")], Computed(returns::coalesce))
            .repeating(1)
            .joining(JoinedArgs::All),
    ]);

    // Tables
    fns.extend([
        f(
            "Filter",
            vec![
                table("source"),
                lambda("predicate", Type::BOOLEAN).with_delegation(filter),
            ],
            Computed(returns::same_as_source),
        )
        .repeating(1)
        .with_flags(FunctionFlags::DELEGABLE),
        f("First", vec![table("source")], Computed(returns::row_of_source))
            .with_flags(FunctionFlags::DELEGABLE),
        f("Last", vec![table("source")], Computed(returns::row_of_source)),
        f(
            "LookUp",
            vec![
                table("source"),
                lambda("predicate", Type::BOOLEAN).with_delegation(filter),
                lambda("reduction", Type::Unknown),
            ],
            Computed(returns::lookup_result),
        )
        .with_min_arity(2)
        .with_flags(FunctionFlags::DELEGABLE),
        f("CountRows", vec![table("source")], Static(Type::NUMBER))
            .with_flags(FunctionFlags::DELEGABLE),
        f(
            "Sum",
            vec![
                table("source"),
                lambda("expression", Type::NUMBER)
                    .with_delegation(DelegationCapability::AGGREGATE),
            ],
            Static(Type::NUMBER),
        )
        .with_flags(FunctionFlags::DELEGABLE),
        f(
            "Average",
            vec![
                table("source"),
                lambda("expression", Type::NUMBER)
                    .with_delegation(DelegationCapability::AGGREGATE),
            ],
            Static(Type::NUMBER),
        )
        .with_flags(FunctionFlags::DELEGABLE),
        f(
            "ForAll",
            vec![table("source"), lambda("body", Type::Unknown)],
            Computed(returns::for_all),
        ),
        f(
            "AddColumns",
            vec![
                table("source"),
                ParamSpec::identifier("column"),
                lambda("value", Type::Unknown),
            ],
            Computed(returns::add_columns),
        )
        .repeating(2),
        f("Table", vec![record("row")], Computed(returns::table_of_records))
            .repeating(1)
            .joining(JoinedArgs::All)
            .with_min_arity(0),
        f(
            "With",
            vec![record("scope"), lambda("body", Type::Unknown)],
            Computed(returns::body_type),
        ),
    ]);

    // Text
    fns.extend([
        f("Concatenate", vec![value("text", Type::TEXT)], Static(Type::TEXT)).repeating(1),
        f("Len", vec![value("text", Type::TEXT)], Static(Type::NUMBER)),
        f("Upper", vec![value("text", Type::TEXT)], Static(Type::TEXT)),
        f("Lower", vec![value("text", Type::TEXT)], Static(Type::TEXT)),
        f("Value", vec![value("text", Type::TEXT)], Static(Type::NUMBER)),
    ]);
    for ty in [Type::NUMBER, Type::DECIMAL, Type::DATE_TIME, Type::DATE, Type::TIME] {
        fns.push(
            f(
                "Text",
                vec![value("value", ty), value("format", Type::TEXT)],
                Static(Type::TEXT),
            )
            .with_min_arity(1),
        );
    }
    fns.push(f("Text", vec![value("value", Type::TEXT)], Static(Type::TEXT)));

    // Math
    fns.extend([
        f("Abs", vec![value("number", Type::NUMBER)], Static(Type::NUMBER)),
        f("Abs", vec![value("number", Type::DECIMAL)], Static(Type::DECIMAL)),
        f(
            "Round",
            vec![value("number", Type::NUMBER), value("digits", Type::NUMBER)],
            Static(Type::NUMBER),
        ),
        f(
            "Round",
            vec![value("number", Type::DECIMAL), value("digits", Type::NUMBER)],
            Static(Type::DECIMAL),
        ),
    ]);

    // Date and time
    fns.extend([
        f("Now", vec![], Static(Type::DATE_TIME)),
        f("Today", vec![], Static(Type::DATE)),
        f(
            "Date",
            vec![
                value("year", Type::NUMBER),
                value("month", Type::NUMBER),
                value("day", Type::NUMBER),
            ],
            Static(Type::DATE),
        ),
        f(
            "DateAdd",
            vec![
                value("date", Type::DATE),
                value("amount", Type::NUMBER),
                value("units", Type::TEXT),
            ],
            Static(Type::DATE),
        )
        .with_min_arity(2),
        f(
            "DateAdd",
            vec![
                value("date", Type::DATE_TIME),
                value("amount", Type::NUMBER),
                value("units", Type::TEXT),
            ],
            Static(Type::DATE_TIME),
        )
        .with_min_arity(2),
    ]);

    // Behavior
    fns.extend([
        f(
            "Patch",
            vec![table("source"), record("base"), record("changes")],
            Computed(returns::row_of_source),
        )
        .with_flags(FunctionFlags::BEHAVIORAL),
        f(
            "Set",
            vec![ParamSpec::identifier("variable"), any("value")],
            Static(Type::Void),
        )
        .with_flags(FunctionFlags::BEHAVIORAL),
    ]);

    fns
}
