//! Operator overloads.
//!
//! Binary and unary operators bind as calls into [`OPERATOR_NAMESPACE`],
//! named by their symbol. Every overload is a plain descriptor, so `+` over
//! Number, Decimal and the date kinds competes through the same tie-break as
//! any other function.
//!
//! `+` also joins two texts. `&` is the concatenation that converts its
//! operands to Text first.
//!
//! [`OPERATOR_NAMESPACE`]: crate::OPERATOR_NAMESPACE

use fx_ir::{BinaryOp, UnaryOp};
use fx_types::Type;

use crate::{operator_namespace, FunctionDescriptor, ParamSpec, ReturnType};

fn binary(op: BinaryOp, left: Type, right: Type, ret: Type) -> FunctionDescriptor {
    FunctionDescriptor::builtin(
        op.as_symbol(),
        vec![ParamSpec::value("left", left), ParamSpec::value("right", right)],
        ReturnType::Static(ret),
    )
    .in_namespace(operator_namespace())
}

/// `=`/`<>` between members of one option set.
fn option_set_equality(op: BinaryOp) -> FunctionDescriptor {
    binary(op, Type::Unknown, Type::Unknown, Type::BOOLEAN).guarded(same_option_set)
}

/// Both sides are the same option set. An `Error` or `Unknown` side matches
/// any option set on the other.
fn same_option_set(args: &[Type]) -> bool {
    match args {
        [Type::OptionSet(a), Type::OptionSet(b)] => a.name() == b.name(),
        [Type::OptionSet(_), other] | [other, Type::OptionSet(_)] => other.is_sentinel(),
        _ => false,
    }
}

fn unary(op: UnaryOp, operand: Type, ret: Type) -> FunctionDescriptor {
    FunctionDescriptor::builtin(
        op.as_symbol(),
        vec![ParamSpec::value("operand", operand)],
        ReturnType::Static(ret),
    )
    .in_namespace(operator_namespace())
}

/// Every operator overload, in preference order per symbol.
pub(super) fn operators() -> Vec<FunctionDescriptor> {
    use BinaryOp::{Add, And, Concat, Div, Gt, GtEq, Lt, LtEq, Mul, Or, Power, Sub};

    const N: Type = Type::NUMBER;
    const W: Type = Type::DECIMAL;
    const S: Type = Type::TEXT;
    const B: Type = Type::BOOLEAN;
    const DATE: Type = Type::DATE;
    const DT: Type = Type::DATE_TIME;
    const TIME: Type = Type::TIME;

    let mut ops = vec![
        binary(Add, N, N, N),
        binary(Add, W, W, W),
        binary(Add, DATE, N, DATE),
        binary(Add, DT, N, DT),
        binary(Add, TIME, N, TIME),
        binary(Sub, N, N, N),
        binary(Sub, W, W, W),
        binary(Sub, DATE, N, DATE),
        binary(Sub, DT, N, DT),
        binary(Sub, TIME, N, TIME),
        binary(Sub, DATE, DATE, N),
        binary(Sub, DT, DT, N),
        binary(Mul, N, N, N),
        binary(Mul, W, W, W),
        binary(Div, N, N, N),
        binary(Div, W, W, W),
        binary(Power, N, N, N),
        binary(Concat, S, S, S),
        binary(And, B, B, B),
        binary(Or, B, B, B),
    ];

    for op in [Lt, LtEq, Gt, GtEq] {
        for ty in [N, W, DATE, DT, TIME, S] {
            ops.push(binary(op, ty.clone(), ty, B));
        }
    }
    for op in [BinaryOp::Eq, BinaryOp::NotEq] {
        for ty in [N, W, S, B, DATE, DT, TIME] {
            ops.push(binary(op, ty.clone(), ty, B));
        }
        ops.push(option_set_equality(op));
    }
    // After the numeric overloads so `1 + 1` keeps Number.
    ops.push(binary(Add, S, S, S));

    ops.extend([
        unary(UnaryOp::Not, B, B),
        unary(UnaryOp::Negate, N, N),
        unary(UnaryOp::Negate, W, W),
        unary(UnaryOp::Percent, N, N),
        unary(UnaryOp::Percent, W, W),
    ]);
    ops
}
