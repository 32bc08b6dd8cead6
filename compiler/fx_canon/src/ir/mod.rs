//! Owned IR tree.
//!
//! Every node carries its type and source span. Unlike the bound tree, the
//! IR is self-contained: names are resolved to objects or scope accesses,
//! coercions are explicit nodes, and lambda arguments are wrapped so an
//! evaluator knows to run them per row.

use std::fmt;

use bitflags::bitflags;
use fx_diagnostic::Diagnostic;
use fx_ir::{Literal, Name, Span};
use fx_registry::{FunctionFlags, FunctionId};
use fx_types::{CoercionPlan, EnumValue, PrimitiveKind, ServiceTag, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrNode {
    pub kind: IrKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrKind {
    Literal(Literal),
    ResolvedObject(ResolvedObject),
    Call {
        target: CallTarget,
        args: Vec<IrNode>,
        flags: CallFlags,
    },
    /// Fields in source order, names unique.
    RecordCtor {
        fields: Vec<(Name, IrNode)>,
    },
    TableCtor {
        rows: Vec<IrNode>,
    },
    FieldAccess {
        source: Box<IrNode>,
        field: Name,
    },
    /// A field of an enclosing lambda row, or the whole row when `field` is
    /// `None`. Depth 0 is the innermost lambda.
    ScopeAccess {
        depth: usize,
        field: Option<Name>,
    },
    /// Argument evaluated once per row of its scope source.
    Lambda {
        body: Box<IrNode>,
    },
    Chaining {
        exprs: Vec<IrNode>,
    },
    Coerce {
        from: PrimitiveKind,
        to: PrimitiveKind,
        operand: Box<IrNode>,
    },
    AggregateCoercion {
        plan: CoercionPlan,
        operand: Box<IrNode>,
    },
    Error {
        diagnostic: Option<Diagnostic>,
    },
}

/// A name resolved outside any lambda scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedObject {
    Global(Name),
    EnumMember {
        enum_name: Name,
        member: Name,
        value: EnumValue,
    },
    OptionSetMember {
        option_set: Name,
        member: Name,
    },
    /// Unevaluated name passed to an identifier parameter.
    Identifier(Name),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallTarget {
    Function { id: FunctionId, name: String },
    Intrinsic(Intrinsic),
}

/// Operations the engine inserts itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    /// Bind the connector service for the wrapped value.
    InjectService { service: ServiceTag },
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CallFlags: u8 {
        /// Side-effecting; an evaluator checks for cancellation around it.
        const BEHAVIORAL = 1 << 0;
        const CONNECTOR = 1 << 1;
    }
}

impl From<FunctionFlags> for CallFlags {
    fn from(flags: FunctionFlags) -> Self {
        let mut out = CallFlags::empty();
        out.set(CallFlags::BEHAVIORAL, flags.contains(FunctionFlags::BEHAVIORAL));
        out.set(CallFlags::CONNECTOR, flags.contains(FunctionFlags::CONNECTOR));
        out
    }
}

impl IrNode {
    pub fn new(kind: IrKind, ty: Type, span: Span) -> Self {
        IrNode { kind, ty, span }
    }

    pub fn error(diagnostic: Option<Diagnostic>, span: Span) -> Self {
        IrNode::new(IrKind::Error { diagnostic }, Type::Error, span)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, IrKind::Error { .. })
    }

    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<&IrNode> {
        match &self.kind {
            IrKind::Literal(_)
            | IrKind::ResolvedObject(_)
            | IrKind::ScopeAccess { .. }
            | IrKind::Error { .. } => Vec::new(),
            IrKind::Call { args, .. } => args.iter().collect(),
            IrKind::RecordCtor { fields } => fields.iter().map(|(_, v)| v).collect(),
            IrKind::TableCtor { rows } => rows.iter().collect(),
            IrKind::Chaining { exprs } => exprs.iter().collect(),
            IrKind::FieldAccess { source: inner, .. }
            | IrKind::Lambda { body: inner }
            | IrKind::Coerce { operand: inner, .. }
            | IrKind::AggregateCoercion { operand: inner, .. } => vec![inner],
        }
    }

    /// Every node in the tree, parents before children.
    pub fn descendants(&self) -> Vec<&IrNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().into_iter().rev());
        }
        out
    }
}

/// S-expression dump, used in tests and debug logs.
impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IrKind::Literal(lit) => write!(f, "{lit}"),
            IrKind::ResolvedObject(obj) => match obj {
                ResolvedObject::Global(name) => write!(f, "{name}"),
                ResolvedObject::EnumMember {
                    enum_name, member, ..
                } => write!(f, "{enum_name}.{member}"),
                ResolvedObject::OptionSetMember { option_set, member } => {
                    write!(f, "{option_set}.{member}")
                }
                ResolvedObject::Identifier(name) => write!(f, "'{name}"),
            },
            IrKind::Call { target, args, .. } => {
                match target {
                    CallTarget::Function { name, .. } => write!(f, "({name}")?,
                    CallTarget::Intrinsic(Intrinsic::InjectService { service }) => {
                        write!(f, "(inject {}", service.name())?;
                    }
                }
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            IrKind::RecordCtor { fields } => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            IrKind::TableCtor { rows } => {
                f.write_str("[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{row}")?;
                }
                f.write_str("]")
            }
            IrKind::FieldAccess { source, field } => write!(f, "{source}.{field}"),
            IrKind::ScopeAccess { depth, field } => match field {
                Some(field) => write!(f, "@{depth}.{field}"),
                None => write!(f, "@{depth}"),
            },
            IrKind::Lambda { body } => write!(f, "(lambda {body})"),
            IrKind::Chaining { exprs } => {
                f.write_str("(chain")?;
                for expr in exprs {
                    write!(f, " {expr}")?;
                }
                f.write_str(")")
            }
            IrKind::Coerce { to, operand, .. } => write!(f, "(as-{} {operand})", to.code()),
            IrKind::AggregateCoercion { operand, .. } => write!(f, "(coerce {operand})"),
            IrKind::Error { .. } => f.write_str("<error>"),
        }
    }
}
