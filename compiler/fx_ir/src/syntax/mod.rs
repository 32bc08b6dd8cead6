//! Syntax tree input.
//!
//! The host parser hands the core a flat arena of [`SyntaxNode`]s. Children
//! are referenced by [`NodeId`] so later phases can keep side tables indexed
//! by node (the binder's bound tree is one such table).
//!
//! # Node Kinds
//!
//! ```text
//! Literal      1, 1.5m, "text", true, Blank()
//! FirstName    Price
//! DottedName   Order.Price, StartOfWeek.Monday
//! Call         Filter(T, a > 1), Office365.Send(...)
//! Record       { a: 1, b: "x" }
//! Table        [ {a: 1}, {a: 2} ]  or  [1, 2, 3]
//! Binary/Unary a + b, Not x, -x, 5%
//! As           Filter(Orders As o, o.Total > 10)
//! Chain        Set(x, 1); Set(y, 2)
//! Error        parse error placeholder
//! ```

mod builder;
mod literal;
mod ops;

pub use builder::SyntaxTreeBuilder;
pub use literal::{DecimalValue, Literal};
pub use ops::{BinaryOp, UnaryOp};

use std::fmt;

use smallvec::SmallVec;

use crate::{Name, Span};

/// Index into a [`SyntaxTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Namespace path of a call, e.g. `["Office365"]` for `Office365.Send(...)`.
pub type NamespacePath = SmallVec<[Name; 2]>;

/// One `name: value` entry in a record constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordField {
    pub name: Name,
    pub value: NodeId,
    /// Span of the field name, where duplicate-field diagnostics point.
    pub name_span: Span,
}

/// Syntax node kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Literal(Literal),
    FirstName {
        name: Name,
    },
    DottedName {
        left: NodeId,
        right: Name,
    },
    Call {
        namespace: NamespacePath,
        name: Name,
        args: Vec<NodeId>,
    },
    Record {
        fields: Vec<RecordField>,
    },
    Table {
        rows: Vec<NodeId>,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    /// `source As alias`: names the row scope a lambda argument sees.
    As {
        source: NodeId,
        alias: Name,
    },
    Chain {
        exprs: Vec<NodeId>,
    },
    Error,
}

impl NodeKind {
    /// Direct children in source order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        match self {
            NodeKind::Literal(_) | NodeKind::FirstName { .. } | NodeKind::Error => SmallVec::new(),
            NodeKind::DottedName { left, .. } => smallvec::smallvec![*left],
            NodeKind::Call { args, .. } => args.iter().copied().collect(),
            NodeKind::Record { fields } => fields.iter().map(|f| f.value).collect(),
            NodeKind::Table { rows } => rows.iter().copied().collect(),
            NodeKind::Binary { left, right, .. } => smallvec::smallvec![*left, *right],
            NodeKind::Unary { operand, .. } => smallvec::smallvec![*operand],
            NodeKind::As { source, .. } => smallvec::smallvec![*source],
            NodeKind::Chain { exprs } => exprs.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
}

/// Arena of syntax nodes with a designated root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<SyntaxNode>, root: NodeId) -> Self {
        SyntaxTree { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id, in allocation order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "arena length is bounded by u32 at allocation"
    )]
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32))
    }
}

#[cfg(test)]
mod tests;
