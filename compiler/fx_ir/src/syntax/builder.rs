//! Programmatic syntax tree construction.
//!
//! Hosts that own a parser call [`SyntaxTreeBuilder::alloc`] with real
//! spans. The convenience constructors (`number`, `call`, ...) synthesize
//! spans from a running cursor: leaves get consecutive, non-overlapping
//! ranges in allocation order and composite nodes cover their children. That
//! keeps diagnostics ordered the way the expression would read when leaves
//! are allocated left to right.

use smallvec::SmallVec;

use super::{
    BinaryOp, DecimalValue, Literal, NodeId, NodeKind, RecordField, SyntaxNode, SyntaxTree,
    UnaryOp,
};
use crate::{Name, SharedInterner, Span};

#[derive(Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
    cursor: u32,
    interner: Option<SharedInterner>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose names are interned through `interner`.
    pub fn with_interner(interner: SharedInterner) -> Self {
        SyntaxTreeBuilder {
            interner: Some(interner),
            ..Self::default()
        }
    }

    pub fn name(&self, s: &str) -> Name {
        match &self.interner {
            Some(interner) => interner.intern(s),
            None => Name::new(s),
        }
    }

    /// Allocate a node with an explicit span.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1);
        self.nodes.push(SyntaxNode { kind, span });
        self.cursor = self.cursor.max(span.end.saturating_add(1));
        NodeId::new(index)
    }

    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree::from_parts(self.nodes, root)
    }

    fn fresh_span(&mut self, width: usize) -> Span {
        let width = u32::try_from(width.max(1)).unwrap_or(u32::MAX / 2);
        let span = Span::new(self.cursor, self.cursor.saturating_add(width));
        self.cursor = span.end.saturating_add(1);
        span
    }

    fn covering(&mut self, children: &[NodeId], fallback_width: usize) -> Span {
        let mut spans = children.iter().map(|&c| self.nodes[c.index()].span);
        match spans.next() {
            Some(first) => spans.fold(first, Span::merge),
            None => self.fresh_span(fallback_width),
        }
    }

    fn leaf(&mut self, kind: NodeKind, width: usize) -> NodeId {
        let span = self.fresh_span(width);
        self.alloc(kind, span)
    }

    // Literals

    pub fn number(&mut self, value: f64) -> NodeId {
        let width = value.to_string().len();
        self.leaf(NodeKind::Literal(Literal::number(value)), width)
    }

    pub fn decimal(&mut self, mantissa: i128, scale: u32) -> NodeId {
        let value = DecimalValue::new(mantissa, scale);
        let width = value.to_string().len();
        self.leaf(NodeKind::Literal(Literal::Decimal(value)), width)
    }

    pub fn text(&mut self, value: &str) -> NodeId {
        let name = self.name(value);
        self.leaf(NodeKind::Literal(Literal::Text(name)), value.len() + 2)
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        let width = if value { 4 } else { 5 };
        self.leaf(NodeKind::Literal(Literal::Boolean(value)), width)
    }

    pub fn blank(&mut self) -> NodeId {
        self.leaf(NodeKind::Literal(Literal::Blank), 7)
    }

    // Names

    pub fn ident(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        let width = name.as_str().len();
        self.leaf(NodeKind::FirstName { name }, width)
    }

    pub fn dotted(&mut self, left: NodeId, right: &str) -> NodeId {
        let right = self.name(right);
        let mut span = self.covering(&[left], 1);
        span = span.merge(self.fresh_span(right.as_str().len()));
        self.alloc(NodeKind::DottedName { left, right }, span)
    }

    // Calls and operators

    pub fn call(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        self.call_ns(&[], name, args)
    }

    pub fn call_ns(&mut self, namespace: &[&str], name: &str, args: Vec<NodeId>) -> NodeId {
        let namespace: SmallVec<[Name; 2]> = namespace.iter().map(|s| self.name(s)).collect();
        let name = self.name(name);
        let span = self.covering(&args, name.as_str().len() + 2);
        self.alloc(
            NodeKind::Call {
                namespace,
                name,
                args,
            },
            span,
        )
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let span = self.covering(&[left, right], 1);
        self.alloc(NodeKind::Binary { op, left, right }, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        let span = self.covering(&[operand], 1);
        self.alloc(NodeKind::Unary { op, operand }, span)
    }

    // Constructors

    /// Record constructor; field-name spans are synthesized before each value.
    pub fn record(&mut self, fields: Vec<(&str, NodeId)>) -> NodeId {
        let mut entries = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let name = self.name(name);
            let value_span = self.nodes[value.index()].span;
            let name_span = Span::point(value_span.start);
            entries.push(RecordField {
                name,
                value,
                name_span,
            });
        }
        let children: Vec<NodeId> = entries.iter().map(|f| f.value).collect();
        let span = self.covering(&children, 2);
        self.alloc(NodeKind::Record { fields: entries }, span)
    }

    pub fn table(&mut self, rows: Vec<NodeId>) -> NodeId {
        let span = self.covering(&rows, 2);
        self.alloc(NodeKind::Table { rows }, span)
    }

    pub fn as_alias(&mut self, source: NodeId, alias: &str) -> NodeId {
        let alias = self.name(alias);
        let mut span = self.covering(&[source], 1);
        span = span.merge(self.fresh_span(alias.as_str().len() + 3));
        self.alloc(NodeKind::As { source, alias }, span)
    }

    pub fn chain(&mut self, exprs: Vec<NodeId>) -> NodeId {
        let span = self.covering(&exprs, 1);
        self.alloc(NodeKind::Chain { exprs }, span)
    }

    pub fn error(&mut self) -> NodeId {
        self.leaf(NodeKind::Error, 1)
    }
}
