//! Function descriptors.
//!
//! A [`FunctionDescriptor`] is everything the binder needs to type-check a
//! call: parameter specs with their usage (value, lambda, identifier), arity
//! bounds, an optional repeating tail, and a static or computed return type.
//! Built-ins and connector functions produce the same descriptors.
//!
//! # Parameter positions
//!
//! Arguments map to declared parameters positionally. With a [`RepeatSpec`]
//! the last `group` declared parameters repeat, so `If(c1, v1, c2, v2, e)`
//! maps positions `2, 3` back onto `c1, v1` and the final odd argument onto
//! the tail parameter:
//!
//! ```text
//! declared:  [condition, value]   group = 2, tail = else
//! args:       c1  v1  c2  v2  e
//! param:      c   v   c   v   else
//! ```

use std::fmt;

use bitflags::bitflags;
use fx_diagnostic::MessageKey;
use fx_ir::{Name, NamespacePath};
use fx_types::{CoercionRules, Type};

use crate::RegistryError;

/// Index of a registered function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    /// Placeholder carried by descriptors not yet registered.
    pub const UNREGISTERED: FunctionId = FunctionId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        FunctionId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNREGISTERED {
            write!(f, "FunctionId::UNREGISTERED")
        } else {
            write!(f, "FunctionId({})", self.0)
        }
    }
}

/// How an argument is interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamUsage {
    /// Evaluated once in the caller's scope.
    Value,
    /// Evaluated per row, in a scope derived from another argument.
    Lambda,
    /// A bare name, not evaluated (`Set(x, ...)`, `AddColumns(t, Col, ...)`).
    Identifier,
}

bitflags! {
    /// What an argument may push down to a remote data source.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DelegationCapability: u8 {
        const FILTER = 1 << 0;
        const SORT = 1 << 1;
        const LOOKUP = 1 << 2;
        const AGGREGATE = 1 << 3;
    }
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u8 {
        /// Has side effects; only callable where behavior is allowed.
        const BEHAVIORAL = 1 << 0;
        /// Supplied by a connector service.
        const CONNECTOR = 1 << 1;
        /// Can run against a remote data source.
        const DELEGABLE = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamSpec {
    pub name: Name,
    pub ty: Type,
    pub usage: ParamUsage,
    /// For lambdas: position of the argument whose rows form the scope.
    pub scope_source: Option<usize>,
    pub delegation: DelegationCapability,
}

impl ParamSpec {
    pub fn value(name: impl Into<Name>, ty: Type) -> Self {
        ParamSpec {
            name: name.into(),
            ty,
            usage: ParamUsage::Value,
            scope_source: None,
            delegation: DelegationCapability::empty(),
        }
    }

    /// Lambda evaluated against the rows of argument `scope_source`.
    pub fn lambda(name: impl Into<Name>, ty: Type, scope_source: usize) -> Self {
        ParamSpec {
            name: name.into(),
            ty,
            usage: ParamUsage::Lambda,
            scope_source: Some(scope_source),
            delegation: DelegationCapability::empty(),
        }
    }

    pub fn identifier(name: impl Into<Name>) -> Self {
        ParamSpec {
            name: name.into(),
            ty: Type::Unknown,
            usage: ParamUsage::Identifier,
            scope_source: None,
            delegation: DelegationCapability::empty(),
        }
    }

    #[must_use]
    pub fn with_delegation(mut self, delegation: DelegationCapability) -> Self {
        self.delegation = delegation;
        self
    }

    #[inline]
    pub fn is_lambda(&self) -> bool {
        self.usage == ParamUsage::Lambda
    }
}

/// Repeating tail of a parameter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepeatSpec {
    /// Number of trailing declared parameters that repeat together.
    pub group: usize,
    /// Parameter allowed once after the last complete group.
    pub tail: Option<ParamSpec>,
}

/// Arguments whose types a computed return joins.
///
/// Once the join is known the binder coerces each of them to it, so every
/// branch of an `If` yields the call's type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinedArgs {
    #[default]
    None,
    All,
    /// `(condition, value)` pairs and an optional trailing else value.
    Branches,
}

impl JoinedArgs {
    pub fn positions(self, arg_count: usize) -> Vec<usize> {
        match self {
            JoinedArgs::None => Vec::new(),
            JoinedArgs::All => (0..arg_count).collect(),
            JoinedArgs::Branches => (1..arg_count)
                .step_by(2)
                .chain((arg_count % 2 == 1 && arg_count > 2).then_some(arg_count - 1))
                .collect(),
        }
    }
}

/// Inputs to a computed return type.
pub struct ReturnContext<'a> {
    /// Bound argument types, in call order.
    pub args: &'a [Type],
    /// Names of identifier-usage arguments, by position.
    pub identifiers: &'a [Option<Name>],
    pub rules: &'a CoercionRules,
}

/// A computed return type rejected the argument types.
///
/// Becomes a diagnostic at the call (or at argument `arg` when set).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnTypeError {
    pub key: MessageKey,
    pub arg: Option<usize>,
    pub args: Vec<String>,
}

impl ReturnTypeError {
    #[cold]
    pub fn new(key: MessageKey) -> Self {
        ReturnTypeError {
            key,
            arg: None,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, arg: usize) -> Self {
        self.arg = Some(arg);
        self
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

pub type ReturnTypeFn = fn(&ReturnContext<'_>) -> Result<Type, ReturnTypeError>;

/// Extra condition on the bound argument types. An overload whose guard
/// fails is not a candidate.
pub type ArgGuard = fn(&[Type]) -> bool;

#[derive(Clone, Debug)]
pub enum ReturnType {
    Static(Type),
    /// Depends on the argument types (`First` returns the row type).
    Computed(ReturnTypeFn),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionOrigin {
    Builtin,
    Service(Name),
}

/// Arity and parameter types; two overloads with equal signatures under
/// one name are duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub min_arity: usize,
    pub max_arity: Option<usize>,
    pub params: Vec<Type>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        match self.max_arity {
            Some(max) => write!(f, ") {}..={max}", self.min_arity),
            None => write!(f, ") {}..", self.min_arity),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionDescriptor {
    /// Set by the registry.
    pub id: FunctionId,
    pub namespace: NamespacePath,
    pub name: Name,
    pub params: Vec<ParamSpec>,
    pub min_arity: usize,
    /// `None` when a repeating tail makes the arity unbounded.
    pub max_arity: Option<usize>,
    pub repeat: Option<RepeatSpec>,
    /// The last parameter is a record collecting optional parameters.
    pub options_record: bool,
    /// Required parameters callers are not prompted for.
    pub hidden_required: Vec<Name>,
    pub returns: ReturnType,
    pub joins: JoinedArgs,
    pub guard: Option<ArgGuard>,
    pub flags: FunctionFlags,
    pub origin: FunctionOrigin,
}

impl FunctionDescriptor {
    /// Built-in with every parameter required.
    pub fn builtin(name: impl Into<Name>, params: Vec<ParamSpec>, returns: ReturnType) -> Self {
        let arity = params.len();
        FunctionDescriptor {
            id: FunctionId::UNREGISTERED,
            namespace: NamespacePath::new(),
            name: name.into(),
            params,
            min_arity: arity,
            max_arity: Some(arity),
            repeat: None,
            options_record: false,
            hidden_required: Vec::new(),
            returns,
            joins: JoinedArgs::None,
            guard: None,
            flags: FunctionFlags::empty(),
            origin: FunctionOrigin::Builtin,
        }
    }

    #[must_use]
    pub fn in_namespace(mut self, namespace: NamespacePath) -> Self {
        self.namespace = namespace;
        self
    }

    /// Trailing parameters past `min` are optional.
    #[must_use]
    pub fn with_min_arity(mut self, min: usize) -> Self {
        self.min_arity = min;
        self
    }

    /// The last `group` declared parameters repeat without bound.
    #[must_use]
    pub fn repeating(mut self, group: usize) -> Self {
        self.repeat = Some(RepeatSpec { group, tail: None });
        self.max_arity = None;
        self
    }

    #[must_use]
    pub fn repeating_with_tail(mut self, group: usize, tail: ParamSpec) -> Self {
        self.repeat = Some(RepeatSpec {
            group,
            tail: Some(tail),
        });
        self.max_arity = None;
        self
    }

    /// Coerce the `joins` arguments to the computed return type.
    #[must_use]
    pub fn joining(mut self, joins: JoinedArgs) -> Self {
        self.joins = joins;
        self
    }

    #[must_use]
    pub fn guarded(mut self, guard: ArgGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether the guard, if any, admits these argument types.
    pub fn admits(&self, args: &[Type]) -> bool {
        self.guard.is_none_or(|guard| guard(args))
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_behavioral(&self) -> bool {
        self.flags.contains(FunctionFlags::BEHAVIORAL)
    }

    /// `Namespace.Name`, or just `Name`.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        for segment in &self.namespace {
            out.push_str(segment.as_str());
            out.push('.');
        }
        out.push_str(self.name.as_str());
        out
    }

    pub fn signature(&self) -> Signature {
        let mut params: Vec<Type> = self.params.iter().map(|p| p.ty.clone()).collect();
        if let Some(tail) = self.repeat.as_ref().and_then(|r| r.tail.as_ref()) {
            params.push(tail.ty.clone());
        }
        Signature {
            min_arity: self.min_arity,
            max_arity: self.max_arity,
            params,
        }
    }

    /// Whether a call with `arg_count` arguments fits this descriptor.
    pub fn accepts_arity(&self, arg_count: usize) -> bool {
        if arg_count < self.min_arity || self.max_arity.is_some_and(|max| arg_count > max) {
            return false;
        }
        let declared = self.params.len();
        match &self.repeat {
            None => arg_count <= declared,
            Some(_) if arg_count <= declared => true,
            Some(repeat) => {
                let partial = (arg_count - declared) % repeat.group;
                partial == 0 || (partial == 1 && repeat.tail.is_some())
            }
        }
    }

    /// Declared parameter governing argument `index` of an `arg_count` call.
    pub fn param_at(&self, index: usize, arg_count: usize) -> Option<&ParamSpec> {
        let declared = self.params.len();
        if index < declared {
            return self.params.get(index);
        }
        let repeat = self.repeat.as_ref()?;
        if index >= arg_count || repeat.group == 0 {
            return None;
        }
        if let Some(tail) = &repeat.tail {
            if (arg_count - declared) % repeat.group != 0 && index + 1 == arg_count {
                return Some(tail);
            }
        }
        let start = declared - repeat.group;
        self.params.get(start + (index - start) % repeat.group)
    }

    /// Scope source of argument `index` if it is a lambda.
    pub fn lambda_source(&self, index: usize, arg_count: usize) -> Option<usize> {
        self.param_at(index, arg_count)
            .filter(|p| p.is_lambda())
            .and_then(|p| p.scope_source)
    }

    /// Whether the two descriptors agree on which positions are lambdas for
    /// every argument count both accept.
    pub fn same_lambda_layout(&self, other: &FunctionDescriptor) -> bool {
        let lo = self.min_arity.max(other.min_arity);
        let period = [self, other]
            .iter()
            .map(|d| d.params.len() + 2 * d.repeat.as_ref().map_or(0, |r| r.group) + 1)
            .max()
            .unwrap_or(0);
        let hi = match (self.max_arity, other.max_arity) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => lo.max(period),
        };
        (lo..=hi)
            .filter(|&n| self.accepts_arity(n) && other.accepts_arity(n))
            .all(|n| (0..n).all(|i| self.lambda_source(i, n) == other.lambda_source(i, n)))
    }

    pub fn return_type(&self, ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
        match &self.returns {
            ReturnType::Static(ty) => Ok(ty.clone()),
            ReturnType::Computed(compute) => compute(ctx),
        }
    }

    /// Structural checks run at registration.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidDescriptor {
            function: self.qualified_name(),
            reason: reason.to_owned(),
        };

        if self.name.as_str().is_empty() {
            return Err(invalid("empty function name"));
        }
        if self.min_arity > self.params.len() {
            return Err(invalid("min arity exceeds declared parameters"));
        }
        if self.max_arity.is_some_and(|max| max < self.min_arity) {
            return Err(invalid("max arity below min arity"));
        }
        if let Some(repeat) = &self.repeat {
            if repeat.group == 0 || repeat.group > self.params.len() {
                return Err(invalid("repeat group must cover 1..=declared parameters"));
            }
            if self.options_record {
                return Err(invalid("options record cannot follow a repeating tail"));
            }
        } else if self.max_arity != Some(self.params.len()) {
            return Err(invalid("max arity must equal declared parameters"));
        }
        if self.options_record && !self.params.last().is_some_and(|p| p.ty.is_record()) {
            return Err(invalid("options parameter must be a record"));
        }
        for (index, param) in self.params.iter().enumerate() {
            if !param.is_lambda() {
                continue;
            }
            match param.scope_source {
                Some(source) if source < index && !self.params[source].is_lambda() => {}
                _ => return Err(invalid("lambda scope source must be an earlier value parameter")),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
