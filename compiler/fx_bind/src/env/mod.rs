//! Name resolution environment.
//!
//! [`SymbolTable`] holds what every expression can see: the ambient record's
//! fields, enums, option sets and connector namespaces. It is built once per
//! configuration and shared read-only.
//!
//! [`NameResolver`] layers lambda scopes on top. Scopes form a persistent
//! chain: entering a scope allocates one link pointing at its parent, so the
//! binder can hold a resolver per argument without copying anything.
//!
//! # Lookup order
//!
//! ```text
//! 1. lambda scopes, innermost first (row fields, then ThisRecord / As alias)
//! 2. globals
//! 3. enum and option-set namespaces
//! 4. function namespaces
//! ```
//!
//! All four tiers are searched with exact case first. When
//! `case_insensitive_globals` is set, tiers 2 to 4 are searched again
//! ignoring ASCII case. A name still unresolved inside a permissive scope
//! (one derived from an `Error` or `Unknown` source) binds to that scope's
//! sentinel so a single upstream error does not cascade.

mod symbol;

pub use symbol::Symbol;

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use fx_ir::Name;
use fx_registry::FunctionRegistry;
use fx_types::{EnumType, OptionSetType, Type};

/// Name of the implicit row alias in every lambda scope.
pub const THIS_RECORD: &str = "ThisRecord";

/// Globally visible names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    globals: BTreeMap<Name, Type>,
    enums: BTreeMap<Name, EnumType>,
    option_sets: BTreeMap<Name, OptionSetType>,
    function_namespaces: BTreeSet<Name>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Globals from the fields of an ambient record. Other types add nothing.
    pub fn from_ambient(ambient: &Type) -> Self {
        let mut table = Self::new();
        if let Type::Record(fields) = ambient {
            for (name, ty) in fields.iter() {
                table.globals.insert(name.clone(), ty.clone());
            }
        }
        table
    }

    #[must_use]
    pub fn with_global(mut self, name: impl Into<Name>, ty: Type) -> Self {
        self.globals.insert(name.into(), ty);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, enum_type: EnumType) -> Self {
        self.enums.insert(enum_type.name().clone(), enum_type);
        self
    }

    #[must_use]
    pub fn with_option_set(mut self, option_set: OptionSetType) -> Self {
        self.option_sets.insert(option_set.name().clone(), option_set);
        self
    }

    /// Adopt every namespace the registry knows, replacing earlier ones.
    #[must_use]
    pub fn with_registry(mut self, registry: &FunctionRegistry) -> Self {
        self.sync_namespaces(registry);
        self
    }

    pub fn sync_namespaces(&mut self, registry: &FunctionRegistry) {
        self.function_namespaces = registry.namespaces().cloned().collect();
    }

    pub fn global(&self, name: &str) -> Option<&Type> {
        self.globals.get(name)
    }

    pub fn globals(&self) -> impl Iterator<Item = (&Name, &Type)> {
        self.globals.iter()
    }

    /// Whether `name` is a known function namespace (exact case).
    pub fn has_namespace(&self, name: &str) -> bool {
        self.function_namespaces.contains(name)
    }

    /// Tiers 2 to 4, exact case.
    fn lookup_exact(&self, name: &str) -> Option<Symbol> {
        if let Some((name, ty)) = self.globals.get_key_value(name) {
            return Some(Symbol::Global {
                name: name.clone(),
                ty: ty.clone(),
            });
        }
        if let Some(e) = self.enums.get(name) {
            return Some(Symbol::EnumNamespace(e.clone()));
        }
        if let Some(o) = self.option_sets.get(name) {
            return Some(Symbol::OptionSetNamespace(o.clone()));
        }
        self.function_namespaces
            .get(name)
            .map(|ns| Symbol::FunctionNamespace(ns.clone()))
    }

    /// Tiers 2 to 4, ignoring ASCII case. The first match in name order wins.
    fn lookup_ignore_case(&self, name: &str) -> Option<Symbol> {
        if let Some((name, ty)) = self.globals.iter().find(|(n, _)| n.eq_ignore_case(name)) {
            return Some(Symbol::Global {
                name: name.clone(),
                ty: ty.clone(),
            });
        }
        if let Some(e) = self.enums.values().find(|e| e.name().eq_ignore_case(name)) {
            return Some(Symbol::EnumNamespace(e.clone()));
        }
        if let Some(o) = self
            .option_sets
            .values()
            .find(|o| o.name().eq_ignore_case(name))
        {
            return Some(Symbol::OptionSetNamespace(o.clone()));
        }
        self.function_namespaces
            .iter()
            .find(|ns| ns.eq_ignore_case(name))
            .map(|ns| Symbol::FunctionNamespace(ns.clone()))
    }
}

/// One lambda scope.
#[derive(Debug)]
struct Scope {
    row: Type,
    alias: Option<Name>,
    permissive: bool,
    parent: Option<Rc<Scope>>,
}

/// Symbol table plus the lambda scopes enclosing the current node.
#[derive(Clone, Debug)]
pub struct NameResolver<'a> {
    symbols: &'a SymbolTable,
    scope: Option<Rc<Scope>>,
    case_insensitive: bool,
}

impl<'a> NameResolver<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        NameResolver {
            symbols,
            scope: None,
            case_insensitive: false,
        }
    }

    #[must_use]
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Resolver for a lambda evaluated against rows of `row`.
    ///
    /// A sentinel row makes the scope permissive.
    #[must_use]
    pub fn enter_scope(&self, row: Type, alias: Option<Name>) -> Self {
        let permissive = row.is_sentinel();
        NameResolver {
            symbols: self.symbols,
            scope: Some(Rc::new(Scope {
                row,
                alias,
                permissive,
                parent: self.scope.clone(),
            })),
            case_insensitive: self.case_insensitive,
        }
    }

    /// Resolver for the enclosing scope. At the top level, `self` unchanged.
    #[must_use]
    pub fn exit_scope(&self) -> Self {
        NameResolver {
            symbols: self.symbols,
            scope: self.scope.as_ref().and_then(|s| s.parent.clone()),
            case_insensitive: self.case_insensitive,
        }
    }

    /// Number of enclosing lambda scopes.
    pub fn scope_depth(&self) -> usize {
        self.scopes().count()
    }

    fn scopes(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(self.scope.as_deref(), |s| s.parent.as_deref())
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.lookup_scopes(name)
            .or_else(|| self.symbols.lookup_exact(name))
            .or_else(|| {
                self.case_insensitive
                    .then(|| self.symbols.lookup_ignore_case(name))
                    .flatten()
            })
            .or_else(|| self.permissive_fallback(name))
    }

    fn lookup_scopes(&self, name: &str) -> Option<Symbol> {
        for (depth, scope) in self.scopes().enumerate() {
            // An `As` alias hides the row's fields.
            if scope.alias.is_none() {
                if let Some(ty) = scope.row.get_field(name) {
                    return Some(Symbol::ScopeField {
                        name: Name::new(name),
                        ty: ty.clone(),
                        depth,
                    });
                }
            }
            let aliased = match &scope.alias {
                Some(alias) => alias.as_str() == name,
                None => name == THIS_RECORD,
            };
            if aliased {
                return Some(Symbol::Alias {
                    name: Name::new(name),
                    ty: scope.row.clone(),
                    depth,
                });
            }
        }
        None
    }

    fn permissive_fallback(&self, name: &str) -> Option<Symbol> {
        self.scopes()
            .enumerate()
            .find(|(_, scope)| scope.permissive)
            .map(|(depth, scope)| Symbol::ScopeField {
                name: Name::new(name),
                ty: scope.row.clone(),
                depth,
            })
    }

    /// Member of an enum or option-set namespace.
    pub fn lookup_member(&self, namespace: &Symbol, member: &str) -> Option<Symbol> {
        match namespace {
            Symbol::EnumNamespace(e) => e.members().find(|(m, _)| m.as_str() == member).map(
                |(m, _)| Symbol::EnumMember {
                    enum_type: e.clone(),
                    member: m.clone(),
                },
            ),
            Symbol::OptionSetNamespace(o) => o
                .members()
                .find(|(m, _)| m.as_str() == member)
                .map(|(m, _)| Symbol::OptionSetMember {
                    option_set: o.clone(),
                    member: m.clone(),
                }),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
