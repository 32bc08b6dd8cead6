//! Resolved symbols.

use fx_ir::Name;
use fx_types::{EnumType, OptionSetType, Type};

/// What a name refers to.
///
/// Scope depths count outward from the scope the name was looked up in:
/// 0 is the innermost lambda scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Field of the ambient record.
    Global { name: Name, ty: Type },
    /// Field of a lambda row.
    ScopeField { name: Name, ty: Type, depth: usize },
    /// A whole lambda row, named by `ThisRecord` or an `As` alias.
    Alias { name: Name, ty: Type, depth: usize },
    EnumNamespace(EnumType),
    EnumMember { enum_type: EnumType, member: Name },
    OptionSetNamespace(OptionSetType),
    OptionSetMember { option_set: OptionSetType, member: Name },
    /// First segment of a connector namespace (`Office365`).
    FunctionNamespace(Name),
}

impl Symbol {
    /// Type of the symbol used as a value; `None` for namespaces.
    pub fn value_type(&self) -> Option<Type> {
        match self {
            Symbol::Global { ty, .. }
            | Symbol::ScopeField { ty, .. }
            | Symbol::Alias { ty, .. } => Some(ty.clone()),
            Symbol::EnumMember { enum_type, .. } => Some(Type::Enum(enum_type.clone())),
            Symbol::OptionSetMember { option_set, .. } => {
                Some(Type::OptionSet(option_set.clone()))
            }
            Symbol::EnumNamespace(_)
            | Symbol::OptionSetNamespace(_)
            | Symbol::FunctionNamespace(_) => None,
        }
    }

    #[inline]
    pub fn is_namespace(&self) -> bool {
        self.value_type().is_none()
    }

    /// Name as declared, which may differ in case from the lookup.
    pub fn name(&self) -> &Name {
        match self {
            Symbol::Global { name, .. }
            | Symbol::ScopeField { name, .. }
            | Symbol::Alias { name, .. }
            | Symbol::FunctionNamespace(name) => name,
            Symbol::EnumNamespace(e) => e.name(),
            Symbol::EnumMember { member, .. } | Symbol::OptionSetMember { member, .. } => member,
            Symbol::OptionSetNamespace(o) => o.name(),
        }
    }
}
