//! Stable message keys for every diagnostic the core can emit.
//!
//! Each key has a searchable code (`FX####`, the first digit naming the
//! phase) and a localization key the host resolves to text:
//! - FX1xxx: name resolution
//! - FX2xxx: type and overload errors
//! - FX3xxx: constructors
//! - FX4xxx: behavior and scoping rules
//! - FX5xxx: IR rewrite notes

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKey {
    // Name resolution (FX1xxx)
    /// Name not found in any scope. Args: `[name]`.
    UnknownIdentifier,
    /// Record or table has no such field. Args: `[field, type]`.
    UnknownField,
    /// `a.b` where `a` is neither an aggregate nor a namespace. Args: `[right, left type]`.
    InvalidDottedName,
    /// A namespace used where a value is required. Args: `[name]`.
    NamespaceNotValue,

    // Type and overload errors (FX2xxx)
    /// No overload accepts the argument types. Args: `[function, arg types...]`.
    NoMatchingOverload,
    /// Function exists but takes a different number of arguments. Args: `[function, min, max, found]`.
    ArityMismatch,
    /// A connector function was disabled at registration. Args: `[function, reason]`.
    FunctionDisabled,
    /// Branches of a conditional have no common type. Args: `[left type, right type]`.
    IncompatibleBranchTypes,
    /// A lambda's scope source is neither a table nor a record. Args: `[function, type]`.
    InvalidScopeSource,

    // Constructors (FX3xxx)
    /// A record constructor names the same field twice. Args: `[field]`.
    DuplicateField,
    /// Table rows disagree on a field's type. Args: `[row type, table type]`.
    IncompatibleRecordFields,

    // Behavior and scoping (FX4xxx)
    /// `As` used outside a lambda scope-source argument.
    AsNotAllowed,
    /// Behavior function called where side effects are disabled. Args: `[function]`.
    BehaviorNotAllowed,
    /// Chained expressions where side effects are disabled.
    ChainingNotAllowed,

    // IR rewrite notes (FX5xxx)
    /// A service injection was inserted. Args: `[service]`.
    ServiceInjected,
}

impl MessageKey {
    /// Localization key.
    pub const fn key(self) -> &'static str {
        match self {
            MessageKey::UnknownIdentifier => "ErrUnknownIdentifier",
            MessageKey::UnknownField => "ErrUnknownField",
            MessageKey::InvalidDottedName => "ErrInvalidDottedName",
            MessageKey::NamespaceNotValue => "ErrNamespaceNotValue",
            MessageKey::NoMatchingOverload => "ErrNoMatchingOverload",
            MessageKey::ArityMismatch => "ErrArityMismatch",
            MessageKey::FunctionDisabled => "ErrFunctionDisabled",
            MessageKey::IncompatibleBranchTypes => "ErrIncompatibleBranchTypes",
            MessageKey::InvalidScopeSource => "ErrInvalidScopeSource",
            MessageKey::DuplicateField => "ErrDuplicateField",
            MessageKey::IncompatibleRecordFields => "ErrIncompatibleRecordFields",
            MessageKey::AsNotAllowed => "ErrAsNotAllowed",
            MessageKey::BehaviorNotAllowed => "ErrBehaviorNotAllowed",
            MessageKey::ChainingNotAllowed => "ErrChainingNotAllowed",
            MessageKey::ServiceInjected => "InfoServiceInjected",
        }
    }

    /// Searchable code.
    pub const fn code(self) -> &'static str {
        match self {
            MessageKey::UnknownIdentifier => "FX1001",
            MessageKey::UnknownField => "FX1002",
            MessageKey::InvalidDottedName => "FX1003",
            MessageKey::NamespaceNotValue => "FX1004",
            MessageKey::NoMatchingOverload => "FX2001",
            MessageKey::ArityMismatch => "FX2002",
            MessageKey::FunctionDisabled => "FX2003",
            MessageKey::IncompatibleBranchTypes => "FX2004",
            MessageKey::InvalidScopeSource => "FX2005",
            MessageKey::DuplicateField => "FX3001",
            MessageKey::IncompatibleRecordFields => "FX3002",
            MessageKey::AsNotAllowed => "FX4001",
            MessageKey::BehaviorNotAllowed => "FX4002",
            MessageKey::ChainingNotAllowed => "FX4003",
            MessageKey::ServiceInjected => "FX5001",
        }
    }

    /// Severity a diagnostic with this key is created with.
    pub const fn default_severity(self) -> Severity {
        match self {
            MessageKey::ServiceInjected => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Name-resolution keys (FX1xxx).
    pub const fn is_resolution_error(self) -> bool {
        matches!(
            self,
            MessageKey::UnknownIdentifier
                | MessageKey::UnknownField
                | MessageKey::InvalidDottedName
                | MessageKey::NamespaceNotValue
        )
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.key(), self.code())
    }
}
