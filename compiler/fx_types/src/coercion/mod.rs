//! Legal implicit conversions between primitive kinds.
//!
//! Every allowed pair is listed explicitly in [`COERCION_TABLE`]; nothing is
//! inferred from kind categories. Entries are either *widening* (lossless,
//! used by both `accepts` and `union`) or *conversions* (used by `accepts`,
//! and by `union` only under loose unification).
//!
//! Entries with `strict: false` are switched off when
//! [`CoercionRules::strict_numeric`] is set. These are the numeric
//! conversions that can lose precision or change meaning silently.

mod plan;

pub use plan::{coercion_plan, CoercionPlan};

use crate::PrimitiveKind;

/// Rules that vary per engine configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoercionRules {
    /// Disable the lossy numeric entries (`Number -> Decimal` and the
    /// number/date-time conversions).
    pub strict_numeric: bool,
    /// Let `union` use conversion entries, not only widening ones, so
    /// `If(c, 1, "a")` unifies to Text instead of failing.
    pub loose_unification: bool,
}

impl Default for CoercionRules {
    fn default() -> Self {
        CoercionRules {
            strict_numeric: true,
            loose_unification: false,
        }
    }
}

impl CoercionRules {
    /// Everything enabled.
    pub fn lenient() -> Self {
        CoercionRules {
            strict_numeric: false,
            loose_unification: true,
        }
    }

    #[must_use]
    pub fn with_strict_numeric(mut self, strict: bool) -> Self {
        self.strict_numeric = strict;
        self
    }

    #[must_use]
    pub fn with_loose_unification(mut self, loose: bool) -> Self {
        self.loose_unification = loose;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoercionKind {
    /// Lossless; the target kind can represent every source value.
    Widening,
    /// May fail or lose information at runtime.
    Conversion,
}

/// One row of the coercion table: a value of kind `from` may be used where
/// `to` is expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoercionEntry {
    pub from: PrimitiveKind,
    pub to: PrimitiveKind,
    pub kind: CoercionKind,
    /// Still enabled under strict numeric rules.
    pub strict: bool,
}

const fn widen(from: PrimitiveKind, to: PrimitiveKind) -> CoercionEntry {
    CoercionEntry {
        from,
        to,
        kind: CoercionKind::Widening,
        strict: true,
    }
}

const fn convert(from: PrimitiveKind, to: PrimitiveKind) -> CoercionEntry {
    CoercionEntry {
        from,
        to,
        kind: CoercionKind::Conversion,
        strict: true,
    }
}

const fn lenient(from: PrimitiveKind, to: PrimitiveKind) -> CoercionEntry {
    CoercionEntry {
        from,
        to,
        kind: CoercionKind::Conversion,
        strict: false,
    }
}

use PrimitiveKind::{
    Blob, Boolean, Date, DateTime, Decimal, Guid, Hyperlink, Image, Media, Number, Text, Time,
};

/// Every legal implicit conversion.
pub const COERCION_TABLE: &[CoercionEntry] = &[
    // Widening
    widen(Decimal, Number),
    widen(Date, DateTime),
    // To number
    convert(Text, Number),
    convert(Boolean, Number),
    lenient(Date, Number),
    lenient(DateTime, Number),
    lenient(Time, Number),
    // To decimal
    lenient(Number, Decimal),
    convert(Text, Decimal),
    convert(Boolean, Decimal),
    // To text
    convert(Number, Text),
    convert(Decimal, Text),
    convert(Boolean, Text),
    convert(Date, Text),
    convert(DateTime, Text),
    convert(Time, Text),
    convert(Guid, Text),
    convert(Hyperlink, Text),
    // To boolean
    convert(Number, Boolean),
    convert(Decimal, Boolean),
    convert(Text, Boolean),
    // To date/time
    convert(DateTime, Date),
    convert(Text, Date),
    convert(Text, DateTime),
    convert(Text, Time),
    lenient(Number, Date),
    lenient(Number, DateTime),
    lenient(Number, Time),
    // To media and identifiers
    convert(Text, Hyperlink),
    convert(Text, Image),
    convert(Text, Media),
    convert(Text, Blob),
    convert(Text, Guid),
    convert(Hyperlink, Image),
    convert(Hyperlink, Media),
];

/// How a `from` value can be used as a `to` value, if at all.
///
/// Identical kinds are not in the table; callers handle equality first.
pub fn lookup(from: PrimitiveKind, to: PrimitiveKind, rules: &CoercionRules) -> Option<CoercionKind> {
    COERCION_TABLE
        .iter()
        .find(|e| e.from == from && e.to == to)
        .filter(|e| e.strict || !rules.strict_numeric)
        .map(|e| e.kind)
}

/// `from` widens to `to` (a widening entry exists).
#[inline]
pub fn widens_to(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    COERCION_TABLE
        .iter()
        .any(|e| e.from == from && e.to == to && e.kind == CoercionKind::Widening)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
