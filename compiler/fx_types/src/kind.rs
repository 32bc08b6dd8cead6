//! Primitive kinds.

use std::fmt;

/// Scalar kinds a formula value can have.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// Binary floating point.
    Number,
    /// Base-10 fixed point.
    Decimal,
    Text,
    Boolean,
    Date,
    DateTime,
    Time,
    Guid,
    Color,
    Hyperlink,
    Image,
    Media,
    Blob,
    /// Untyped host object; fields resolved at runtime.
    Untyped,
    /// The type of `Blank()`.
    Blank,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 15] = [
        PrimitiveKind::Number,
        PrimitiveKind::Decimal,
        PrimitiveKind::Text,
        PrimitiveKind::Boolean,
        PrimitiveKind::Date,
        PrimitiveKind::DateTime,
        PrimitiveKind::Time,
        PrimitiveKind::Guid,
        PrimitiveKind::Color,
        PrimitiveKind::Hyperlink,
        PrimitiveKind::Image,
        PrimitiveKind::Media,
        PrimitiveKind::Blob,
        PrimitiveKind::Untyped,
        PrimitiveKind::Blank,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Number => "Number",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Text => "Text",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTime => "DateTime",
            PrimitiveKind::Time => "Time",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Color => "Color",
            PrimitiveKind::Hyperlink => "Hyperlink",
            PrimitiveKind::Image => "Image",
            PrimitiveKind::Media => "Media",
            PrimitiveKind::Blob => "Blob",
            PrimitiveKind::Untyped => "Untyped",
            PrimitiveKind::Blank => "Blank",
        }
    }

    /// Compact type-string code used by `Display`.
    pub const fn code(self) -> &'static str {
        match self {
            PrimitiveKind::Number => "n",
            PrimitiveKind::Decimal => "w",
            PrimitiveKind::Text => "s",
            PrimitiveKind::Boolean => "b",
            PrimitiveKind::Date => "D",
            PrimitiveKind::DateTime => "d",
            PrimitiveKind::Time => "T",
            PrimitiveKind::Guid => "g",
            PrimitiveKind::Color => "c",
            PrimitiveKind::Hyperlink => "h",
            PrimitiveKind::Image => "i",
            PrimitiveKind::Media => "m",
            PrimitiveKind::Blob => "o",
            PrimitiveKind::Untyped => "O",
            PrimitiveKind::Blank => "N",
        }
    }

    /// Preference when loose unification must pick one of two mutually
    /// convertible kinds: the higher rank wins, Text above all.
    pub(crate) const fn unification_rank(self) -> u8 {
        match self {
            PrimitiveKind::Text => 15,
            PrimitiveKind::DateTime => 14,
            PrimitiveKind::Date => 13,
            PrimitiveKind::Time => 12,
            PrimitiveKind::Number => 11,
            PrimitiveKind::Decimal => 10,
            PrimitiveKind::Boolean => 9,
            PrimitiveKind::Hyperlink => 8,
            PrimitiveKind::Image => 7,
            PrimitiveKind::Media => 6,
            PrimitiveKind::Blob => 5,
            PrimitiveKind::Guid => 4,
            PrimitiveKind::Color => 3,
            PrimitiveKind::Untyped => 2,
            PrimitiveKind::Blank => 1,
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, PrimitiveKind::Number | PrimitiveKind::Decimal)
    }

    #[inline]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Date | PrimitiveKind::DateTime | PrimitiveKind::Time
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
