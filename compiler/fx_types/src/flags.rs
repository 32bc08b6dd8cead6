//! Pre-computed type metadata flags.
//!
//! Aggregates compute their flags once at construction, so questions like
//! "does this record contain an error anywhere" or "is any column externally
//! serviced" are O(1) instead of a field-tree walk.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        // === Presence flags ===
        // Propagate from fields to the enclosing aggregate.

        /// Contains the `Error` sentinel.
        const HAS_ERROR = 1 << 0;
        /// Contains the `Unknown` sentinel.
        const HAS_UNKNOWN = 1 << 1;
        /// Contains an aggregate tagged as externally serviced.
        const HAS_SERVICE = 1 << 2;

        // === Category flags ===
        // Describe the outermost type only.

        const IS_PRIMITIVE = 1 << 8;
        const IS_AGGREGATE = 1 << 9;
        const IS_TABLE = 1 << 10;
        /// `Error` or `Unknown`.
        const IS_SENTINEL = 1 << 11;
        const IS_NAMED = 1 << 12;
    }
}

impl TypeFlags {
    /// Flags inherited by an aggregate from its fields.
    pub const PROPAGATE_MASK: Self = Self::from_bits_truncate(
        Self::HAS_ERROR.bits() | Self::HAS_UNKNOWN.bits() | Self::HAS_SERVICE.bits(),
    );

    #[inline]
    pub const fn has_errors(self) -> bool {
        self.contains(Self::HAS_ERROR)
    }

    #[inline]
    pub const fn has_service(self) -> bool {
        self.contains(Self::HAS_SERVICE)
    }

    #[inline]
    pub const fn propagate_from(child: Self) -> Self {
        Self::from_bits_truncate(child.bits() & Self::PROPAGATE_MASK.bits())
    }

    #[inline]
    pub fn propagate_all(children: impl IntoIterator<Item = Self>) -> Self {
        children
            .into_iter()
            .fold(Self::empty(), |acc, child| acc.union(Self::propagate_from(child)))
    }
}
