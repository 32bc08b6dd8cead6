//! Type acceptance: can a value of the candidate type be used where `self`
//! is expected?
//!
//! # Rules, in order
//!
//! 1. Structurally equal types: exact.
//! 2. `Error` or `Unknown` on either side: exact (no cascading errors).
//! 3. `Void` target accepts anything; a `Void` candidate is rejected.
//! 4. A `Blank` candidate is accepted exactly by everything.
//! 5. Primitive pairs consult the coercion table.
//! 6. A primitive accepts an enum backed by that kind.
//! 7. Enums and option sets accept only themselves, by name.
//! 8. Records and tables accept candidates providing every required field,
//!    each accepted recursively.

use crate::coercion::lookup;
use crate::{CoercionRules, Type};

/// Outcome of an acceptance check.
///
/// Ordered from best to worst, so the worst of several checks is `max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Acceptance {
    Exact,
    /// Accepted once a coercion is inserted.
    Coerced,
    Rejected,
}

impl Acceptance {
    #[inline]
    pub fn is_accepted(self) -> bool {
        self != Acceptance::Rejected
    }

    #[inline]
    #[must_use]
    pub fn worst(self, other: Acceptance) -> Acceptance {
        self.max(other)
    }
}

impl Type {
    /// Acceptance under the default coercion rules.
    pub fn accepts(&self, candidate: &Type, exact: bool) -> bool {
        self.accepts_with(candidate, exact, &CoercionRules::default())
    }

    pub fn accepts_with(&self, candidate: &Type, exact: bool, rules: &CoercionRules) -> bool {
        self.check_accepts(candidate, exact, rules).is_accepted()
    }

    /// Acceptance, reporting whether a coercion is needed.
    ///
    /// `exact` disables every coercion, including nested field coercions.
    pub fn check_accepts(&self, candidate: &Type, exact: bool, rules: &CoercionRules) -> Acceptance {
        if self == candidate || self.is_sentinel() || candidate.is_sentinel() {
            return Acceptance::Exact;
        }
        match (self, candidate) {
            (Type::Void, _) => Acceptance::Exact,
            (_, Type::Void) => Acceptance::Rejected,
            (_, c) if c.is_blank() => Acceptance::Exact,
            (Type::Primitive(target), Type::Primitive(source)) => {
                if exact {
                    return Acceptance::Rejected;
                }
                match lookup(*source, *target, rules) {
                    Some(_) => Acceptance::Coerced,
                    None => Acceptance::Rejected,
                }
            }
            (Type::Primitive(target), Type::Enum(e)) => {
                if e.backing() == *target {
                    Acceptance::Exact
                } else if !exact && lookup(e.backing(), *target, rules).is_some() {
                    Acceptance::Coerced
                } else {
                    Acceptance::Rejected
                }
            }
            (Type::Enum(a), Type::Enum(b)) if a.name() == b.name() => Acceptance::Exact,
            (Type::OptionSet(a), Type::OptionSet(b)) if a.name() == b.name() => Acceptance::Exact,
            (Type::Record(target), Type::Record(source))
            | (Type::Table(target), Type::Table(source)) => {
                let mut result = Acceptance::Exact;
                for (name, required) in target.iter() {
                    let Some(provided) = source.get(name.as_str()) else {
                        return Acceptance::Rejected;
                    };
                    result = result.worst(required.check_accepts(provided, exact, rules));
                    if result == Acceptance::Rejected {
                        return result;
                    }
                }
                result
            }
            _ => Acceptance::Rejected,
        }
    }

    /// Acceptance of a record that may omit declared fields.
    ///
    /// Used for the trailing options record of connector functions: every
    /// field the candidate supplies must be declared and accepted, but
    /// declared fields may be missing. Non-records fall back to
    /// [`Type::check_accepts`].
    pub fn check_accepts_partial(
        &self,
        candidate: &Type,
        exact: bool,
        rules: &CoercionRules,
    ) -> Acceptance {
        let (Type::Record(declared), Type::Record(supplied)) = (self, candidate) else {
            return self.check_accepts(candidate, exact, rules);
        };
        let mut result = Acceptance::Exact;
        for (name, provided) in supplied.iter() {
            let Some(expected) = declared.get(name.as_str()) else {
                return Acceptance::Rejected;
            };
            result = result.worst(expected.check_accepts(provided, exact, rules));
            if result == Acceptance::Rejected {
                return result;
            }
        }
        result
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
