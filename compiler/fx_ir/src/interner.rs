//! Deduplicating string interner.
//!
//! Hosts that build many syntax trees over the same identifiers (column
//! names, connector parameters) intern through a shared [`StringInterner`]
//! so every occurrence of an identifier shares one allocation.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::Name;

/// Thread-safe interner handing out [`Name`]s that share storage.
#[derive(Default)]
pub struct StringInterner {
    strings: RwLock<FxHashSet<Arc<str>>>,
}

/// Interner shared between threads building trees concurrently.
pub type SharedInterner = Arc<StringInterner>;

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning a name that shares storage with every other
    /// name interned from the same text.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(existing) = self.strings.read().get(s) {
            return Name::from_arc(Arc::clone(existing));
        }

        let mut guard = self.strings.write();
        // Double-check after acquiring write lock
        if let Some(existing) = guard.get(s) {
            return Name::from_arc(Arc::clone(existing));
        }
        let stored: Arc<str> = Arc::from(s);
        guard.insert(Arc::clone(&stored));
        Name::from_arc(stored)
    }

    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.read().is_empty()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups() {
        let interner = StringInterner::new();
        let a = interner.intern("Price");
        let b = interner.intern("Price");
        let c = interner.intern("price");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn shared_across_threads() {
        let interner: SharedInterner = Arc::new(StringInterner::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || interner.intern("Status"))
            })
            .collect();
        for handle in handles {
            let Ok(name) = handle.join() else {
                panic!("interner thread panicked");
            };
            assert_eq!(name.as_str(), "Status");
        }
        assert_eq!(interner.len(), 1);
    }
}
