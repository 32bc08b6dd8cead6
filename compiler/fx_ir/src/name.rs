//! Identifier names.
//!
//! A [`Name`] is a shared, immutable string. Cloning is a reference-count
//! bump, equality and ordering compare contents, so names can key sorted
//! maps directly (record field trees rely on this for order-independent
//! equality).

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Shared identifier string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// Create a name without going through an interner.
    pub fn new(s: &str) -> Self {
        Name(Arc::from(s))
    }

    pub(crate) fn from_arc(s: Arc<str>) -> Self {
        Name(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII case-insensitive comparison, used by hosts with case-insensitive
    /// global names.
    #[inline]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Append `_n` to this name.
    #[must_use]
    pub fn with_suffix(&self, n: usize) -> Name {
        Name::new(&format!("{}_{n}", self.0))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(Arc::from(s))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Name::from(s))
    }
}
