//! Interned identifier.
//!
//! Symbols in data and variable names in patterns are both `Name`s, so
//! comparing a pattern variable against a bound name is a `u32` compare.

use std::fmt;

use crate::interner::StringInterner;

/// Interned string identifier.
///
/// Every `Name` is produced by the process-wide [`StringInterner`], so two
/// names are equal exactly when their text is equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Intern `text` in the global interner.
    #[inline]
    pub fn intern(text: &str) -> Self {
        StringInterner::global().intern(text)
    }

    /// The interned text.
    #[inline]
    pub fn as_str(self) -> &'static str {
        StringInterner::global().lookup(self)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::intern(text)
    }
}
