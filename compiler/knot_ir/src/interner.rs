//! Process-wide string interner backing [`Name`].
//!
//! Interned strings are leaked to obtain `'static` lifetimes; the set of
//! identifiers in patterns and data is small and lives for the whole run.

use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

static GLOBAL: LazyLock<StringInterner> = LazyLock::new(StringInterner::new);

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    #[error("interner exceeded capacity: {count} strings, max is {}", u32::MAX)]
    Overflow { count: usize },
}

struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// String interner with O(1) lookup in both directions.
///
/// Reads take a shared lock; only the first sighting of a string takes the
/// write lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner holding only the empty string (as `Name::EMPTY`).
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        StringInterner {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// The interner every `Name` refers to.
    pub fn global() -> &'static StringInterner {
        &GLOBAL
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        if let Some(&index) = self.table.read().map.get(text) {
            return Ok(Name::from_index(index));
        }

        let mut table = self.table.write();
        // Another thread may have won the race between the two locks.
        if let Some(&index) = table.map.get(text) {
            return Ok(Name::from_index(index));
        }
        let index = u32::try_from(table.strings.len()).map_err(|_| InternError::Overflow {
            count: table.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.map.insert(leaked, index);
        Ok(Name::from_index(index))
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings have been interned.
    pub fn intern(&self, text: &str) -> Name {
        self.try_intern(text).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Text of an interned name. Names from another interner yield `""`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
