//! Binding environments.
//!
//! `Env` is the scratch environment threaded through one match attempt.
//! It is a stack: alternatives take a [`mark`](Env::mark) before trying a
//! branch and [`truncate`](Env::truncate) back to it on failure, so a
//! failed branch never leaves bindings behind. [`Bindings`] is the
//! finished, ordered result handed to success continuations.

use knot_ir::{Name, Value};
use smallvec::SmallVec;

/// Values of a fixed list of names, as bound since some mark.
pub(crate) type Collected = SmallVec<[Option<Value>; 4]>;

#[derive(Debug, Default)]
pub(crate) struct Env {
    entries: Vec<(Name, Value)>,
}

impl Env {
    pub(crate) fn seeded(seed: &Bindings) -> Self {
        Env {
            entries: seed.entries.clone(),
        }
    }

    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn truncate(&mut self, mark: usize) {
        self.entries.truncate(mark);
    }

    #[inline]
    pub(crate) fn bind(&mut self, name: Name, value: Value) {
        self.entries.push((name, value));
    }

    /// Most recent binding of `name`.
    pub(crate) fn lookup(&self, name: Name) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    /// Current values of `names` among the bindings made since `mark`.
    pub(crate) fn collect(&self, mark: usize, names: &[Name]) -> Collected {
        let recent = &self.entries[mark.min(self.entries.len())..];
        names
            .iter()
            .map(|name| {
                recent
                    .iter()
                    .rev()
                    .find(|(bound, _)| bound == name)
                    .map(|(_, value)| value.clone())
            })
            .collect()
    }

    pub(crate) fn bindings_since(&self, mark: usize) -> Bindings {
        Bindings {
            entries: self.entries[mark.min(self.entries.len())..].to_vec(),
        }
    }
}

/// Names bound by a successful match, in the order they were bound.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    entries: Vec<(Name, Value)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding; later bindings shadow earlier ones.
    pub fn insert(&mut self, name: Name, value: Value) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    /// [`get`](Self::get) by text.
    pub fn get_str(&self, name: &str) -> Option<&Value> {
        self.get(Name::intern(name))
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Name, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        Bindings {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Bindings {
    type Item = (Name, Value);
    type IntoIter = std::vec::IntoIter<(Name, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
