//! Compiler configuration.

/// How `or` patterns whose branches bind different names are treated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OrBindings {
    /// Reject them at compile time.
    #[default]
    Strict,
    /// Compile them; names bound only by branches that were not taken are
    /// absent from the result, and referencing one non-linearly raises
    /// `MatchError::UnboundReference`.
    Lenient,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub or_bindings: OrBindings,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_or_bindings(mut self, or_bindings: OrBindings) -> Self {
        self.or_bindings = or_bindings;
        self
    }

    /// Shorthand for `with_or_bindings(OrBindings::Lenient)`.
    #[must_use]
    pub fn lenient_or(self) -> Self {
        self.with_or_bindings(OrBindings::Lenient)
    }
}
