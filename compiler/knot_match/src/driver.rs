//! Clause Driver: tries clauses in order and runs the first body whose
//! pattern matches.
//!
//! A body receives the clause's bindings and a [`Failure`] handle. Calling
//! [`Failure::invoke`] (and returning its error) abandons the clause and
//! moves on to the next one, as if the pattern had not matched.

use std::sync::atomic::{AtomicU64, Ordering};

use knot_ir::{Name, Value};

use crate::env::Bindings;
use crate::{CompiledPattern, ControlAction, MatchError};

/// Body of a clause.
pub type ClauseBody<'a, T> = dyn Fn(&Bindings, &Failure) -> Result<T, MatchError> + 'a;

pub struct Clause<'a, T> {
    pattern: CompiledPattern,
    failure: Option<Name>,
    body: Box<ClauseBody<'a, T>>,
}

impl<'a, T> Clause<'a, T> {
    pub fn new(
        pattern: CompiledPattern,
        body: impl Fn(&Bindings, &Failure) -> Result<T, MatchError> + 'a,
    ) -> Self {
        Clause {
            pattern,
            failure: None,
            body: Box::new(body),
        }
    }

    /// Name the failure continuation, as in `(pat (=> name) body ...)`.
    #[must_use]
    pub fn with_failure(mut self, name: Name) -> Self {
        self.failure = Some(name);
        self
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn failure(&self) -> Option<Name> {
        self.failure
    }
}

/// Identity of one `match_value` call. Nested matches never share one.
static NEXT_DRIVER: AtomicU64 = AtomicU64::new(0);

/// Failure continuation handed to a clause body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    driver: u64,
    clause: usize,
    name: Option<Name>,
}

impl Failure {
    /// Signal that the current clause should be treated as not matching.
    pub fn invoke<T>(&self) -> Result<T, MatchError> {
        Err(MatchError::Control(ControlAction::NextClause {
            driver: self.driver,
            clause: self.clause,
        }))
    }

    /// Index of the clause this failure belongs to.
    pub fn clause(&self) -> usize {
        self.clause
    }

    /// Name given by `(=> name)`, if any.
    pub fn name(&self) -> Option<Name> {
        self.name
    }
}

/// Run the first clause whose pattern matches `value`.
///
/// Fails with [`MatchError::NoMatchingPattern`] when every clause either
/// failed to match or invoked its failure continuation.
#[tracing::instrument(level = "debug", skip_all, fields(clauses = clauses.len()))]
pub fn match_value<T>(value: &Value, clauses: &[Clause<'_, T>]) -> Result<T, MatchError> {
    let driver = NEXT_DRIVER.fetch_add(1, Ordering::Relaxed);
    let seed = Bindings::default();
    for (index, clause) in clauses.iter().enumerate() {
        tracing::trace!(clause = index, "trying clause");
        let failure = Failure {
            driver,
            clause: index,
            name: clause.failure,
        };
        let outcome = clause.pattern.run(
            value,
            &seed,
            |bindings| (clause.body)(&bindings, &failure).map(Some),
            || Ok(None),
        );
        match outcome {
            Ok(Some(result)) => return Ok(result),
            Ok(None) => {}
            Err(MatchError::Control(ControlAction::NextClause {
                driver: owner,
                clause: failed,
            })) if owner == driver && failed == index => {
                tracing::trace!(clause = failed, "clause body invoked its failure continuation");
            }
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(%value, "no clause matched");
    Err(MatchError::NoMatchingPattern {
        value: value.clone(),
    })
}
