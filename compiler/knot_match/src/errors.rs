//! Match-time errors and control signals.

use knot_ir::{Name, ProcError, Value};
use knot_patterns::PatternSyntaxError;

/// Everything a compiled matcher or the clause driver can report.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// Every clause failed.
    #[error("no matching pattern for {value}")]
    NoMatchingPattern { value: Value },

    /// A non-linear reference to a name the taken `or` branch did not bind
    /// (only possible with [`OrBindings::Lenient`](crate::OrBindings)).
    #[error("reference to unbound pattern variable `{name}`")]
    UnboundReference { name: Name },

    #[error(transparent)]
    Syntax(#[from] PatternSyntaxError),

    /// Raised by a predicate, transform, accessor or slot procedure.
    #[error(transparent)]
    External(#[from] ProcError),

    /// Control signal, not an error. Caught by the clause driver.
    #[error("{0}")]
    Control(ControlAction),
}

/// Non-local exits a clause body can request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControlAction {
    /// The body of clause `clause` of the match identified by `driver`
    /// invoked its failure continuation.
    #[error("failure continuation of clause {clause} invoked outside its match")]
    NextClause { driver: u64, clause: usize },
}
