//! Reader errors.

use crate::Span;

/// A read failure and where it happened.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub span: Span,
}

impl ReadError {
    pub fn new(kind: ReadErrorKind, span: Span) -> Self {
        ReadError { kind, span }
    }
}

/// What went wrong while reading.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadErrorKind {
    #[error("invalid token `{text}`")]
    InvalidToken { text: String },

    #[error("unexpected `{text}`")]
    UnexpectedClose { text: String },

    #[error("unterminated list")]
    UnterminatedList,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unknown escape `\\{escape}` in string")]
    BadEscape { escape: char },

    #[error("unknown character name `{name}`")]
    BadCharName { name: String },

    #[error("misplaced `.`")]
    MisplacedDot,

    #[error("invalid number `{text}`")]
    InvalidNumber { text: String },

    #[error("record literal needs a symbol tag")]
    BadRecordTag,

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("expected one datum, found {count}")]
    ExpectedOneDatum { count: usize },
}
