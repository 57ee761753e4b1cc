//! Lexing with logos.
//!
//! `RawToken` is the logos-derived tokenizer output. `tokenize` converts it
//! into [`Token`]s, turning every self-evaluating atom into its `Value`
//! right away so the reader only deals with structure.

use knot_ir::Value;
use logos::Logos;

use crate::{ReadError, ReadErrorKind, Span};

/// Raw token from logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r";[^\n]*")]
    LineComment,

    #[token("#;")]
    DatumComment,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("#(")]
    VectorOpen,
    #[token("#s(")]
    RecordOpen,

    #[token("'")]
    Quote,
    #[token("`")]
    Quasiquote,
    #[token(",")]
    Unquote,
    #[token(",@")]
    UnquoteSplicing,

    #[token("#t")]
    #[token("#true")]
    True,
    #[token("#f")]
    #[token("#false")]
    False,

    #[regex(r"#\\([a-zA-Z]+|[^a-zA-Z])")]
    Char,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // A string that runs off the end of the input.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    // Numbers, symbols and the dot; classified after lexing.
    #[regex(r#"[^\s()\[\]"';`,#][^\s()\[\]"';`,]*"#)]
    Atom,
}

/// Which bracket opened or closed a list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Bracket {
    Paren,
    Square,
}

impl Bracket {
    pub(crate) fn close_text(self) -> &'static str {
        match self {
            Bracket::Paren => ")",
            Bracket::Square => "]",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Token {
    Open(Bracket),
    Close(Bracket),
    /// `#(`
    VectorOpen,
    /// `#s(`, closed by `)`.
    RecordOpen,
    /// Quote-like prefix; the payload is the list head it expands to.
    Abbrev(&'static str),
    DatumComment,
    Dot,
    Datum(Value),
}

#[derive(Clone, Debug)]
pub(crate) struct Spanned {
    pub token: Token,
    pub span: Span,
}

/// Lex `source` into tokens, dropping whitespace and line comments.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ReadError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let slice = lexer.slice();
        let raw = result.map_err(|()| {
            ReadError::new(
                ReadErrorKind::InvalidToken {
                    text: slice.to_owned(),
                },
                span,
            )
        })?;
        let token = match raw {
            RawToken::LineComment => continue,
            RawToken::DatumComment => Token::DatumComment,
            RawToken::LParen => Token::Open(Bracket::Paren),
            RawToken::RParen => Token::Close(Bracket::Paren),
            RawToken::LBracket => Token::Open(Bracket::Square),
            RawToken::RBracket => Token::Close(Bracket::Square),
            RawToken::VectorOpen => Token::VectorOpen,
            RawToken::RecordOpen => Token::RecordOpen,
            RawToken::Quote => Token::Abbrev("quote"),
            RawToken::Quasiquote => Token::Abbrev("quasiquote"),
            RawToken::Unquote => Token::Abbrev("unquote"),
            RawToken::UnquoteSplicing => Token::Abbrev("unquote-splicing"),
            RawToken::True => Token::Datum(Value::Bool(true)),
            RawToken::False => Token::Datum(Value::Bool(false)),
            RawToken::Char => Token::Datum(Value::Char(char_literal(&slice[2..], span)?)),
            RawToken::String => {
                Token::Datum(Value::string(unescape(&slice[1..slice.len() - 1], span)?))
            }
            RawToken::UnterminatedString => {
                return Err(ReadError::new(ReadErrorKind::UnterminatedString, span));
            }
            RawToken::Atom => classify_atom(slice, span)?,
        };
        tokens.push(Spanned { token, span });
    }

    Ok(tokens)
}

fn char_literal(name: &str, span: Span) -> Result<char, ReadError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c);
    }
    match name {
        "space" => Ok(' '),
        "newline" | "linefeed" => Ok('\n'),
        "tab" => Ok('\t'),
        "return" => Ok('\r'),
        "nul" | "null" => Ok('\0'),
        _ => Err(ReadError::new(
            ReadErrorKind::BadCharName {
                name: name.to_owned(),
            },
            span,
        )),
    }
}

fn unescape(body: &str, span: Span) -> Result<String, ReadError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // The lexer guarantees a character follows every backslash.
        let escape = chars.next().unwrap_or('\\');
        out.push(match escape {
            '"' => '"',
            '\\' => '\\',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => {
                return Err(ReadError::new(
                    ReadErrorKind::BadEscape { escape: other },
                    span,
                ))
            }
        });
    }
    Ok(out)
}

/// Numbers start with a digit, or with a sign or `.` followed by a digit.
fn looks_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [first, ..] if first.is_ascii_digit() => true,
        [b'+' | b'-' | b'.', second, ..] if second.is_ascii_digit() => true,
        [b'+' | b'-', b'.', third, ..] if third.is_ascii_digit() => true,
        _ => false,
    }
}

fn classify_atom(text: &str, span: Span) -> Result<Token, ReadError> {
    match text {
        "." => return Ok(Token::Dot),
        "+inf.0" => return Ok(Token::Datum(Value::float(f64::INFINITY))),
        "-inf.0" => return Ok(Token::Datum(Value::float(f64::NEG_INFINITY))),
        "+nan.0" | "-nan.0" => return Ok(Token::Datum(Value::float(f64::NAN))),
        _ => {}
    }
    if !looks_numeric(text) {
        return Ok(Token::Datum(Value::symbol(text)));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Token::Datum(Value::int(n)));
    }
    let float_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    match text.parse::<f64>() {
        Ok(x) if float_chars => Ok(Token::Datum(Value::float(x))),
        _ => Err(ReadError::new(
            ReadErrorKind::InvalidNumber {
                text: text.to_owned(),
            },
            span,
        )),
    }
}
