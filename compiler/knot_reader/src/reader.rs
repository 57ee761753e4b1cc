//! Recursive reader over the token stream.

use knot_ir::Value;
use knot_stack::ensure_sufficient_stack;

use crate::token::{Bracket, Spanned, Token};
use crate::{ReadError, ReadErrorKind, Span};

pub(crate) struct Reader<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    source_len: usize,
}

/// Closing delimiter a sequence is waiting for.
#[derive(Copy, Clone)]
enum Closer {
    List(Bracket),
    /// Vectors and records always close with `)`.
    Hash,
}

impl Closer {
    fn accepts(self, bracket: Bracket) -> bool {
        match self {
            Closer::List(open) => open == bracket,
            Closer::Hash => bracket == Bracket::Paren,
        }
    }
}

impl<'t> Reader<'t> {
    pub(crate) fn new(tokens: &'t [Spanned], source_len: usize) -> Self {
        Reader {
            tokens,
            pos: 0,
            source_len,
        }
    }

    pub(crate) fn read_all(mut self) -> Result<Vec<Value>, ReadError> {
        let mut data = Vec::new();
        while let Some(datum) = self.next_datum()? {
            data.push(datum);
        }
        Ok(data)
    }

    pub(crate) fn read_single(self) -> Result<Value, ReadError> {
        let eof = self.eof_span();
        let mut data = self.read_all()?;
        match data.len() {
            1 => Ok(data.swap_remove(0)),
            0 => Err(ReadError::new(ReadErrorKind::UnexpectedEof, eof)),
            count => Err(ReadError::new(
                ReadErrorKind::ExpectedOneDatum { count },
                eof,
            )),
        }
    }

    fn eof_span(&self) -> Span {
        Span::point(self.source_len)
    }

    fn advance(&mut self) -> Option<&'t Spanned> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Next top-level datum, or `None` at end of input.
    fn next_datum(&mut self) -> Result<Option<Value>, ReadError> {
        self.skip_datum_comments()?;
        if self.pos >= self.tokens.len() {
            return Ok(None);
        }
        self.read_datum().map(Some)
    }

    fn read_datum(&mut self) -> Result<Value, ReadError> {
        ensure_sufficient_stack(|| {
            self.skip_datum_comments()?;
            let Some(spanned) = self.advance() else {
                return Err(ReadError::new(ReadErrorKind::UnexpectedEof, self.eof_span()));
            };
            let span = spanned.span;
            match &spanned.token {
                Token::Datum(value) => Ok(value.clone()),
                Token::Open(bracket) => self.read_list(*bracket, span),
                Token::VectorOpen => {
                    let items = self.read_sequence(Closer::Hash, span)?;
                    Ok(Value::vector(items))
                }
                Token::RecordOpen => self.read_record(span),
                Token::Abbrev(keyword) => {
                    let datum = self.read_datum()?;
                    Ok(Value::list(vec![Value::symbol(keyword), datum]))
                }
                Token::Close(bracket) => Err(ReadError::new(
                    ReadErrorKind::UnexpectedClose {
                        text: bracket.close_text().to_owned(),
                    },
                    span,
                )),
                Token::Dot => Err(ReadError::new(ReadErrorKind::MisplacedDot, span)),
                // skip_datum_comments consumed every leading `#;`
                Token::DatumComment => Err(ReadError::new(ReadErrorKind::UnexpectedEof, span)),
            }
        })
    }

    /// List body after its opening bracket, including a dotted tail.
    fn read_list(&mut self, bracket: Bracket, open: Span) -> Result<Value, ReadError> {
        let mut items = Vec::new();
        loop {
            let Some(spanned) = self.tokens.get(self.pos) else {
                return Err(ReadError::new(ReadErrorKind::UnterminatedList, open));
            };
            match &spanned.token {
                Token::Close(close) => {
                    expect_close(Closer::List(bracket), *close, spanned.span)?;
                    self.pos += 1;
                    return Ok(Value::list(items));
                }
                Token::Dot => {
                    if items.is_empty() {
                        return Err(ReadError::new(ReadErrorKind::MisplacedDot, spanned.span));
                    }
                    self.pos += 1;
                    let tail = self.read_datum()?;
                    self.skip_datum_comments()?;
                    return match self.advance() {
                        Some(Spanned {
                            token: Token::Close(close),
                            span,
                        }) => {
                            expect_close(Closer::List(bracket), *close, *span)?;
                            Ok(Value::list_with_tail(items, tail))
                        }
                        Some(other) => {
                            Err(ReadError::new(ReadErrorKind::MisplacedDot, other.span))
                        }
                        None => Err(ReadError::new(ReadErrorKind::UnterminatedList, open)),
                    };
                }
                Token::DatumComment => {
                    self.pos += 1;
                    self.read_datum()?;
                }
                _ => items.push(self.read_datum()?),
            }
        }
    }

    /// Elements up to a closing `)`; no dotted tail allowed.
    fn read_sequence(&mut self, closer: Closer, open: Span) -> Result<Vec<Value>, ReadError> {
        let mut items = Vec::new();
        loop {
            let Some(spanned) = self.tokens.get(self.pos) else {
                return Err(ReadError::new(ReadErrorKind::UnterminatedList, open));
            };
            match &spanned.token {
                Token::Close(close) => {
                    expect_close(closer, *close, spanned.span)?;
                    self.pos += 1;
                    return Ok(items);
                }
                Token::Dot => {
                    return Err(ReadError::new(ReadErrorKind::MisplacedDot, spanned.span));
                }
                Token::DatumComment => {
                    self.pos += 1;
                    self.read_datum()?;
                }
                _ => items.push(self.read_datum()?),
            }
        }
    }

    fn read_record(&mut self, open: Span) -> Result<Value, ReadError> {
        let mut items = self.read_sequence(Closer::Hash, open)?.into_iter();
        match items.next().as_ref().and_then(Value::as_symbol) {
            Some(tag) => Ok(Value::record(tag, items.collect())),
            None => Err(ReadError::new(ReadErrorKind::BadRecordTag, open)),
        }
    }

    fn skip_datum_comments(&mut self) -> Result<(), ReadError> {
        while let Some(Spanned {
            token: Token::DatumComment,
            ..
        }) = self.tokens.get(self.pos)
        {
            self.pos += 1;
            self.read_datum()?;
        }
        Ok(())
    }
}

fn expect_close(closer: Closer, close: Bracket, span: Span) -> Result<(), ReadError> {
    if closer.accepts(close) {
        Ok(())
    } else {
        Err(ReadError::new(
            ReadErrorKind::UnexpectedClose {
                text: close.close_text().to_owned(),
            },
            span,
        ))
    }
}
