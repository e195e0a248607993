//! Whitespace-delimited token reader for m3d text.
//!
//! Every field in the format is a label followed by one or more values. The
//! reader checks each token against the shape it is expected to have and
//! reports the position of the first one that does not fit.

use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::options::LabelPolicy;

pub(crate) type ParseResult<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
}

pub(crate) struct TokenReader<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    policy: LabelPolicy,
}

impl<'a> TokenReader<'a> {
    pub fn new(source: &'a str, policy: LabelPolicy) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            policy,
        }
    }

    /// Next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let rest = &self.source[self.offset..];
        if rest.is_empty() {
            return None;
        }

        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = Token {
            text: &rest[..len],
            line: self.line,
            column: self.column,
        };
        self.offset += len;
        self.column += token.text.chars().count();
        Some(token)
    }

    /// Next token; running out of input is an error naming `expected`.
    pub fn require(&mut self, expected: &str) -> ParseResult<Token<'a>> {
        self.next_token().ok_or_else(|| ParseError {
            line: self.line,
            column: self.column,
            kind: ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
        })
    }

    /// Consumes a field label such as `Position:`.
    pub fn label(&mut self, canonical: &str) -> ParseResult<()> {
        let token = self.require(&format!("label {canonical:?}"))?;
        let accepted = match self.policy {
            LabelPolicy::Shape => !is_numeric(token.text),
            LabelPolicy::Exact => {
                let found = token.text.trim_end_matches(':');
                found.eq_ignore_ascii_case(canonical.trim_end_matches(':'))
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(unexpected_label(&token, canonical))
        }
    }

    /// Consumes a section banner such as `*****Materials*****`.
    pub fn section(&mut self, name: &str) -> ParseResult<()> {
        let token = self.require(&format!("section {name:?}"))?;
        let accepted = match self.policy {
            LabelPolicy::Shape => !is_numeric(token.text),
            LabelPolicy::Exact => token.text.trim_matches('*').eq_ignore_ascii_case(name),
        };
        if accepted {
            Ok(())
        } else {
            Err(unexpected_label(&token, name))
        }
    }

    /// Consumes a `{` or `}`; delimiters are always matched exactly.
    pub fn delimiter(&mut self, expected: &'static str) -> ParseResult<()> {
        let token = self.require(&format!("delimiter {expected:?}"))?;
        if token.text == expected {
            Ok(())
        } else {
            Err(ParseError {
                line: token.line,
                column: token.column,
                kind: ParseErrorKind::UnexpectedDelimiter {
                    expected,
                    found: token.text.to_string(),
                },
            })
        }
    }

    /// Consumes a free-form word such as a material or clip name.
    pub fn word(&mut self, what: &str) -> ParseResult<&'a str> {
        Ok(self.require(what)?.text)
    }

    pub fn number<T: FromStr>(&mut self, what: &str) -> ParseResult<T> {
        let token = self.require(what)?;
        token
            .text
            .parse::<T>()
            .map_err(|_| invalid_number(&token, what))
    }

    /// A finite float; `inf` and `NaN` spellings are rejected.
    pub fn float(&mut self, what: &str) -> ParseResult<f32> {
        let token = self.require(what)?;
        match token.text.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(invalid_number(&token, what)),
        }
    }

    pub fn floats<const N: usize>(&mut self, what: &str) -> ParseResult<[f32; N]> {
        let mut values = [0.0; N];
        for value in &mut values {
            *value = self.float(what)?;
        }
        Ok(values)
    }

    /// `0`/`1` as written by stream-based exporters, or `true`/`false`.
    pub fn flag(&mut self, what: &str) -> ParseResult<bool> {
        let token = self.require(what)?;
        match token.text {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(invalid_number(&token, what)),
        }
    }

    /// Integer that must lie in `0..limit`.
    pub fn index(&mut self, what: &'static str, limit: usize) -> ParseResult<usize> {
        let token = self.require(what)?;
        let value: i64 = token
            .text
            .parse()
            .map_err(|_| invalid_number(&token, what))?;

        match usize::try_from(value) {
            Ok(index) if index < limit => Ok(index),
            _ => Err(ParseError {
                line: token.line,
                column: token.column,
                kind: ParseErrorKind::IndexOutOfRange {
                    what,
                    index: value,
                    limit,
                },
            }),
        }
    }

    /// Position of the next token, for errors raised after reading a record.
    pub fn peek_position(&mut self) -> (usize, usize) {
        self.skip_whitespace();
        (self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.offset..];
        for (idx, ch) in rest.char_indices() {
            if !ch.is_whitespace() {
                self.offset += idx;
                return;
            }
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = self.source.len();
    }
}

// Number-shaped: leading digit, sign or decimal point. Labels never start
// with one, so words like `inf` still count as labels.
fn is_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
}

fn unexpected_label(token: &Token<'_>, expected: &str) -> ParseError {
    ParseError {
        line: token.line,
        column: token.column,
        kind: ParseErrorKind::UnexpectedLabel {
            expected: expected.to_string(),
            found: token.text.to_string(),
        },
    }
}

fn invalid_number(token: &Token<'_>, what: &str) -> ParseError {
    ParseError {
        line: token.line,
        column: token.column,
        kind: ParseErrorKind::InvalidNumber {
            expected: what.to_string(),
            found: token.text.to_string(),
        },
    }
}
