//! Loader Error Types
//!
//! [`LoadError`] is what every public loading call returns. Grammar
//! violations carry a [`ParseError`] with the line and column of the token
//! that did not fit, so a broken file can be fixed without a debugger.

use std::path::PathBuf;

use sinew_animation::AnimationError;
use thiserror::Error;

/// Failure of a scene file load. Nothing is returned on failure.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing or unreadable.
    #[error("Failed to open scene file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The token stream does not match the m3d grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The file parsed but its animation data is degenerate.
    #[error("Invalid animation data in {context}: {source}")]
    Animation {
        context: String,
        source: AnimationError,
    },
}

/// A grammar violation at a known position (1-based line and column).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

/// What went wrong at a [`ParseError`] position.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The input ended while a token was still required.
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },

    /// A token that should be a number (or flag) does not parse as one.
    #[error("expected {expected}, found {found:?}")]
    InvalidNumber { expected: String, found: String },

    /// A field label or section banner is missing or misspelled.
    #[error("expected label {expected:?}, found {found:?}")]
    UnexpectedLabel { expected: String, found: String },

    /// An opening or closing brace is missing.
    #[error("expected delimiter {expected:?}, found {found:?}")]
    UnexpectedDelimiter { expected: &'static str, found: String },

    /// An index references a vertex or bone that does not exist.
    #[error("{what} {index} is out of range (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        limit: usize,
    },

    /// A subset covers vertices or faces past the end of its buffer.
    #[error("{what} range {start}..{start}+{count} exceeds {limit}")]
    RangeOutOfBounds {
        what: &'static str,
        start: u32,
        count: u32,
        limit: usize,
    },

    /// A keyframe rotation with (near) zero or non-finite length.
    #[error("keyframe rotation {found:?} is not a valid quaternion")]
    DegenerateRotation { found: [f32; 4] },

    /// Tokens remain after the last record the header announced.
    #[error("unexpected data {found:?} after the last section")]
    TrailingData { found: String },

    /// The file is not valid UTF-8 text.
    #[error("invalid UTF-8 byte sequence")]
    InvalidUtf8,
}

/// Alias for `Result<T, LoadError>`.
pub type Result<T> = std::result::Result<T, LoadError>;
