//! Errors shared by both translation pipelines.
//!
//! Every error is fatal to the current run: nothing is retried and no
//! partial output is written.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An input character does not begin any valid token.
    #[error("lexer error on character '{ch}' at line {line}, column {column}")]
    Lexer { ch: char, line: usize, column: usize },

    /// The parser found a token that is not permitted at this point.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// A label was declared twice and the run rejects duplicates.
    #[error("label `{name}` on line {line} is already declared")]
    DuplicateLabel { name: String, line: usize },

    #[error("{0}")]
    Semantic(String),

    #[error("invalid file `{}`: expected a `.{}` file", .path.display(), .expected)]
    Extension { path: PathBuf, expected: &'static str },

    #[error("unable to access `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn semantic<S: Into<String>>(msg: S) -> Self {
        Error::Semantic(msg.into())
    }

    /// Builds an unexpected-token error from the accepted kinds
    /// and a rendering of the offending token.
    pub fn unexpected<K: std::fmt::Display, T: std::fmt::Display>(expected: &[K], found: &T) -> Self {
        let expected = expected
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Error::UnexpectedToken { expected, found: found.to_string() }
    }
}
