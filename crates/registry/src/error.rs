use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading data files or describing implementor markup.
///
/// The registry itself never produces one of these: delivering and binding
/// only ever surface the consumer's own error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO operation failed on path '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A line that looks like an implementor entry but does not have the
    /// `implementors["<library>"] = [<markup>, ...];` shape.
    #[error("Malformed implementor entry on line {line}: {reason}")]
    MalformedEntry { line: usize, reason: String },

    #[error("Invalid string literal on line {line}: {source}")]
    InvalidLiteral {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Not an impl block: '{0}'")]
    NotAnImpl(String),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Cannot resolve reference '{href}': {source}")]
    InvalidReference {
        href: String,
        source: url::ParseError,
    },

    #[error("Unknown pending policy: {0}")]
    UnknownPolicy(String),
}
