use thiserror::Error;

/// Error type for quantity and duration parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,

    #[error("no numeric literal in '{0}'")]
    NoNumber(String),

    #[error("unknown time unit: '{0}'")]
    UnknownTimeUnit(String),
}

/// Error type for observation sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The query matched no rows. Distinct from a backend failure so
    /// callers can render an empty state instead of an error page.
    #[error("empty result set")]
    EmptyResult,

    #[error("backend error {code}: {message}")]
    Backend { code: u16, message: String },
}
