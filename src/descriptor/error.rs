use thiserror::Error;

/// Malformed descriptor text; `line` and `column` are 1-based
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub reason: ParseErrorReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorReason {
    #[error("unterminated string")]
    UnterminatedString,

    #[error("unbalanced '{0}'")]
    UnbalancedDelimiter(char),

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("missing key before '='")]
    MissingKey,

    #[error("missing value after '='")]
    MissingValue,

    #[error("empty section name")]
    EmptySectionName,

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("duplicate section: {0}")]
    DuplicateSection(String),
}
