use thiserror::Error;

/// The feed document as a whole is not usable syndication markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedFormatError {
    #[error("Feed document is empty")]
    Empty,

    #[error("Malformed feed document: {0}")]
    Malformed(String),

    #[error("Unrecognized feed root element <{0}>")]
    UnrecognizedRoot(String),

    #[error("RSS document has no <channel>")]
    MissingChannel,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Feed not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure to fetch or read a release feed
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FeedFormatError),
}
