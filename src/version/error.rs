use thiserror::Error;

/// A string that does not contain a `MAJOR.MINOR` version
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version string: {raw:?}")]
pub struct VersionError {
    pub raw: String,
}

impl VersionError {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}
