use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::ParseError;

/// Step of an atomic write that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Write,
    Sync,
    Rename,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WritePhase::Write => "write",
            WritePhase::Sync => "sync",
            WritePhase::Rename => "rename",
        })
    }
}

#[derive(Debug, Error)]
#[error("Failed to {phase} {}: {source}", path.display())]
pub struct IoError {
    pub phase: WritePhase,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl IoError {
    pub fn new(phase: WritePhase, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            phase,
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Write(#[from] IoError),
}
