//! Release candidates extracted from a feed

use chrono::{DateTime, FixedOffset};

use crate::feed::resolver::latest;
use crate::version::{Version, VersionError};

/// A named link attached to a feed entry (article, download, enclosure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLink {
    pub name: String,
    pub url: String,
}

/// One release announced by a feed entry
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCandidate {
    pub version: Version,
    pub title: Option<String>,
    /// `None` when the entry carries no date or an unparseable one
    pub published_at: Option<DateTime<FixedOffset>>,
    pub asset_links: Vec<AssetLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a title nor an identifier to read a version from
    Untitled,
    NoVersion(VersionError),
    /// The entry could not be read, with the deserializer's message
    Malformed(String),
}

/// Diagnostic for an entry that did not yield a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position of the entry in the feed, 0-based
    pub index: usize,
    pub title: Option<String>,
    pub reason: SkipReason,
}

/// Result of reading a feed: candidates latest first, plus skipped entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedResolution {
    pub candidates: Vec<ReleaseCandidate>,
    pub skipped: Vec<SkippedEntry>,
}

impl FeedResolution {
    pub fn latest(&self, include_prerelease: bool) -> Option<&ReleaseCandidate> {
        latest(&self.candidates, include_prerelease)
    }
}
