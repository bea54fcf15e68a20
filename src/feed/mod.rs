//! Engine release discovery from syndication feeds
//!
//! # Modules
//!
//! - [`resolver`]: feed bytes → [`FeedResolution`], and [`latest`] selection
//! - [`source`]: [`FeedSource`] trait and its HTTP implementation
//! - [`types`]: release candidates and skip diagnostics
//! - [`error`]: format, fetch and discovery errors

pub mod error;
pub mod resolver;
pub mod source;
pub mod types;

pub use error::{DiscoverError, FeedFormatError, FetchError};
pub use resolver::{latest, parse_feed};
pub use source::{FeedSource, HttpFeedSource, discover};
pub use types::{AssetLink, FeedResolution, ReleaseCandidate, SkipReason, SkippedEntry};
