//! Engine version model
//!
//! - [`model`]: `Version` parsing and its total ordering
//! - [`error`]: `VersionError`

pub mod error;
pub mod model;

pub use error::VersionError;
pub use model::{BuildVariant, Prerelease, Version};
