//! Read-only view of the project settings, located through [`ProjectKeys`]

use tracing::warn;

use crate::descriptor::{DescriptorDocument, TypedValue};
use crate::project::updater::{KeyPath, ProjectKeys};
use crate::version::Version;

pub const DEFAULT_NAME: &str = "Unnamed Project";
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMetadata {
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub tags: Vec<String>,
    /// Resource path as written, e.g. `res://icon.svg`
    pub icon: Option<String>,
    /// Engine feature tags (`4.2`, `Forward Plus`, ...)
    pub features: Vec<String>,
    /// Engine version the project was last saved with, from the feature tags
    pub compatibility_version: Option<Version>,
}

fn string_list(value: &TypedValue) -> Vec<String> {
    match value {
        TypedValue::String(s) => vec![s.value().clone()],
        TypedValue::Literal(literal) => literal.string_args(),
        TypedValue::Array(array) => array
            .iter()
            .filter_map(TypedValue::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Read the metadata from the keys the updater writes
pub fn read_metadata(document: &DescriptorDocument, keys: &ProjectKeys) -> ProjectMetadata {
    let get = |path: &KeyPath| document.get(&path.section, &path.key);
    let get_str = |path: &KeyPath| get(path).and_then(TypedValue::as_str).map(str::to_string);

    let features = get(&keys.engine_version).map(string_list).unwrap_or_default();
    let compatibility_version = features
        .iter()
        .find_map(|feature| Version::parse(feature).ok());
    if !features.is_empty() && compatibility_version.is_none() {
        warn!("No engine version among feature tags {:?}", features);
    }

    ProjectMetadata {
        name: get_str(&keys.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: get_str(&keys.description)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        version: get_str(&keys.version),
        tags: get(&keys.tags).map(string_list).unwrap_or_default(),
        icon: get_str(&keys.icon),
        features,
        compatibility_version,
    }
}
