//! Targeted rewrites of the known project fields

use serde::Deserialize;
use tracing::{debug, warn};

use crate::descriptor::parser::decode_string_literal;
use crate::descriptor::value::quote;
use crate::descriptor::{DescriptorDocument, KeyChange, TypedLiteral, TypedValue};
use crate::version::Version;

/// Section holding the project-wide settings
pub const APPLICATION_SECTION: &str = "application";

/// Engine feature tags, e.g. `PackedStringArray("4.2", "Forward Plus")`
pub const FEATURES_KEY: &str = "config/features";

/// Project icon resource path
pub const ICON_KEY: &str = "config/icon";

pub const NAME_KEY: &str = "config/name";
pub const DESCRIPTION_KEY: &str = "config/description";

/// The project's own release number, unrelated to the engine version
pub const VERSION_KEY: &str = "config/version";

/// Project tags, a `PackedStringArray`
pub const TAGS_KEY: &str = "config/tags";

/// Location of a key inside the descriptor
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KeyPath {
    pub section: String,
    pub key: String,
}

impl KeyPath {
    pub fn new(section: &str, key: &str) -> Self {
        Self {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

/// Keys the updater knows how to rewrite
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectKeys {
    /// Feature tags holding the compatibility engine version
    pub engine_version: KeyPath,
    pub icon: KeyPath,
    pub name: KeyPath,
    pub description: KeyPath,
    pub version: KeyPath,
    pub tags: KeyPath,
}

impl Default for ProjectKeys {
    fn default() -> Self {
        Self {
            engine_version: KeyPath::new(APPLICATION_SECTION, FEATURES_KEY),
            icon: KeyPath::new(APPLICATION_SECTION, ICON_KEY),
            name: KeyPath::new(APPLICATION_SECTION, NAME_KEY),
            description: KeyPath::new(APPLICATION_SECTION, DESCRIPTION_KEY),
            version: KeyPath::new(APPLICATION_SECTION, VERSION_KEY),
            tags: KeyPath::new(APPLICATION_SECTION, TAGS_KEY),
        }
    }
}

/// Fields to write; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub engine_version: Option<Version>,
    pub icon: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Outcome for one requested field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    Created,
    Updated,
    Unchanged,
    /// Key absent, or its value holds nothing to rewrite
    Missing,
}

impl From<KeyChange> for FieldChange {
    fn from(change: KeyChange) -> Self {
        match change {
            KeyChange::Created => FieldChange::Created,
            KeyChange::Updated => FieldChange::Updated,
            KeyChange::Unchanged => FieldChange::Unchanged,
        }
    }
}

/// What an update did; `None` means the field was not requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub engine_version: Option<FieldChange>,
    pub icon: Option<FieldChange>,
    pub name: Option<FieldChange>,
    pub description: Option<FieldChange>,
    pub version: Option<FieldChange>,
    pub tags: Option<FieldChange>,
}

impl UpdateReport {
    /// Requested fields with a display label, in report order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldChange)> {
        [
            ("engine version", self.engine_version),
            ("icon", self.icon),
            ("name", self.name),
            ("description", self.description),
            ("project version", self.version),
            ("tags", self.tags),
        ]
        .into_iter()
        .filter_map(|(label, change)| Some((label, change?)))
    }

    /// True when the document differs from its input
    pub fn is_changed(&self) -> bool {
        self.fields()
            .map(|(_, change)| change)
            .any(|change| matches!(change, FieldChange::Created | FieldChange::Updated))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdater {
    keys: ProjectKeys,
}

impl ProjectUpdater {
    pub fn new(keys: ProjectKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &ProjectKeys {
        &self.keys
    }

    /// Rewrite the engine version and/or icon, leaving every other byte alone
    ///
    /// Applying the same update twice yields the same document.
    pub fn apply(
        &self,
        document: DescriptorDocument,
        new_version: Option<&Version>,
        new_icon_path: Option<&str>,
    ) -> (DescriptorDocument, UpdateReport) {
        let changes = ProjectChanges {
            engine_version: new_version.cloned(),
            icon: new_icon_path.map(str::to_string),
            ..ProjectChanges::default()
        };
        self.apply_changes(document, &changes)
    }

    /// Write every requested field, leaving the rest of the document alone
    pub fn apply_changes(
        &self,
        mut document: DescriptorDocument,
        changes: &ProjectChanges,
    ) -> (DescriptorDocument, UpdateReport) {
        let keys = &self.keys;
        let mut report = UpdateReport::default();

        if let Some(version) = &changes.engine_version {
            report.engine_version = Some(self.set_engine_version(&mut document, version));
        }
        if let Some(icon) = &changes.icon {
            report.icon = Some(set_string(&mut document, &keys.icon, icon));
        }
        if let Some(name) = &changes.name {
            report.name = Some(set_string(&mut document, &keys.name, name));
        }
        if let Some(description) = &changes.description {
            report.description = Some(set_string(&mut document, &keys.description, description));
        }
        if let Some(version) = &changes.version {
            report.version = Some(set_string(&mut document, &keys.version, version));
        }
        if let Some(tags) = &changes.tags {
            report.tags = Some(set_tags(&mut document, &keys.tags, tags));
        }

        debug!("Applied project update: {:?}", report);
        (document, report)
    }

    fn set_engine_version(&self, document: &mut DescriptorDocument, version: &Version) -> FieldChange {
        let KeyPath { section, key } = &self.keys.engine_version;
        let Some(value) = document.get_mut(section, key) else {
            debug!("[{}] {} is absent, engine version left as is", section, key);
            return FieldChange::Missing;
        };

        if let Some(current) = value.as_str() {
            if current == version.raw() {
                return FieldChange::Unchanged;
            }
            *value = TypedValue::string(version.raw());
            return FieldChange::Updated;
        }

        match value {
            TypedValue::Literal(literal) => {
                let found = literal.args().enumerate().find_map(|(index, raw)| {
                    let text = decode_string_literal(raw)?;
                    let current = Version::parse(&text).ok()?;
                    Some((index, text, current))
                });
                let Some((index, text, current)) = found else {
                    warn!("[{}] {} holds no version argument", section, key);
                    return FieldChange::Missing;
                };

                let replacement = if current.has_explicit_patch() {
                    version.raw().to_string()
                } else {
                    version.major_minor()
                };
                if replacement == text {
                    return FieldChange::Unchanged;
                }
                literal.set_arg(index, quote(&replacement));
                FieldChange::Updated
            }
            other => {
                warn!(
                    "[{}] {} is a {}, engine version left as is",
                    section,
                    key,
                    other.kind()
                );
                FieldChange::Missing
            }
        }
    }

}

fn set_string(document: &mut DescriptorDocument, path: &KeyPath, text: &str) -> FieldChange {
    let KeyPath { section, key } = path;
    if document.get(section, key).and_then(TypedValue::as_str) == Some(text) {
        return FieldChange::Unchanged;
    }
    document.set(section, key, TypedValue::string(text)).into()
}

/// Tags are written as `PackedStringArray("a", "b")`, the form the editor uses
fn set_tags(document: &mut DescriptorDocument, path: &KeyPath, tags: &[String]) -> FieldChange {
    let KeyPath { section, key } = path;
    let current = document.get(section, key).and_then(TypedValue::as_literal);
    if current.is_some_and(|literal| literal.string_args() == tags) {
        return FieldChange::Unchanged;
    }
    let literal = TypedLiteral::new("PackedStringArray", tags.iter().map(|tag| quote(tag)));
    document.set(section, key, TypedValue::Literal(literal)).into()
}

/// Apply an update with the default keys
pub fn update(
    document: DescriptorDocument,
    new_version: Option<&Version>,
    new_icon_path: Option<&str>,
) -> DescriptorDocument {
    ProjectUpdater::default()
        .apply(document, new_version, new_icon_path)
        .0
}
