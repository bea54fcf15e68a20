//! Project descriptor files on disk
//!
//! - [`updater`]: rewrites the engine version, icon and metadata of a document
//! - [`atomic`]: crash-safe file replacement
//! - [`metadata`]: typed view of `[application]`
//! - [`error`]: I/O and project errors

pub mod atomic;
pub mod error;
pub mod metadata;
pub mod updater;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::descriptor::{self, DescriptorDocument};
use crate::version::Version;

pub use atomic::write_atomic;
pub use error::{IoError, ProjectError, WritePhase};
pub use metadata::{ProjectMetadata, read_metadata};
pub use updater::{
    FieldChange, KeyPath, ProjectChanges, ProjectKeys, ProjectUpdater, UpdateReport, update,
};

/// A descriptor loaded from disk
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    document: DescriptorDocument,
}

impl ProjectFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| ProjectError::Read {
            path: path.clone(),
            source,
        })?;
        let document = descriptor::parse(&text).map_err(|source| ProjectError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &DescriptorDocument {
        &self.document
    }

    pub fn metadata(&self, keys: &ProjectKeys) -> ProjectMetadata {
        read_metadata(&self.document, keys)
    }

    /// Apply an update to the in-memory document
    pub fn apply(&mut self, updater: &ProjectUpdater, changes: &ProjectChanges) -> UpdateReport {
        let document = std::mem::take(&mut self.document);
        let (document, report) = updater.apply_changes(document, changes);
        self.document = document;
        report
    }

    /// Atomically write the document back to its path
    pub fn save(&self) -> Result<(), ProjectError> {
        write_atomic(&self.path, &descriptor::serialize(&self.document))?;
        Ok(())
    }
}

/// Read, update and atomically rewrite a descriptor
///
/// The file is not touched when the update changes nothing.
pub fn update_file(
    path: impl AsRef<Path>,
    updater: &ProjectUpdater,
    new_version: Option<&Version>,
    new_icon_path: Option<&str>,
) -> Result<UpdateReport, ProjectError> {
    let changes = ProjectChanges {
        engine_version: new_version.cloned(),
        icon: new_icon_path.map(str::to_string),
        ..ProjectChanges::default()
    };
    apply_to_file(path, updater, &changes)
}

/// [`update_file`] for any set of field changes
pub fn apply_to_file(
    path: impl AsRef<Path>,
    updater: &ProjectUpdater,
    changes: &ProjectChanges,
) -> Result<UpdateReport, ProjectError> {
    let mut project = ProjectFile::open(path)?;
    let report = project.apply(updater, changes);
    if report.is_changed() {
        project.save()?;
    } else {
        info!("{} is already up to date", project.path().display());
    }
    Ok(report)
}
