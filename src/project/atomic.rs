//! Crash-safe replacement of a file's contents

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::project::error::{IoError, WritePhase};

/// Mode given to a file that did not exist before; temp files start at 0600
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Replace `path` with `text` so readers see either the old or the new file
///
/// The text goes to a uniquely named temp file in the same directory, which is
/// synced and then renamed over `path`. On any failure before the rename the
/// temp file is removed and `path` is left as it was.
pub fn write_atomic(path: &Path, text: &str) -> Result<(), IoError> {
    write_atomic_with(path, text, |_| Ok(()))
}

/// `write_atomic` with a hook run on the synced temp file right before the rename
pub(crate) fn write_atomic_with<F>(path: &Path, text: &str, before_rename: F) -> Result<(), IoError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    // Dropping `tmp` on an early return deletes the temp file
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| IoError::new(WritePhase::Write, path, e))?;

    tmp.write_all(text.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| IoError::new(WritePhase::Write, path, e))?;

    match fs::metadata(path) {
        Ok(metadata) => fs::set_permissions(tmp.path(), metadata.permissions())
            .map_err(|e| IoError::new(WritePhase::Write, path, e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => set_new_file_mode(tmp.path())
            .map_err(|e| IoError::new(WritePhase::Write, path, e))?,
        Err(e) => return Err(IoError::new(WritePhase::Write, path, e)),
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| IoError::new(WritePhase::Sync, path, e))?;

    before_rename(tmp.path()).map_err(|e| IoError::new(WritePhase::Rename, path, e))?;

    tmp.persist(path)
        .map_err(|e| IoError::new(WritePhase::Rename, path, e.error))?;

    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!("Failed to sync directory {}: {}", dir.display(), e);
    }

    info!("Wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}

#[cfg(unix)]
fn set_new_file_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn set_new_file_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
