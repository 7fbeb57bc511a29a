use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::repository::StorageError;

/// Write `content` to `path` via a uniquely named sibling temp file and rename.
///
/// Missing parent directories are created. Every call stages into its own
/// temp file, so concurrent writers never share a partially written file.
///
/// # Errors
///
/// Returns `StorageError::Io` if any step fails. The staged file is removed
/// on failure.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let path = path.to_path_buf();
    let content = content.to_vec();
    tokio::task::spawn_blocking(move || write_staged(&path, &content))
        .await
        .map_err(|err| StorageError::Io(format!("write task failed: {err}")))?
}

fn write_staged(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|err| {
        StorageError::Io(format!("failed to create {}: {err}", parent.display()))
    })?;

    let mut staged = NamedTempFile::new_in(&parent).map_err(|err| {
        StorageError::Io(format!("failed to stage in {}: {err}", parent.display()))
    })?;
    staged
        .write_all(content)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|err| {
            StorageError::Io(format!("failed to write {}: {err}", staged.path().display()))
        })?;

    staged.persist(path).map_err(|err| {
        StorageError::Io(format!("failed to replace {}: {}", path.display(), err.error))
    })?;
    Ok(())
}
