//! File helpers for rewriting manifests safely.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Write `content` to `path` through a sibling temp file and a rename.
///
/// Readers observe either the old or the new file, never a partial write.
/// The temp file lives next to the target so the rename stays on one
/// file system.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    {
        let mut file = fs::File::create(&temp_path).with_context(|| {
            format!(
                "Failed to create temp file: {}\n\nCheck file permissions and that directory exists",
                temp_path.display()
            )
        })?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to rename temp file to: {}", path.display()));
    }

    Ok(())
}

/// Modification time of a file, used to invalidate cached analyses.
pub fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to read modification time of {}", path.display()))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
