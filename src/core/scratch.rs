//! Scratch directory management
//!
//! The external encoder writes its own temp files; we point every child
//! process (TMPDIR/TMP/TEMP) at one fixed scratch folder so those files
//! land in a known, cleanable location. Concurrent requests share the
//! folder; an accepted simplification, not a guaranteed-safe isolation.

use std::io;
use std::path::{Path, PathBuf};

/// Create the scratch directory if needed and return its absolute path.
///
/// Supports tilde (~) expansion. Called once per processor construction.
pub fn ensure_scratch_dir(configured: &str) -> io::Result<PathBuf> {
    let expanded = shellexpand::tilde(configured).into_owned();
    let path = Path::new(&expanded);
    std::fs::create_dir_all(path)?;
    // canonicalize so child processes get an absolute TMPDIR regardless of
    // their working directory
    path.canonicalize()
}

/// Delete stale regular files from the scratch directory.
///
/// Subdirectories are left alone. Per-file errors are logged and skipped;
/// cleanup is best-effort and never fails a request.
pub fn cleanup_scratch(dir: &Path) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read scratch dir {}: {}", dir.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Removed stale scratch file: {}", path.display());
                    removed += 1;
                }
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
    removed
}
