//! Atomic file writer for rendered entries.
//!
//! ## `atomic_write` protocol
//!
//! 1. Render content (already done by caller).
//! 2. Normalise line endings to LF.
//! 3. Write to `.<name>.midas.tmp` beside the target, hidden from the generator.
//! 4. Rename to final path (atomic on POSIX); on failure remove the `.tmp`.
//!
//! A reader of the output directory therefore never sees a half-written page.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Create `dir` and its parents if missing. Idempotent.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), SyncError> {
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
}

/// True if anything exists at `path`.
pub(crate) fn exists(path: &Path) -> Result<bool, SyncError> {
    path.try_exists().map_err(|e| io_err(path, e))
}

/// Remove `path`, treating "already gone" as success.
///
/// Returns whether a file was actually removed.
pub(crate) fn remove_if_present(path: &Path) -> Result<bool, SyncError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Atomically write `content` to `path`.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    atomic_write_with_tmp(path, content, &tmp_path(path))
}

/// Dot-prefixed sibling of `path` used while writing.
fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.midas.tmp"))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    let normalized = content.replace("\r\n", "\n");

    std::fs::write(tmp, normalized).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn write_creates_file_with_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hello.html");
        atomic_write(&path, "hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.html");
        atomic_write(&path, "data").unwrap();
        assert!(!tmp_path(&path).exists(), ".midas.tmp must be cleaned up");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn tmp_file_is_hidden_sibling() {
        let path = Path::new("/site/content/posts/hello.html");
        assert_eq!(
            tmp_path(path),
            Path::new("/site/content/posts/.hello.html.midas.tmp")
        );
    }

    #[test]
    fn write_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        atomic_write(&path, "v1").unwrap();
        atomic_write(&path, "v2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
    }

    #[test]
    fn crlf_is_normalised() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("normalize.html");
        atomic_write(&path, "line1\r\nline2\r\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "line1\nline2\n");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content").join("posts");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn remove_if_present_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.html");
        assert!(!remove_if_present(&path).unwrap());
        fs::write(&path, "x").unwrap();
        assert!(remove_if_present(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("file.html");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_file = tmp_dir.path().join(".file.html.midas.tmp");

        let result = atomic_write_with_tmp(&path, "new content", &tmp_file);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Running as root bypasses directory permissions; nothing to assert then.
        if result.is_ok() {
            return;
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(!tmp_file.exists(), ".midas.tmp should be cleaned up");
    }
}
