//! Filesystem helpers

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

fn temp_path_for(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => path.with_file_name(format!("{}.tmp", name)),
        None => path.with_extension("tmp"),
    }
}

/// Write `contents` to `path` through a sibling temp file and a rename.
///
/// Either the whole new content is in place afterwards or `path` is
/// untouched; the temp file is removed on failure.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = temp_path_for(path);

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(&tmp, e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");

        write_atomic(&path, "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("index.html.tmp").exists());
    }

    #[test]
    fn test_write_atomic_missing_parent_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("post.html");

        assert!(matches!(write_atomic(&path, "x"), Err(Error::Io { .. })));
        assert!(!path.exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_write_atomic_onto_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();

        assert!(write_atomic(&path, "x").is_err());
        assert!(path.is_dir());
        assert!(!dir.path().join("taken.tmp").exists());
    }
}
