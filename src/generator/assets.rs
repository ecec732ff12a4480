//! Static asset copying

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Per-file results of a static copy
#[derive(Debug, Default)]
pub struct AssetReport {
    /// Destination paths of copied files
    pub copied: Vec<PathBuf>,
    /// One [`Error::AssetCopy`] per file or entry that failed
    pub failures: Vec<Error>,
}

impl AssetReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &Path, source: io::Error) {
        tracing::warn!("Failed to copy {:?}: {}", path, source);
        self.failures.push(Error::AssetCopy {
            path: path.to_path_buf(),
            source,
        });
    }
}

/// Remove whatever currently sits at `path`
fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn copy_file(src: &Path, dest: &Path, report: &mut AssetReport) {
    match fs::copy(src, dest) {
        Ok(_) => report.copied.push(dest.to_path_buf()),
        Err(e) => report.fail(src, e),
    }
}

fn copy_tree(src: &Path, dest: &Path, report: &mut AssetReport) {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(src).to_path_buf();
                report.fail(&path, e.into());
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            if let Err(e) = fs::create_dir_all(&target) {
                report.fail(entry.path(), e);
            }
        } else {
            copy_file(entry.path(), &target, report);
        }
    }
}

/// Copy every entry of `static_dir` into `destination`, replacing what was
/// there. Failures are collected instead of aborting the copy.
pub fn copy_static(static_dir: &Path, destination: &Path) -> Result<AssetReport> {
    if !static_dir.is_dir() {
        return Err(Error::Configuration(format!(
            "static folder {:?} not found",
            static_dir
        )));
    }

    tracing::info!("Installing static folder to {:?}", destination);

    let mut report = AssetReport::default();
    let entries = fs::read_dir(static_dir).map_err(|e| Error::io(static_dir, e))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.fail(static_dir, e);
                continue;
            }
        };

        let src = entry.path();
        let dest = destination.join(entry.file_name());

        if let Err(e) = remove_existing(&dest) {
            report.fail(&dest, e);
            continue;
        }

        if src.is_dir() {
            copy_tree(&src, &dest, &mut report);
        } else {
            copy_file(&src, &dest, &mut report);
        }
    }

    tracing::info!(
        "Copied {} static files, {} failed",
        report.copied.len(),
        report.failures.len()
    );

    Ok(report)
}
