//! Package loading
//!
//! A package is either a zip archive or a directory it was extracted to. Only
//! top-level files matter. Archives are extracted into a [`Workspace`] whose
//! lifetime is the whole comparison run.

use crate::error::{PackageError, Result};
use schemaparity_core::Side;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Scratch directory for archive extraction, removed when dropped
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("schemaparity-")
            .tempdir()
            .map_err(|e| PackageError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Top-level files of one package, loaded into memory
#[derive(Debug, Clone)]
pub struct PackageContents {
    /// Path the package was opened from
    source: PathBuf,

    /// File name -> raw bytes
    files: BTreeMap<String, Vec<u8>>,
}

impl PackageContents {
    /// Open `path` as the given side of the comparison. Directories are read
    /// in place; anything else is treated as an archive and extracted into
    /// `workspace` first.
    pub fn open(path: &Path, side: Side, workspace: &Workspace) -> Result<Self> {
        if path.is_dir() {
            tracing::debug!(side = %side, path = %path.display(), "reading extracted package");
            let mut contents = Self::from_directory(path)?;
            contents.source = path.to_path_buf();
            return Ok(contents);
        }

        if !path.exists() {
            return Err(PackageError::NotFound(path.to_path_buf()));
        }

        let target = workspace.path().join(side.to_string());
        tracing::debug!(
            side = %side,
            path = %path.display(),
            target = %target.display(),
            "extracting package archive"
        );
        extract_archive(path, &target)?;

        let mut contents = Self::from_directory(&target)?;
        contents.source = path.to_path_buf();
        Ok(contents)
    }

    /// Read every top-level file of `dir`
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| PackageError::Walk {
                path: dir.to_path_buf(),
                source: e,
            })?;

            if !entry.path().is_file() {
                continue;
            }

            let data = std::fs::read(entry.path()).map_err(|e| PackageError::Io {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            files.insert(entry.file_name().to_string_lossy().into_owned(), data);
        }

        Ok(Self {
            source: dir.to_path_buf(),
            files,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File names in ascending order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|v| v.as_slice())
    }

    /// File contents as UTF-8 text; `Ok(None)` when the file is absent
    pub fn text(&self, name: &str) -> Result<Option<&str>> {
        match self.files.get(name) {
            None => Ok(None),
            Some(data) => std::str::from_utf8(data)
                .map(Some)
                .map_err(|_| PackageError::Encoding {
                    file: format!("{} ({})", name, self.source.display()),
                }),
        }
    }
}

fn extract_archive(archive_path: &Path, target: &Path) -> Result<()> {
    let archive_error = |message: String| PackageError::Archive {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = File::open(archive_path).map_err(|e| PackageError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;
    archive.extract(target).map_err(|e| archive_error(e.to_string()))?;

    Ok(())
}
