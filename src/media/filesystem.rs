//! Filesystem port rooted at the media directory, and its local adapter.

use crate::config::MediaConfig;
use crate::error::{ApiError, RelocationError};
use std::path::{Component, Path, PathBuf};

/// Filesystem operations the relocation engine needs.
///
/// Every path is relative to the media root. Existence checks and renames
/// are separate calls; nothing makes the pair atomic.
pub trait MediaFilesystem: Send + Sync {
    fn exists(&self, path: &str) -> bool;

    /// Move `from` to `to`, creating the destination directory if needed.
    /// Fails with `FileMissing` when `from` does not exist.
    fn rename(&self, from: &str, to: &str) -> Result<(), RelocationError>;

    /// Remove a file. A file that is already gone is not an error.
    fn delete(&self, path: &str) -> Result<(), RelocationError>;

    fn absolute_path(&self, path: &str) -> Result<PathBuf, RelocationError>;
}

/// Media filesystem backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalMediaFilesystem {
    root: PathBuf,
}

impl LocalMediaFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `media.root` against `working_dir`; the directory must exist.
    pub fn from_config(config: &MediaConfig, working_dir: &Path) -> Result<Self, ApiError> {
        Ok(Self::new(config.resolve_root(working_dir)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaFilesystem for LocalMediaFilesystem {
    fn exists(&self, path: &str) -> bool {
        self.absolute_path(path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), RelocationError> {
        let source = self.absolute_path(from)?;
        let target = self.absolute_path(to)?;
        if !source.is_file() {
            return Err(RelocationError::FileMissing { path: source });
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RelocationError::io(parent, e))?;
        }
        std::fs::rename(&source, &target).map_err(|e| RelocationError::io(&source, e))
    }

    fn delete(&self, path: &str) -> Result<(), RelocationError> {
        let target = self.absolute_path(path)?;
        match std::fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RelocationError::io(&target, e)),
        }
    }

    fn absolute_path(&self, path: &str) -> Result<PathBuf, RelocationError> {
        let relative = Path::new(path.trim_start_matches(|c: char| c == '/' || c == '\\'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(name) => resolved.push(name),
                Component::CurDir => {}
                _ => return Err(RelocationError::InvalidFileName(path.to_string())),
            }
        }
        Ok(resolved)
    }
}
