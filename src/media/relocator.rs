//! Physical file moves inside the media tree.

use crate::error::RelocationError;
use crate::media::filesystem::MediaFilesystem;
use crate::media::layout::{join_segments, normalize_separators, stored_path};
use crate::media::unique_name::UniqueNameAllocator;
use std::sync::Arc;
use tracing::debug;

/// Moves single files between directories under one slot base, never
/// overwriting an existing file at the destination.
pub struct FileRelocator {
    fs: Arc<dyn MediaFilesystem>,
    allocator: UniqueNameAllocator,
    temp_suffix: String,
}

impl FileRelocator {
    pub fn new(
        fs: Arc<dyn MediaFilesystem>,
        allocator: UniqueNameAllocator,
        temp_suffix: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            allocator,
            temp_suffix: temp_suffix.into(),
        }
    }

    pub fn filesystem(&self) -> &Arc<dyn MediaFilesystem> {
        &self.fs
    }

    /// Move `file_name` from `base_path/from_subpath` to `base_path/to_subpath`.
    ///
    /// A trailing temp suffix is stripped from the name first. Returns the new
    /// stored reference relative to `base_path`, e.g. `/Acme/DigitalAssets/logo_1.png`.
    pub fn move_file(
        &self,
        base_path: &str,
        from_subpath: &str,
        to_subpath: &str,
        file_name: &str,
    ) -> Result<String, RelocationError> {
        let name = self.strip_temp_suffix(file_name);
        validate_file_name(name)?;

        let source = join_segments(&[base_path, from_subpath, name]);
        if !self.fs.exists(&source) {
            let path = self
                .fs
                .absolute_path(&source)
                .unwrap_or_else(|_| source.clone().into());
            return Err(RelocationError::FileMissing { path });
        }

        let target_dir = join_segments(&[base_path, to_subpath]);
        let target_name = self.allocator.allocate(self.fs.as_ref(), &target_dir, name)?;
        let target = join_segments(&[&target_dir, &target_name]);

        self.fs.rename(&source, &target)?;
        debug!(from = %source, to = %target, "Moved media file");

        Ok(normalize_separators(&stored_path(to_subpath, &target_name)))
    }

    /// Delete a stored reference under `base_path`.
    pub fn delete_file(&self, base_path: &str, stored: &str) -> Result<(), RelocationError> {
        let path = join_segments(&[base_path, stored]);
        self.fs.delete(&path)?;
        debug!(path = %path, "Deleted media file");
        Ok(())
    }

    fn strip_temp_suffix<'a>(&self, file_name: &'a str) -> &'a str {
        if self.temp_suffix.is_empty() {
            return file_name;
        }
        file_name
            .strip_suffix(self.temp_suffix.as_str())
            .unwrap_or(file_name)
    }
}

fn validate_file_name(name: &str) -> Result<(), RelocationError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(|c: char| c == '/' || c == '\\') {
        return Err(RelocationError::InvalidFileName(name.to_string()));
    }
    Ok(())
}
