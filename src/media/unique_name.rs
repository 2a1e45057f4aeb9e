//! Collision-free file name allocation.

use crate::error::RelocationError;
use crate::media::filesystem::MediaFilesystem;
use crate::media::layout::join_segments;

/// Picks a name that is free in a directory: the candidate itself, else
/// `<stem>_<n>.<ext>` for the smallest free `n` starting at 1.
#[derive(Debug, Clone, Copy)]
pub struct UniqueNameAllocator {
    max_attempts: u32,
}

impl UniqueNameAllocator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// `dir` is media-root-relative.
    pub fn allocate(
        &self,
        fs: &dyn MediaFilesystem,
        dir: &str,
        name: &str,
    ) -> Result<String, RelocationError> {
        if !fs.exists(&join_segments(&[dir, name])) {
            return Ok(name.to_string());
        }
        let (stem, extension) = split_extension(name);
        for index in 1..=self.max_attempts {
            let candidate = match extension {
                Some(ext) => format!("{}_{}.{}", stem, index, ext),
                None => format!("{}_{}", stem, index),
            };
            if !fs.exists(&join_segments(&[dir, &candidate])) {
                return Ok(candidate);
            }
        }
        Err(RelocationError::CollisionExhausted {
            dir: dir.to_string(),
            name: name.to_string(),
            attempts: self.max_attempts,
        })
    }
}

impl Default for UniqueNameAllocator {
    fn default() -> Self {
        Self::new(10_000)
    }
}

/// Split at the last dot; a leading dot is part of the stem.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}
