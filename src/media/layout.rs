//! Media tree layout: slot base directories, directory roles and path helpers.
//!
//! Stored asset references are slot-relative and start with a slash
//! (`/a/b/logo.png`). Filesystem paths handed to [`MediaFilesystem`] are
//! media-root-relative without a leading slash (`catalog/product/a/b/logo.png`).
//!
//! [`MediaFilesystem`]: crate::media::MediaFilesystem

use crate::catalog::FileSlot;
use crate::config::MediaConfig;

/// What a directory under a slot base is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    /// Original asset files
    Base,
    /// Generated copies (resized images and the like); never relocated
    Cache,
}

#[derive(Debug, Clone)]
pub struct MediaLayout {
    image_base: String,
    link_base: String,
    link_sample_base: String,
    sample_base: String,
    cache_dir: String,
}

impl MediaLayout {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            image_base: trim_slashes(&config.image_base),
            link_base: trim_slashes(&config.link_base),
            link_sample_base: trim_slashes(&config.link_sample_base),
            sample_base: trim_slashes(&config.sample_base),
            cache_dir: trim_slashes(&config.cache_dir),
        }
    }

    /// Base directory of a slot, relative to the media root.
    pub fn base_path(&self, slot: FileSlot) -> &str {
        match slot {
            FileSlot::Image => &self.image_base,
            FileSlot::LinkFile => &self.link_base,
            FileSlot::LinkSample => &self.link_sample_base,
            FileSlot::Sample => &self.sample_base,
        }
    }

    /// Role of the directory a stored reference lives in, decided by its
    /// first path segment.
    pub fn role_of(&self, stored_path: &str) -> DirectoryRole {
        if self.cache_dir.is_empty() {
            return DirectoryRole::Base;
        }
        let normalized = normalize_separators(stored_path);
        match normalized.split('/').find(|segment| !segment.is_empty()) {
            Some(first) if first == self.cache_dir => DirectoryRole::Cache,
            _ => DirectoryRole::Base,
        }
    }

    /// Media-root-relative path of a stored reference in `slot`.
    pub fn media_path(&self, slot: FileSlot, stored_path: &str) -> String {
        join_segments(&[self.base_path(slot), stored_path])
    }
}

impl Default for MediaLayout {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

/// Use forward slashes only and collapse repeated separators.
pub fn normalize_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_slash = false;
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        out.push(c);
    }
    out
}

/// Last segment of a path, accepting either separator.
pub fn file_name(path: &str) -> &str {
    match path.rfind(|c: char| c == '/' || c == '\\') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Directory part of a stored reference, with a leading slash (`/a/b`), or
/// the empty string for a bare file name.
pub fn parent_dir(path: &str) -> String {
    let normalized = normalize_separators(path);
    match normalized.rfind('/') {
        Some(idx) => {
            let dir = trim_slashes(&normalized[..idx]);
            if dir.is_empty() {
                String::new()
            } else {
                format!("/{}", dir)
            }
        }
        None => String::new(),
    }
}

/// Stored reference for `name` inside `dir`: `/dir/name`.
pub fn stored_path(dir: &str, name: &str) -> String {
    format!("/{}", join_segments(&[dir, name]))
}

/// Join path pieces with single forward slashes, no leading or trailing slash.
pub fn join_segments(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| trim_slashes(&normalize_separators(part)))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn trim_slashes(s: &str) -> String {
    s.trim_matches(|c: char| c == '/' || c == '\\').to_string()
}
