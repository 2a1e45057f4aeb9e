//! Asset variants and the file references they carry.
//!
//! Every asset owns one or two [`AssetFile`]s, each living in a distinct
//! [`FileSlot`] with its own base directory under the media root.

use crate::brand::BrandPath;
use crate::media::layout::{file_name, normalize_separators};
use crate::types::AssetId;
use serde::{Deserialize, Serialize};

/// Whether a submitted file differs from the persisted one for the same asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    New,
    #[default]
    Old,
}

/// Reference to a file relative to its slot's base directory, e.g. `/a/b/logo.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetFile {
    pub path: String,

    #[serde(skip)]
    pub status: FileStatus,

    /// Destination chosen ahead of time; taken by the mover.
    #[serde(skip)]
    pub brand_override: Option<BrandPath>,

    #[serde(skip)]
    pub(crate) move_scheduled: bool,
}

impl AssetFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Old,
            brand_override: None,
            move_scheduled: false,
        }
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    pub fn normalized_path(&self) -> String {
        normalize_separators(&self.path)
    }

    pub fn is_move_scheduled(&self) -> bool {
        self.move_scheduled
    }

    /// Mark the file as scheduled to move, optionally pinning its destination.
    ///
    /// Returns false if a move is already pending.
    pub(crate) fn schedule(&mut self, destination: Option<&BrandPath>) -> bool {
        if self.move_scheduled {
            return false;
        }
        self.move_scheduled = true;
        if let Some(brand) = destination {
            self.brand_override = Some(brand.clone());
        }
        true
    }

    /// Consume a pending move; true at most once per schedule.
    pub(crate) fn take_schedule(&mut self) -> bool {
        std::mem::replace(&mut self.move_scheduled, false)
    }

    pub(crate) fn take_override(&mut self) -> Option<BrandPath> {
        self.brand_override.take()
    }

    pub(crate) fn reset_transient(&mut self) {
        self.status = FileStatus::Old;
        self.brand_override = None;
        self.move_scheduled = false;
    }
}

/// Storage slot of a file; decides the base directory it lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSlot {
    Image,
    LinkFile,
    LinkSample,
    Sample,
}

/// Asset variant, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Link,
    Sample,
}

/// Common view over gallery entries, links and samples.
pub trait Asset {
    const KIND: AssetKind;

    /// Slots this variant can hold a file in, in processing order.
    const SLOTS: &'static [FileSlot];

    /// Persisted identity; `None` for assets created in the current save.
    fn id(&self) -> Option<AssetId>;

    fn file(&self, slot: FileSlot) -> Option<&AssetFile>;

    fn file_mut(&mut self, slot: FileSlot) -> Option<&mut AssetFile>;

    /// All present files with their slot.
    fn files(&self) -> Vec<(FileSlot, &AssetFile)> {
        Self::SLOTS
            .iter()
            .filter_map(|slot| self.file(*slot).map(|file| (*slot, file)))
            .collect()
    }
}

/// Product gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub id: Option<AssetId>,
    #[serde(default)]
    pub file: Option<AssetFile>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub disabled: bool,
    /// Role codes such as `image` or `thumbnail`
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ImageEntry {
    pub fn new(id: Option<AssetId>, path: impl Into<String>) -> Self {
        Self {
            id,
            file: Some(AssetFile::new(path)),
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }
}

impl Asset for ImageEntry {
    const KIND: AssetKind = AssetKind::Image;
    const SLOTS: &'static [FileSlot] = &[FileSlot::Image];

    fn id(&self) -> Option<AssetId> {
        self.id
    }

    fn file(&self, slot: FileSlot) -> Option<&AssetFile> {
        match slot {
            FileSlot::Image => self.file.as_ref(),
            _ => None,
        }
    }

    fn file_mut(&mut self, slot: FileSlot) -> Option<&mut AssetFile> {
        match slot {
            FileSlot::Image => self.file.as_mut(),
            _ => None,
        }
    }
}

/// Downloadable link: the purchasable file plus an optional preview sample.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadableLink {
    #[serde(default)]
    pub id: Option<AssetId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link_file: Option<AssetFile>,
    #[serde(default)]
    pub sample_file: Option<AssetFile>,
}

impl DownloadableLink {
    pub fn new(id: Option<AssetId>, link_file: Option<&str>, sample_file: Option<&str>) -> Self {
        Self {
            id,
            title: String::new(),
            link_file: link_file.map(AssetFile::new),
            sample_file: sample_file.map(AssetFile::new),
        }
    }
}

impl Asset for DownloadableLink {
    const KIND: AssetKind = AssetKind::Link;
    const SLOTS: &'static [FileSlot] = &[FileSlot::LinkFile, FileSlot::LinkSample];

    fn id(&self) -> Option<AssetId> {
        self.id
    }

    fn file(&self, slot: FileSlot) -> Option<&AssetFile> {
        match slot {
            FileSlot::LinkFile => self.link_file.as_ref(),
            FileSlot::LinkSample => self.sample_file.as_ref(),
            _ => None,
        }
    }

    fn file_mut(&mut self, slot: FileSlot) -> Option<&mut AssetFile> {
        match slot {
            FileSlot::LinkFile => self.link_file.as_mut(),
            FileSlot::LinkSample => self.sample_file.as_mut(),
            _ => None,
        }
    }
}

/// Standalone downloadable sample.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadableSample {
    #[serde(default)]
    pub id: Option<AssetId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sample_file: Option<AssetFile>,
}

impl DownloadableSample {
    pub fn new(id: Option<AssetId>, sample_file: Option<&str>) -> Self {
        Self {
            id,
            title: String::new(),
            sample_file: sample_file.map(AssetFile::new),
        }
    }
}

impl Asset for DownloadableSample {
    const KIND: AssetKind = AssetKind::Sample;
    const SLOTS: &'static [FileSlot] = &[FileSlot::Sample];

    fn id(&self) -> Option<AssetId> {
        self.id
    }

    fn file(&self, slot: FileSlot) -> Option<&AssetFile> {
        match slot {
            FileSlot::Sample => self.sample_file.as_ref(),
            _ => None,
        }
    }

    fn file_mut(&mut self, slot: FileSlot) -> Option<&mut AssetFile> {
        match slot {
            FileSlot::Sample => self.sample_file.as_mut(),
            _ => None,
        }
    }
}
