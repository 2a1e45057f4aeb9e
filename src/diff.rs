//! Submitted-versus-persisted asset comparison.
//!
//! Images carry no identity across saves, so only their placement is
//! checked. Links and samples are matched by id against the product's
//! snapshot to find new, replaced and removed files.

use crate::brand::BrandPath;
use crate::catalog::{Asset, AssetFile, AssetKind, FileSlot, FileStatus, ImageEntry, Product};
use crate::types::AssetId;
use serde::Serialize;
use std::collections::HashSet;

/// A file scheduled to move into the brand folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledMove {
    pub kind: AssetKind,
    pub asset_id: Option<AssetId>,
    /// Position in the submitted collection
    pub index: usize,
    pub slot: FileSlot,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// The asset is gone from the submission.
    AssetRemoved,
    /// The asset got a different file; the old one sat in the brand folder.
    Replaced,
}

/// A persisted file that should be deleted from the media tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleFile {
    pub kind: AssetKind,
    pub asset_id: Option<AssetId>,
    pub slot: FileSlot,
    pub path: String,
    pub reason: StaleReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetDiff {
    pub to_move: Vec<ScheduledMove>,
    pub to_delete: Vec<StaleFile>,
}

impl AssetDiff {
    pub fn is_empty(&self) -> bool {
        self.to_move.is_empty() && self.to_delete.is_empty()
    }

    pub fn extend(&mut self, other: AssetDiff) {
        self.to_move.extend(other.to_move);
        self.to_delete.extend(other.to_delete);
    }
}

/// Compare file references ignoring every path separator.
pub fn same_file(a: Option<&AssetFile>, b: Option<&AssetFile>) -> bool {
    fn strip(file: Option<&AssetFile>) -> String {
        file.map(|f| f.path.replace('/', "").replace('\\', ""))
            .unwrap_or_default()
    }
    strip(a) == strip(b)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AssetDiffer;

impl AssetDiffer {
    pub fn new() -> Self {
        Self
    }

    /// Schedule gallery entries that are new or sit outside the brand folder.
    pub fn diff_images(&self, images: &mut [ImageEntry], brand: Option<&BrandPath>) -> AssetDiff {
        let mut diff = AssetDiff::default();
        for (index, image) in images.iter_mut().enumerate() {
            let id = image.id;
            let Some(file) = image.file.as_mut() else {
                continue;
            };
            let outside = brand.map(|b| !b.contains(&file.path)).unwrap_or(false);
            if (id.is_none() || outside) && file.schedule(brand) {
                diff.to_move.push(ScheduledMove {
                    kind: AssetKind::Image,
                    asset_id: id,
                    index,
                    slot: FileSlot::Image,
                    path: file.path.clone(),
                });
            }
        }
        diff
    }

    /// Diff identity-tracked assets against their persisted versions.
    ///
    /// Statuses are derived first. Files with a move still pending are not
    /// scheduled again.
    pub fn diff<T: Asset>(
        &self,
        submitted: &mut [T],
        original: &[T],
        brand: Option<&BrandPath>,
    ) -> AssetDiff {
        self.derive_statuses(submitted, original);
        let mut diff = AssetDiff::default();

        for (index, asset) in submitted.iter_mut().enumerate() {
            let id = asset.id();
            let persisted = id.and_then(|id| original.iter().find(|o| o.id() == Some(id)));

            for slot in T::SLOTS {
                let stale = match persisted {
                    // new, or an id the snapshot does not know
                    None => {
                        schedule(&mut diff, asset, index, *slot, brand);
                        None
                    }
                    Some(before) => self.compare_slot(&mut diff, asset, before, index, *slot, brand),
                };
                if let Some(stale) = stale {
                    diff.to_delete.push(stale);
                }
            }
        }

        let kept: HashSet<AssetId> = submitted.iter().filter_map(|a| a.id()).collect();
        for removed in original
            .iter()
            .filter(|o| o.id().map(|id| !kept.contains(&id)).unwrap_or(false))
        {
            for (slot, file) in removed.files() {
                diff.to_delete.push(StaleFile {
                    kind: T::KIND,
                    asset_id: removed.id(),
                    slot,
                    path: file.path.clone(),
                    reason: StaleReason::AssetRemoved,
                });
            }
        }

        diff
    }

    fn compare_slot<T: Asset>(
        &self,
        diff: &mut AssetDiff,
        asset: &mut T,
        before: &T,
        index: usize,
        slot: FileSlot,
        brand: Option<&BrandPath>,
    ) -> Option<StaleFile> {
        let old = before.file(slot);
        if asset.file(slot).is_none() && old.is_none() {
            return None;
        }
        let brand = brand?;
        let outside = asset
            .file(slot)
            .map(|f| !brand.contains(&f.path))
            .unwrap_or(false);
        if outside {
            schedule(diff, asset, index, slot, Some(brand));
        }
        let replaced = match asset.file(slot) {
            Some(file) => file.status == FileStatus::New,
            None => true,
        };
        if !replaced {
            return None;
        }
        old.filter(|f| brand.contains(&f.path)).map(|f| StaleFile {
            kind: T::KIND,
            asset_id: before.id(),
            slot,
            path: f.path.clone(),
            reason: StaleReason::Replaced,
        })
    }

    /// Tag each file `New` when it differs from the persisted file of the
    /// same asset; assets without an id are always `New`.
    pub fn derive_statuses<T: Asset>(&self, submitted: &mut [T], original: &[T]) {
        for asset in submitted.iter_mut() {
            let persisted = asset
                .id()
                .and_then(|id| original.iter().find(|o| o.id() == Some(id)));
            for slot in T::SLOTS {
                let status = match persisted {
                    Some(before) if same_file(asset.file(*slot), before.file(*slot)) => {
                        FileStatus::Old
                    }
                    _ => FileStatus::New,
                };
                if let Some(file) = asset.file_mut(*slot) {
                    file.status = status;
                }
            }
        }
    }

    /// Diff all three collections of a product against its snapshot.
    pub fn diff_product(&self, product: &mut Product, brand: Option<&BrandPath>) -> AssetDiff {
        let mut diff = self.diff_images(&mut product.images, brand);
        diff.extend(self.diff(&mut product.links, &product.original.links, brand));
        diff.extend(self.diff(&mut product.samples, &product.original.samples, brand));
        diff
    }
}

fn schedule<T: Asset>(
    diff: &mut AssetDiff,
    asset: &mut T,
    index: usize,
    slot: FileSlot,
    brand: Option<&BrandPath>,
) {
    let id = asset.id();
    let Some(file) = asset.file_mut(slot) else {
        return;
    };
    if file.schedule(brand) {
        diff.to_move.push(ScheduledMove {
            kind: T::KIND,
            asset_id: id,
            index,
            slot,
            path: file.path.clone(),
        });
    }
}
