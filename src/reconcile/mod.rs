//! Asset location reconciliation
//!
//! Brings every file of a product to where the brand policy wants it: into
//! `<base>/<Brand>/DigitalAssets` while the product sits in a branded
//! digital-assets category, back to the default dispersion directory once
//! it leaves. Failures are isolated per file and reported, never raised.

pub mod hooks;
pub mod outcome;

pub use hooks::DigitalAssetHooks;
pub use outcome::{
    AssetOutcome, BeforeSaveReport, CategorySaveReport, Direction, ReconcileAction,
    ReconcileReport, Relocation, RelocationFailure,
};

use crate::brand::{BrandPath, BrandPathResolver};
use crate::catalog::{Asset, AssetFile, AssetKind, CategoryStore, FileSlot, Product, ProductStore};
use crate::config::BrandAssetsConfig;
use crate::diff::{same_file, AssetDiffer};
use crate::error::CatalogError;
use crate::media::layout::{file_name, parent_dir};
use crate::media::{
    dispersion_path, DirectoryRole, FileRelocator, MediaFilesystem, MediaLayout,
    UniqueNameAllocator,
};
use crate::types::{AssetId, ProductId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct AssetLocationReconciler {
    resolver: BrandPathResolver,
    relocator: FileRelocator,
    products: Arc<dyn ProductStore>,
    layout: MediaLayout,
    differ: AssetDiffer,
    media_attribute_codes: Vec<String>,
}

impl AssetLocationReconciler {
    pub fn new(
        resolver: BrandPathResolver,
        relocator: FileRelocator,
        products: Arc<dyn ProductStore>,
        layout: MediaLayout,
        media_attribute_codes: Vec<String>,
    ) -> Self {
        Self {
            resolver,
            relocator,
            products,
            layout,
            differ: AssetDiffer::new(),
            media_attribute_codes,
        }
    }

    /// Wire every collaborator from configuration.
    pub fn from_config(
        config: &BrandAssetsConfig,
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        fs: Arc<dyn MediaFilesystem>,
    ) -> Self {
        let resolver = BrandPathResolver::new(categories, &config.brand);
        let relocator = FileRelocator::new(
            fs,
            UniqueNameAllocator::new(config.relocation.max_name_attempts),
            config.relocation.temp_suffix.clone(),
        );
        Self::new(
            resolver,
            relocator,
            products,
            MediaLayout::from_config(&config.media),
            config.media_attribute_codes.clone(),
        )
    }

    pub fn resolver(&self) -> &BrandPathResolver {
        &self.resolver
    }

    pub fn relocator(&self) -> &FileRelocator {
        &self.relocator
    }

    pub fn layout(&self) -> &MediaLayout {
        &self.layout
    }

    pub fn differ(&self) -> &AssetDiffer {
        &self.differ
    }

    /// Reconcile the product's files and save it if any file moved.
    ///
    /// With no `action` the leaving-brand path runs first; when the product
    /// lost its brand the entering path is skipped for this call.
    /// `explicit_brand` replaces the resolved brand on both paths.
    pub fn reconcile(
        &self,
        product: &mut Product,
        explicit_brand: Option<&BrandPath>,
        action: Option<ReconcileAction>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::new(product.id);

        let left = match action {
            None | Some(ReconcileAction::Remove) => {
                self.leave_brand(product, explicit_brand, &mut report)
            }
            Some(ReconcileAction::Move) => false,
        };
        if !left && action != Some(ReconcileAction::Remove) {
            self.enter_brand(product, explicit_brand, &mut report);
        }

        if report.changed() {
            self.persist(product, &mut report);
        } else {
            debug!(product_id = product.id, "No asset moved; skipping save");
        }
        report
    }

    /// Load a product from the store and reconcile it.
    pub fn reconcile_by_id(
        &self,
        product_id: ProductId,
        explicit_brand: Option<&BrandPath>,
        action: Option<ReconcileAction>,
    ) -> Result<ReconcileReport, CatalogError> {
        let mut product = self.products.get_by_id(product_id)?;
        Ok(self.reconcile(&mut product, explicit_brand, action))
    }

    /// Move files out of the prior brand folder when the product's current
    /// categories no longer resolve to a brand. Returns whether the product
    /// has left its brand.
    fn leave_brand(
        &self,
        product: &mut Product,
        explicit_brand: Option<&BrandPath>,
        report: &mut ReconcileReport,
    ) -> bool {
        let prior = match explicit_brand {
            Some(brand) => Some(brand.clone()),
            None => self.resolver.resolve(&product.original.category_ids),
        };
        let Some(prior) = prior else {
            return false;
        };
        if let Some(current) = self.resolver.resolve(&product.category_ids) {
            debug!(
                product_id = product.id,
                brand = %current,
                "Product still belongs to a brand"
            );
            return false;
        }

        info!(product_id = product.id, brand = %prior, "Product left brand; restoring default locations");
        let plan = |file: &mut AssetFile| -> Option<String> {
            if !prior.contains(&file.path) || self.layout.role_of(&file.path) == DirectoryRole::Cache {
                return None;
            }
            Some(dispersion_path(file_name(&file.path)))
        };
        self.relocate_product(product, Direction::ToDispersion, plan, report);
        report.left_brand = Some(prior);
        true
    }

    /// Move the files the differ schedules into the brand folder.
    ///
    /// Moves still pending from the before-save diff are carried out too;
    /// every pending move is consumed whether or not the file ends up moving.
    fn enter_brand(
        &self,
        product: &mut Product,
        explicit_brand: Option<&BrandPath>,
        report: &mut ReconcileReport,
    ) {
        let brand = match explicit_brand {
            Some(brand) => Some(brand.clone()),
            None => self.resolver.resolve(&product.category_ids),
        };
        let Some(brand) = brand else {
            debug!(product_id = product.id, "Product has no brand");
            return;
        };

        let diff = self.differ.diff_product(product, Some(&brand));
        debug!(
            product_id = product.id,
            brand = %brand,
            newly_scheduled = diff.to_move.len(),
            "Scheduled asset files for the brand folder"
        );

        let plan = |file: &mut AssetFile| -> Option<String> {
            if !file.take_schedule() {
                return None;
            }
            let target = file.take_override().unwrap_or_else(|| brand.clone());
            if target.contains(&file.path) {
                return None;
            }
            if self.layout.role_of(&file.path) == DirectoryRole::Cache {
                debug!(path = %file.path, "Skipping generated cache file");
                return None;
            }
            Some(target.as_str().to_string())
        };
        self.relocate_product(product, Direction::IntoBrand, plan, report);
        report.brand = Some(brand);
    }

    /// Images, then links, then samples; submission order within each.
    fn relocate_product<F>(
        &self,
        product: &mut Product,
        direction: Direction,
        mut plan: F,
        report: &mut ReconcileReport,
    ) where
        F: FnMut(&mut AssetFile) -> Option<String>,
    {
        let moved_images = self.relocate_assets(&mut product.images, direction, &mut plan, report);
        for relocation in &moved_images {
            self.sync_image_references(product, relocation);
        }
        self.relocate_assets(&mut product.links, direction, &mut plan, report);
        self.relocate_assets(&mut product.samples, direction, &mut plan, report);
    }

    fn relocate_assets<T: Asset, F>(
        &self,
        assets: &mut [T],
        direction: Direction,
        plan: &mut F,
        report: &mut ReconcileReport,
    ) -> Vec<Relocation>
    where
        F: FnMut(&mut AssetFile) -> Option<String>,
    {
        let mut moved = Vec::new();
        for (index, asset) in assets.iter_mut().enumerate() {
            let asset_id = asset.id();
            for slot in T::SLOTS {
                let Some(file) = asset.file_mut(*slot) else {
                    continue;
                };
                let outcome = match plan(&mut *file) {
                    Some(to_subpath) => {
                        self.relocate_file(file, *slot, &to_subpath, direction, T::KIND, asset_id, index)
                    }
                    None => AssetOutcome::Unchanged,
                };
                if let AssetOutcome::Relocated(relocation) = &outcome {
                    moved.push(relocation.clone());
                }
                report.record(outcome);
            }
        }
        moved
    }

    #[allow(clippy::too_many_arguments)]
    fn relocate_file(
        &self,
        file: &mut AssetFile,
        slot: FileSlot,
        to_subpath: &str,
        direction: Direction,
        kind: AssetKind,
        asset_id: Option<AssetId>,
        index: usize,
    ) -> AssetOutcome {
        let base_path = self.layout.base_path(slot);
        let from = file.path.clone();
        match self
            .relocator
            .move_file(base_path, &parent_dir(&from), to_subpath, file_name(&from))
        {
            Ok(to) => {
                info!(slot = ?slot, from = %from, to = %to, "Relocated asset file");
                file.path = to.clone();
                AssetOutcome::Relocated(Relocation {
                    kind,
                    asset_id,
                    index,
                    slot,
                    direction,
                    from,
                    to,
                })
            }
            Err(e) => {
                error!(slot = ?slot, path = %from, error = %e, "Failed to relocate asset file");
                AssetOutcome::Failed(RelocationFailure {
                    kind,
                    asset_id,
                    slot,
                    path: from,
                    error: e.to_string(),
                })
            }
        }
    }

    /// Point the gallery row and every media attribute that referenced the
    /// old path at the new one.
    fn sync_image_references(&self, product: &mut Product, relocation: &Relocation) {
        if let Some(entry_id) = relocation.asset_id {
            if let Err(e) = self.products.update_gallery_path(entry_id, &relocation.to) {
                error!(entry_id = entry_id, error = %e, "Failed to update gallery path");
            }
        }

        let roles: Vec<String> = product
            .images
            .get(relocation.index)
            .map(|image| image.roles.clone())
            .unwrap_or_default();
        let from = AssetFile::new(relocation.from.as_str());
        for code in &self.media_attribute_codes {
            let has_role = roles.iter().any(|role| role == code);
            let points_at_old = product
                .media_attributes
                .get(code)
                .map(|value| same_file(Some(&AssetFile::new(value.as_str())), Some(&from)))
                .unwrap_or(false);
            if has_role || points_at_old {
                product
                    .media_attributes
                    .insert(code.clone(), relocation.to.clone());
            }
        }
    }

    fn persist(&self, product: &mut Product, report: &mut ReconcileReport) {
        product.set_assets_modified(true);
        match self.products.save(product) {
            Ok(()) => {
                info!(
                    product_id = product.id,
                    moved = report.file_operations(),
                    "Saved product after relocating assets"
                );
                report.saved = true;
            }
            Err(e) => {
                // files already moved stay where they are; the next save retries
                error!(product_id = product.id, error = %e, "Failed to save product after relocating assets");
                report.save_error = Some(e.to_string());
            }
        }
        product.set_assets_modified(false);
        if !report.failures.is_empty() {
            warn!(
                product_id = product.id,
                failed = report.failures.len(),
                "Some asset files could not be relocated"
            );
        }
    }
}
