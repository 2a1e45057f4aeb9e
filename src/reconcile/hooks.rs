//! Save-pipeline entry points.
//!
//! The host catalog calls these around category and product saves. None of
//! them return errors; everything that goes wrong lands in the report and
//! the log.

use super::outcome::{
    BeforeSaveReport, CategorySaveReport, ReconcileAction, ReconcileReport, RelocationFailure,
};
use super::AssetLocationReconciler;
use crate::catalog::{Asset, Category, FileSlot, Product};
use crate::diff::{StaleFile, StaleReason};
use crate::types::ProductId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct DigitalAssetHooks {
    reconciler: Arc<AssetLocationReconciler>,
}

impl DigitalAssetHooks {
    pub fn new(reconciler: Arc<AssetLocationReconciler>) -> Self {
        Self { reconciler }
    }

    pub fn reconciler(&self) -> &Arc<AssetLocationReconciler> {
        &self.reconciler
    }

    /// Category product assignments changed.
    ///
    /// Only a digital-assets category under a brand does anything: products
    /// added to it move into the brand folder, products removed from it move
    /// out (and then into another brand, if they still have one).
    pub fn on_category_saved(
        &self,
        category: &Category,
        inserted: &[ProductId],
        removed: &[ProductId],
    ) -> CategorySaveReport {
        let mut report = CategorySaveReport {
            category_id: category.id,
            ..CategorySaveReport::default()
        };
        let resolver = self.reconciler.resolver();
        if !resolver.is_digital_assets(category) {
            debug!(category_id = category.id, "Not a digital assets category");
            return report;
        }
        let Some(brand) = resolver.brand_path_for_category(category) else {
            debug!(category_id = category.id, "Digital assets category has no brand");
            return report;
        };
        info!(
            category_id = category.id,
            brand = %brand,
            inserted = inserted.len(),
            removed = removed.len(),
            "Reconciling products of digital assets category"
        );

        for product_id in inserted {
            match self
                .reconciler
                .reconcile_by_id(*product_id, None, Some(ReconcileAction::Move))
            {
                Ok(product_report) => report.moved.push(product_report),
                Err(e) => {
                    error!(product_id = *product_id, error = %e, "Failed to load product");
                    report.missing_products.push(*product_id);
                }
            }
        }

        for product_id in removed {
            let mut product = match self.reconciler.products.get_by_id(*product_id) {
                Ok(product) => product,
                Err(e) => {
                    error!(product_id = *product_id, error = %e, "Failed to load product");
                    report.missing_products.push(*product_id);
                    continue;
                }
            };
            let mut product_report =
                self.reconciler
                    .reconcile(&mut product, Some(&brand), Some(ReconcileAction::Remove));
            product_report.merge(self.reconciler.reconcile(
                &mut product,
                None,
                Some(ReconcileAction::Move),
            ));
            report.removed.push(product_report);
        }

        report.brand = Some(brand);
        report
    }

    /// Prepare a submitted product for persistence.
    pub fn on_before_product_save(&self, mut product: Product) -> Product {
        self.prepare_product_save(&mut product);
        product
    }

    /// Tag file statuses, schedule moves and delete stale files.
    ///
    /// A product leaving the downloadable type loses every link and sample
    /// file instead.
    pub fn prepare_product_save(&self, product: &mut Product) -> BeforeSaveReport {
        let mut report = BeforeSaveReport {
            product_id: product.id,
            ..BeforeSaveReport::default()
        };
        if product.assets_modified() {
            report.skipped = true;
            return report;
        }

        if product.left_downloadable() {
            report.type_transition = true;
            self.drop_downloadable_files(product, &mut report);
            return report;
        }

        let brand = self.reconciler.resolver().resolve(&product.category_ids);
        let diff = self.reconciler.differ().diff_product(product, brand.as_ref());
        debug!(
            product_id = product.id,
            scheduled = diff.to_move.len(),
            stale = diff.to_delete.len(),
            "Computed asset diff"
        );
        report.scheduled = diff.to_move;
        for stale in diff.to_delete {
            self.delete_stale(stale, &mut report);
        }
        report
    }

    /// Reconcile after the host persisted the product.
    ///
    /// Returns `None` for the engine's own nested save.
    pub fn on_after_product_save(&self, product: &mut Product) -> Option<ReconcileReport> {
        if product.assets_modified() {
            debug!(product_id = product.id, "Skipping reentrant save");
            return None;
        }
        let report = self.reconciler.reconcile(product, None, None);
        product.finish_save_cycle();
        Some(report)
    }

    fn drop_downloadable_files(&self, product: &mut Product, report: &mut BeforeSaveReport) {
        let mut seen: HashSet<(FileSlot, String)> = HashSet::new();
        let mut stale = Vec::new();
        let links = product.original.links.iter().chain(&product.links);
        for link in links {
            collect_files(link, &mut seen, &mut stale);
        }
        let samples = product.original.samples.iter().chain(&product.samples);
        for sample in samples {
            collect_files(sample, &mut seen, &mut stale);
        }

        warn!(
            product_id = product.id,
            files = stale.len(),
            "Product is no longer downloadable; deleting link and sample files"
        );
        for file in stale {
            self.delete_stale(file, report);
        }
        product.links.clear();
        product.samples.clear();
    }

    fn delete_stale(&self, stale: StaleFile, report: &mut BeforeSaveReport) {
        let base_path = self.reconciler.layout().base_path(stale.slot);
        match self.reconciler.relocator().delete_file(base_path, &stale.path) {
            Ok(()) => {
                info!(slot = ?stale.slot, path = %stale.path, reason = ?stale.reason, "Deleted stale asset file");
                report.deleted.push(stale);
            }
            Err(e) => {
                error!(slot = ?stale.slot, path = %stale.path, error = %e, "Failed to delete stale asset file");
                report.failures.push(RelocationFailure {
                    kind: stale.kind,
                    asset_id: stale.asset_id,
                    slot: stale.slot,
                    path: stale.path,
                    error: e.to_string(),
                });
            }
        }
    }
}

fn collect_files<T: Asset>(
    asset: &T,
    seen: &mut HashSet<(FileSlot, String)>,
    out: &mut Vec<StaleFile>,
) {
    for (slot, file) in asset.files() {
        if seen.insert((slot, file.normalized_path())) {
            out.push(StaleFile {
                kind: T::KIND,
                asset_id: asset.id(),
                slot,
                path: file.path.clone(),
                reason: StaleReason::AssetRemoved,
            });
        }
    }
}
