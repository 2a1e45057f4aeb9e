//! In-memory catalog implementing both store ports.
//!
//! Used by tests and by embedders that load a catalog from JSON. Every save
//! and gallery path update is recorded so callers can assert on them.

use crate::catalog::asset::Asset;
use crate::catalog::category::{Category, CategoryStore};
use crate::catalog::product::{Product, ProductStore};
use crate::error::{ApiError, CatalogError};
use crate::types::{AssetId, CategoryId, ProductId};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Default)]
pub struct MemoryCatalog {
    categories: RwLock<HashMap<CategoryId, Category>>,
    products: RwLock<HashMap<ProductId, Product>>,
    saves: RwLock<Vec<ProductId>>,
    gallery_updates: RwLock<Vec<(AssetId, String)>>,
    next_asset_id: RwLock<AssetId>,
    fail_saves: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            next_asset_id: RwLock::new(1000),
            ..Self::default()
        }
    }

    /// Load categories and products from a JSON document of the form
    /// `{"categories": [...], "products": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let fixture: CatalogFixture = serde_json::from_str(json)
            .map_err(|e| ApiError::ConfigError(format!("Invalid catalog JSON: {}", e)))?;
        let catalog = Self::new();
        for category in fixture.categories {
            catalog.insert_category(category);
        }
        for product in fixture.products {
            catalog.insert_product(product);
        }
        Ok(catalog)
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.write().insert(category.id, category);
    }

    /// Store a product as-is, without counting it as a save.
    pub fn insert_product(&self, product: Product) {
        self.products.write().insert(product.id, product);
    }

    /// Make every subsequent `save` fail with `CatalogError::Persistence`.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Product ids in save order.
    pub fn saves(&self) -> Vec<ProductId> {
        self.saves.read().clone()
    }

    pub fn save_count(&self, id: ProductId) -> usize {
        self.saves.read().iter().filter(|saved| **saved == id).count()
    }

    pub fn gallery_updates(&self) -> Vec<(AssetId, String)> {
        self.gallery_updates.read().clone()
    }

    fn allocate_id(&self) -> AssetId {
        let mut next = self.next_asset_id.write();
        *next += 1;
        *next
    }

    fn assign_missing_ids(&self, product: &mut Product) {
        for image in product.images.iter_mut().filter(|i| i.id().is_none()) {
            image.id = Some(self.allocate_id());
        }
        for link in product.links.iter_mut().filter(|l| l.id().is_none()) {
            link.id = Some(self.allocate_id());
        }
        for sample in product.samples.iter_mut().filter(|s| s.id().is_none()) {
            sample.id = Some(self.allocate_id());
        }
    }
}

impl CategoryStore for MemoryCatalog {
    fn get(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::category_not_found(id))
    }
}

impl ProductStore for MemoryCatalog {
    fn get_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::product_not_found(id))
    }

    fn save(&self, product: &Product) -> Result<(), CatalogError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CatalogError::Persistence(format!(
                "product {} rejected by store",
                product.id
            )));
        }
        let mut stored = product.clone();
        self.assign_missing_ids(&mut stored);
        stored.finish_save_cycle();
        self.products.write().insert(stored.id, stored);
        self.saves.write().push(product.id);
        Ok(())
    }

    fn update_gallery_path(&self, entry_id: AssetId, path: &str) -> Result<(), CatalogError> {
        let mut products = self.products.write();
        let entry = products
            .values_mut()
            .flat_map(|product| product.images.iter_mut())
            .find(|image| image.id == Some(entry_id))
            .ok_or(CatalogError::NotFound {
                entity: "gallery entry",
                id: entry_id,
            })?;
        if let Some(file) = entry.file.as_mut() {
            file.path = path.to_string();
        }
        self.gallery_updates.write().push((entry_id, path.to_string()));
        Ok(())
    }
}
