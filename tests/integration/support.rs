use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brand_assets::catalog::{Category, MemoryCatalog};
use brand_assets::config::BrandAssetsConfig;
use brand_assets::media::{LocalMediaFilesystem, MediaFilesystem};
use brand_assets::{AssetLocationReconciler, DigitalAssetHooks, RelocationError};
use tempfile::TempDir;

/// Local filesystem that counts mutating calls.
pub struct CountingFilesystem {
    inner: LocalMediaFilesystem,
    renames: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingFilesystem {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: LocalMediaFilesystem::new(root),
            renames: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn renames(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
    }

    pub fn operations(&self) -> usize {
        self.renames() + self.deletes.load(Ordering::SeqCst)
    }
}

impl MediaFilesystem for CountingFilesystem {
    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), RelocationError> {
        self.renames.fetch_add(1, Ordering::SeqCst);
        self.inner.rename(from, to)
    }

    fn delete(&self, path: &str) -> Result<(), RelocationError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path)
    }

    fn absolute_path(&self, path: &str) -> Result<PathBuf, RelocationError> {
        self.inner.absolute_path(path)
    }
}

/// Media tree, catalog and engine wired together.
///
/// Category tree:
/// - 1 Root (1)
///   - 2 Brands (2)
///     - 3 Acme (3): 5 Shirts (4), 7 Digital Assets (4)
///     - 4 Big Corp (3): 8 Digital Assets (4)
pub struct Harness {
    pub temp: TempDir,
    pub catalog: Arc<MemoryCatalog>,
    pub fs: Arc<CountingFilesystem>,
    pub reconciler: Arc<AssetLocationReconciler>,
    pub hooks: DigitalAssetHooks,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BrandAssetsConfig::default())
    }

    pub fn with_config(config: BrandAssetsConfig) -> Self {
        let temp = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.insert_category(Category::new(1, "Root", 1));
        catalog.insert_category(Category::new(2, "Brands", 2).with_parent(1));
        catalog.insert_category(Category::new(3, "Acme", 3).with_parent(2));
        catalog.insert_category(Category::new(4, "Big Corp", 3).with_parent(2));
        catalog.insert_category(Category::new(5, "Shirts", 4).with_parent(3));
        catalog.insert_category(Category::new(7, "Digital Assets", 4).with_parent(3));
        catalog.insert_category(Category::new(8, "Digital Assets", 4).with_parent(4));

        let fs = Arc::new(CountingFilesystem::new(temp.path()));
        let reconciler = Arc::new(AssetLocationReconciler::from_config(
            &config,
            catalog.clone(),
            catalog.clone(),
            fs.clone(),
        ));
        let hooks = DigitalAssetHooks::new(reconciler.clone());
        Self {
            temp,
            catalog,
            fs,
            reconciler,
            hooks,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Create a file under the media root.
    pub fn touch(&self, rel: &str) {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, rel.as_bytes()).unwrap();
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root().join(rel).is_file()
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root().join(rel)).unwrap()
    }
}
