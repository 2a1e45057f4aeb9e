use brand_assets::catalog::{DownloadableLink, ImageEntry, Product, ProductType};

use crate::integration::support::Harness;

fn branded_product() -> Product {
    Product::new(1, "ebook", ProductType::Downloadable)
        .with_categories(&[5, 7])
        .with_image(ImageEntry::new(Some(10), "/a/b/logo.png"))
        .with_link(DownloadableLink::new(Some(20), Some("/b/o/book.pdf"), None))
        .persisted()
}

#[test]
fn second_reconcile_performs_no_file_operations() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.touch("downloadable/files/links/b/o/book.pdf");
    let mut product = branded_product();
    h.catalog.insert_product(product.clone());

    let first = h.reconciler.reconcile(&mut product, None, None);
    assert_eq!(first.file_operations(), 2);
    let renames_after_first = h.fs.renames();

    let second = h.reconciler.reconcile(&mut product, None, None);
    assert_eq!(second.file_operations(), 0);
    assert!(!second.saved);
    assert_eq!(h.fs.renames(), renames_after_first);
    assert_eq!(h.catalog.save_count(1), 1);
}

#[test]
fn unbranded_product_is_never_touched() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[5])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"))
        .persisted();
    product.category_ids = vec![5, 404];

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert!(!report.changed());
    assert!(report.brand.is_none() && report.left_brand.is_none());
    assert_eq!(h.fs.operations(), 0);
    assert!(h.catalog.saves().is_empty());
    assert!(h.exists("catalog/product/a/b/logo.png"));
}

#[test]
fn colliding_names_land_under_distinct_files() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.touch("catalog/product/x/y/logo.png");
    h.touch("catalog/product/Acme/DigitalAssets/logo.png");

    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[7])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"))
        .with_image(ImageEntry::new(None, "/x/y/logo.png"))
        .persisted();

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert_eq!(report.file_operations(), 2);
    let paths: Vec<&str> = product
        .images
        .iter()
        .map(|i| i.file.as_ref().unwrap().path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec!["/Acme/DigitalAssets/logo_1.png", "/Acme/DigitalAssets/logo_2.png"]
    );
    // nothing was overwritten
    assert_eq!(
        h.read("catalog/product/Acme/DigitalAssets/logo.png"),
        "catalog/product/Acme/DigitalAssets/logo.png"
    );
    assert_eq!(
        h.read("catalog/product/Acme/DigitalAssets/logo_1.png"),
        "catalog/product/a/b/logo.png"
    );
    assert_eq!(
        h.read("catalog/product/Acme/DigitalAssets/logo_2.png"),
        "catalog/product/x/y/logo.png"
    );
}

#[test]
fn failed_asset_self_heals_on_next_save() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    let mut product = branded_product();

    // link file not uploaded yet
    let first = h.reconciler.reconcile(&mut product, None, None);
    assert_eq!(first.file_operations(), 1);
    assert_eq!(first.failures.len(), 1);
    assert_eq!(product.links[0].link_file.as_ref().unwrap().path, "/b/o/book.pdf");

    h.touch("downloadable/files/links/b/o/book.pdf");
    let second = h.reconciler.reconcile(&mut product, None, None);
    assert_eq!(second.file_operations(), 1);
    assert!(second.failures.is_empty());
    assert_eq!(
        product.links[0].link_file.as_ref().unwrap().path,
        "/Acme/DigitalAssets/book.pdf"
    );
}

#[test]
fn failed_save_keeps_moved_files_and_reports_error() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.catalog.fail_saves(true);
    let mut product = branded_product();
    product.links.clear();

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert!(report.changed());
    assert!(!report.saved);
    assert!(report.save_error.as_deref().unwrap().contains("rejected"));
    assert!(h.exists("catalog/product/Acme/DigitalAssets/logo.png"));
}

#[test]
fn broken_category_lookup_leaves_branded_product_alone() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[7, 404])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"));

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert!(report.brand.is_none());
    assert!(!report.changed());
    assert_eq!(h.fs.operations(), 0);
    assert!(h.exists("catalog/product/a/b/logo.png"));
}
