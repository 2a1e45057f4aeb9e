use brand_assets::catalog::{
    DownloadableLink, DownloadableSample, ImageEntry, Product, ProductStore, ProductType,
};
use brand_assets::media::dispersion_path;
use brand_assets::reconcile::Direction;

use crate::integration::support::Harness;

fn shirt(categories: &[u64]) -> Product {
    Product::new(1, "shirt", ProductType::Simple)
        .with_categories(categories)
        .with_image(ImageEntry::new(Some(10), "/a/b/logo.png").with_roles(&["image", "thumbnail"]))
        .persisted()
}

#[test]
fn product_in_brand_category_moves_image_into_brand_folder() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    let mut product = shirt(&[5, 7]);
    product
        .media_attributes
        .insert("small_image".to_string(), "/a/b/logo.png".to_string());
    h.catalog.insert_product(product.clone());

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert_eq!(report.brand.as_ref().unwrap().as_str(), "/Acme/DigitalAssets");
    assert_eq!(report.file_operations(), 1);
    assert_eq!(report.relocations[0].direction, Direction::IntoBrand);

    let moved = "/Acme/DigitalAssets/logo.png";
    assert_eq!(product.images[0].file.as_ref().unwrap().path, moved);
    assert!(h.exists("catalog/product/Acme/DigitalAssets/logo.png"));
    assert!(!h.exists("catalog/product/a/b/logo.png"));

    // gallery row and every media attribute pointing at the image follow it
    assert_eq!(h.catalog.gallery_updates(), vec![(10, moved.to_string())]);
    assert_eq!(product.media_attributes["image"], moved);
    assert_eq!(product.media_attributes["thumbnail"], moved);
    assert_eq!(product.media_attributes["small_image"], moved);
    assert!(!product.media_attributes.contains_key("swatch_image"));

    assert_eq!(h.catalog.save_count(1), 1);
    let stored = h.catalog.get_by_id(1).unwrap();
    assert_eq!(stored.images[0].file.as_ref().unwrap().path, moved);
}

#[test]
fn product_leaving_brand_category_moves_back_to_dispersion_path() {
    let h = Harness::new();
    h.touch("catalog/product/Acme/DigitalAssets/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[5, 7])
        .with_image(ImageEntry::new(Some(10), "/Acme/DigitalAssets/logo.png"))
        .persisted();
    h.catalog.insert_product(product.clone());

    product.category_ids = vec![5];
    let report = h.reconciler.reconcile(&mut product, None, None);

    assert_eq!(report.left_brand.as_ref().unwrap().as_str(), "/Acme/DigitalAssets");
    assert!(report.brand.is_none());
    assert_eq!(report.relocations[0].direction, Direction::ToDispersion);
    assert_eq!(dispersion_path("logo.png"), "/l/o");
    assert_eq!(product.images[0].file.as_ref().unwrap().path, "/l/o/logo.png");
    assert!(h.exists("catalog/product/l/o/logo.png"));
    assert_eq!(h.catalog.save_count(1), 1);
}

#[test]
fn assign_then_unassign_restores_default_upload_location() {
    let h = Harness::new();
    // a fresh upload of logo.png lands in its dispersion directory
    let upload = format!("catalog/product{}/logo.png", dispersion_path("logo.png"));
    h.touch(&upload);
    let original_bytes = h.read(&upload);

    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_image(ImageEntry::new(Some(10), "/l/o/logo.png"))
        .persisted();
    h.catalog.insert_product(product.clone());

    product.category_ids = vec![7];
    h.hooks.on_after_product_save(&mut product).unwrap();
    assert!(h.exists("catalog/product/Acme/DigitalAssets/logo.png"));

    product.category_ids = vec![];
    h.hooks.on_after_product_save(&mut product).unwrap();

    assert_eq!(product.images[0].file.as_ref().unwrap().path, "/l/o/logo.png");
    assert!(h.exists(&upload));
    assert_eq!(h.read(&upload), original_bytes);
    assert!(!h.exists("catalog/product/Acme/DigitalAssets/logo.png"));
}

#[test]
fn downloadable_files_move_in_every_slot_in_order() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.touch("downloadable/files/links/b/o/book.pdf");
    h.touch("downloadable/files/link_samples/p/r/preview.pdf");
    h.touch("downloadable/files/samples/c/h/chapter.pdf");

    let mut product = Product::new(2, "ebook", ProductType::Downloadable)
        .with_categories(&[7])
        .with_image(ImageEntry::new(Some(10), "/a/b/logo.png"))
        .with_link(DownloadableLink::new(Some(20), Some("/b/o/book.pdf"), Some("/p/r/preview.pdf")))
        .with_sample(DownloadableSample::new(Some(30), Some("/c/h/chapter.pdf")))
        .persisted();

    let report = h.reconciler.reconcile(&mut product, None, None);

    let moved: Vec<&str> = report.relocations.iter().map(|r| r.from.as_str()).collect();
    assert_eq!(
        moved,
        vec!["/a/b/logo.png", "/b/o/book.pdf", "/p/r/preview.pdf", "/c/h/chapter.pdf"]
    );
    assert!(h.exists("downloadable/files/links/Acme/DigitalAssets/book.pdf"));
    assert!(h.exists("downloadable/files/link_samples/Acme/DigitalAssets/preview.pdf"));
    assert!(h.exists("downloadable/files/samples/Acme/DigitalAssets/chapter.pdf"));
    assert_eq!(
        product.links[0].sample_file.as_ref().unwrap().path,
        "/Acme/DigitalAssets/preview.pdf"
    );
}

#[test]
fn switching_brands_moves_files_between_brand_folders() {
    let h = Harness::new();
    h.touch("catalog/product/Acme/DigitalAssets/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[7])
        .with_image(ImageEntry::new(Some(10), "/Acme/DigitalAssets/logo.png"))
        .persisted();

    product.category_ids = vec![8];
    let report = h.reconciler.reconcile(&mut product, None, None);

    assert!(report.left_brand.is_none());
    assert_eq!(
        product.images[0].file.as_ref().unwrap().path,
        "/BigCorp/DigitalAssets/logo.png"
    );
    assert!(h.exists("catalog/product/BigCorp/DigitalAssets/logo.png"));
}
