use brand_assets::catalog::{
    Category, CategoryStore, ImageEntry, Product, ProductStore, ProductType,
};

use crate::integration::support::Harness;

fn stored_image_path(h: &Harness, product_id: u64) -> String {
    h.catalog.get_by_id(product_id).unwrap().images[0]
        .file
        .as_ref()
        .unwrap()
        .path
        .clone()
}

#[test]
fn products_added_to_digital_assets_category_move_in() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.catalog.insert_product(
        Product::new(1, "shirt", ProductType::Simple)
            .with_categories(&[5, 7])
            .with_image(ImageEntry::new(Some(10), "/a/b/logo.png"))
            .persisted(),
    );

    let category = h.catalog.get(7).unwrap();
    let report = h.hooks.on_category_saved(&category, &[1], &[]);

    assert_eq!(report.brand.as_ref().unwrap().as_str(), "/Acme/DigitalAssets");
    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.file_operations(), 1);
    assert_eq!(stored_image_path(&h, 1), "/Acme/DigitalAssets/logo.png");
    assert!(h.exists("catalog/product/Acme/DigitalAssets/logo.png"));
}

#[test]
fn products_removed_from_digital_assets_category_move_out() {
    let h = Harness::new();
    h.touch("catalog/product/Acme/DigitalAssets/logo.png");
    // category assignment already saved without category 7
    h.catalog.insert_product(
        Product::new(1, "shirt", ProductType::Simple)
            .with_categories(&[5])
            .with_image(ImageEntry::new(Some(10), "/Acme/DigitalAssets/logo.png"))
            .persisted(),
    );

    let category = h.catalog.get(7).unwrap();
    let report = h.hooks.on_category_saved(&category, &[], &[1]);

    assert_eq!(report.removed.len(), 1);
    assert_eq!(
        report.removed[0].left_brand.as_ref().unwrap().as_str(),
        "/Acme/DigitalAssets"
    );
    assert_eq!(stored_image_path(&h, 1), "/l/o/logo.png");
    assert!(h.exists("catalog/product/l/o/logo.png"));
}

#[test]
fn removed_product_still_in_other_brand_lands_there() {
    let h = Harness::new();
    h.touch("catalog/product/Acme/DigitalAssets/logo.png");
    h.catalog.insert_product(
        Product::new(1, "shirt", ProductType::Simple)
            .with_categories(&[8])
            .with_image(ImageEntry::new(Some(10), "/Acme/DigitalAssets/logo.png"))
            .persisted(),
    );

    let category = h.catalog.get(7).unwrap();
    let report = h.hooks.on_category_saved(&category, &[], &[1]);

    assert!(report.removed[0].left_brand.is_none());
    assert_eq!(report.file_operations(), 1);
    assert_eq!(stored_image_path(&h, 1), "/BigCorp/DigitalAssets/logo.png");
}

#[test]
fn ordinary_category_save_does_nothing() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    h.catalog.insert_product(
        Product::new(1, "shirt", ProductType::Simple)
            .with_categories(&[5, 7])
            .with_image(ImageEntry::new(Some(10), "/a/b/logo.png"))
            .persisted(),
    );

    let report = h
        .hooks
        .on_category_saved(&Category::new(5, "Shirts", 4).with_parent(3), &[1], &[]);

    assert!(report.brand.is_none());
    assert_eq!(h.fs.operations(), 0);
    assert_eq!(stored_image_path(&h, 1), "/a/b/logo.png");
}
