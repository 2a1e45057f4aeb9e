use brand_assets::catalog::{ImageEntry, Product, ProductType};
use brand_assets::config::ConflictPolicy;
use brand_assets::ConfigLoader;

use crate::integration::support::Harness;

#[test]
fn configured_folder_and_base_paths_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brand-assets.toml");
    std::fs::write(
        &path,
        r#"
[media]
image_base = "media/images"

[brand]
folder_name = "Assets"
"#,
    )
    .unwrap();
    let config = ConfigLoader::load_from_file(&path).unwrap();

    let h = Harness::with_config(config);
    h.touch("media/images/a/b/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[7])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"));

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert_eq!(report.brand.unwrap().as_str(), "/Acme/Assets");
    assert!(h.exists("media/images/Acme/Assets/logo.png"));
}

#[test]
fn reject_policy_leaves_multi_brand_product_alone() {
    let mut config = ConfigLoader::default();
    config.brand.conflict_policy = ConflictPolicy::Reject;
    let h = Harness::with_config(config);
    h.touch("catalog/product/a/b/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[7, 8])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"));

    let report = h.reconciler.reconcile(&mut product, None, None);

    assert!(!report.changed());
    assert!(h.exists("catalog/product/a/b/logo.png"));
}

#[test]
fn first_match_policy_uses_first_brand() {
    let h = Harness::new();
    h.touch("catalog/product/a/b/logo.png");
    let mut product = Product::new(1, "shirt", ProductType::Simple)
        .with_categories(&[8, 7])
        .with_image(ImageEntry::new(None, "/a/b/logo.png"));

    h.reconciler.reconcile(&mut product, None, None);

    assert_eq!(
        product.images[0].file.as_ref().unwrap().path,
        "/BigCorp/DigitalAssets/logo.png"
    );
}
