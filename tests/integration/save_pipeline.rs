use brand_assets::catalog::{
    DownloadableLink, DownloadableSample, FileStatus, Product, ProductStore, ProductType,
};
use brand_assets::diff::StaleReason;

use crate::integration::support::Harness;

fn sample(id: Option<u64>, path: &str) -> DownloadableSample {
    DownloadableSample::new(id, Some(path))
}

#[test]
fn diff_moves_new_sample_and_deletes_removed_one() {
    let h = Harness::new();
    h.touch("downloadable/files/samples/Acme/DigitalAssets/f1.pdf");
    h.touch("downloadable/files/samples/f/2/f2.pdf");
    h.touch("downloadable/files/samples/f/3/f3.pdf");

    let persisted = Product::new(1, "ebook", ProductType::Downloadable)
        .with_categories(&[7])
        .with_sample(sample(Some(1), "/Acme/DigitalAssets/f1.pdf"))
        .with_sample(sample(Some(2), "/f/2/f2.pdf"))
        .persisted();
    h.catalog.insert_product(persisted.clone());

    let mut submitted = persisted.clone();
    submitted.samples = vec![
        sample(Some(1), "/Acme/DigitalAssets/f1.pdf"),
        sample(None, "/f/3/f3.pdf"),
    ];

    let before = h.hooks.prepare_product_save(&mut submitted);

    assert_eq!(before.scheduled.len(), 1);
    assert_eq!(before.scheduled[0].path, "/f/3/f3.pdf");
    assert_eq!(before.deleted.len(), 1);
    assert_eq!(before.deleted[0].path, "/f/2/f2.pdf");
    assert_eq!(before.deleted[0].reason, StaleReason::AssetRemoved);
    assert!(!h.exists("downloadable/files/samples/f/2/f2.pdf"));
    assert_eq!(
        submitted.samples[0].sample_file.as_ref().unwrap().status,
        FileStatus::Old
    );
    assert_eq!(
        submitted.samples[1].sample_file.as_ref().unwrap().status,
        FileStatus::New
    );

    h.catalog.save(&submitted).unwrap();
    let after = h.hooks.on_after_product_save(&mut submitted).unwrap();

    assert_eq!(after.file_operations(), 1);
    assert_eq!(
        submitted.samples[1].sample_file.as_ref().unwrap().path,
        "/Acme/DigitalAssets/f3.pdf"
    );
    assert!(h.exists("downloadable/files/samples/Acme/DigitalAssets/f3.pdf"));
    // host save plus the engine's own save
    assert_eq!(h.catalog.save_count(1), 2);
    assert_eq!(submitted.original.samples.len(), 2);
}

#[test]
fn replaced_link_file_in_brand_folder_is_deleted() {
    let h = Harness::new();
    h.touch("downloadable/files/links/Acme/DigitalAssets/v1.zip");
    h.touch("downloadable/files/links/v/2/v2.zip");

    let persisted = Product::new(1, "ebook", ProductType::Downloadable)
        .with_categories(&[7])
        .with_link(DownloadableLink::new(Some(20), Some("/Acme/DigitalAssets/v1.zip"), None))
        .persisted();
    let mut submitted = persisted.clone();
    submitted.links[0] = DownloadableLink::new(Some(20), Some("/v/2/v2.zip"), None);

    let submitted = h.hooks.on_before_product_save(submitted);
    assert!(!h.exists("downloadable/files/links/Acme/DigitalAssets/v1.zip"));
    assert_eq!(
        submitted.links[0].link_file.as_ref().unwrap().status,
        FileStatus::New
    );

    let mut submitted = submitted;
    h.hooks.on_after_product_save(&mut submitted).unwrap();
    assert_eq!(
        submitted.links[0].link_file.as_ref().unwrap().path,
        "/Acme/DigitalAssets/v2.zip"
    );
}

#[test]
fn temp_upload_suffix_is_dropped_on_move() {
    let h = Harness::new();
    h.touch("downloadable/files/links/b/o/book.pdf");
    let mut product = Product::new(1, "ebook", ProductType::Downloadable)
        .with_categories(&[7])
        .with_link(DownloadableLink::new(None, Some("/b/o/book.pdf.tmp"), None));

    let report = h.hooks.on_after_product_save(&mut product).unwrap();

    assert_eq!(report.file_operations(), 1);
    assert_eq!(
        product.links[0].link_file.as_ref().unwrap().path,
        "/Acme/DigitalAssets/book.pdf"
    );
}

#[test]
fn product_no_longer_downloadable_loses_link_files() {
    let h = Harness::new();
    h.touch("downloadable/files/links/Acme/DigitalAssets/book.pdf");
    h.touch("downloadable/files/link_samples/Acme/DigitalAssets/preview.pdf");

    let mut product = Product::new(1, "ebook", ProductType::Downloadable)
        .with_categories(&[7])
        .with_link(DownloadableLink::new(
            Some(20),
            Some("/Acme/DigitalAssets/book.pdf"),
            Some("/Acme/DigitalAssets/preview.pdf"),
        ))
        .persisted();
    product.type_id = ProductType::Virtual;

    let report = h.hooks.prepare_product_save(&mut product);

    assert!(report.type_transition);
    assert_eq!(report.deleted.len(), 2);
    assert!(product.links.is_empty());
    assert!(!h.exists("downloadable/files/links/Acme/DigitalAssets/book.pdf"));
    assert!(!h.exists("downloadable/files/link_samples/Acme/DigitalAssets/preview.pdf"));
}
