//! Integration tests for slicing snapshots across pages.

use wss::error::WssError;
use wss::export::mock::{RecordingWriter, WriterOp};
use wss::export::{
    DocumentMetadata, ExportOptions, PageGeometry, PaginatedExporter, SLACK_MM, ScaleMode,
};

use crate::common::fixtures::{solid_snapshot, striped_snapshot};

fn exporter(mode: ScaleMode, geometry: PageGeometry) -> PaginatedExporter {
    PaginatedExporter::new(ExportOptions {
        geometry,
        scale_mode: mode,
        ..ExportOptions::default()
    })
}

#[test]
fn test_default_export_fits_one_page() {
    let mut writer = RecordingWriter::new();
    let plan = PaginatedExporter::default()
        .export(&striped_snapshot(1436, 4000), &mut writer)
        .unwrap();

    assert_eq!(plan.page_count(), 1);
    let (page, placement) = writer.placements()[0];
    assert_eq!(page, 0);
    assert!((placement.x - 20.0).abs() < 1e-9);
    assert!((placement.y - 20.0).abs() < 1e-9);
    assert!(placement.height <= 257.0 + SLACK_MM);
    assert!(placement.width <= 170.0 + SLACK_MM);
}

#[test]
fn test_fit_width_three_pages() {
    // 170 x 771 px at 170 mm wide is 771 mm tall: 257 mm per page, exactly 3.
    let mut writer = RecordingWriter::new();
    let plan = exporter(ScaleMode::FitWidth, PageGeometry::a4())
        .export(&striped_snapshot(170, 771), &mut writer)
        .unwrap();

    assert_eq!(plan.page_count(), 3);
    assert_eq!(
        writer.operations().iter().filter(|op| **op == WriterOp::AddPage).count(),
        2
    );
    assert_eq!(writer.band_heights(), vec![257, 257, 257]);
    for (_, placement) in writer.placements() {
        assert!((placement.height - 257.0).abs() < 1e-6);
        assert!((placement.width - 170.0).abs() < 1e-9);
    }
}

#[test]
fn test_bands_are_contiguous_and_cover_every_row() {
    let geometries = [
        PageGeometry::a4(),
        PageGeometry::new(215.9, 279.4, 12.7),
        PageGeometry::new(100.0, 150.0, 5.0),
    ];
    for geometry in geometries {
        for (w, h) in [(640, 5000), (333, 7777), (1000, 1001), (17, 9000)] {
            let plan = exporter(ScaleMode::FitWidth, geometry)
                .plan(&solid_snapshot(w, h, [255, 255, 255]))
                .unwrap();

            let mut next_row = 0;
            for band in &plan.bands {
                assert_eq!(band.source_y, next_row, "{w}x{h} gap or overlap");
                assert!(band.source_height >= 1);
                next_row += band.source_height;
            }
            assert_eq!(next_row, h, "{w}x{h} must end on the last row");

            let expected = (plan.image.height / geometry.content_height() - SLACK_MM / geometry.content_height()).ceil();
            assert_eq!(plan.page_count(), (expected as usize).max(1));
            assert!((plan.covered_height() - plan.image.height).abs() < 1e-6);
        }
    }
}

#[test]
fn test_band_pixels_come_from_matching_rows() {
    let snap = striped_snapshot(50, 1200);
    let plan = exporter(ScaleMode::FitWidth, PageGeometry::new(60.0, 80.0, 5.0))
        .plan(&snap)
        .unwrap();
    assert!(plan.page_count() > 1);

    for band in &plan.bands {
        let pixels = snap.extract_band(band.source_y, band.source_height);
        assert_eq!(pixels.height(), band.source_height);
        let expected = (band.source_y % 256) as u8;
        assert_eq!(pixels.get_pixel(0, 0).0, [expected, expected, expected]);
    }
}

#[test]
fn test_zero_margin_rejected_before_writing() {
    let mut writer = RecordingWriter::new();
    let err = exporter(ScaleMode::FitPage, PageGeometry::new(210.0, 297.0, 0.0))
        .export(&solid_snapshot(10, 10, [0, 0, 0]), &mut writer)
        .unwrap_err();

    assert!(matches!(err, WssError::InvalidInput { field: "geometry.margin", .. }));
    assert!(writer.operations().is_empty());
}

#[test]
fn test_pdf_matches_plan() {
    let snap = striped_snapshot(400, 2600);
    let exported = exporter(ScaleMode::FitWidth, PageGeometry::a4())
        .export_pdf(&snap, DocumentMetadata::default().with_subject("Natal"))
        .unwrap();

    assert!(exported.bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&exported.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), exported.plan.page_count());
    assert!(exported.plan.page_count() >= 2);
}

#[test]
fn test_pdf_saved_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Worship_Service_Styles.pdf");
    let exported = PaginatedExporter::default()
        .export_pdf(&solid_snapshot(100, 100, [67, 56, 202]), DocumentMetadata::default())
        .unwrap();
    exported.save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, exported.bytes);
}
