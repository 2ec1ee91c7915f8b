//! Integration tests for rendering a palette and paginating the result.

use lopdf::content::Content;
use wss::export::mock::RecordingWriter;
use wss::export::{DocumentMetadata, ExportOptions, PaginatedExporter, ScaleMode, encode_win_ansi};
use wss::palette::Palette;
use wss::render::{EMPTY_NOTES, NOTES_HEADING, RenderOptions, ResizeStrategy, SHEET_TITLE, render_palette};

use crate::common::fixtures::reference_image;

/// Eight colors with three photos each.
fn full_palette() -> Palette {
    let mut palette = Palette::default();
    for _ in 0..3 {
        palette = palette.with_color_added();
    }
    let ids: Vec<String> = palette.colors.iter().map(|c| c.id.clone()).collect();
    for (n, id) in ids.iter().enumerate() {
        for k in 0..3u8 {
            palette = palette
                .with_image_attached(id, reference_image([n as u8 * 30, k * 80, 100]))
                .unwrap();
        }
    }
    palette.with_notes("Natal: dourado e branco")
}

#[test]
fn test_default_palette_fits_one_page() {
    let snapshot = render_palette(&Palette::default(), &RenderOptions::default()).unwrap();
    assert_eq!(snapshot.width(), 718 * 2);

    let plan = PaginatedExporter::default().plan(&snapshot).unwrap();
    assert_eq!(plan.page_count(), 1);
}

#[test]
fn test_tall_sheet_spans_pages_at_full_width() {
    let palette = full_palette();
    assert_eq!(palette.image_count(), 24);

    let snapshot = render_palette(&palette, &RenderOptions::default()).unwrap();
    let exporter = PaginatedExporter::new(ExportOptions {
        scale_mode: ScaleMode::FitWidth,
        ..ExportOptions::default()
    });
    let plan = exporter.plan(&snapshot).unwrap();

    assert!(plan.page_count() >= 2, "got {} pages", plan.page_count());
    let rows: u32 = plan.bands.iter().map(|b| b.source_height).sum();
    assert_eq!(rows, snapshot.height());

    // Squeezed onto one page instead.
    let one = PaginatedExporter::default().plan(&snapshot).unwrap();
    assert_eq!(one.page_count(), 1);
}

#[test]
fn test_tile_strategies_render_same_size() {
    let palette = Palette::default()
        .with_image_attached("color-1", reference_image([10, 20, 30]))
        .unwrap();
    let sizes: Vec<(u32, u32)> = [ResizeStrategy::Fill, ResizeStrategy::Fit, ResizeStrategy::Stretch]
        .into_iter()
        .map(|tile_strategy| {
            let snap = render_palette(
                &palette,
                &RenderOptions {
                    scale: 1,
                    tile_strategy,
                },
            )
            .unwrap();
            (snap.width(), snap.height())
        })
        .collect();
    assert!(sizes.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_rendered_pdf_carries_notes() {
    let palette = Palette::default().with_notes("Domingo de Ramos");
    let snapshot = render_palette(&palette, &RenderOptions::default()).unwrap();
    let exported = PaginatedExporter::default()
        .export_pdf(&snapshot, DocumentMetadata::default().with_subject(&palette.notes))
        .unwrap();

    let doc = lopdf::Document::load_mem(&exported.bytes).unwrap();
    let info_ref = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_ref).unwrap();
    let subject = info.get(b"Subject").unwrap().as_str().unwrap();
    assert_eq!(subject, b"Domingo de Ramos");
}

/// Every string shown with `Tj` across all pages, in page order.
fn shown_text(bytes: &[u8]) -> Vec<Vec<u8>> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let mut shown = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            shown.push(op.operands[0].as_str().unwrap().to_vec());
        }
    }
    shown
}

#[test]
fn test_notes_reach_page_content() {
    let palette = Palette::default().with_notes("Observações: dourado e branco");
    let snapshot = render_palette(&palette, &RenderOptions::default()).unwrap();
    let exported = PaginatedExporter::default()
        .export_pdf(&snapshot, DocumentMetadata::default())
        .unwrap();

    let shown = shown_text(&exported.bytes);
    assert_eq!(shown.len(), snapshot.text().len());
    assert_eq!(shown[0], SHEET_TITLE.as_bytes());
    assert!(shown.contains(&encode_win_ansi(NOTES_HEADING)));
    assert!(shown.contains(&encode_win_ansi("Observações: dourado e branco")));
    assert!(shown.contains(&b"#93C5FD".to_vec()));
}

#[test]
fn test_empty_notes_print_placeholder() {
    let snapshot = render_palette(&Palette::default(), &RenderOptions::default()).unwrap();
    let exported = PaginatedExporter::default()
        .export_pdf(&snapshot, DocumentMetadata::default())
        .unwrap();
    assert_eq!(shown_text(&exported.bytes).last(), Some(&encode_win_ansi(EMPTY_NOTES)));
}

#[test]
fn test_text_split_across_pages_once() {
    let palette = full_palette();
    let snapshot = render_palette(&palette, &RenderOptions::default()).unwrap();
    let exporter = PaginatedExporter::new(ExportOptions {
        scale_mode: ScaleMode::FitWidth,
        ..ExportOptions::default()
    });
    let mut writer = RecordingWriter::new();
    let plan = exporter.export(&snapshot, &mut writer).unwrap();

    let texts = writer.texts();
    assert_eq!(texts.len(), snapshot.text().len());
    assert_eq!(texts.first().map(|(page, _)| *page), Some(0));
    assert!(plan.page_count() >= 2);

    let notes = snapshot.text().last().unwrap();
    let (page, text) = texts.last().unwrap();
    assert_eq!(text, "Natal: dourado e branco");
    assert_eq!(*page, plan.band_for_row(notes.baseline));
    assert!(*page > 0);
    assert!(texts.windows(2).all(|w| w[0].0 <= w[1].0));
}
