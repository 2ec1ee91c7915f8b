//! Integration tests for palette edits.

use wss::error::WssError;
use wss::palette::{HexColor, MAX_IMAGES_PER_COLOR, Palette, ReferenceImage};

use crate::common::fixtures::{TestDir, reference_image};

#[test]
fn test_edit_sequence_never_mutates_inputs() {
    let start = Palette::default();
    let snapshot = start.clone();

    let edited = start
        .with_color_added()
        .with_color_changed("color-1", HexColor::parse("#123456").unwrap())
        .unwrap()
        .with_color_removed("color-5")
        .unwrap()
        .with_notes("Pentecostes: tons quentes");

    assert_eq!(start, snapshot);
    assert_eq!(edited.colors.len(), 5);
    assert_eq!(edited.colors[0].color, Some(HexColor::new(0x12, 0x34, 0x56)));
    assert!(edited.color("color-5").is_none());
    assert_eq!(edited.colors[4].color, Some(HexColor::WHITE));
    assert_eq!(edited.notes, "Pentecostes: tons quentes");
}

#[test]
fn test_attach_from_file() {
    let files = TestDir::new();
    let path = files.png("altar.png", 64, 48, [200, 30, 30]);

    let image = ReferenceImage::from_path(&path).unwrap();
    assert_eq!(image.mime_type(), Some("image/png"));

    let palette = Palette::default().with_image_attached("color-3", image.clone()).unwrap();
    assert_eq!(palette.image_count(), 1);
    assert_eq!(palette.images().next(), Some(&image));

    let decoded = palette.color("color-3").unwrap().images[0].decode().unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn test_image_limit_per_color_only() {
    let mut palette = Palette::default();
    for i in 0..MAX_IMAGES_PER_COLOR {
        palette = palette
            .with_image_attached("color-1", reference_image([i as u8, 0, 0]))
            .unwrap();
    }
    let err = palette
        .with_image_attached("color-1", reference_image([9, 9, 9]))
        .unwrap_err();
    assert!(matches!(err, WssError::ImageLimit { .. }));
    assert!(err.suggestion().is_some());

    // Other colors still accept images.
    let palette = palette
        .with_image_attached("color-2", reference_image([9, 9, 9]))
        .unwrap();
    assert_eq!(palette.image_count(), MAX_IMAGES_PER_COLOR + 1);
}

#[test]
fn test_detach_by_prefix() {
    let red = reference_image([255, 0, 0]);
    let blue = reference_image([0, 0, 255]);
    let palette = Palette::default()
        .with_image_attached("color-1", red.clone())
        .unwrap()
        .with_image_attached("color-1", blue.clone())
        .unwrap();

    let detached = palette
        .with_image_removed("color-1", &blue.fingerprint()[..8])
        .unwrap();
    assert_eq!(detached.color("color-1").unwrap().images, vec![red]);

    let err = palette.with_image_removed("color-2", &blue.fingerprint()).unwrap_err();
    assert!(matches!(err, WssError::ImageNotAttached { .. }));
}

#[test]
fn test_invalid_color_and_unknown_id() {
    assert!(matches!(HexColor::parse("blue"), Err(WssError::InvalidColor { .. })));
    let err = Palette::default()
        .with_color_changed("color-99", HexColor::WHITE)
        .unwrap_err();
    assert!(matches!(err, WssError::ColorNotFound { .. }));
    assert!(err.is_user_recoverable());
}

#[test]
fn test_reset_restores_defaults() {
    let edited = Palette::default()
        .with_color_removed("color-1")
        .unwrap()
        .with_notes("x");
    assert_ne!(edited, Palette::default());
    assert_eq!(Palette::reset(), Palette::default());
}

#[test]
fn test_json_round_trip_keeps_images_inline() {
    let palette = Palette::default()
        .with_image_attached("color-4", reference_image([1, 2, 3]))
        .unwrap();
    let json = serde_json::to_string(&palette).unwrap();
    assert!(json.contains("data:image/png;base64,"));

    let back: Palette = serde_json::from_str(&json).unwrap();
    assert_eq!(back, palette);
}
