//! Integration tests for saved palettes on a file-backed store.

use chrono::{Local, TimeZone};
use wss::error::WssError;
use wss::history::{DRAFT_KEY, HISTORY_KEY, HistoryRepository, KeyValueStore, SqliteStore};
use wss::palette::{HexColor, Palette};

use crate::common::fixtures::{TestDir, reference_image};

#[test]
fn test_history_survives_reopen() {
    let dir = TestDir::new();
    let path = dir.join("nested/history.db");
    let now = Local.with_ymd_and_hms(2024, 12, 1, 9, 30, 5).unwrap();

    let palette = Palette::default()
        .with_notes("Advento")
        .with_image_attached("color-2", reference_image([250, 220, 70]))
        .unwrap();

    let saved_id = {
        let mut repo = HistoryRepository::new(SqliteStore::open(&path).unwrap());
        let (history, record) = repo.load_history().unwrap().with_saved(&palette, now).unwrap();
        repo.save_history(&history).unwrap();
        repo.save_draft(&Palette::default().with_notes("rascunho")).unwrap();
        assert!(repo.clear_draft().unwrap());
        assert_eq!(record.date, "01/12/2024, 09:30:05");
        record.id
    };

    let repo = HistoryRepository::new(SqliteStore::open(&path).unwrap());
    let history = repo.load_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].image_count(), 1);
    assert_eq!(history.load(saved_id).unwrap(), palette);
    assert_eq!(repo.load_draft().unwrap(), Palette::default());
}

#[test]
fn test_newest_first_and_delete() {
    let mut repo = HistoryRepository::new(SqliteStore::in_memory().unwrap());
    let first = Local.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let second = Local.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();

    let (history, a) = repo.load_history().unwrap().with_saved(&Palette::default().with_notes("a"), first).unwrap();
    let (history, b) = history.with_saved(&Palette::default().with_notes("b"), second).unwrap();
    repo.save_history(&history).unwrap();

    let loaded = repo.load_history().unwrap();
    let ids: Vec<i64> = loaded.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);

    let (remaining, removed) = loaded.without(a.id);
    assert!(removed);
    repo.save_history(&remaining).unwrap();
    assert!(matches!(
        repo.load_history().unwrap().load(a.id),
        Err(WssError::PaletteNotFound { .. })
    ));
}

#[test]
fn test_blank_colors_dropped_on_save() {
    let mut palette = Palette::default().with_notes("Quaresma");
    palette.colors[1].color = None;

    let now = Local.with_ymd_and_hms(2024, 2, 14, 19, 0, 0).unwrap();
    let (_, record) = wss::history::History::new().with_saved(&palette, now).unwrap();
    assert_eq!(record.colors.len(), 4);
    assert!(record.colors.iter().all(|c| c.color.is_some()));
}

#[test]
fn test_unreadable_values_fall_back() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.set(HISTORY_KEY, "not json").unwrap();
    store.set(DRAFT_KEY, "{\"colors\": 7}").unwrap();

    let repo = HistoryRepository::new(store);
    assert!(repo.load_history().unwrap().is_empty());
    assert_eq!(repo.load_draft().unwrap(), Palette::default());
}

#[test]
fn test_reads_records_with_numeric_color_ids() -> anyhow::Result<()> {
    let raw = r##"[{
        "id": 1717171717171,
        "colors": [
            {"id": "color-1", "color": "#93c5fd", "images": []},
            {"id": 1717171700000, "color": "#ef4444", "images": []}
        ],
        "notes": "Pentecostes",
        "date": "31/05/2024, 13:08:37"
    }]"##;
    let mut store = SqliteStore::in_memory()?;
    store.set(HISTORY_KEY, raw)?;

    let repo = HistoryRepository::new(store);
    let palette = repo.load_history()?.load(1_717_171_717_171)?;
    assert_eq!(palette.colors[1].id, "1717171700000");
    assert_eq!(palette.colors[1].color, Some(HexColor::new(0xef, 0x44, 0x44)));
    assert_eq!(palette.notes, "Pentecostes");

    // The raw store still holds exactly what was written.
    let store = repo.into_inner();
    assert_eq!(store.get(HISTORY_KEY)?.as_deref(), Some(raw));
    Ok(())
}
