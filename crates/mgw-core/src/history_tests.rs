use chrono::{Duration, Utc};
use serde_json::json;

use crate::history::{HistoryBuffer, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
use crate::record::StatusRecord;
use crate::test_support::payload_with;

fn entry(playlist: i64) -> HistoryEntry {
    HistoryEntry {
        record: StatusRecord::decode(&payload_with("playlist", json!(playlist)))
            .expect("valid payload"),
        received_at: Utc::now() + Duration::seconds(playlist),
    }
}

fn playlists(entries: &[HistoryEntry]) -> Vec<i64> {
    entries.iter().map(|e| e.record.active_playlist).collect()
}

#[test]
fn default_capacity_is_one_hundred() {
    assert_eq!(HistoryBuffer::default().capacity(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(DEFAULT_HISTORY_CAPACITY, 100);
}

#[test]
fn keeps_last_entries_in_insertion_order() {
    let mut history = HistoryBuffer::default();
    for i in 0..150 {
        history.push(entry(i));
    }

    let all = history.recent(None);
    assert_eq!(all.len(), 100);
    assert_eq!(playlists(&all), (50..150).collect::<Vec<_>>());
}

#[test]
fn recent_limit_returns_newest_oldest_first() {
    let mut history = HistoryBuffer::with_capacity(10);
    for i in 0..6 {
        history.push(entry(i));
    }

    assert_eq!(playlists(&history.recent(Some(3))), vec![3, 4, 5]);
    assert_eq!(playlists(&history.recent(Some(50))), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(history.recent(Some(0)).len(), 6);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut history = HistoryBuffer::with_capacity(0);
    history.push(entry(1));
    history.push(entry(2));

    assert_eq!(history.capacity(), 1);
    assert_eq!(playlists(&history.recent(None)), vec![2]);
}

#[test]
fn clear_empties_buffer() {
    let mut history = HistoryBuffer::default();
    history.push(entry(1));
    history.clear();

    assert!(history.is_empty());
    assert_eq!(history.len(), 0);
}

#[test]
fn entry_serializes_status_and_received_at() {
    let value = serde_json::to_value(entry(4)).expect("serialize");

    assert_eq!(value["status"]["playlist"], 4);
    assert!(value.get("receivedAt").is_some());
}
