use std::ops::RangeInclusive;

use tempfile::TempDir;

use crate::EngineOptions;
use crate::Entry;
use crate::SledStore;

/// Small-footprint engine options so many stores can be opened per test run.
pub fn test_engine_options() -> EngineOptions {
    EngineOptions {
        cache_capacity: 8 * 1024 * 1024,
        flush_every_ms: None,
        segment_size: 1024 * 1024,
        ..EngineOptions::default()
    }
}

// Helper to create test entries
pub fn create_entries(range: RangeInclusive<u64>) -> Vec<Entry> {
    range
        .map(|i| Entry::new(i, i, vec![i as u8; 1024])) // 1KB payload
        .collect()
}

// Test setup helper
pub fn setup_store() -> (SledStore, TempDir) {
    let tempdir = tempfile::tempdir().unwrap();
    let store = SledStore::open(tempdir.path(), Some(test_engine_options())).unwrap();
    (store, tempdir)
}

/// Reopens the store in `dir`. The previous handle must already be dropped.
pub fn reopen_store(dir: &TempDir) -> SledStore {
    SledStore::open(dir.path(), Some(test_engine_options())).unwrap()
}
