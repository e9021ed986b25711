//! Acknowledged writes must survive the process dying without any handle
//! being dropped. Each case re-runs this test binary as a child that
//! performs one write, then calls `process::abort`, so neither `close()` nor
//! `Drop` gets a chance to flush. The parent reopens the directory and
//! checks the write is there.

use std::path::Path;
use std::process::Command;

use raft_sled_store::EngineOptions;
use raft_sled_store::Entry;
use raft_sled_store::Error;
use raft_sled_store::LogStore;
use raft_sled_store::MetaStore;
use raft_sled_store::SledStore;

const CRASH_DIR_ENV: &str = "RAFT_SLED_STORE_CRASH_DIR";
const CRASH_OP_ENV: &str = "RAFT_SLED_STORE_CRASH_OP";
const CHILD_TEST: &str = "abort_after_acknowledged_write";

/// Background flushing disabled: only explicit flushes reach the disk.
fn engine_options() -> EngineOptions {
    EngineOptions {
        cache_capacity: 8 * 1024 * 1024,
        flush_every_ms: None,
        segment_size: 1024 * 1024,
        ..EngineOptions::default()
    }
}

fn open(dir: &Path) -> SledStore {
    SledStore::open(dir, Some(engine_options())).unwrap()
}

/// Child side. Does nothing unless launched by `run_crashing_child`.
#[test]
fn abort_after_acknowledged_write() {
    let (Ok(dir), Ok(op)) = (std::env::var(CRASH_DIR_ENV), std::env::var(CRASH_OP_ENV)) else {
        return;
    };
    let store = open(Path::new(&dir));

    match op.as_str() {
        "store_log" => store.store_log(&Entry::new(1, 3, b"one".to_vec())).unwrap(),
        "store_logs" => {
            let batch: Vec<Entry> = (1..=5).map(|i| Entry::new(i, 3, vec![i as u8; 64])).collect();
            store.store_logs(&batch).unwrap()
        }
        "delete_range" => store.delete_range(1, 3).unwrap(),
        "set" => store.set(b"LastVoteCand", b"node-2").unwrap(),
        "set_uint64" => store.set_uint64(b"CurrentTerm", 9).unwrap(),
        other => panic!("unknown write {other}"),
    }

    std::process::abort();
}

fn run_crashing_child(
    dir: &Path,
    op: &str,
) {
    let status = Command::new(std::env::current_exe().unwrap())
        .args([CHILD_TEST, "--exact", "--nocapture", "--test-threads=1"])
        .env(CRASH_DIR_ENV, dir)
        .env(CRASH_OP_ENV, op)
        .status()
        .unwrap();
    assert!(!status.success(), "child for {op} was expected to abort");
}

#[test]
fn test_store_log_survives_abort() {
    let dir = tempfile::tempdir().unwrap();
    run_crashing_child(dir.path(), "store_log");

    let store = open(dir.path());
    let entry = store.get_log(1).unwrap();
    assert_eq!(entry.term, 3);
    assert_eq!(entry.payload, b"one");
}

#[test]
fn test_store_logs_survives_abort() {
    let dir = tempfile::tempdir().unwrap();
    run_crashing_child(dir.path(), "store_logs");

    let store = open(dir.path());
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), 5);
    assert_eq!(store.get_log(4).unwrap().payload, vec![4u8; 64]);
}

#[test]
fn test_delete_range_survives_abort() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(dir.path());
        let batch: Vec<Entry> = (1..=5).map(|i| Entry::new(i, 1, Vec::new())).collect();
        store.store_logs(&batch).unwrap();
        store.close().unwrap();
    }

    run_crashing_child(dir.path(), "delete_range");

    let store = open(dir.path());
    assert_eq!(store.first_index().unwrap(), 4);
    assert_eq!(store.last_index().unwrap(), 5);
    assert!(matches!(store.get_log(3), Err(Error::LogNotFound(3))));
}

#[test]
fn test_metadata_survives_abort() {
    let dir = tempfile::tempdir().unwrap();
    run_crashing_child(dir.path(), "set");
    {
        let store = open(dir.path());
        assert_eq!(store.get(b"LastVoteCand").unwrap(), b"node-2");
        store.close().unwrap();
    }

    run_crashing_child(dir.path(), "set_uint64");
    let store = open(dir.path());
    assert_eq!(store.get_uint64(b"CurrentTerm").unwrap(), 9);
    assert_eq!(store.get(b"LastVoteCand").unwrap(), b"node-2");
}
