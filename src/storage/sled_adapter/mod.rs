mod sled_store;

pub use sled_store::*;


use std::fmt::Debug;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::EngineOptions;
use crate::Result;
use crate::StorageError;

//---
// Database namespaces
/// Sled tree holding log entries keyed by big-endian index
pub(crate) const RAFT_LOG_NAMESPACE: &str = "raft_log";
/// Sled tree holding opaque metadata, disjoint from the log keyspace
pub(crate) const RAFT_META_NAMESPACE: &str = "raft_meta";

//---
// Directory lock backoff
const LOCK_RETRY_BASE_DELAY: Duration = Duration::from_millis(5);
const LOCK_RETRY_MAX_DELAY: Duration = Duration::from_millis(200);

/// Opens (or creates) the sled database rooted at `sled_db_root_path`,
/// creating the directory first if it does not exist.
///
/// sled releases its exclusive directory lock from background threads some
/// time after the last handle is dropped. While that lock is still held the
/// open is retried with exponential backoff for up to
/// `options.open_lock_timeout_ms`, so a store can be reopened right after
/// [`SledStore::close`] in the same process.
pub fn init_sled_store_db(
    sled_db_root_path: impl AsRef<Path> + Debug,
    options: &EngineOptions,
) -> Result<sled::Db> {
    debug!("init_sled_store_db from path: {:?}", &sled_db_root_path);

    options.validate()?;

    let path = sled_db_root_path.as_ref();
    std::fs::create_dir_all(path).map_err(|source| StorageError::PathError {
        path: path.to_path_buf(),
        source,
    })?;

    let config = options.to_sled_config().path(path);
    let deadline = Instant::now() + Duration::from_millis(options.open_lock_timeout_ms);
    let mut delay = LOCK_RETRY_BASE_DELAY;
    let mut attempts = 1u32;

    loop {
        match config.open() {
            Ok(db) => {
                if attempts > 1 {
                    debug!(?path, attempts, "acquired sled directory lock");
                }
                return Ok(db);
            }
            Err(e) if is_lock_contention(&e) && Instant::now() < deadline => {
                trace!(?path, attempts, ?delay, "sled directory lock still held, retrying");
                thread::sleep(delay);
                delay = (delay * 2).min(LOCK_RETRY_MAX_DELAY);
                attempts += 1;
            }
            Err(e) => {
                warn!(
                    "Try to open DB at this location: {:?} and failed after {} attempt(s): {:?}",
                    path, attempts, e
                );
                return Err(e.into());
            }
        }
    }
}

/// True if `e` is sled failing to take the exclusive lock on its directory.
pub(crate) fn is_lock_contention(e: &sled::Error) -> bool {
    match e {
        sled::Error::Io(io_err) => {
            io_err.kind() == io::ErrorKind::WouldBlock
                || io_err.to_string().contains("could not acquire lock")
        }
        _ => false,
    }
}
