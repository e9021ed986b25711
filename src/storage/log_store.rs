//! Core model in Raft: the persistence contract a consensus driver relies on.
//!
//! Every method is a blocking call that either completes durably or fails.
//! `Ok` from a write means the data survives a crash right after the call
//! returns.

use crate::convert::index_to_key;
use crate::convert::key_to_index;
use crate::Entry;
use crate::Result;

/// Replicated log persistence.
pub trait LogStore: Send + Sync + 'static {
    /// Smallest stored index, or `0` when the log is empty.
    fn first_index(&self) -> Result<u64>;

    /// Largest stored index, or `0` when the log is empty.
    fn last_index(&self) -> Result<u64>;

    /// Fails with `Error::LogNotFound` if nothing (or an empty value) is
    /// stored at `index`.
    fn get_log(
        &self,
        index: u64,
    ) -> Result<Entry>;

    /// Persists one entry, replacing any entry already stored at its index.
    fn store_log(
        &self,
        entry: &Entry,
    ) -> Result<()>;

    /// Persists a batch of entries atomically: either every entry is
    /// durable or none was written.
    fn store_logs(
        &self,
        entries: &[Entry],
    ) -> Result<()>;

    /// Deletes every entry with index in `[min, max]` atomically. Ranges with
    /// no stored entries, including `min > max`, succeed without effect.
    fn delete_range(
        &self,
        min: u64,
        max: u64,
    ) -> Result<()>;
}

/// Small opaque key/value state kept outside the log (term, vote, ...).
pub trait MetaStore: Send + Sync + 'static {
    /// Overwrites silently.
    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()>;

    /// Fails with `Error::KeyNotFound` if the key is absent or its value is
    /// empty.
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>>;

    fn set_uint64(
        &self,
        key: &[u8],
        value: u64,
    ) -> Result<()> {
        self.set(key, &index_to_key(value))
    }

    fn get_uint64(
        &self,
        key: &[u8],
    ) -> Result<u64> {
        let value = self.get(key)?;
        key_to_index(value)
    }
}
