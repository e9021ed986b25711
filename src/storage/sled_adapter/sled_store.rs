//! Sled-backed Raft log and metadata store.
//!
//! One sled `Db` with two trees: `raft_log` keyed by big-endian index, and
//! `raft_meta` for opaque metadata. Keeping them in separate trees makes the
//! two keyspaces disjoint no matter what metadata keys callers choose.
//!
//! Every write is applied as a single atomic sled operation (an insert or a
//! `Batch`) and flushed before returning, so `Ok` means durable.

use std::fmt::Debug;
use std::path::Path;

use autometrics::autometrics;
use sled::Batch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::init_sled_store_db;
use super::RAFT_LOG_NAMESPACE;
use super::RAFT_META_NAMESPACE;
use crate::convert::index_to_key;
use crate::scan_boundary;
use crate::storage::index_scanner::log_key_to_index;
use crate::BincodeCodec;
use crate::BufferPool;
use crate::EngineOptions;
use crate::Entry;
use crate::EntryCodec;
use crate::Error;
use crate::LogStore;
use crate::MetaStore;
use crate::Result;
use crate::ScanEnd;
use crate::StorageError;
use crate::StoreConfig;
use crate::API_SLO;

pub struct SledStore<C: EntryCodec = BincodeCodec> {
    db: sled::Db,

    pub(crate) log_tree: sled::Tree,

    pub(crate) meta_tree: sled::Tree,

    codec: C,

    buffers: BufferPool,
}

impl SledStore<BincodeCodec> {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    /// `None` applies [`EngineOptions::default`].
    pub fn open(
        dir: impl AsRef<Path> + Debug,
        options: Option<EngineOptions>,
    ) -> Result<Self> {
        Self::open_with_codec(dir, options, BincodeCodec)
    }

    /// Opens the store described by an already validated [`StoreConfig`].
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(&config.data_dir, Some(config.engine.clone()))
    }
}

impl<C: EntryCodec> SledStore<C> {
    pub fn open_with_codec(
        dir: impl AsRef<Path> + Debug,
        options: Option<EngineOptions>,
        codec: C,
    ) -> Result<Self> {
        let options = options.unwrap_or_default();
        let db = init_sled_store_db(&dir, &options)?;
        let store = Self::with_db(db, codec)?;
        info!(?dir, log_len = store.len(), "opened raft log store");
        Ok(store)
    }

    /// Builds a store on top of an existing sled database. The store takes
    /// ownership of its own two trees only; other trees in `db` are untouched.
    pub fn with_db(
        db: sled::Db,
        codec: C,
    ) -> Result<Self> {
        let log_tree = db.open_tree(RAFT_LOG_NAMESPACE)?;
        let meta_tree = db.open_tree(RAFT_META_NAMESPACE)?;
        Ok(Self {
            db,
            log_tree,
            meta_tree,
            codec,
            buffers: BufferPool::default(),
        })
    }

    /// Flushes and closes the store. Consumes the handle, so nothing can be
    /// issued against it afterwards.
    ///
    /// Dropping the trees and the database here releases this handle's
    /// references to the engine. sled lets go of its directory lock once its
    /// background threads wind down; a reopen of the same directory in this
    /// process waits for that (see [`init_sled_store_db`]).
    pub fn close(self) -> Result<()> {
        self.flush()?;
        drop(self);
        debug!("raft log store closed");
        Ok(())
    }

    /// Synchronously flushes both trees to disk.
    pub fn flush(&self) -> Result<()> {
        trace!("SledStore flush");
        self.log_tree.flush()?;
        self.meta_tree.flush()?;
        Ok(())
    }

    /// Number of log entries currently stored.
    pub fn len(&self) -> usize {
        self.log_tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_tree.is_empty()
    }

    pub fn size_on_disk(&self) -> Result<u64> {
        Ok(self.db.size_on_disk()?)
    }

    fn decode_entry(
        &self,
        index: u64,
        bytes: &[u8],
    ) -> Result<Entry> {
        let entry = self.codec.decode(bytes).map_err(|source| {
            warn!(index, ?source, "failed to decode log record");
            StorageError::CorruptRecord { index, source }
        })?;

        if entry.index != index {
            warn!(index, found = entry.index, "log record stored under wrong key");
            return Err(StorageError::IndexMismatch {
                index,
                found: entry.index,
            }
            .into());
        }
        Ok(entry)
    }

    fn encode_entry(
        &self,
        entry: &Entry,
        buf: &mut Vec<u8>,
    ) -> Result<()> {
        buf.clear();
        self.codec.encode(entry, buf).map_err(|source| {
            error!(index = entry.index, ?source, "failed to encode log entry");
            StorageError::Encode {
                index: entry.index,
                source,
            }
            .into()
        })
    }
}

impl<C: EntryCodec> LogStore for SledStore<C> {
    #[autometrics(objective = API_SLO)]
    fn first_index(&self) -> Result<u64> {
        scan_boundary(self.log_tree.iter().keys(), ScanEnd::First)
    }

    #[autometrics(objective = API_SLO)]
    fn last_index(&self) -> Result<u64> {
        scan_boundary(self.log_tree.iter().keys(), ScanEnd::Last)
    }

    #[autometrics(objective = API_SLO)]
    fn get_log(
        &self,
        index: u64,
    ) -> Result<Entry> {
        match self.log_tree.get(index_to_key(index))? {
            Some(bytes) if !bytes.is_empty() => self.decode_entry(index, &bytes),
            _ => Err(Error::LogNotFound(index)),
        }
    }

    #[autometrics(objective = API_SLO)]
    fn store_log(
        &self,
        entry: &Entry,
    ) -> Result<()> {
        let mut buf = self.buffers.acquire();
        self.encode_entry(entry, &mut buf)?;

        self.log_tree.insert(index_to_key(entry.index), buf.as_slice())?;
        self.log_tree.flush()?;

        trace!(index = entry.index, term = entry.term, "stored log entry");
        Ok(())
    }

    #[autometrics(objective = API_SLO)]
    fn store_logs(
        &self,
        entries: &[Entry],
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // Encode everything before touching the tree so that an encode
        // failure leaves the log unchanged.
        let mut batch = Batch::default();
        let mut buf = self.buffers.acquire();
        for entry in entries {
            self.encode_entry(entry, &mut buf)?;
            batch.insert(&index_to_key(entry.index)[..], buf.as_slice());
        }

        self.log_tree.apply_batch(batch)?;
        self.log_tree.flush()?;

        trace!(
            "store_logs len = {}, first = {}, last = {}",
            entries.len(),
            entries[0].index,
            entries[entries.len() - 1].index
        );
        Ok(())
    }

    #[autometrics(objective = API_SLO)]
    fn delete_range(
        &self,
        min: u64,
        max: u64,
    ) -> Result<()> {
        if min > max {
            return Ok(());
        }

        let mut batch = Batch::default();
        let mut removed = 0usize;
        for key in self.log_tree.range(index_to_key(min)..).keys() {
            let key = key?;
            if log_key_to_index(&key)? > max {
                break;
            }
            batch.remove(key);
            removed += 1;
        }

        if removed == 0 {
            trace!(min, max, "delete_range matched no entries");
            return Ok(());
        }

        self.log_tree.apply_batch(batch)?;
        self.log_tree.flush()?;

        debug!(min, max, removed, "deleted log range");
        Ok(())
    }
}

impl<C: EntryCodec> MetaStore for SledStore<C> {
    #[autometrics(objective = API_SLO)]
    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()> {
        self.meta_tree.insert(key, value)?;
        self.meta_tree.flush()?;
        Ok(())
    }

    #[autometrics(objective = API_SLO)]
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>> {
        match self.meta_tree.get(key)? {
            Some(value) if !value.is_empty() => Ok(value.to_vec()),
            _ => Err(Error::KeyNotFound),
        }
    }
}

impl<C: EntryCodec> Debug for SledStore<C> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("log_len", &self.log_tree.len())
            .field("meta_len", &self.meta_tree.len())
            .finish()
    }
}

impl<C: EntryCodec> Drop for SledStore<C> {
    fn drop(&mut self) {
        match self.flush() {
            Ok(_) => trace!("Successfully flush SledStore"),
            Err(e) => error!(?e, "Failed to flush SledStore"),
        }
    }
}
