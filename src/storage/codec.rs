//! Log entry serialization.
//!
//! The store never interprets payloads: it hands an [`Entry`] to an
//! [`EntryCodec`] and persists whatever bytes come back. [`BincodeCodec`] is
//! the default; any deterministic codec whose output decodes without external
//! schema can be plugged in instead.

use std::ops::Deref;
use std::ops::DerefMut;

use bincode::Options;
use parking_lot::Mutex;

use crate::CodecError;
use crate::Entry;

/// Leading byte of every record written by [`BincodeCodec`].
pub const ENTRY_FORMAT_V1: u8 = 1;

const DEFAULT_POOL_SIZE: usize = 16;
const DEFAULT_MAX_RETAINED_CAPACITY: usize = 1024 * 1024; // 1MB

pub trait EntryCodec: Send + Sync + 'static {
    /// Appends the encoded form of `entry` to `buf`.
    fn encode(
        &self,
        entry: &Entry,
        buf: &mut Vec<u8>,
    ) -> Result<(), CodecError>;

    /// Decodes one record. Must fail (never guess) on structurally invalid
    /// input.
    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<Entry, CodecError>;
}

/// Version-prefixed, fixed-int bincode records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
    }
}

impl EntryCodec for BincodeCodec {
    fn encode(
        &self,
        entry: &Entry,
        buf: &mut Vec<u8>,
    ) -> Result<(), CodecError> {
        buf.push(ENTRY_FORMAT_V1);
        Self::options().serialize_into(&mut *buf, entry)?;
        Ok(())
    }

    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<Entry, CodecError> {
        let (version, body) = bytes.split_first().ok_or(CodecError::Empty)?;
        if *version != ENTRY_FORMAT_V1 {
            return Err(CodecError::UnsupportedVersion(*version));
        }
        // Bounding reads by the body length stops a corrupt length prefix
        // from triggering a huge allocation.
        let entry = Self::options()
            .with_limit(body.len() as u64)
            .deserialize(body)?;
        Ok(entry)
    }
}

/// Reusable scratch buffers for encoding.
///
/// Buffers come back through [`PooledBuffer`]'s `Drop`. At most `max_pooled`
/// buffers are kept, and buffers that grew past `max_retained_capacity` are
/// released rather than pooled.
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_pooled: usize,
    max_retained_capacity: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_MAX_RETAINED_CAPACITY)
    }
}

impl BufferPool {
    pub fn new(
        max_pooled: usize,
        max_retained_capacity: usize,
    ) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_pooled)),
            max_pooled,
            max_retained_capacity,
        }
    }

    /// Takes an empty buffer from the pool, allocating if none is free.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.buffers.lock().pop().unwrap_or_default();
        PooledBuffer { buf, pool: self }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.buffers.lock().len()
    }

    fn release(
        &self,
        mut buf: Vec<u8>,
    ) {
        if buf.capacity() > self.max_retained_capacity {
            return;
        }
        buf.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < self.max_pooled {
            buffers.push(buf);
        }
    }
}

pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
