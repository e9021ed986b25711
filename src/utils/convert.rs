//! Fixed-width, order-preserving conversion between log indices and keys.
//!
//! Big-endian layout makes byte-lexicographic order of keys identical to the
//! numeric order of indices, which the sled log tree relies on for
//! first/last scans and range deletes.

use crate::ConvertError;
use crate::Result;

/// Width in bytes of an encoded index key (and of an encoded u64 value).
pub const INDEX_KEY_LEN: usize = 8;

/// Converts a `u64` to an 8-byte array in big-endian byte order.
///
/// # Examples
/// ```
/// use raft_sled_store::convert::index_to_key;
///
/// let bytes = index_to_key(0x1234_5678_9ABC_DEF0);
/// assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]);
/// ```
pub const fn index_to_key(index: u64) -> [u8; INDEX_KEY_LEN] {
    index.to_be_bytes()
}

/// Inverse of [`index_to_key`]. Fails on anything that is not exactly
/// [`INDEX_KEY_LEN`] bytes wide.
pub fn key_to_index<K: AsRef<[u8]>>(key: K) -> Result<u64> {
    let bytes = key.as_ref();
    let array: [u8; INDEX_KEY_LEN] = bytes
        .try_into()
        .map_err(|_| ConvertError::InvalidLength(bytes.len()))?;
    Ok(u64::from_be_bytes(array))
}
