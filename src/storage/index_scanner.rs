//! Log boundary discovery.
//!
//! First/last index lookups pull exactly one key from an ordered key
//! iterator. They must never walk the log.

use tracing::warn;

use crate::convert::key_to_index;
use crate::Result;
use crate::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    First,
    Last,
}

/// Decodes the key at one end of `keys`, or returns `0` if there are none.
///
/// Takes a single step (`next` or `next_back`) regardless of how many keys
/// the iterator could produce.
pub fn scan_boundary<I, K, E>(
    mut keys: I,
    end: ScanEnd,
) -> Result<u64>
where
    I: DoubleEndedIterator<Item = std::result::Result<K, E>>,
    K: AsRef<[u8]>,
    crate::Error: From<E>,
{
    let key = match end {
        ScanEnd::First => keys.next(),
        ScanEnd::Last => keys.next_back(),
    };

    match key {
        None => Ok(0),
        Some(key) => {
            let key = key?;
            log_key_to_index(key.as_ref()).inspect_err(|e| {
                warn!(?end, ?e, "Invalid key format in log tree");
            })
        }
    }
}

/// Decodes a key read back from the log tree. A key of the wrong width can
/// only come from damaged storage, so it is reported as `CorruptKey`.
pub(crate) fn log_key_to_index(key: &[u8]) -> Result<u64> {
    key_to_index(key).map_err(|e| match e {
        crate::Error::Storage(StorageError::Convert(source)) => StorageError::CorruptKey {
            key: key.to_vec(),
            source,
        }
        .into(),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::convert::index_to_key;
    use crate::Error;

    /// Counts every item pulled from the inner iterator.
    struct CountingIter<'a, I> {
        inner: I,
        pulls: &'a Cell<usize>,
    }

    impl<I: Iterator> Iterator for CountingIter<'_, I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<I::Item> {
            self.pulls.set(self.pulls.get() + 1);
            self.inner.next()
        }
    }

    impl<I: DoubleEndedIterator> DoubleEndedIterator for CountingIter<'_, I> {
        fn next_back(&mut self) -> Option<I::Item> {
            self.pulls.set(self.pulls.get() + 1);
            self.inner.next_back()
        }
    }

    #[test]
    fn test_scan_boundary_takes_a_single_step() {
        let all: Vec<[u8; 8]> = (1..=100_000).map(index_to_key).collect();

        for (end, expected) in [(ScanEnd::First, 1), (ScanEnd::Last, 100_000)] {
            let pulls = Cell::new(0);
            let iter = CountingIter {
                inner: all.iter().map(|k| Ok::<_, Error>(*k)),
                pulls: &pulls,
            };
            assert_eq!(scan_boundary(iter, end).unwrap(), expected);
            assert_eq!(pulls.get(), 1, "{end:?} scan pulled more than one key");
        }
    }

    #[test]
    fn test_scan_boundary_empty_returns_zero() {
        let empty = || std::iter::empty::<std::result::Result<[u8; 8], Error>>();
        assert_eq!(scan_boundary(empty(), ScanEnd::First).unwrap(), 0);
        assert_eq!(scan_boundary(empty(), ScanEnd::Last).unwrap(), 0);
    }

    #[test]
    fn test_scan_boundary_propagates_iterator_error() {
        let items: Vec<std::result::Result<[u8; 8], Error>> = vec![Err(Error::KeyNotFound)];
        assert!(matches!(
            scan_boundary(items.into_iter(), ScanEnd::First),
            Err(Error::KeyNotFound)
        ));
    }

    #[test]
    fn test_scan_boundary_rejects_malformed_key() {
        let items: Vec<std::result::Result<Vec<u8>, Error>> = vec![Ok(vec![1, 2, 3])];
        let err = scan_boundary(items.into_iter(), ScanEnd::Last).unwrap_err();
        assert!(err.is_corruption());
        match err {
            Error::Storage(StorageError::CorruptKey { key, source }) => {
                assert_eq!(key, vec![1, 2, 3]);
                assert!(matches!(source, crate::ConvertError::InvalidLength(3)));
            }
            other => panic!("expected CorruptKey, got {other:?}"),
        }
    }
}
