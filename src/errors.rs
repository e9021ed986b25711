//! Raft Log Store Error Hierarchy
//!
//! Separates the recoverable "not found" outcomes a consensus driver expects
//! from integrity and engine failures it must treat as fatal to the call.

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No log entry is stored at the requested index
    #[error("Log entry not found at index {0}")]
    LogNotFound(u64),

    /// No metadata value is stored under the requested key
    #[error("Metadata key not found")]
    KeyNotFound,

    /// Embedded engine failures, passed through unchanged
    #[error(transparent)]
    Engine(#[from] sled::Error),

    /// Failures raised by this layer (codec, key layout, filesystem)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns true for the recoverable lookup misses
    /// (`LogNotFound`, `KeyNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::LogNotFound(_) | Error::KeyNotFound)
    }

    /// Returns true if a stored log key or record failed to decode.
    ///
    /// A wrong-width metadata value read through `get_uint64` is not
    /// corruption: metadata values are caller-defined and surface as
    /// `StorageError::Convert`.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::Storage(StorageError::CorruptRecord { .. })
                | Error::Storage(StorageError::CorruptKey { .. })
                | Error::Storage(StorageError::IndexMismatch { .. })
                | Error::Engine(sled::Error::Corruption { .. })
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures while preparing the store directory
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// I/O failure bound to a concrete path
    #[error("Error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A persisted log entry could not be decoded
    #[error("Corrupt log record at index {index}")]
    CorruptRecord {
        index: u64,
        #[source]
        source: CodecError,
    },

    /// A key in the log tree is not a valid index key
    #[error("Corrupt log key {key:02x?}")]
    CorruptKey {
        key: Vec<u8>,
        #[source]
        source: ConvertError,
    },

    /// A record decoded cleanly but belongs to a different index
    #[error("Log record stored at index {index} carries index {found}")]
    IndexMismatch { index: u64, found: u64 },

    /// A log entry could not be encoded
    #[error("Failed to encode log entry at index {index}")]
    Encode {
        index: u64,
        #[source]
        source: CodecError,
    },

    /// Error type for value conversion operations
    #[error("Value convert failed")]
    Convert(#[from] ConvertError),
}

/// Error type for entry codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Zero-length record
    #[error("empty record")]
    Empty,

    /// Leading format byte is not one this codec understands
    #[error("unsupported record format version: {0}")]
    UnsupportedVersion(u8),

    /// Serialization failures of the record body
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

/// Error type for value conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Invalid input length error
    ///
    /// This occurs when the input byte slice length doesn't match the required 8 bytes.
    #[error("invalid byte length: expected 8 bytes, received {0} bytes")]
    InvalidLength(usize),
}

impl From<ConvertError> for Error {
    fn from(e: ConvertError) -> Self {
        Error::Storage(StorageError::Convert(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}
