use serde::Deserialize;
use serde::Serialize;

use config::ConfigError;

use crate::Result;

const MIN_SEGMENT_SIZE: usize = 256;
const MAX_SEGMENT_SIZE: usize = 1 << 24;

/// Write-path layout of the embedded engine
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Smaller files on disk, more compaction work
    LowSpace,
    /// Faster writes, more disk space
    #[default]
    HighThroughput,
}

impl From<EngineMode> for sled::Mode {
    fn from(mode: EngineMode) -> Self {
        match mode {
            EngineMode::LowSpace => sled::Mode::LowSpace,
            EngineMode::HighThroughput => sled::Mode::HighThroughput,
        }
    }
}

/// Tuning knobs handed to sled when the store is opened
///
/// Durability of acknowledged writes does not depend on these values: the
/// store flushes explicitly after every write.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineOptions {
    /// Page cache size in bytes
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Background flush interval of the engine itself. `None` disables it.
    #[serde(default = "default_flush_every_ms")]
    pub flush_every_ms: Option<u64>,

    /// zstd-compress pages on disk
    #[serde(default = "default_use_compression")]
    pub use_compression: bool,

    /// zstd level, 1..=22
    #[serde(default = "default_compression_factor")]
    pub compression_factor: i32,

    #[serde(default)]
    pub mode: EngineMode,

    /// On-disk segment size in bytes. Power of two in [256, 16MB].
    /// Must not change for an existing database.
    #[serde(default = "default_segment_size")]
    pub segment_size: usize,

    /// How long an open keeps retrying while the directory lock is still
    /// held by a just-closed handle in this process (unit: milliseconds).
    /// `0` fails on the first attempt.
    #[serde(default = "default_open_lock_timeout_ms")]
    pub open_lock_timeout_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            flush_every_ms: default_flush_every_ms(),
            use_compression: default_use_compression(),
            compression_factor: default_compression_factor(),
            mode: EngineMode::default(),
            segment_size: default_segment_size(),
            open_lock_timeout_ms: default_open_lock_timeout_ms(),
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Message("engine.cache_capacity must be greater than 0".into()).into());
        }

        if !(1..=22).contains(&self.compression_factor) {
            return Err(ConfigError::Message(format!(
                "engine.compression_factor must be within 1..=22, got {}",
                self.compression_factor
            ))
            .into());
        }

        if !self.segment_size.is_power_of_two()
            || !(MIN_SEGMENT_SIZE..=MAX_SEGMENT_SIZE).contains(&self.segment_size)
        {
            return Err(ConfigError::Message(format!(
                "engine.segment_size must be a power of two within [{MIN_SEGMENT_SIZE}, {MAX_SEGMENT_SIZE}], got {}",
                self.segment_size
            ))
            .into());
        }

        Ok(())
    }

    pub(crate) fn to_sled_config(&self) -> sled::Config {
        sled::Config::default()
            .cache_capacity(self.cache_capacity)
            .flush_every_ms(self.flush_every_ms)
            .use_compression(self.use_compression)
            .compression_factor(self.compression_factor)
            .mode(self.mode.into())
            .segment_size(self.segment_size)
    }
}

fn default_cache_capacity() -> u64 {
    256 * 1024 * 1024 //256MB
}
fn default_flush_every_ms() -> Option<u64> {
    Some(10)
}
fn default_use_compression() -> bool {
    true
}
fn default_compression_factor() -> i32 {
    1
}
fn default_segment_size() -> usize {
    16_777_216 // 16MB
}
fn default_open_lock_timeout_ms() -> u64 {
    5000
}
