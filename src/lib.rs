//! Durable Raft log and metadata store on top of sled.
//!
//! [`SledStore`] implements both consumer interfaces of a consensus driver:
//! [`LogStore`] for replicated log entries keyed by index and [`MetaStore`]
//! for small opaque state such as the current term or vote.
//!
//! ```no_run
//! use raft_sled_store::{Entry, LogStore, MetaStore, SledStore};
//!
//! # fn main() -> raft_sled_store::Result<()> {
//! let store = SledStore::open("/var/lib/raft", None)?;
//! store.store_logs(&[Entry::new(1, 1, b"a".to_vec()), Entry::new(2, 1, b"b".to_vec())])?;
//! store.set_uint64(b"CurrentTerm", 1)?;
//!
//! assert_eq!(store.last_index()?, 2);
//! store.delete_range(1, 1)?;
//! assert_eq!(store.first_index()?, 2);
//! store.close()
//! # }
//! ```

mod config;
mod errors;
mod metrics;
mod storage;
mod utils;

pub use self::config::*;
pub use errors::*;
pub use metrics::*;
pub use storage::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
//-----------------------------------------------------------
// Autometrics
/// autometrics: https://docs.autometrics.dev/rust/adding-alerts-and-slos
use autometrics::objectives::Objective;
use autometrics::objectives::ObjectiveLatency;
use autometrics::objectives::ObjectivePercentile;
const API_SLO: Objective = Objective::new("raft_log_store")
    .success_rate(ObjectivePercentile::P99_9)
    .latency(ObjectiveLatency::Ms10, ObjectivePercentile::P99);
