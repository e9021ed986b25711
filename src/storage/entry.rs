use serde::Deserialize;
use serde::Serialize;

/// Kind of a replicated log entry. Opaque to the store; persisted so the
/// consensus layer can tell commands from membership changes after restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntryKind {
    /// Client command applied to the state machine
    #[default]
    Normal,
    /// Cluster membership configuration
    Configuration,
    /// Leader no-op appended at the start of a term
    Noop,
}

/// A replicated log entry as persisted under its index key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub index: u64,
    pub term: u64,
    pub kind: EntryKind,
    pub payload: Vec<u8>,
}

impl Entry {
    pub fn new(
        index: u64,
        term: u64,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            term,
            kind: EntryKind::Normal,
            payload: payload.into(),
        }
    }

    pub fn noop(
        index: u64,
        term: u64,
    ) -> Self {
        Self {
            index,
            term,
            kind: EntryKind::Noop,
            payload: Vec::new(),
        }
    }

    pub fn configuration(
        index: u64,
        term: u64,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            term,
            kind: EntryKind::Configuration,
            payload: payload.into(),
        }
    }
}
