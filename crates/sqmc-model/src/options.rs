//! Query options and follow-on callback, threaded through translation untouched

use serde::{Deserialize, Serialize};

/// Requested lock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockMode {
    #[default]
    None,
    Read,
    Write,
    PessimisticWrite,
    UpgradeNoWait,
}

/// Execution hints for a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub fetch_size: Option<u32>,
    pub timeout_secs: Option<u32>,
    pub lock_mode: LockMode,
    /// SQL comment requested by the caller
    pub comment: Option<String>,
    pub read_only: bool,
}

pub static DEFAULT_QUERY_OPTIONS: QueryOptions = QueryOptions {
    fetch_size: None,
    timeout_secs: None,
    lock_mode: LockMode::None,
    comment: None,
    read_only: false,
};

/// Receiver for follow-on work (locking, fetching) discovered while
/// translating. A select translation only hands it along.
pub trait Callback {
    fn register_after_load_action(&self, _entity_name: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl Callback for NoopCallback {}
