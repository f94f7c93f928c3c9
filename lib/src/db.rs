use std::fmt;
use std::path::Path;

use async_trait::async_trait;

/// Error reported by a store implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "'{}'", v),
        }
    }
}

/// One SQL template executed once per parameter tuple.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub sql: String,
    pub params: Vec<Vec<Value>>,
}

impl Batch {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, params: Vec<Value>) {
        self.params.push(params);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Result row of `PRAGMA wal_checkpoint(RESTART)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckpointStats {
    /// Non-zero when the checkpoint could not run to completion.
    pub busy: i64,
    /// Frames in the write-ahead log, -1 outside WAL mode.
    pub log_frames: i64,
    pub checkpointed_frames: i64,
}

/// A transactional SQL store driven by the harness.
///
/// Calls are issued strictly one at a time; implementations never see two
/// in-flight operations from the same harness.
#[async_trait]
pub trait DB: Send + Sync {
    /// Open the store at `path`, creating the file when it is missing.
    async fn open(path: &Path) -> StoreResult<Self>
    where
        Self: Sized;

    /// Run one statement, re-parsing it on every call. Returns the number of
    /// changed rows.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> StoreResult<usize>;

    async fn begin(&self) -> StoreResult<()>;
    async fn commit(&self) -> StoreResult<()>;
    async fn rollback(&self) -> StoreResult<()>;

    /// Prepare `batch.sql` once, execute it for every parameter tuple, then
    /// finalize the statement.
    async fn execute_prepared(&self, batch: Batch) -> StoreResult<usize>;

    /// Fold the write-ahead log back into the main database file.
    async fn checkpoint(&self) -> StoreResult<CheckpointStats>;
}
