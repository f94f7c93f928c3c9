use std::path::PathBuf;

use thiserror::Error;

use crate::db::StoreError;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to open store at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("schema statement rejected for table {table}")]
    Schema {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("statement failed: {sql}")]
    Statement {
        sql: String,
        #[source]
        source: StoreError,
    },

    #[error("wal checkpoint failed")]
    Checkpoint {
        #[source]
        source: StoreError,
    },

    /// The store answered the checkpoint but could not complete it.
    #[error("wal checkpoint did not complete ({log_frames} frames in log, {checkpointed_frames} checkpointed)")]
    CheckpointBusy {
        log_frames: i64,
        checkpointed_frames: i64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BenchError {
    pub(crate) fn statement(sql: &str, source: StoreError) -> Self {
        BenchError::Statement {
            sql: sql.to_string(),
            source,
        }
    }
}
