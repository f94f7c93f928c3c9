//! SQLite store for the insert bench.
//!
//! The connection lives behind a mutex and every call runs on tokio's
//! blocking pool, so the harness suspends on each store round trip the same
//! way it would with a remote client.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use insert_bench::db::{Batch, CheckpointStats, StoreError, StoreResult, Value, DB};
use itertools::Itertools;
use log::debug;
use rusqlite::{params_from_iter, types, Connection};

/// Apply the connection settings every bench store runs with.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<String> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
}

fn to_sql_params(params: Vec<Value>) -> Vec<types::Value> {
    params
        .into_iter()
        .map(|v| match v {
            Value::Integer(i) => types::Value::Integer(i),
            Value::Text(s) => types::Value::Text(s),
        })
        .collect_vec()
}

#[derive(Clone)]
pub struct SQLite {
    conn: Arc<Mutex<Connection>>,
}

impl SQLite {
    pub fn new(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let mode = configure_connection(&conn)?;
        debug!("opened {} (journal_mode={})", path.display(), mode);
        Ok(SQLite {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<R> {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::from("sqlite connection lock poisoned"))?;
            Ok(f(&mut conn)?)
        })
        .await?
    }
}

#[async_trait]
impl DB for SQLite {
    async fn open(path: &Path) -> StoreResult<Self> {
        let path = path.to_path_buf();
        let db = tokio::task::spawn_blocking(move || SQLite::new(&path)).await??;
        Ok(db)
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> StoreResult<usize> {
        let sql = sql.to_string();
        self.with_conn(move |conn| conn.execute(&sql, params_from_iter(to_sql_params(params))))
            .await
    }

    async fn begin(&self) -> StoreResult<()> {
        self.with_conn(|conn| conn.execute_batch("BEGIN")).await
    }

    async fn commit(&self) -> StoreResult<()> {
        self.with_conn(|conn| conn.execute_batch("COMMIT")).await
    }

    async fn rollback(&self) -> StoreResult<()> {
        self.with_conn(|conn| conn.execute_batch("ROLLBACK")).await
    }

    async fn execute_prepared(&self, batch: Batch) -> StoreResult<usize> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&batch.sql)?;
            let mut changed = 0;
            for params in batch.params {
                changed += stmt.execute(params_from_iter(to_sql_params(params)))?;
            }
            stmt.finalize()?;
            Ok(changed)
        })
        .await
    }

    async fn checkpoint(&self) -> StoreResult<CheckpointStats> {
        self.with_conn(|conn| {
            conn.query_row("PRAGMA wal_checkpoint(RESTART)", [], |row| {
                Ok(CheckpointStats {
                    busy: row.get(0)?,
                    log_frames: row.get(1)?,
                    checkpointed_frames: row.get(2)?,
                })
            })
        })
        .await
    }
}
