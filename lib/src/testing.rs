//! In-memory `DB` used by the unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::db::{Batch, CheckpointStats, StoreResult, Value, DB};

type Tables = HashMap<String, Vec<Vec<Value>>>;

#[derive(Default)]
struct State {
    tables: Tables,
    snapshot: Option<Tables>,
    log: Vec<String>,
    fail_on: Option<String>,
    fail_at_insert: Option<usize>,
    inserts: usize,
    checkpoint: Option<StoreResult<CheckpointStats>>,
}

#[derive(Default)]
pub struct FakeDB {
    state: Mutex<State>,
}

impl FakeDB {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Reject every statement containing `needle`.
    pub fn fail_on(&self, needle: &str) {
        self.state().fail_on = Some(needle.to_string());
    }

    /// Reject the `n`-th insert (1-based) counted from now.
    pub fn fail_at_insert(&self, n: usize) {
        let mut state = self.state();
        state.inserts = 0;
        state.fail_at_insert = Some(n);
    }

    pub fn set_checkpoint(&self, result: StoreResult<CheckpointStats>) {
        self.state().checkpoint = Some(result);
    }

    /// Every statement except inserts, in issue order.
    pub fn log(&self) -> Vec<String> {
        self.state().log.clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Vec<Value>> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    /// Column `a` of every row in `table`.
    pub fn a_values(&self, table: &str) -> Vec<i64> {
        self.rows(table)
            .iter()
            .map(|row| match row.first() {
                Some(Value::Integer(a)) => *a,
                other => panic!("unexpected a column: {:?}", other),
            })
            .collect()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.state().tables.contains_key(table)
    }

    pub fn in_transaction(&self) -> bool {
        self.state().snapshot.is_some()
    }

    pub fn insert_raw(&self, table: &str, count: usize) {
        let mut state = self.state();
        let rows = state.tables.entry(table.to_string()).or_default();
        for i in 0..count {
            rows.push(vec![
                Value::Integer(i as i64 + 1),
                Value::Integer(0),
                Value::Text("zero".into()),
            ]);
        }
    }
}

impl State {
    fn check(&self, sql: &str) -> StoreResult<()> {
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(format!("injected failure: {}", sql).into())
            }
            _ => Ok(()),
        }
    }

    fn run(&mut self, sql: &str, params: Vec<Value>) -> StoreResult<usize> {
        self.check(sql)?;
        if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            return self.insert(table_name(rest), params);
        }
        self.log.push(sql.to_string());
        if let Some(rest) = sql.strip_prefix("DROP TABLE IF EXISTS ") {
            self.tables.remove(table_name(rest));
        } else if let Some(rest) = sql.strip_prefix("CREATE TABLE IF NOT EXISTS ") {
            self.tables.entry(table_name(rest).to_string()).or_default();
        } else if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let name = table_name(rest);
            if self.tables.contains_key(name) {
                return Err(format!("table {} already exists", name).into());
            }
            self.tables.insert(name.to_string(), Vec::new());
        } else {
            return Err(format!("unsupported statement: {}", sql).into());
        }
        Ok(0)
    }

    fn insert(&mut self, table: &str, params: Vec<Value>) -> StoreResult<usize> {
        self.inserts += 1;
        if self.fail_at_insert == Some(self.inserts) {
            let shown: Vec<String> = params.iter().map(Value::to_string).collect();
            return Err(format!("constraint failed for ({})", shown.join(", ")).into());
        }
        match self.tables.get_mut(table) {
            Some(rows) => {
                rows.push(params);
                Ok(1)
            }
            None => Err(format!("no such table: {}", table).into()),
        }
    }
}

fn table_name(rest: &str) -> &str {
    rest.split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(rest)
}

#[async_trait]
impl DB for FakeDB {
    async fn open(path: &Path) -> StoreResult<Self> {
        match path.file_name() {
            Some(_) => Ok(FakeDB::new()),
            None => Err(format!("cannot open {}", path.display()).into()),
        }
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> StoreResult<usize> {
        self.state().run(sql, params)
    }

    async fn begin(&self) -> StoreResult<()> {
        let mut state = self.state();
        state.check("BEGIN")?;
        if state.snapshot.is_some() {
            return Err("cannot start a transaction within a transaction".into());
        }
        state.snapshot = Some(state.tables.clone());
        state.log.push("BEGIN".into());
        Ok(())
    }

    async fn commit(&self) -> StoreResult<()> {
        let mut state = self.state();
        state.check("COMMIT")?;
        state.snapshot.take().ok_or("no transaction is active")?;
        state.log.push("COMMIT".into());
        Ok(())
    }

    async fn rollback(&self) -> StoreResult<()> {
        let mut state = self.state();
        let snapshot = state.snapshot.take().ok_or("no transaction is active")?;
        state.tables = snapshot;
        state.log.push("ROLLBACK".into());
        Ok(())
    }

    async fn execute_prepared(&self, batch: Batch) -> StoreResult<usize> {
        let mut state = self.state();
        state.check(&batch.sql)?;
        state.log.push(format!("PREPARE {}", batch.sql));
        let mut changed = 0;
        for params in batch.params {
            changed += state.run(&batch.sql, params)?;
        }
        state.log.push("FINALIZE".into());
        Ok(changed)
    }

    async fn checkpoint(&self) -> StoreResult<CheckpointStats> {
        let mut state = self.state();
        state.log.push("CHECKPOINT".into());
        state
            .checkpoint
            .take()
            .unwrap_or(Ok(CheckpointStats::default()))
    }
}
