mod insert_workload;

use std::future::Future;

use serde::Deserialize;

pub use insert_workload::{run_batched, run_row_by_row, InsertWorkload};

use crate::db::DB;
use crate::error::Result;
use crate::generator::RowGenerator;

/// How a workload pushes its rows into the store.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One parameterized statement per row inside a single transaction.
    RowByRow,
    /// One prepared statement reused for every row.
    Batched,
}

pub trait Workload {
    fn label(&self) -> &str;
    fn run<T: DB>(&self, db: &T, rows: &mut RowGenerator) -> impl Future<Output = Result<()>>;
}
