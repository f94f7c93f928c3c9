use std::future::Future;

use log::{info, warn};

use super::{Mode, Workload};
use crate::db::{Batch, DB};
use crate::error::{BenchError, Result};
use crate::generator::RowGenerator;
use crate::properties::{Properties, WorkloadSpec};
use crate::schema::insert_sql;

/// A named bulk insert into one table.
#[derive(Debug, Clone)]
pub struct InsertWorkload {
    pub spec: WorkloadSpec,
    pub atomic_batch: bool,
    pub progress_interval: usize,
}

impl InsertWorkload {
    pub fn new(spec: WorkloadSpec, props: &Properties) -> Self {
        Self {
            spec,
            atomic_batch: props.atomic_batch,
            progress_interval: props.progress_interval,
        }
    }

    pub fn from_properties(props: &Properties) -> Vec<Self> {
        props
            .workloads
            .iter()
            .map(|spec| InsertWorkload::new(spec.clone(), props))
            .collect()
    }
}

impl Workload for InsertWorkload {
    fn label(&self) -> &str {
        &self.spec.label
    }

    async fn run<T: DB>(&self, db: &T, rows: &mut RowGenerator) -> Result<()> {
        let spec = &self.spec;
        info!("{}: {} rows into {}", spec.label, spec.rows, spec.table);
        match spec.mode {
            Mode::RowByRow => {
                run_row_by_row(db, rows, &spec.table, spec.rows, self.progress_interval).await?
            }
            Mode::Batched => {
                run_batched(db, rows, &spec.table, spec.rows, self.atomic_batch).await?
            }
        };
        Ok(())
    }
}

/// Commit `work` as one unit; on any failure roll back and return the
/// original error.
async fn in_transaction<T, F, R>(db: &T, work: F) -> Result<R>
where
    T: DB,
    F: Future<Output = Result<R>>,
{
    db.begin()
        .await
        .map_err(|e| BenchError::statement("BEGIN", e))?;
    let outcome = match work.await {
        Ok(v) => db
            .commit()
            .await
            .map(|_| v)
            .map_err(|e| BenchError::statement("COMMIT", e)),
        Err(e) => Err(e),
    };
    if outcome.is_err() {
        if let Err(e) = db.rollback().await {
            warn!("rollback failed: {}", e);
        }
    }
    outcome
}

/// Insert `count` rows into `table`, one statement each, inside a single
/// transaction. Returns the number of inserted rows.
pub async fn run_row_by_row<T: DB>(
    db: &T,
    rows: &mut RowGenerator,
    table: &str,
    count: usize,
    progress_interval: usize,
) -> Result<usize> {
    let sql = insert_sql(table)?;
    let sql = &sql;
    in_transaction(db, async {
        for i in 0..count {
            let row = rows.row(i);
            db.execute(sql, row.params())
                .await
                .map_err(|e| BenchError::statement(sql, e))?;
            if progress_interval > 0 && i % progress_interval == 0 {
                info!("{}: i = {}", table, i);
            }
        }
        Ok(count)
    })
    .await
}

/// Generate all `count` rows up front and push them through one prepared
/// statement. With `atomic` set the whole batch commits or rolls back as a
/// unit; otherwise every execution autocommits.
pub async fn run_batched<T: DB>(
    db: &T,
    rows: &mut RowGenerator,
    table: &str,
    count: usize,
    atomic: bool,
) -> Result<usize> {
    let mut batch = Batch::new(insert_sql(table)?);
    for i in 0..count {
        batch.push(rows.row(i).params());
    }
    if batch.is_empty() {
        return Ok(0);
    }

    let sql = batch.sql.clone();
    let execute = async {
        db.execute_prepared(batch)
            .await
            .map_err(|e| BenchError::statement(&sql, e))
    };
    if atomic {
        in_transaction(db, execute).await
    } else {
        execute.await
    }
}
