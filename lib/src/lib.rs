use crate::db::{CheckpointStats, DB};
use crate::error::{BenchError, Result};
use crate::generator::RowGenerator;
use crate::schema::prepare_schema;
use crate::timing::{timed, Timing};
use crate::workload::{InsertWorkload, Workload};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

use properties::Properties;
use structopt::StructOpt;

pub mod db;
pub mod error;
pub mod generator;
pub mod properties;
pub mod schema;
pub mod timing;
pub mod workload;

#[cfg(test)]
mod testing;

#[derive(StructOpt, Debug)]
#[structopt(name = "insert-bench")]
struct Opt {
    /// TOML properties file; the built-in tables and workloads are used when
    /// omitted.
    #[structopt(short, long)]
    workload: Option<String>,
    /// Store file, overriding `storepath`.
    #[structopt(short, long, parse(from_os_str))]
    db: Option<PathBuf>,
    /// Seed for row generation, overriding `seed`.
    #[structopt(short, long)]
    seed: Option<u64>,
}

fn load_properties(opt: &Opt) -> anyhow::Result<Properties> {
    let mut props = match &opt.workload {
        Some(path) => {
            let raw_props = fs::read_to_string(path)?;
            Properties::from_toml(&raw_props)?
        }
        None => Properties::default(),
    };
    if let Some(db) = &opt.db {
        props.store_path = db.clone();
    }
    if opt.seed.is_some() {
        props.seed = opt.seed;
    }
    Ok(props)
}

/// Open the store at `path`, creating it when missing.
pub async fn initialize<T: DB>(path: &Path) -> Result<T> {
    info!("opening {}", path.display());
    T::open(path).await.map_err(|source| BenchError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Fold the write-ahead log into the main database file and restart it.
pub async fn checkpoint<T: DB>(db: &T) -> Result<CheckpointStats> {
    let stats = db
        .checkpoint()
        .await
        .map_err(|source| BenchError::Checkpoint { source })?;
    if stats.busy != 0 {
        return Err(BenchError::CheckpointBusy {
            log_frames: stats.log_frames,
            checkpointed_frames: stats.checkpointed_frames,
        });
    }
    debug!(
        "checkpoint: {} frames in log, {} checkpointed",
        stats.log_frames, stats.checkpointed_frames
    );
    Ok(stats)
}

/// Prepare the schema, then run every configured workload in order. Each
/// workload's timing covers its inserts and the checkpoint that follows
/// them. The first failure ends the run.
pub async fn bench_run<T: DB>(
    db: &T,
    props: &Properties,
    rows: &mut RowGenerator,
) -> Result<Vec<Timing>> {
    props.validate()?;
    info!("Starting bench");

    prepare_schema(db, &props.tables).await?;

    let workloads = InsertWorkload::from_properties(props);
    let mut timings = Vec::with_capacity(workloads.len());
    for wl in &workloads {
        let timing = timed(wl.label(), async {
            wl.run(db, rows).await?;
            checkpoint(db).await?;
            Ok(())
        })
        .await?;
        timings.push(timing);
    }

    info!("Finishing bench");
    Ok(timings)
}

/// Start a run on a background task. The caller decides whether to wait for
/// it; nothing in the run depends on the caller's progress.
pub fn spawn_bench<T: DB + 'static>(
    props: Properties,
    mut rows: RowGenerator,
) -> JoinHandle<Result<Vec<Timing>>> {
    tokio::spawn(async move {
        let db: T = initialize(&props.store_path).await?;
        bench_run(&db, &props, &mut rows).await
    })
}

pub async fn bench_main<T: DB + 'static>() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let props = load_properties(&opt)?;

    let rows = RowGenerator::new(props.seed);

    let timings = spawn_bench::<T>(props, rows).await??;
    info!("DONE");

    for timing in timings {
        println!("[{}], RunTime(ms), {}", timing.label, timing.millis());
    }

    Ok(())
}
