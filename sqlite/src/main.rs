use std::io::Write;

use anyhow::Result;
use env_logger::{Env, Target};
use sqlite::SQLite;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    insert_bench::bench_main::<SQLite>().await
}
