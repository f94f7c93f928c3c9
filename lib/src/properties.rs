use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{BenchError, Result};
use crate::workload::Mode;

fn default_store_path() -> PathBuf {
    PathBuf::from("test.db")
}

fn default_atomic_batch() -> bool {
    true
}

fn default_progress_interval() -> usize {
    100
}

fn default_recreate() -> bool {
    true
}

/// A table sharing the fixed `(id, a, b, c)` layout.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    /// Drop and recreate the table instead of creating it only when missing.
    #[serde(default = "default_recreate")]
    pub recreate: bool,
}

impl TableSpec {
    pub fn recreated(name: &str) -> Self {
        Self {
            name: name.to_string(),
            recreate: true,
        }
    }

    pub fn if_missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            recreate: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub label: String,
    pub table: String,
    pub mode: Mode,
    pub rows: usize,
}

impl WorkloadSpec {
    pub fn new(label: &str, table: &str, mode: Mode, rows: usize) -> Self {
        Self {
            label: label.to_string(),
            table: table.to_string(),
            mode,
            rows,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Properties {
    #[serde(default = "default_store_path", rename = "storepath")]
    pub store_path: PathBuf,

    /// Wrap prepared batches in one transaction instead of autocommitting
    /// each execution.
    #[serde(default = "default_atomic_batch", rename = "atomicbatch")]
    pub atomic_batch: bool,

    /// Log row-by-row progress every this many rows; zero disables it.
    #[serde(default = "default_progress_interval", rename = "progressinterval")]
    pub progress_interval: usize,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default, rename = "table")]
    pub tables: Vec<TableSpec>,

    #[serde(default, rename = "workload")]
    pub workloads: Vec<WorkloadSpec>,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            atomic_batch: default_atomic_batch(),
            progress_interval: default_progress_interval(),
            seed: None,
            tables: vec![
                TableSpec::recreated("t1"),
                TableSpec::recreated("t2"),
                TableSpec::if_missing("t3"),
            ],
            workloads: vec![
                WorkloadSpec::new("Normal Test 2", "t2", Mode::RowByRow, 24_000),
                WorkloadSpec::new("Prepared Test 2", "t2", Mode::Batched, 25_000),
                WorkloadSpec::new("Normal Test 3", "t3", Mode::RowByRow, 24_000),
                WorkloadSpec::new("Prepared Test 3", "t3", Mode::Batched, 25_000),
            ],
        }
    }
}

impl Properties {
    /// Parse a TOML properties file. Sections left out fall back to the
    /// default tables and workloads.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut props: Properties =
            toml::from_str(raw).map_err(|e| BenchError::Config(e.to_string()))?;
        let defaults = Properties::default();
        if props.tables.is_empty() {
            props.tables = defaults.tables;
        }
        if props.workloads.is_empty() {
            props.workloads = defaults.workloads;
        }
        props.validate()?;
        Ok(props)
    }

    pub fn validate(&self) -> Result<()> {
        let mut declared = HashSet::new();
        for table in &self.tables {
            if !is_identifier(&table.name) {
                return Err(BenchError::Config(format!(
                    "invalid table name {:?}",
                    table.name
                )));
            }
            if !declared.insert(table.name.as_str()) {
                return Err(BenchError::Config(format!(
                    "table {} declared twice",
                    table.name
                )));
            }
        }
        for wl in &self.workloads {
            if wl.label.trim().is_empty() {
                return Err(BenchError::Config("workload label is empty".into()));
            }
            if !declared.contains(wl.table.as_str()) {
                return Err(BenchError::Config(format!(
                    "workload {:?} uses undeclared table {}",
                    wl.label, wl.table
                )));
            }
        }
        Ok(())
    }
}

/// Table names are spliced into SQL text, so only plain identifiers pass.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
