//! DDL for the fixed `(id, a, b, c)` bench tables.

use log::debug;
use sql_builder::SqlBuilder;

use crate::db::DB;
use crate::error::{BenchError, Result};
use crate::properties::TableSpec;

pub const COLUMNS: &str = "id INTEGER PRIMARY KEY, a INTEGER, b INTEGER, c TEXT";

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", table)
}

pub fn create_table_sql(spec: &TableSpec) -> String {
    let guard = if spec.recreate { "" } else { "IF NOT EXISTS " };
    format!("CREATE TABLE {}{}({})", guard, spec.name, COLUMNS)
}

pub fn insert_sql(table: &str) -> Result<String> {
    SqlBuilder::insert_into(table)
        .fields(&["a", "b", "c"])
        .values(&["?", "?", "?"])
        .sql()
        .map_err(|e| BenchError::statement(table, e.to_string().into()))
}

/// Bring every table to its starting state. Tables marked `recreate` end up
/// empty; the others keep whatever rows earlier runs left.
pub async fn prepare_schema<T: DB>(db: &T, tables: &[TableSpec]) -> Result<()> {
    for spec in tables {
        let mut statements = Vec::with_capacity(2);
        if spec.recreate {
            statements.push(drop_table_sql(&spec.name));
        }
        statements.push(create_table_sql(spec));

        for sql in statements {
            debug!("{}", sql);
            db.execute(&sql, Vec::new())
                .await
                .map_err(|source| BenchError::Schema {
                    table: spec.name.clone(),
                    source,
                })?;
        }
    }
    Ok(())
}
