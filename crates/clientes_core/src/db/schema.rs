//! `clientes` table definition and idempotent creation.
//!
//! # Invariants
//! - DDL runs only when `sqlite_master` has no `clientes` table.
//! - An existing table must expose every column the repository reads.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

pub const CLIENTS_TABLE: &str = "clientes";

const REQUIRED_COLUMNS: &[&str] = &["id", "nome", "email"];

const CREATE_CLIENTS_SQL: &str = "CREATE TABLE clientes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome VARCHAR(100),
    email VARCHAR(50)
);";

/// Outcome of an idempotent schema check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The table was missing and has been created.
    Created,
    /// The table was already present; no DDL was executed.
    AlreadyExists,
}

/// Creates the `clientes` table when it does not exist yet.
///
/// The DDL runs in its own transaction so a failure leaves no partial schema.
pub fn ensure_clients_table(conn: &Connection) -> DbResult<SchemaStatus> {
    if table_exists(conn, CLIENTS_TABLE)? {
        ensure_required_columns(conn)?;
        info!("event=schema_ensure module=db status=ok table={CLIENTS_TABLE} outcome=already_exists");
        return Ok(SchemaStatus::AlreadyExists);
    }

    let tx = rusqlite::Transaction::new_unchecked(conn, rusqlite::TransactionBehavior::Immediate)?;
    tx.execute_batch(CREATE_CLIENTS_SQL)?;
    tx.commit()?;

    info!("event=schema_ensure module=db status=ok table={CLIENTS_TABLE} outcome=created");
    Ok(SchemaStatus::Created)
}

/// Returns whether a table named `table_name` exists.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_required_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CLIENTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &required in REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(DbError::MissingRequiredColumn {
                table: CLIENTS_TABLE,
                column: required,
            });
        }
    }

    Ok(())
}
