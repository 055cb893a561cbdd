//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open, configure and close the single SQLite connection.
//! - Own the `clientes` table definition and its existence checks.
//!
//! # Invariants
//! - One connection is opened per unit of work and released exactly once.
//! - Client reads/writes happen only after `schema::ensure_clients_table`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{close_db, default_db_path, open_db, open_db_in_memory, DEFAULT_DB_FILE_NAME};
pub use schema::SchemaStatus;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    Close(rusqlite::Error),
    InvalidData(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
            Self::Close(err) => write!(f, "failed to close database: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Close(err) => Some(err),
            Self::MissingRequiredColumn { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
