//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface over the `clientes` table.
//! - Translate SQLite failures into the closed `RepoError` set.
//!
//! # Invariants
//! - Id-addressed operations validate the id before any SQL runs.
//! - Every write runs inside a transaction that commits or rolls back whole.
//! - `fetch_all` returns rows in id (insertion) order.
//! - Rows with NULL `nome`/`email` are reported as invalid data, never
//!   read back as empty strings.

use crate::db::schema::{ensure_clients_table, SchemaStatus};
use crate::db::DbError;
use crate::model::client::{
    validate_client_id, Client, ClientId, ClientValidationError, NewClient,
};
use log::{debug, info, warn};
use rusqlite::{params, Connection, ErrorCode, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT id, nome, email FROM clientes";
const CLIENT_INSERT_SQL: &str = "INSERT INTO clientes (nome, email) VALUES (?1, ?2);";

pub type RepoResult<T> = Result<T, RepoError>;

/// Closed set of failures reported by client repository operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound(ClientId),
    InvalidInput(ClientValidationError),
    ConstraintViolation(rusqlite::Error),
    StorageUnavailable(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::InvalidInput(err) => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::StorageUnavailable(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::ConstraintViolation(value);
        }
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

/// Repository interface for client CRUD operations.
pub trait ClientRepository {
    /// Creates the `clientes` table unless it already exists.
    fn ensure_schema(&self) -> RepoResult<SchemaStatus>;
    /// Inserts one client; the generated id is not reported.
    fn insert_one(&self, name: &str, email: &str) -> RepoResult<()>;
    /// Inserts all rows atomically and returns how many were written.
    fn insert_many(&self, rows: &[NewClient]) -> RepoResult<usize>;
    /// Replaces name and email of an existing client.
    fn update_one(&self, id: ClientId, name: &str, email: &str) -> RepoResult<()>;
    /// Deletes an existing client.
    fn delete_one(&self, id: ClientId) -> RepoResult<()>;
    /// Loads one client, `None` when no row has `id`.
    fn fetch_one(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Loads every client in insertion order.
    fn fetch_all(&self) -> RepoResult<Vec<Client>>;
    /// Counts stored clients.
    fn count_clients(&self) -> RepoResult<u64>;
}

/// SQLite-backed client repository borrowing a caller-owned connection.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn ensure_schema(&self) -> RepoResult<SchemaStatus> {
        Ok(ensure_clients_table(self.conn)?)
    }

    fn insert_one(&self, name: &str, email: &str) -> RepoResult<()> {
        let tx = self.begin()?;
        tx.execute(CLIENT_INSERT_SQL, params![name, email])?;
        tx.commit()?;

        info!("event=client_insert module=repo status=ok rows=1");
        Ok(())
    }

    fn insert_many(&self, rows: &[NewClient]) -> RepoResult<usize> {
        if rows.is_empty() {
            info!("event=client_insert_many module=repo status=skipped reason=empty_input");
            return Ok(0);
        }

        let tx = self.begin()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(CLIENT_INSERT_SQL)?;
            for row in rows {
                inserted += stmt.execute(params![row.name.as_str(), row.email.as_str()])?;
            }
        }
        tx.commit()?;

        info!("event=client_insert_many module=repo status=ok rows={inserted}");
        Ok(inserted)
    }

    fn update_one(&self, id: ClientId, name: &str, email: &str) -> RepoResult<()> {
        let id = validate_client_id(id)?;

        let tx = self.begin()?;
        let changed = tx.execute(
            "UPDATE clientes SET nome = ?1, email = ?2 WHERE id = ?3;",
            params![name, email, id],
        )?;
        if changed == 0 {
            // Dropping `tx` rolls back the no-op statement.
            warn!("event=client_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=client_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_one(&self, id: ClientId) -> RepoResult<()> {
        let id = validate_client_id(id)?;

        let tx = self.begin()?;
        let changed = tx.execute("DELETE FROM clientes WHERE id = ?1;", [id])?;
        if changed == 0 {
            warn!("event=client_delete module=repo status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=client_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn fetch_one(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let id = validate_client_id(id)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            debug!("event=client_fetch_one module=repo status=ok id={id}");
            return Ok(Some(parse_client_row(row)?));
        }

        debug!("event=client_fetch_one module=repo status=not_found id={id}");
        Ok(None)
    }

    fn fetch_all(&self) -> RepoResult<Vec<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut clients = Vec::new();

        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }

        debug!(
            "event=client_fetch_all module=repo status=ok rows={}",
            clients.len()
        );
        Ok(clients)
    }

    fn count_clients(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM clientes;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let id: ClientId = row.get("id")?;
    Ok(Client {
        id,
        name: required_text(row, "nome", id)?,
        email: required_text(row, "email", id)?,
    })
}

fn required_text(row: &Row<'_>, column: &'static str, id: ClientId) -> RepoResult<String> {
    row.get::<_, Option<String>>(column)?.ok_or_else(|| {
        RepoError::StorageUnavailable(DbError::InvalidData(format!(
            "NULL value in clientes.{column} for id {id}"
        )))
    })
}
