//! Core data access for the `clientes` store.
//! This crate owns the client model, the SQLite repository and logging setup.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{close_db, default_db_path, open_db, open_db_in_memory, DbError, SchemaStatus};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::client::{
    parse_client_id, validate_client_id, Client, ClientId, ClientValidationError, NewClient,
};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
