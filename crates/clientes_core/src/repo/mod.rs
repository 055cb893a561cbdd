//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for client records.
//! - Isolate SQLite query details from the CLI.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidInput`) in
//!   addition to storage errors; nothing is swallowed here.

pub mod client_repo;
