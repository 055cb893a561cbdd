//! Domain model for persisted client records.
//!
//! # Responsibility
//! - Define the canonical client shapes used by the repository and CLI.
//! - Own the single id range check applied before id-addressed queries.
//!
//! # Invariants
//! - Every stored client is identified by a positive, storage-assigned id.

pub mod client;
