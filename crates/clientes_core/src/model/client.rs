//! Client domain model.
//!
//! # Responsibility
//! - Define the stored `Client` record and the `NewClient` insert payload.
//! - Validate caller-provided ids before they reach SQL.
//!
//! # Invariants
//! - `id` is assigned by SQLite on insert and never changes afterwards.
//! - `name`/`email` widths are declared by the schema only; SQLite does not
//!   enforce them and neither does this model.
//! - `name` and `email` are always present; a stored NULL is invalid data.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier of a client row.
pub type ClientId = i64;

/// Persisted client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Serialized as `nome` to match the `clientes` column naming.
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// Insert payload for a client that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

impl NewClient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Attaches a storage-assigned id, producing the persisted shape.
    pub fn with_id(self, id: ClientId) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

impl Display for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} <{}>", self.id, self.name, self.email)
    }
}

/// Rejected client id input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    /// Id is zero or negative.
    NonPositiveId(i64),
    /// Id text is not an integer.
    MalformedId(String),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => {
                write!(f, "client id must be a positive integer, got {id}")
            }
            Self::MalformedId(raw) => {
                write!(f, "client id must be a positive integer, got `{raw}`")
            }
        }
    }
}

impl Error for ClientValidationError {}

/// Checks that `id` can address a stored row.
pub fn validate_client_id(id: i64) -> Result<ClientId, ClientValidationError> {
    if id <= 0 {
        return Err(ClientValidationError::NonPositiveId(id));
    }
    Ok(id)
}

/// Parses user-provided id text and applies [`validate_client_id`].
pub fn parse_client_id(raw: &str) -> Result<ClientId, ClientValidationError> {
    let trimmed = raw.trim();
    let id = trimmed
        .parse::<i64>()
        .map_err(|_| ClientValidationError::MalformedId(trimmed.to_string()))?;
    validate_client_id(id)
}
