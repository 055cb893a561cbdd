//! Console output helpers and the CLI error type.

use clientes_core::{Client, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

#[derive(Debug)]
pub enum CommandError {
    Repo(RepoError),
    Encode(serde_json::Error),
    Output(std::io::Error),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode client: {err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Renders one client as a single-line JSON object.
pub fn client_json(client: &Client) -> Result<String, CommandError> {
    Ok(serde_json::to_string(client)?)
}

/// Writes every client on its own line.
pub fn write_clients(out: &mut impl Write, clients: &[Client]) -> Result<(), CommandError> {
    for client in clients {
        writeln!(out, "{}", client_json(client)?)?;
    }
    Ok(())
}
