//! Hard-coded demonstration run against the client store.
//!
//! Every step prints one status line; a failing step is reported and the
//! run moves on. Only schema setup and output failures stop the run.

use crate::output::{client_json, write_clients, CommandError};
use clientes_core::{ClientRepository, NewClient, RepoError, SchemaStatus};
use std::io::Write;

const UPDATE_TARGET_ID: i64 = 22;
const DELETE_TARGET_ID: i64 = 1;
const FETCH_TARGET_ID: i64 = 2;

/// Rows inserted by the batch step.
pub fn seed_clients() -> Vec<NewClient> {
    vec![
        NewClient::new("Matheus", "matheus@email.com"),
        NewClient::new("João", "joao@email.com"),
        NewClient::new("maria", "maria@email.com"),
        NewClient::new("carlos", "carlos@email.com"),
        NewClient::new("leticia", "leticia@email.com"),
    ]
}

/// Result of a completed demonstration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
    pub failed_steps: usize,
}

pub fn run_demo<R: ClientRepository>(
    repo: &R,
    out: &mut impl Write,
) -> Result<DemoReport, CommandError> {
    let mut failed_steps = 0;

    match repo.ensure_schema()? {
        SchemaStatus::Created => writeln!(out, "Table 'clientes' created.")?,
        SchemaStatus::AlreadyExists => writeln!(out, "Table 'clientes' already exists.")?,
    }

    match repo.insert_many(&seed_clients()) {
        Ok(0) => writeln!(out, "No data provided for insertion.")?,
        Ok(inserted) => writeln!(out, "{inserted} record(s) inserted.")?,
        Err(err) => {
            failed_steps += 1;
            writeln!(out, "Could not insert seed clients: {err}")?;
        }
    }

    match repo.insert_one("Matheeus", "matheus@email.com") {
        Ok(()) => writeln!(out, "Client 'Matheeus' inserted.")?,
        Err(err) => {
            failed_steps += 1;
            writeln!(out, "Could not insert client 'Matheeus': {err}")?;
        }
    }

    match repo.update_one(UPDATE_TARGET_ID, "Matheus", "matheus@email.com") {
        Ok(()) => writeln!(out, "Client with ID {UPDATE_TARGET_ID} updated.")?,
        Err(err) => {
            failed_steps += 1;
            writeln!(
                out,
                "Could not update client with ID {UPDATE_TARGET_ID}: {err}"
            )?;
        }
    }

    match repo.delete_one(DELETE_TARGET_ID) {
        Ok(()) => writeln!(out, "Client with ID {DELETE_TARGET_ID} deleted.")?,
        Err(RepoError::NotFound(id)) => {
            failed_steps += 1;
            writeln!(out, "No client found with ID {id}.")?;
        }
        Err(err) => {
            failed_steps += 1;
            writeln!(
                out,
                "Could not delete client with ID {DELETE_TARGET_ID}: {err}"
            )?;
        }
    }

    match repo.fetch_one(FETCH_TARGET_ID) {
        Ok(Some(client)) => writeln!(out, "Client found: {}", client_json(&client)?)?,
        Ok(None) => {
            failed_steps += 1;
            writeln!(out, "No client found with ID {FETCH_TARGET_ID}.")?;
        }
        Err(err) => {
            failed_steps += 1;
            writeln!(
                out,
                "Could not fetch client with ID {FETCH_TARGET_ID}: {err}"
            )?;
        }
    }

    match repo.fetch_all() {
        Ok(clients) if clients.is_empty() => writeln!(out, "No clients found in the table.")?,
        Ok(clients) => {
            writeln!(out, "{} client(s) retrieved.", clients.len())?;
            write_clients(out, &clients)?;
        }
        Err(err) => {
            failed_steps += 1;
            writeln!(out, "Could not fetch clients: {err}")?;
        }
    }

    Ok(DemoReport { failed_steps })
}

#[cfg(test)]
mod tests {
    use super::{run_demo, DemoReport};
    use clientes_core::{open_db_in_memory, ClientRepository, SqliteClientRepository};

    fn run_to_string(repo: &SqliteClientRepository<'_>) -> (DemoReport, String) {
        let mut out = Vec::new();
        let report = run_demo(repo, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn demo_on_fresh_database_prints_each_step() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteClientRepository::new(&conn);

        let (report, output) = run_to_string(&repo);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(report, DemoReport { failed_steps: 1 });
        assert_eq!(lines[0], "Table 'clientes' created.");
        assert_eq!(lines[1], "5 record(s) inserted.");
        assert_eq!(lines[2], "Client 'Matheeus' inserted.");
        assert_eq!(
            lines[3],
            "Could not update client with ID 22: client not found: 22"
        );
        assert_eq!(lines[4], "Client with ID 1 deleted.");
        assert_eq!(
            lines[5],
            r#"Client found: {"id":2,"nome":"João","email":"joao@email.com"}"#
        );
        assert_eq!(lines[6], "5 client(s) retrieved.");
        assert_eq!(lines.len(), 12);
        assert_eq!(
            lines[11],
            r#"{"id":6,"nome":"Matheeus","email":"matheus@email.com"}"#
        );
        assert_eq!(repo.count_clients().unwrap(), 5);
    }

    #[test]
    fn second_demo_run_reuses_existing_table() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteClientRepository::new(&conn);
        run_to_string(&repo);

        let (report, output) = run_to_string(&repo);

        assert_eq!(
            output.lines().next(),
            Some("Table 'clientes' already exists.")
        );
        // Id 1 was deleted by the first run.
        assert!(output.contains("No client found with ID 1."));
        assert_eq!(report.failed_steps, 2);
        assert_eq!(repo.count_clients().unwrap(), 11);
    }
}
