//! Argument parsing and command dispatch.

use crate::demo::run_demo;
use crate::output::{client_json, write_clients, CommandError};
use clap::{Parser, Subcommand};
use clientes_core::{
    close_db, default_db_path, default_log_level, init_logging, open_db, parse_client_id,
    ClientId, ClientRepository, RepoError, SqliteClientRepository,
};
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// clientes: a small SQLite-backed client store
#[derive(Debug, Parser)]
#[command(name = "clientes", version)]
#[command(about = "Create, read, update and delete client records in a local SQLite file")]
pub struct Cli {
    /// Database file (defaults to clientes.sqlite next to the executable)
    #[arg(long, env = "CLIENTES_DB", global = true)]
    db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "CLIENTES_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (logs go to stderr otherwise)
    #[arg(long, env = "CLIENTES_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in demonstration sequence (default)
    Demo,

    /// Print every client
    List,

    /// Print one client
    Get {
        /// Client ID
        #[arg(value_parser = parse_client_id)]
        id: ClientId,
    },

    /// Insert a client
    Add {
        /// Client name
        name: String,
        /// Client email
        email: String,
    },

    /// Replace name and email of a client
    Update {
        /// Client ID
        #[arg(value_parser = parse_client_id)]
        id: ClientId,
        /// New name
        name: String,
        /// New email
        email: String,
    },

    /// Delete a client
    Delete {
        /// Client ID
        #[arg(value_parser = parse_client_id)]
        id: ClientId,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    let db_path = cli.db.unwrap_or_else(default_db_path);
    let command = cli.command.unwrap_or(Command::Demo);
    let mut stdout = std::io::stdout().lock();
    run_with_db(&db_path, command, &mut stdout)
}

/// Opens `db_path`, runs `command`, closes the connection once and maps the
/// outcome to an exit code.
pub fn run_with_db(db_path: &Path, command: Command, out: &mut impl Write) -> ExitCode {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=cli_finish module=cli status=error error_code=db_open_failed error={err}"
            );
            eprintln!("Error: cannot open `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        db_path.display()
    );

    let result = execute(&SqliteClientRepository::new(&conn), command, out);
    let close_result = close_db(conn);

    match (result, close_result) {
        (Ok(()), Ok(())) => {
            info!("event=cli_finish module=cli status=ok");
            ExitCode::SUCCESS
        }
        (Err(err), _) => {
            error!("event=cli_finish module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
        (Ok(()), Err(err)) => {
            error!("event=cli_finish module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs `command` against `repo`, writing user-facing lines to `out`.
pub fn execute<R: ClientRepository>(
    repo: &R,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    // The demo reports schema setup itself.
    if !matches!(command, Command::Demo) {
        repo.ensure_schema()?;
    }

    match command {
        Command::Demo => {
            let report = run_demo(repo, out)?;
            let status = if report.failed_steps == 0 { "ok" } else { "partial" };
            info!(
                "event=demo_finish module=cli status={status} failed_steps={}",
                report.failed_steps
            );
        }
        Command::List => {
            let clients = repo.fetch_all()?;
            if clients.is_empty() {
                writeln!(out, "No clients found in the table.")?;
            } else {
                write_clients(out, &clients)?;
            }
        }
        Command::Get { id } => match repo.fetch_one(id)? {
            Some(client) => writeln!(out, "{}", client_json(&client)?)?,
            None => return Err(RepoError::NotFound(id).into()),
        },
        Command::Add { name, email } => {
            repo.insert_one(&name, &email)?;
            writeln!(out, "Client '{name}' inserted.")?;
        }
        Command::Update { id, name, email } => {
            repo.update_one(id, &name, &email)?;
            writeln!(out, "Client with ID {id} updated.")?;
        }
        Command::Delete { id } => {
            repo.delete_one(id)?;
            writeln!(out, "Client with ID {id} deleted.")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, run_with_db, Cli, Command};
    use crate::output::CommandError;
    use clap::{CommandFactory, Parser};
    use clientes_core::{
        open_db, open_db_in_memory, ClientRepository, RepoError, SqliteClientRepository,
    };
    use std::process::ExitCode;

    fn run_command(repo: &SqliteClientRepository<'_>, command: Command) -> String {
        let mut out = Vec::new();
        execute(repo, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_demo() {
        let cli = Cli::try_parse_from(["clientes", "--db", "/tmp/x.sqlite"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.sqlite")));
    }

    #[test]
    fn non_integer_and_non_positive_ids_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["clientes", "get", "abc"]).is_err());
        assert!(Cli::try_parse_from(["clientes", "delete", "0"]).is_err());
        assert!(Cli::try_parse_from(["clientes", "update", "-4", "X", "y@z.com"]).is_err());

        let cli = Cli::try_parse_from(["clientes", "get", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Get { id: 2 })));
    }

    #[test]
    fn single_commands_round_through_the_repository() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteClientRepository::new(&conn);

        assert_eq!(
            run_command(&repo, Command::List),
            "No clients found in the table.\n"
        );
        assert_eq!(
            run_command(
                &repo,
                Command::Add {
                    name: "maria".to_string(),
                    email: "maria@email.com".to_string(),
                }
            ),
            "Client 'maria' inserted.\n"
        );
        run_command(
            &repo,
            Command::Update {
                id: 1,
                name: "X".to_string(),
                email: "y@z.com".to_string(),
            },
        );
        assert_eq!(
            run_command(&repo, Command::Get { id: 1 }),
            "{\"id\":1,\"nome\":\"X\",\"email\":\"y@z.com\"}\n"
        );
        assert_eq!(
            run_command(&repo, Command::Delete { id: 1 }),
            "Client with ID 1 deleted.\n"
        );
    }

    #[test]
    fn get_missing_client_is_an_error() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteClientRepository::new(&conn);

        let mut out = Vec::new();
        let err = execute(&repo, Command::Get { id: 9 }, &mut out).unwrap_err();
        assert!(matches!(err, CommandError::Repo(RepoError::NotFound(9))));
        assert!(out.is_empty());
    }

    #[test]
    fn demo_run_on_file_exits_zero_and_persists_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clientes.sqlite");

        let mut out = Vec::new();
        let code = run_with_db(&path, Command::Demo, &mut out);

        assert_eq!(code, ExitCode::SUCCESS);
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("Table 'clientes' created.\n"));

        let conn = open_db(&path).unwrap();
        let repo = SqliteClientRepository::new(&conn);
        assert_eq!(repo.count_clients().unwrap(), 5);
        assert!(repo.fetch_one(1).unwrap().is_none());
    }

    #[test]
    fn failing_single_command_exits_one_and_leaves_file_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clientes.sqlite");

        let mut out = Vec::new();
        let code = run_with_db(&path, Command::Delete { id: 99 }, &mut out);

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());

        // The handle was released, so a second run can open the same file.
        let mut out = Vec::new();
        assert_eq!(run_with_db(&path, Command::List, &mut out), ExitCode::SUCCESS);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No clients found in the table.\n"
        );
    }

    #[test]
    fn unopenable_database_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("clientes.sqlite");

        let mut out = Vec::new();
        assert_eq!(run_with_db(&path, Command::List, &mut out), ExitCode::FAILURE);
        assert!(out.is_empty());
    }
}
