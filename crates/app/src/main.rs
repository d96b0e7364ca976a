//! `vspheredb` command line.
//!
//! Each invocation performs at most one reconciliation pass; scheduling
//! repeated passes is left to cron or a systemd timer. Failures worth
//! retrying exit with `EX_TEMPFAIL` (75) so the scheduler can tell them apart.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;

use vspheredb_common::ErrorClassification;
use vspheredb_domain::VsphereDbError;
use vspheredb_infra::InfraError;

mod commands;
mod context;
mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    logging::init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "could not load .env file"),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let (task, rest) = match args.split_first() {
        Some((task, rest)) => (Some(task.as_str()), rest),
        None => (None, &[][..]),
    };

    let result = match task {
        Some("sync") => commands::run_sync(rest).await,
        Some("summary") => commands::run_summary().await,
        Some("help" | "-h" | "--help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_help();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vspheredb: {e:#}");
            exit_code_for(&e)
        }
    }
}

const EX_TEMPFAIL: u8 = 75;

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(failure_code(err))
}

/// `EX_TEMPFAIL` for transient domain errors, 1 for everything else.
fn failure_code(err: &anyhow::Error) -> u8 {
    let Some(domain) = err.downcast_ref::<VsphereDbError>() else {
        tracing::error!(error = ?err, "command failed");
        return 1;
    };

    let classified = InfraError(domain.clone());
    tracing::error!(
        error = ?err,
        severity = %classified.severity(),
        retryable = classified.is_retryable(),
        "command failed"
    );

    if classified.is_retryable() {
        EX_TEMPFAIL
    } else {
        1
    }
}

fn print_help() {
    println!("vspheredb {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    vspheredb <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    sync [KIND...]  Run one reconciliation pass (Datastore, HostSystem, VirtualMachine)");
    println!("    summary         Print stored object counts and the last sync time");
    println!("    help            Show this help message");
    println!();
    println!("Configuration comes from VSPHEREDB_* variables, a .env file, or");
    println!("vspheredb.toml / config.toml (VSPHEREDB_CONFIG names an explicit file).");
    println!("RUST_LOG sets the log filter; VSPHEREDB_LOG_JSON=1 switches to JSON logs.");
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    fn failing(err: VsphereDbError) -> anyhow::Error {
        Err::<(), _>(err).context("sync pass failed").unwrap_err()
    }

    #[test]
    fn contention_and_network_failures_ask_for_a_retry() {
        assert_eq!(failure_code(&failing(VsphereDbError::DatabaseBusy("database is locked".into()))), 75);
        assert_eq!(failure_code(&failing(VsphereDbError::Network("connection reset".into()))), 75);
    }

    #[test]
    fn permanent_failures_exit_with_one() {
        assert_eq!(failure_code(&failing(VsphereDbError::Database("CHECK constraint failed".into()))), 1);
        assert_eq!(failure_code(&failing(VsphereDbError::Auth("401 Unauthorized".into()))), 1);
        assert_eq!(failure_code(&anyhow::anyhow!("no such command")), 1);
    }
}
