//! Command-line front end for the task list.
//!
//! # Responsibility
//! - Drive the storage facade the way the list screen does.
//! - Keep output deterministic for scripting and smoke checks.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasknote_core::{
    core_version, default_log_level, init_logging, Platform, StorageConfig, Task, TaskService,
    TaskStorage,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    if cli.command == Command::Version {
        println!("tasknote_core version={}", core_version());
        return Ok(());
    }

    let data_dir = absolute_dir(&cli.data_dir)?;
    if let Err(err) = init_logging(
        default_log_level(),
        &data_dir.join("logs").to_string_lossy(),
    ) {
        eprintln!("logging disabled: {err}");
    }

    let storage = TaskStorage::for_platform(Platform::current(), StorageConfig::new(&data_dir));
    let service = TaskService::new(storage);
    service.start().await.map_err(|err| err.to_string())?;

    match cli.command {
        Command::List => {
            let tasks = service.list_tasks().await.map_err(|err| err.to_string())?;
            for task in &tasks {
                println!("{}", render_task(task));
            }
        }
        Command::Add { title, description } => {
            let created = service
                .create_task(&title, description.as_deref().unwrap_or(""))
                .await
                .map_err(|err| err.to_string())?;
            println!("added {}", created.inserted_id);
        }
        Command::Toggle { id } => {
            let result = service
                .toggle_task(id)
                .await
                .map_err(|err| err.to_string())?;
            report_rows("toggled", result.rows_affected);
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let result = service
                .edit_task(id, &title, description.as_deref().unwrap_or(""))
                .await
                .map_err(|err| err.to_string())?;
            report_rows("edited", result.rows_affected);
        }
        Command::Delete { id } => {
            let result = service
                .remove_task(id)
                .await
                .map_err(|err| err.to_string())?;
            report_rows("deleted", result.rows_affected);
        }
        Command::Version => {}
    }

    Ok(())
}

fn absolute_dir(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| format!("cannot resolve working directory: {err}"))
}

fn render_task(task: &Task) -> String {
    let mark = if task.done { "x" } else { " " };
    if task.description.is_empty() {
        format!("[{mark}] {} {}", task.id, task.title)
    } else {
        format!("[{mark}] {} {} - {}", task.id, task.title, task.description)
    }
}

fn report_rows(action: &str, rows_affected: u64) {
    if rows_affected == 0 {
        warn!("event=cli_mutation module=cli status=no_match action={action}");
        println!("no matching task");
    } else {
        println!("{action} {rows_affected}");
    }
}
