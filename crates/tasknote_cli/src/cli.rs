//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasknote_core::TaskId;

/// Local task list backed by SQLite or a blob store
#[derive(Parser, Debug)]
#[command(name = "tasknote_cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the database, blob files and logs
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List tasks, newest first
    List,

    /// Add a task
    Add {
        title: String,
        description: Option<String>,
    },

    /// Flip the done flag of a task
    Toggle { id: TaskId },

    /// Replace title and description of a task
    Edit {
        id: TaskId,
        title: String,
        description: Option<String>,
    },

    /// Delete a task
    Delete { id: TaskId },

    /// Print the core library version
    Version,
}
