//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "moodjournal",
    version,
    about = "Mood journal smoke CLI over a SQLite state file",
    long_about = "Without a subcommand, prints core linkage and version.\n\
                  Subcommands drive the journal store against a SQLite file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Absolute directory for rotating log files (logging stays off when unset).
    #[arg(long = "log-dir", value_name = "DIR", env = "MOODJOURNAL_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an entry from the remaining words.
    Add {
        #[arg(value_name = "DB")]
        db: PathBuf,
        #[arg(value_name = "CONTENT", required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// List entries, newest first.
    List {
        #[arg(value_name = "DB")]
        db: PathBuf,
    },

    /// Toggle the favorite flag of one entry.
    Pin {
        #[arg(value_name = "DB")]
        db: PathBuf,
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete one entry.
    Rm {
        #[arg(value_name = "DB")]
        db: PathBuf,
        #[arg(value_name = "ID")]
        id: String,
    },
}

impl Command {
    pub fn db(&self) -> &PathBuf {
        match self {
            Self::Add { db, .. } | Self::List { db } | Self::Pin { db, .. } | Self::Rm { db, .. } => {
                db
            }
        }
    }
}
