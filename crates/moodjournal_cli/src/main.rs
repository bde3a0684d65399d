//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `moodjournal_core` linkage (`moodjournal` with no subcommand).
//! - Drive the journal store against a SQLite file for local sanity checks.
//!
//! Pass `--log-dir` (or set `MOODJOURNAL_LOG_DIR`) to an absolute path to
//! enable file logging.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use moodjournal_core::{
    default_log_level, init_logging, EntryDraft, EntryListQuery, EntrySort, JournalService,
    SqliteStorage, Store, StoreConfig,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    }

    let Some(command) = cli.command else {
        println!("moodjournal_core ping={}", moodjournal_core::ping());
        println!("moodjournal_core version={}", moodjournal_core::core_version());
        return Ok(());
    };

    let storage = SqliteStorage::open(command.db())?;
    let mut store = Store::rehydrate(storage, StoreConfig::default());
    let mut journal = JournalService::new(&mut store);

    match command {
        Command::Add { content, .. } => {
            let entry = journal.create_entry(EntryDraft {
                content: content.join(" "),
                ..EntryDraft::default()
            })?;
            println!("{}", entry.id);
        }
        Command::List { .. } => {
            let query = EntryListQuery {
                sort: EntrySort::NewestFirst,
                ..EntryListQuery::default()
            };
            for summary in journal.list_summaries(&query) {
                println!(
                    "{}\t{}\t{}\t{}",
                    summary.id,
                    if summary.is_pinned { "*" } else { " " },
                    summary.mood.name(),
                    summary.preview.unwrap_or_default()
                );
            }
        }
        Command::Pin { id, .. } => {
            let entry = journal.toggle_pin(&id)?;
            println!("{} pinned={}", entry.id, entry.is_pinned);
        }
        Command::Rm { id, .. } => {
            journal.remove_entry(&id)?;
        }
    }

    store.flush_strict()?;
    Ok(())
}
