//! Pagenote CLI - inspect and edit a page-notes blob outside the browser.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pagenote_core::{validate_content, NoteStore};
use pagenote_files::FileStorage;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagenote", about = "Page-scoped notes for rendered documents", version)]
struct Cli {
    /// Directory holding the notes blob
    #[arg(long, env = "PAGENOTE_DIR", default_value = ".pagenote")]
    dir: PathBuf,
    /// Storage key the notes live under
    #[arg(long, env = "PAGENOTE_KEY", default_value = pagenote_core::DEFAULT_STORAGE_KEY)]
    key: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pages that have notes
    Pages,
    /// List the notes of a page
    Ls {
        /// Page path, e.g. /guide/intro.html
        page: String,
    },
    /// Add a note to a page
    Add {
        page: String,
        /// Note text (reads from stdin if not provided)
        content: Option<String>,
    },
    /// Replace the text of a note
    Edit {
        page: String,
        id: String,
        /// New text (reads from stdin if not provided)
        content: Option<String>,
    },
    /// Delete one or more notes from a page
    Rm {
        page: String,
        /// Comma-separated note IDs
        ids: String,
    },
}

fn parse_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Use the given text, or read it from stdin when stdin is not a terminal.
fn content_or_stdin(content: Option<String>) -> Result<String> {
    if let Some(content) = content {
        return Ok(content);
    }
    if io::stdin().is_terminal() {
        bail!("No note text given and stdin is a terminal");
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagenote=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let storage = FileStorage::open(&cli.dir)
        .with_context(|| format!("Failed to open {}", cli.dir.display()))?;
    let _lock = storage.lock().context("Failed to lock notes directory")?;
    let store = NoteStore::new(storage).with_key(cli.key);

    match cli.command {
        Commands::Pages => {
            for (page, notes) in store.get_all() {
                let noun = if notes.len() == 1 { "note" } else { "notes" };
                println!("{} ({} {})", page, notes.len(), noun);
            }
        }

        Commands::Ls { page } => {
            let notes = store.get_for_page(&page);
            if notes.is_empty() {
                eprintln!("No notes for {}", page);
            }
            for note in notes {
                let edited = if note.is_edited() { " (edited)" } else { "" };
                println!("{} [{}]{}", note.id, note.created_label(), edited);
                for line in note.content.lines() {
                    println!("  {}", line);
                }
            }
        }

        Commands::Add { page, content } => {
            let content = content_or_stdin(content)?;
            let Some(content) = validate_content(&content) else {
                bail!("Note text cannot be empty");
            };
            let note = store.create(&page, content)?;
            println!("Added note {}", note.id);
        }

        Commands::Edit { page, id, content } => {
            let content = content_or_stdin(content)?;
            let Some(content) = validate_content(&content) else {
                bail!("Note text cannot be empty");
            };
            if store.update(&page, &id, content)? {
                println!("Edited note {}", id);
            } else {
                eprintln!("Note {} not found on {}", id, page);
                std::process::exit(1);
            }
        }

        Commands::Rm { page, ids } => {
            let ids = parse_ids(&ids);
            if ids.is_empty() {
                eprintln!("No note IDs provided");
                std::process::exit(1);
            }

            let mut not_found = Vec::new();
            for id in &ids {
                if store.delete(&page, id)? {
                    println!("Deleted note {}", id);
                } else {
                    not_found.push(id);
                }
            }

            if !not_found.is_empty() {
                for id in &not_found {
                    eprintln!("Note {} not found on {}", id, page);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
