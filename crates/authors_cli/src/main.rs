//! Command-line front end over the authors repository.
//!
//! Flags override the `AUTHORS_*` environment variables read by
//! [`CoreConfig::from_env`]. Results are printed as JSON on stdout.

use authors_core::db::{open, DbTarget};
use authors_core::{
    init_logging, AuthorsRepository, CoreConfig, NewAuthor, SearchParams, SortDirection,
    SqliteAuthorStore, StoreAuthorsRepository,
};
use clap::{Parser, Subcommand};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Parser)]
#[command(name = "authors", version, about = "Create, update and search authors")]
struct Cli {
    /// SQLite database file. Defaults to `AUTHORS_DB_PATH`, then in-memory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an author.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_email)]
        email: String,
    },
    /// Fetch an author by id.
    Get { id: Uuid },
    /// Look up an author by email; prints `null` when absent.
    FindEmail { email: String },
    /// Change name and/or email of an existing author.
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_email)]
        email: Option<String>,
    },
    /// Delete an author and print the removed record.
    Delete { id: Uuid },
    /// Search with filter, sort and paging.
    Search {
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        per_page: Option<i64>,
        #[arg(long)]
        filter: Option<String>,
        /// One of `name`, `email`, `createdAt`; anything else sorts newest first.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        sort_dir: Option<SortDirection>,
    },
}

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
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let target = DbTarget::from_path(config.db_path.clone());
    if target == DbTarget::Memory {
        warn!("event=cli_start module=cli status=ok mode=memory note=changes_not_persisted");
    }
    let conn = open(&target)?;
    let repo = StoreAuthorsRepository::new(SqliteAuthorStore::try_new(&conn)?);

    match cli.command {
        Command::Create { name, email } => print_json(&repo.create(&NewAuthor::new(name, email))?),
        Command::Get { id } => print_json(&repo.find_by_id(id)?),
        Command::FindEmail { email } => print_json(&repo.find_by_email(&email)?),
        Command::Update { id, name, email } => {
            let mut author = repo.find_by_id(id)?;
            if let Some(name) = name {
                author.name = name;
            }
            if let Some(email) = email {
                author.email = email;
            }
            print_json(&repo.update(&author)?)
        }
        Command::Delete { id } => print_json(&repo.delete(id)?),
        Command::Search {
            page,
            per_page,
            filter,
            sort,
            sort_dir,
        } => {
            let params = SearchParams {
                page,
                per_page,
                filter,
                sort,
                sort_dir,
            };
            print_json(&repo.search(&params)?)
        }
    }
}

/// Rejects obvious typos before they reach the store; the core accepts any text.
fn parse_email(raw: &str) -> Result<String, String> {
    if EMAIL_RE.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("`{raw}` does not look like an email address"))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
