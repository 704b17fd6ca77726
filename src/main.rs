//! # kutub CLI
//!
//! The `kutub` binary drives the corpus migration pipeline and offers a few
//! read-side commands for inspecting the produced artifacts.
//!
//! ## Usage
//!
//! ```bash
//! kutub --config ./kutub.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kutub migrate all` | Migrate every catalog book that isn't migrated yet |
//! | `kutub migrate <id>` | Migrate one book by catalog id |
//! | `kutub books` | List the catalog and each book's migration status |
//! | `kutub stats <id>` | Summarize a migrated book's artifacts |
//! | `kutub get <id> <heading>` | Print a heading and its covered excerpts |
//!
//! Migration is idempotent: a book whose complete output already exists is
//! skipped. Remote fetches read their bearer token from the `HF_TOKEN`
//! environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kutub::{catalog, config, get, migrate, stats};

/// kutub — migrate and index digitized Qur'an and Hadith corpora.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with the data root, chunk size, and optional remote source template.
#[derive(Parser)]
#[command(
    name = "kutub",
    about = "kutub — a migration and indexing pipeline for digitized Qur'an and Hadith corpora",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./kutub.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate source data into chunked, indexed artifacts.
    ///
    /// Transforms each selected book's raw source (local `source.json`, or a
    /// remote download when absent) into `headings.json`, `indexes.json`,
    /// and `content/{n}.json` chunks. Books with complete output are
    /// skipped; failed books are warned about and the run continues.
    Migrate {
        /// Book selector: `all` or a numeric catalog id.
        book: String,

        /// Re-migrate even when complete output already exists.
        #[arg(long)]
        force: bool,

        /// Transform and report counts without writing any artifacts.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the catalog and each book's migration status.
    Books,

    /// Summarize a migrated book's persisted artifacts.
    Stats {
        /// Numeric catalog id.
        book: u32,
    },

    /// Print a heading and the excerpts it covers.
    ///
    /// Loads the covering content chunks and slices them by the heading's
    /// index range — the same contract the browsing UI uses.
    Get {
        /// Numeric catalog id.
        book: u32,

        /// Heading id (e.g. `T5` for a hadith book, `1` for a surah).
        heading: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Migrate {
            book,
            force,
            dry_run,
        } => {
            migrate::run_migration(&cfg, &book, force, dry_run).await?;
        }
        Commands::Books => {
            catalog::run_books(&cfg)?;
        }
        Commands::Stats { book } => {
            stats::run_stats(&cfg, book)?;
        }
        Commands::Get { book, heading } => {
            get::run_get(&cfg, book, &heading)?;
        }
    }

    Ok(())
}
