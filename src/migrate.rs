//! Migration orchestration.
//!
//! Coordinates the per-book flow: source loading (local file or remote
//! fetch) → shape detection → transform → heading resolution → index
//! construction → chunked persistence. Each book runs to completion before
//! the next; a book whose output is already complete is skipped, and a book
//! that fails is warned about and skipped so multi-book runs continue.
//!
//! The completeness check is all-or-nothing over the full artifact set: a
//! run killed mid-write leaves a partial set, which the next invocation
//! treats as not migrated and redoes from scratch.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::adapters::{self, SourceData};
use crate::chunks::{self, CONTENT_DIR, HEADINGS_FILE, INDEXES_FILE};
use crate::config::Config;
use crate::fetch;
use crate::headings;
use crate::index::{self, LocationEntry};
use crate::loader;
use crate::models::{Book, Excerpt, GlobalIndex, Heading, Span, Translator};
use crate::transform;

/// Conventional name of a book's local raw source file.
pub const SOURCE_FILE: &str = "source.json";

/// In-memory result of migrating one book's source data.
#[derive(Debug, Clone)]
pub struct MigratedBook {
    pub content: Vec<Excerpt>,
    pub headings: Vec<Heading>,
    /// Ids of headings excluded because no content was found within the
    /// page-lookahead window.
    pub dropped_headings: Vec<String>,
    pub indexes: BookIndexes,
}

/// The v1-style location indexes, kept with the in-memory result for
/// reporting and tests; only the consolidated [`GlobalIndex`] is persisted.
#[derive(Debug, Clone, Default)]
pub struct BookIndexes {
    pub pages: BTreeMap<String, Span<usize>>,
    pub surah_verse: BTreeMap<String, LocationEntry<u64>>,
    pub hadith_numbers: BTreeMap<String, LocationEntry<String>>,
}

/// Migrate normalized source data. Pure: no I/O, deterministic, idempotent.
pub fn migrate_source(source: &SourceData) -> MigratedBook {
    let content = transform::transform_content(source);
    match source {
        SourceData::Scripture { verses, headings } => {
            let resolved = headings::surah_ranges(headings, &content);
            let indexes = BookIndexes {
                pages: index::page_index(&content),
                surah_verse: index::surah_verse_index(verses),
                hadith_numbers: BTreeMap::new(),
            };
            MigratedBook {
                content,
                headings: resolved,
                dropped_headings: Vec::new(),
                indexes,
            }
        }
        SourceData::Collection { headings, .. } => {
            let resolved = headings::resolve_ranges(headings, &content);
            let indexes = BookIndexes {
                pages: index::page_index(&content),
                surah_verse: BTreeMap::new(),
                hadith_numbers: index::hadith_number_index(&content),
            };
            MigratedBook {
                content,
                headings: resolved.headings,
                dropped_headings: resolved.dropped,
                indexes,
            }
        }
    }
}

/// True when every artifact of a finished migration exists: `headings.json`,
/// `indexes.json`, and all chunk files implied by the persisted totals.
pub fn artifacts_complete(out_dir: &Path) -> bool {
    if !out_dir.join(HEADINGS_FILE).is_file() {
        return false;
    }
    let Ok(raw) = fs::read_to_string(out_dir.join(INDEXES_FILE)) else {
        return false;
    };
    let Ok(index) = serde_json::from_str::<GlobalIndex>(&raw) else {
        return false;
    };
    if index.chunk_size == 0 {
        return false;
    }

    let chunks = chunks::chunk_count(index.total_items, index.chunk_size);
    (0..chunks).all(|n| {
        out_dir
            .join(CONTENT_DIR)
            .join(format!("{}.json", n))
            .is_file()
    })
}

enum Outcome {
    Migrated,
    Skipped,
}

/// Run migration for one book or `all`.
///
/// A missing credential or URL template when a fetch is needed aborts the
/// whole run; any other per-book failure is logged and the run continues.
pub async fn run_migration(
    config: &Config,
    selector: &str,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let books = loader::load_books(config)?;
    let selected: Vec<&Book> = if selector == "all" {
        books.iter().collect()
    } else {
        let id: u32 = selector
            .parse()
            .with_context(|| format!("invalid book selector: '{}'", selector))?;
        let book = books
            .iter()
            .find(|b| b.id == id)
            .with_context(|| format!("book {} is not in the catalog", id))?;
        vec![book]
    };

    let translators = loader::load_translators(config)?;

    let mut migrated = 0u32;
    let mut skipped = 0u32;
    let mut failed = 0u32;

    for book in selected {
        match migrate_book(config, book, &translators, force, dry_run).await {
            Ok(Outcome::Migrated) => migrated += 1,
            Ok(Outcome::Skipped) => skipped += 1,
            Err(e) => {
                if e.downcast_ref::<fetch::MissingFetchConfig>().is_some() {
                    return Err(e);
                }
                eprintln!("warning: skipping book {} ({}): {:#}", book.id, book.slug, e);
                failed += 1;
            }
        }
    }

    println!("migration finished");
    println!("  migrated: {}", migrated);
    println!("  skipped:  {}", skipped);
    if failed > 0 {
        println!("  failed:   {}", failed);
    }
    println!("ok");

    Ok(())
}

async fn migrate_book(
    config: &Config,
    book: &Book,
    translators: &[Translator],
    force: bool,
    dry_run: bool,
) -> Result<Outcome> {
    let out_dir = config.book_dir(book.id);
    println!("migrate {} ({})", book.id, book.slug);

    if !force && artifacts_complete(&out_dir) {
        println!("  skipped - already migrated at {}", out_dir.display());
        return Ok(Outcome::Skipped);
    }

    // Local source first; fall back to a remote fetch of the old export.
    let local = out_dir.join(SOURCE_FILE);
    let mut downloaded: Option<PathBuf> = None;
    let data_path = if local.is_file() {
        local
    } else {
        let path = fetch::download_source(
            book.id,
            config.source.url_template.as_deref(),
            &out_dir,
        )
        .await?;
        downloaded = Some(path.clone());
        path
    };

    let raw = fs::read_to_string(&data_path)
        .with_context(|| format!("failed to read {}", data_path.display()))?;
    let source = adapters::parse_source(&raw)?;
    let result = migrate_source(&source);

    if !result.dropped_headings.is_empty() {
        eprintln!(
            "warning: book {}: dropped {} heading(s) with no content in the lookahead window: {}",
            book.id,
            result.dropped_headings.len(),
            result.dropped_headings.join(", ")
        );
    }

    let global = index::global_index(
        &result.content,
        &result.headings,
        translators,
        config.chunking.chunk_size,
    );

    if dry_run {
        println!("  (dry-run) excerpts: {}", result.content.len());
        println!("  (dry-run) headings: {}", result.headings.len());
        println!(
            "  (dry-run) chunks: {}",
            chunks::chunk_count(result.content.len(), global.chunk_size)
        );
        cleanup_downloaded(downloaded.as_deref());
        return Ok(Outcome::Migrated);
    }

    chunks::write_book(&out_dir, &result.content, &result.headings, &global)?;
    cleanup_downloaded(downloaded.as_deref());

    println!("  excerpts: {}", result.content.len());
    println!("  headings: {}", result.headings.len());
    if !result.indexes.surah_verse.is_empty() {
        println!("  surah:verse entries: {}", result.indexes.surah_verse.len());
    }
    if !result.indexes.hadith_numbers.is_empty() {
        println!("  hadith numbers: {}", result.indexes.hadith_numbers.len());
    }
    println!("  pages: {}", result.indexes.pages.len());
    println!("  translators indexed: {}", global.translators.len());
    println!(
        "  content chunks: {}",
        chunks::chunk_count(result.content.len(), global.chunk_size)
    );

    Ok(Outcome::Migrated)
}

/// Remove a transient downloaded source file. Best-effort: the artifact is
/// only disk noise if removal fails.
fn cleanup_downloaded(path: Option<&Path>) {
    if let Some(path) = path {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("warning: could not remove {}: {}", path.display(), e);
        }
    }
}
