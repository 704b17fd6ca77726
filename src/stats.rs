//! Per-book artifact statistics.
//!
//! Summarizes a migrated book's persisted artifacts: totals, chunk layout,
//! index entry counts, and on-disk size. Gives confidence that a migration
//! produced what the read side expects.

use anyhow::{bail, Result};
use std::fs;

use crate::chunks::{self, CONTENT_DIR};
use crate::config::Config;
use crate::loader;
use crate::migrate;

pub fn run_stats(config: &Config, book_id: u32) -> Result<()> {
    let out_dir = config.book_dir(book_id);
    if !migrate::artifacts_complete(&out_dir) {
        bail!(
            "book {} has no complete migrated output at {}",
            book_id,
            out_dir.display()
        );
    }

    let index = loader::load_global_index(config, book_id)?;
    let headings = loader::load_headings(config, book_id)?;
    let top_level = loader::top_level_headings(&headings).len();

    let content_bytes: u64 = fs::read_dir(out_dir.join(CONTENT_DIR))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum();

    println!("kutub — book {} stats", book_id);
    println!("=========================");
    println!();
    println!("  Output:       {}", out_dir.display());
    println!("  Content size: {}", format_bytes(content_bytes));
    println!();
    println!("  Excerpts:     {}", index.total_items);
    println!("  Chunk size:   {}", index.chunk_size);
    println!(
        "  Chunks:       {}",
        chunks::chunk_count(index.total_items, index.chunk_size)
    );
    println!("  Pages:        {}", index.pages.len());
    if !index.surahs.is_empty() {
        println!("  Surah:verse:  {}", index.surahs.len());
    }
    if !index.hadiths.is_empty() {
        println!("  Hadiths:      {}", index.hadiths.len());
    }
    println!("  Translators:  {}", index.translators.len());
    println!("  Headings:     {} ({} top-level)", headings.len(), top_level);
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
