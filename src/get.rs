//! Heading retrieval for the `get` command.
//!
//! Exercises the same read-side contract the browsing UI uses: resolve the
//! heading, load the covering chunk files, and slice out its excerpts.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::loader;
use crate::models::ExcerptKind;

pub fn run_get(config: &Config, book_id: u32, heading_id: &str) -> Result<()> {
    let headings = loader::load_headings(config, book_id)?;
    let Some(heading) = loader::find_heading(&headings, heading_id) else {
        bail!("heading '{}' not found in book {}", heading_id, book_id);
    };

    println!("{} — {}", heading.id, heading.text);
    println!("  {}", heading.nass);
    if let Some(parent) = &heading.parent {
        println!("  parent: {}", parent);
    }
    if let Some(pages) = &heading.page_range {
        println!("  pages: {}-{}", pages.start, pages.end);
    }

    let excerpts = loader::load_heading_excerpts(config, book_id, heading)?;
    println!("  excerpts: {}", excerpts.len());
    println!();

    for excerpt in &excerpts {
        let tag = match &excerpt.kind {
            ExcerptKind::Verse { .. } => "verse",
            ExcerptKind::Hadith { .. } => "hadith",
            ExcerptKind::ChapterTitle { .. } => "chapter-title",
            ExcerptKind::Text { .. } => "text",
        };
        println!("[{}] ({}) p.{}", excerpt.id, tag, excerpt.page);
        println!("  {}", excerpt.text);
    }

    Ok(())
}
