//! Read-side loading of persisted artifacts.
//!
//! This is the contract the browsing UI consumes: given a heading's
//! `indexRange` and the book's `chunkSize`, load the covering chunk files,
//! concatenate, and slice out exactly the excerpts the heading spans.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::chunks::{chunk_of, CONTENT_DIR, HEADINGS_FILE, INDEXES_FILE};
use crate::config::Config;
use crate::models::{
    Book, BooksManifest, ContentManifest, Excerpt, GlobalIndex, Heading, HeadingsManifest,
    Translator, TranslatorsManifest,
};

pub fn load_books(config: &Config) -> Result<Vec<Book>> {
    let manifest: BooksManifest = read_json(&config.books_path())?;
    Ok(manifest.books)
}

pub fn load_translators(config: &Config) -> Result<Vec<Translator>> {
    let manifest: TranslatorsManifest = read_json(&config.translators_path())?;
    Ok(manifest.translators)
}

pub fn load_headings(config: &Config, book_id: u32) -> Result<Vec<Heading>> {
    let manifest: HeadingsManifest = read_json(&config.book_dir(book_id).join(HEADINGS_FILE))?;
    Ok(manifest.headings)
}

pub fn load_global_index(config: &Config, book_id: u32) -> Result<GlobalIndex> {
    read_json(&config.book_dir(book_id).join(INDEXES_FILE))
}

pub fn load_chunk(config: &Config, book_id: u32, chunk: usize) -> Result<ContentManifest> {
    read_json(
        &config
            .book_dir(book_id)
            .join(CONTENT_DIR)
            .join(format!("{}.json", chunk)),
    )
}

/// Headings with no parent: Books in a hadith collection, every surah in
/// scripture.
pub fn top_level_headings(headings: &[Heading]) -> Vec<&Heading> {
    headings.iter().filter(|h| h.is_top_level()).collect()
}

pub fn find_heading<'a>(headings: &'a [Heading], id: &str) -> Option<&'a Heading> {
    headings.iter().find(|h| h.id == id)
}

/// Load exactly the excerpts covered by a heading, in document order.
///
/// Loads chunk files `start/chunkSize` through `end/chunkSize` inclusive,
/// concatenates their content arrays, and slices relative to the first
/// loaded chunk's origin. Headings without a resolved `indexRange` yield an
/// empty list.
pub fn load_heading_excerpts(
    config: &Config,
    book_id: u32,
    heading: &Heading,
) -> Result<Vec<Excerpt>> {
    let Some(ref span) = heading.index_range else {
        return Ok(Vec::new());
    };

    let index = load_global_index(config, book_id)?;
    if index.chunk_size == 0 {
        bail!("book {} has an invalid chunkSize of 0", book_id);
    }

    let first_chunk = chunk_of(span.start, index.chunk_size);
    let last_chunk = chunk_of(span.end, index.chunk_size);

    let mut all = Vec::new();
    for chunk in first_chunk..=last_chunk {
        all.extend(load_chunk(config, book_id, chunk)?.content);
    }

    let offset = span.start - first_chunk * index.chunk_size;
    let len = span.end - span.start + 1;
    if offset + len > all.len() {
        bail!(
            "heading {} spans past the end of book {}'s content",
            heading.id,
            book_id
        );
    }

    Ok(all[offset..offset + len].to_vec())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RawEntry;
    use crate::models::Span;
    use crate::transform::transform_entry;
    use crate::{chunks, index};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(total: usize, chunk_size: usize) -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            data: crate::config::DataConfig {
                root: tmp.path().to_path_buf(),
            },
            chunking: crate::config::ChunkingConfig { chunk_size },
            source: Default::default(),
        };

        let content: Vec<Excerpt> = (0..total)
            .map(|i| {
                transform_entry(&RawEntry {
                    id: format!("P{}", i),
                    nass: "نص".to_string(),
                    text: format!("text {}", i),
                    translator: 1,
                    page: (i + 1) as u32,
                    volume: None,
                    pp: None,
                    mark: None,
                })
            })
            .collect();
        let idx = index::global_index(&content, &[], &[], chunk_size);
        chunks::write_book(&config.book_dir(7), &content, &[], &idx).unwrap();

        (tmp, config)
    }

    fn heading_with_span(start: usize, end: usize) -> Heading {
        Heading {
            id: "T1".to_string(),
            nass: "كتاب".to_string(),
            text: "Book".to_string(),
            translator: 1,
            page: 1,
            surah: None,
            volume: None,
            pp: None,
            parent: None,
            range: None,
            index_range: Some(Span { start, end }),
            page_range: None,
        }
    }

    #[test]
    fn slices_within_a_single_chunk() {
        let (_tmp, config) = fixture(10, 4);
        let excerpts =
            load_heading_excerpts(&config, 7, &heading_with_span(1, 2)).unwrap();
        let ids: Vec<_> = excerpts.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2"]);
    }

    #[test]
    fn slices_across_chunk_boundaries() {
        let (_tmp, config) = fixture(10, 4);
        // Indices 3..=8 cross chunks 0, 1, and 2.
        let excerpts =
            load_heading_excerpts(&config, 7, &heading_with_span(3, 8)).unwrap();
        let ids: Vec<_> = excerpts.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["P3", "P4", "P5", "P6", "P7", "P8"]);
    }

    #[test]
    fn heading_without_range_yields_nothing() {
        let (_tmp, config) = fixture(4, 2);
        let mut heading = heading_with_span(0, 0);
        heading.index_range = None;
        let excerpts = load_heading_excerpts(&config, 7, &heading).unwrap();
        assert!(excerpts.is_empty());
    }

    #[test]
    fn top_level_filter_and_find() {
        let mut book = heading_with_span(0, 1);
        let mut chapter = heading_with_span(0, 1);
        chapter.id = "T2".to_string();
        chapter.parent = Some("T1".to_string());
        book.id = "T1".to_string();

        let headings = vec![book, chapter];
        let top: Vec<_> = top_level_headings(&headings)
            .iter()
            .map(|h| h.id.clone())
            .collect();
        assert_eq!(top, ["T1"]);
        assert!(find_heading(&headings, "T2").is_some());
        assert!(find_heading(&headings, "T9").is_none());
    }

    #[test]
    fn missing_artifacts_are_an_error() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            data: crate::config::DataConfig {
                root: PathBuf::from(tmp.path()),
            },
            chunking: Default::default(),
            source: Default::default(),
        };
        assert!(load_headings(&config, 404).is_err());
    }
}
