//! Lookup index construction.
//!
//! Everything here is a pure reduction over finished content and headings:
//! no I/O, no shared state, same inputs always produce the same maps. The
//! consolidated [`GlobalIndex`] is the persisted artifact; the standalone
//! location indexes mirror the v1 tooling and travel with the in-memory
//! migration result for reporting and tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::adapters::RawVerse;
use crate::models::{Excerpt, ExcerptKind, GlobalIndex, Heading, Span, Translator};

/// Schema version stamped into every persisted `indexes.json`.
pub const INDEX_VERSION: &str = "1.0.0";

/// A v1-style location entry: source excerpt id plus its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationEntry<T> {
    pub eid: T,
    pub page: u32,
}

/// `"surah:verse"` → location of the source verse record.
pub fn surah_verse_index(verses: &[RawVerse]) -> BTreeMap<String, LocationEntry<u64>> {
    verses
        .iter()
        .map(|v| {
            (
                format!("{}:{}", v.surah, v.verse),
                LocationEntry {
                    eid: v.id,
                    page: v.page,
                },
            )
        })
        .collect()
}

/// Hadith number → location of the hadith excerpt.
///
/// Chapter titles never contribute, even when their Arabic text happens to
/// open with a numeral.
pub fn hadith_number_index(content: &[Excerpt]) -> BTreeMap<String, LocationEntry<String>> {
    content
        .iter()
        .filter_map(|item| {
            item.hadith_num().map(|num| {
                (
                    num.to_string(),
                    LocationEntry {
                        eid: item.id.clone(),
                        page: item.page,
                    },
                )
            })
        })
        .collect()
}

/// Page number → inclusive index range into the content array.
///
/// Content is page-monotonic, so each page is one contiguous run; the fold
/// extends the current bucket until the page changes.
pub fn page_index(content: &[Excerpt]) -> BTreeMap<String, Span<usize>> {
    let mut index = BTreeMap::new();
    let Some(first) = content.first() else {
        return index;
    };

    let mut current_page = first.page;
    let mut page_start = 0;
    for (idx, item) in content.iter().enumerate() {
        if item.page != current_page {
            index.insert(
                current_page.to_string(),
                Span {
                    start: page_start,
                    end: idx - 1,
                },
            );
            current_page = item.page;
            page_start = idx;
        }
    }
    index.insert(
        current_page.to_string(),
        Span {
            start: page_start,
            end: content.len() - 1,
        },
    );

    index
}

/// Build the consolidated per-book index from finished content and headings.
///
/// Single forward pass over content (ids, pages, surah:verse and hadith
/// positions), a second pass over headings for referenced translators, then
/// a filtering projection of the full translator directory down to the ids
/// this book actually uses.
pub fn global_index(
    content: &[Excerpt],
    headings: &[Heading],
    all_translators: &[Translator],
    chunk_size: usize,
) -> GlobalIndex {
    let mut ids = BTreeMap::new();
    let mut pages: BTreeMap<String, Span<usize>> = BTreeMap::new();
    let mut surahs = BTreeMap::new();
    let mut hadiths = BTreeMap::new();
    let mut used: BTreeSet<u32> = BTreeSet::new();

    for (index, item) in content.iter().enumerate() {
        ids.insert(item.id.clone(), index);
        used.insert(item.translator);

        match &item.kind {
            ExcerptKind::Verse { meta } => {
                surahs.insert(format!("{}:{}", meta.surah, meta.verse), index);
            }
            ExcerptKind::Hadith { meta } => {
                if let Some(num) = meta.hadith_num {
                    hadiths.insert(num.to_string(), index);
                }
            }
            ExcerptKind::ChapterTitle { .. } | ExcerptKind::Text { .. } => {}
        }

        pages
            .entry(item.page.to_string())
            .and_modify(|span| span.end = index)
            .or_insert(Span {
                start: index,
                end: index,
            });
    }

    for heading in headings {
        used.insert(heading.translator);
    }

    let translators = all_translators
        .iter()
        .filter(|t| used.contains(&t.id))
        .map(|t| (t.id.to_string(), t.clone()))
        .collect();

    GlobalIndex {
        ids,
        pages,
        surahs,
        hadiths,
        translators,
        chunk_size,
        total_items: content.len(),
        version: INDEX_VERSION.to_string(),
    }
}
