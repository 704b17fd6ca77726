//! Core data models used throughout kutub.
//!
//! These types represent the excerpts, headings, and lookup indexes that flow
//! through the migration pipeline, plus the catalog types loaded as external
//! input (`books.json`, `translators.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An inclusive span, denormalized three ways on [`Heading`]: by excerpt id,
/// by content-array position, and by page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span<T> {
    pub start: T,
    pub end: T,
}

/// One addressable unit of corpus text.
///
/// The content array's iteration order is the canonical document order;
/// `page` is non-decreasing across the array and `id` is unique per book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    /// Unique within a book: `"surah:verse"` for scripture, an opaque
    /// prefixed token (`"P10"`, `"C43"`) for hadith collections.
    pub id: String,
    /// Original-language (Arabic) text. Source of truth, never transformed.
    pub nass: String,
    /// Translated text, passed through unchanged.
    pub text: String,
    /// Foreign key into the translator directory.
    pub translator: u32,
    /// 1-based source page number.
    pub page: u32,
    #[serde(flatten)]
    pub kind: ExcerptKind,
}

/// Discriminated excerpt variant, tagged `"type"` in the persisted JSON.
///
/// `meta` is typed per variant so readers never have to probe for the
/// presence of `surah` to tell a verse from a hadith.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExcerptKind {
    Verse { meta: VerseMeta },
    Hadith { meta: CitationMeta },
    ChapterTitle { meta: CitationMeta },
    /// Generic prose: forewords, introductions, editorial notes.
    Text { meta: CitationMeta },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseMeta {
    pub surah: u32,
    pub verse: u32,
}

/// Citation coordinates for hadith-collection excerpts: `volume`/`pp` render
/// as "1/6" style references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMeta {
    pub volume: u32,
    pub pp: u32,
    #[serde(rename = "hadithNum", skip_serializing_if = "Option::is_none")]
    pub hadith_num: Option<u64>,
}

impl Excerpt {
    /// Citation metadata, for the three collection variants. Verses have none.
    pub fn citation(&self) -> Option<&CitationMeta> {
        match &self.kind {
            ExcerptKind::Verse { .. } => None,
            ExcerptKind::Hadith { meta }
            | ExcerptKind::ChapterTitle { meta }
            | ExcerptKind::Text { meta } => Some(meta),
        }
    }

    pub fn verse(&self) -> Option<&VerseMeta> {
        match &self.kind {
            ExcerptKind::Verse { meta } => Some(meta),
            _ => None,
        }
    }

    /// The extracted citation numeral, for `hadith` excerpts only.
    pub fn hadith_num(&self) -> Option<u64> {
        match &self.kind {
            ExcerptKind::Hadith { meta } => meta.hadith_num,
            _ => None,
        }
    }
}

/// A table-of-contents entry covering a contiguous run of excerpts.
///
/// Hadith collections form a two-level hierarchy via `parent` (book →
/// chapter); scripture headings are flat (one per surah, no parent). The
/// three spans are parallel encodings of the same covered range; they are
/// absent when the heading could not be placed over any content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub id: String,
    pub nass: String,
    pub text: String,
    pub translator: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surah: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pp: Option<u32>,
    /// Enclosing heading id. A parent's spans contain the union of its
    /// children's spans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Span<String>>,
    #[serde(rename = "indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<Span<usize>>,
    #[serde(rename = "pageRange", skip_serializing_if = "Option::is_none")]
    pub page_range: Option<Span<u32>>,
}

impl Heading {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Consolidated lookup artifact for one book, persisted as `indexes.json`.
///
/// `chunk_size` must match the value the content array was partitioned with:
/// readers compute `index / chunk_size` to address chunk files, and there is
/// no runtime check tying the two together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalIndex {
    /// Content id → array index, every excerpt.
    pub ids: BTreeMap<String, usize>,
    /// Page number (as string key) → array index range.
    pub pages: BTreeMap<String, Span<usize>>,
    /// `"surah:verse"` → array index. Scripture only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub surahs: BTreeMap<String, usize>,
    /// Hadith number (as string key) → array index. Collections only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hadiths: BTreeMap<String, usize>,
    /// Subset of the translator directory referenced by this book.
    pub translators: BTreeMap<String, Translator>,
    #[serde(rename = "chunkSize")]
    pub chunk_size: usize,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    pub version: String,
}

/// Static catalog entry from `books.json`. Never produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u32,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: BookKind,
    pub title: String,
    /// Arabic title.
    pub unwan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// URL template for the external source reference.
    #[serde(rename = "refTemplate")]
    pub ref_template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    Scripture,
    Hadith,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translator {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

// Wrapper objects matching the persisted file layout.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksManifest {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorsManifest {
    pub translators: Vec<Translator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingsManifest {
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentManifest {
    pub content: Vec<Excerpt>,
}
