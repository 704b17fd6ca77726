//! Input adapters for the historical source formats.
//!
//! The corpus snapshot was produced by several generations of export tooling,
//! so a book's raw source file arrives in one of three shapes: the legacy
//! flat export (`{content, headings}`), the collection-API entry stream (a
//! bare array with `ar_body`/`from_page` fields), or the HuggingFace export
//! (`{excerpts, headings}`). Each shape gets its own adapter that normalizes
//! into the canonical [`SourceData`] records; the shared transform logic in
//! [`crate::transform`] never branches on shape.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Canonical scripture record: one verse.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerse {
    /// Source-side numeric record id (kept for the v1 surah:verse index).
    pub id: u64,
    pub nass: String,
    pub text: String,
    pub translator: u32,
    pub page: u32,
    pub surah: u32,
    pub verse: u32,
}

/// Canonical scripture heading: one surah title.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuranHeading {
    pub nass: String,
    pub text: String,
    pub translator: u32,
    /// Surah number; becomes the heading id.
    pub num: u32,
    pub page: u32,
}

/// Explicit title marker carried by some source shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMark {
    Book,
    Chapter,
}

/// Canonical hadith-collection record: hadith, chapter title, or prose.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub id: String,
    pub nass: String,
    pub text: String,
    pub translator: u32,
    pub page: u32,
    pub volume: Option<u32>,
    pub pp: Option<u32>,
    pub mark: Option<TitleMark>,
}

/// Canonical hadith-collection heading, prior to range resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHeading {
    pub id: String,
    pub nass: String,
    pub text: String,
    pub translator: u32,
    /// Page where the covered content starts.
    pub from: u32,
    pub parent: Option<String>,
    /// Citation coordinates when the source supplies them; otherwise the
    /// range resolver falls back to the first covered excerpt's meta.
    pub volume: Option<u32>,
    pub pp: Option<u32>,
}

/// A book's raw source, normalized from whichever shape it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Scripture {
        verses: Vec<RawVerse>,
        headings: Vec<RawQuranHeading>,
    },
    Collection {
        entries: Vec<RawEntry>,
        headings: Vec<RawHeading>,
    },
}

/// Detect the source shape and normalize it.
///
/// Detection inspects the parsed JSON once: a top-level array is a
/// collection-API entry stream; an object with `excerpts` is a HuggingFace
/// export; an object with `content` is a legacy flat export (scripture when
/// its records carry `surah`). Anything else is a per-book error.
pub fn parse_source(raw: &str) -> Result<SourceData> {
    let value: Value = serde_json::from_str(raw).context("source file is not valid JSON")?;

    if value.is_array() {
        return api_entries(value);
    }

    let Some(object) = value.as_object() else {
        bail!("unrecognized source shape: expected a JSON object or array");
    };

    if object.contains_key("excerpts") {
        return hf_export(value);
    }

    if let Some(content) = object.get("content").and_then(Value::as_array) {
        let is_scripture = content
            .first()
            .map(|item| item.get("surah").is_some())
            .unwrap_or(false);
        return if is_scripture {
            legacy_scripture(value)
        } else {
            legacy_collection(value)
        };
    }

    bail!("unrecognized source shape: no entries, excerpts, or content found");
}

/// Page numbers arrive as JSON numbers in some exports and strings in others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numberish {
    Num(u32),
    Text(String),
}

impl Numberish {
    fn value(&self) -> Result<u32> {
        match self {
            Numberish::Num(n) => Ok(*n),
            Numberish::Text(s) => s
                .trim()
                .parse()
                .with_context(|| format!("invalid page number: '{}'", s)),
        }
    }
}

// ============ Legacy flat export ============

#[derive(Debug, Deserialize)]
struct LegacyScripture {
    content: Vec<LegacyVerse>,
    #[serde(default)]
    headings: Vec<LegacySurahHeading>,
}

#[derive(Debug, Deserialize)]
struct LegacyVerse {
    id: u64,
    nass: String,
    text: String,
    translator: u32,
    page: u32,
    surah: u32,
    verse: u32,
}

#[derive(Debug, Deserialize)]
struct LegacySurahHeading {
    nass: String,
    text: String,
    translator: u32,
    num: u32,
    page: u32,
}

fn legacy_scripture(value: Value) -> Result<SourceData> {
    let data: LegacyScripture =
        serde_json::from_value(value).context("malformed legacy scripture export")?;

    let verses = data
        .content
        .into_iter()
        .map(|v| RawVerse {
            id: v.id,
            nass: v.nass,
            text: v.text,
            translator: v.translator,
            page: v.page,
            surah: v.surah,
            verse: v.verse,
        })
        .collect();

    let headings = data
        .headings
        .into_iter()
        .map(|h| RawQuranHeading {
            nass: h.nass,
            text: h.text,
            translator: h.translator,
            num: h.num,
            page: h.page,
        })
        .collect();

    Ok(SourceData::Scripture { verses, headings })
}

#[derive(Debug, Deserialize)]
struct LegacyCollection {
    content: Vec<LegacyHadith>,
    #[serde(default)]
    headings: Vec<LegacyHadithHeading>,
}

#[derive(Debug, Deserialize)]
struct LegacyHadith {
    id: String,
    nass: String,
    text: String,
    translator: u32,
    page: u32,
    volume: Option<u32>,
    pp: Option<u32>,
    /// Numeric title marker: 1 = book title, 2 = chapter title.
    #[serde(rename = "type")]
    kind: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct LegacyHadithHeading {
    id: String,
    nass: String,
    text: String,
    translator: u32,
    from: u32,
    parent: Option<u64>,
    volume: Option<u32>,
    pp: Option<u32>,
}

fn legacy_collection(value: Value) -> Result<SourceData> {
    let data: LegacyCollection =
        serde_json::from_value(value).context("malformed legacy collection export")?;

    let entries = data
        .content
        .into_iter()
        .map(|e| RawEntry {
            id: e.id,
            nass: e.nass,
            text: e.text,
            translator: e.translator,
            page: e.page,
            volume: e.volume,
            pp: e.pp,
            mark: match e.kind {
                Some(1) => Some(TitleMark::Book),
                Some(2) => Some(TitleMark::Chapter),
                _ => None,
            },
        })
        .collect();

    let headings = data
        .headings
        .into_iter()
        .map(|h| RawHeading {
            id: h.id,
            nass: h.nass,
            text: h.text,
            translator: h.translator,
            from: h.from,
            // Legacy parent links are bare numbers referencing "T"-prefixed ids.
            parent: h.parent.map(|p| format!("T{}", p)),
            volume: Some(h.volume.unwrap_or(1)),
            pp: Some(h.pp.unwrap_or(0)),
        })
        .collect();

    Ok(SourceData::Collection { entries, headings })
}

// ============ Collection-API entry stream ============

#[derive(Debug, Deserialize)]
struct ApiEntry {
    id: u64,
    ar_body: String,
    body: String,
    translator: u32,
    from_page: Numberish,
    part_number: Option<u32>,
    part_page: Option<u32>,
    index_number: Option<u32>,
    /// Present on heading entries, absent on verse entries.
    #[serde(rename = "type")]
    kind: Option<Value>,
}

fn api_entries(value: Value) -> Result<SourceData> {
    let entries: Vec<ApiEntry> =
        serde_json::from_value(value).context("malformed collection-API entry stream")?;

    let mut verses = Vec::new();
    let mut headings = Vec::new();

    for entry in entries {
        let page = entry.from_page.value()?;
        let is_heading = entry.kind.map(|k| !k.is_null()).unwrap_or(false);
        if is_heading {
            headings.push(RawQuranHeading {
                nass: entry.ar_body,
                text: entry.body,
                translator: entry.translator,
                num: entry
                    .index_number
                    .with_context(|| format!("heading entry {} has no index_number", entry.id))?,
                page,
            });
        } else {
            verses.push(RawVerse {
                id: entry.id,
                nass: entry.ar_body,
                text: entry.body,
                translator: entry.translator,
                page,
                surah: entry
                    .part_number
                    .with_context(|| format!("verse entry {} has no part_number", entry.id))?,
                verse: entry
                    .part_page
                    .with_context(|| format!("verse entry {} has no part_page", entry.id))?,
            });
        }
    }

    Ok(SourceData::Scripture { verses, headings })
}

// ============ HuggingFace export ============

#[derive(Debug, Deserialize)]
struct HfExport {
    excerpts: Vec<HfExcerpt>,
    #[serde(default)]
    headings: Vec<HfHeading>,
}

#[derive(Debug, Deserialize)]
struct HfExcerpt {
    id: String,
    nass: String,
    text: String,
    translator: u32,
    /// Page the excerpt starts on.
    from: u32,
    /// Volume number and page-in-volume, for citations.
    vol: u32,
    vp: u32,
    /// `"book"` or `"chapter"` when this excerpt is itself a title.
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HfHeading {
    id: String,
    nass: String,
    text: String,
    translator: u32,
    from: u32,
    parent: Option<String>,
}

fn hf_export(value: Value) -> Result<SourceData> {
    let data: HfExport =
        serde_json::from_value(value).context("malformed HuggingFace export")?;

    let entries = data
        .excerpts
        .into_iter()
        .map(|e| {
            let mark = match e.kind.as_deref() {
                Some("book") => Some(TitleMark::Book),
                Some("chapter") => Some(TitleMark::Chapter),
                _ => None,
            };
            RawEntry {
                id: e.id,
                nass: e.nass,
                text: e.text,
                translator: e.translator,
                page: e.from,
                volume: Some(e.vol),
                pp: Some(e.vp),
                mark,
            }
        })
        .collect();

    let headings = data
        .headings
        .into_iter()
        .map(|h| RawHeading {
            id: h.id,
            nass: h.nass,
            text: h.text,
            translator: h.translator,
            from: h.from,
            parent: h.parent,
            volume: None,
            pp: None,
        })
        .collect();

    Ok(SourceData::Collection { entries, headings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_hf_export() {
        let raw = r#"{
            "excerpts": [
                {"id": "P10", "nass": "١ - حَدَّثَنَا", "text": "Narrated", "translator": 891, "from": 10, "vol": 1, "vp": 6},
                {"id": "B1", "nass": "كتاب", "text": "Book", "translator": 891, "from": 1, "vol": 1, "vp": 1, "type": "book"}
            ],
            "headings": [
                {"id": "T1", "nass": "كتاب", "text": "Book", "translator": 891, "from": 1},
                {"id": "T2", "nass": "باب", "text": "Chapter", "translator": 891, "from": 1, "parent": "T1"}
            ]
        }"#;

        let SourceData::Collection { entries, headings } = parse_source(raw).unwrap() else {
            panic!("expected collection");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].volume, Some(1));
        assert_eq!(entries[0].pp, Some(6));
        assert_eq!(entries[0].mark, None);
        assert_eq!(entries[1].mark, Some(TitleMark::Book));
        assert_eq!(headings[1].parent.as_deref(), Some("T1"));
        // HF headings carry no citation coordinates of their own.
        assert_eq!(headings[0].volume, None);
    }

    #[test]
    fn detects_legacy_scripture() {
        let raw = r#"{
            "content": [
                {"id": 1, "nass": "بِسْمِ", "text": "In the Name", "translator": 13, "page": 1, "surah": 1, "verse": 1, "chapter": 60518}
            ],
            "headings": [
                {"id": 60518, "nass": "الفاتحة", "text": "The Opening", "translator": 13, "num": 1, "page": 1}
            ]
        }"#;

        let SourceData::Scripture { verses, headings } = parse_source(raw).unwrap() else {
            panic!("expected scripture");
        };
        assert_eq!(verses[0].surah, 1);
        assert_eq!(verses[0].id, 1);
        assert_eq!(headings[0].num, 1);
    }

    #[test]
    fn detects_legacy_collection_and_maps_parents() {
        let raw = r#"{
            "content": [
                {"id": "C43", "nass": "بَابُ", "text": "Chapter", "translator": 873, "page": 95, "pp": 19, "volume": 1, "type": 2}
            ],
            "headings": [
                {"id": "T6", "nass": "باب", "text": "Chapter", "translator": 873, "from": 95, "parent": 5}
            ]
        }"#;

        let SourceData::Collection { entries, headings } = parse_source(raw).unwrap() else {
            panic!("expected collection");
        };
        assert_eq!(entries[0].mark, Some(TitleMark::Chapter));
        assert_eq!(headings[0].parent.as_deref(), Some("T5"));
        // Legacy headings default their own citation coordinates.
        assert_eq!(headings[0].volume, Some(1));
        assert_eq!(headings[0].pp, Some(0));
    }

    #[test]
    fn detects_api_entry_stream() {
        let raw = r#"[
            {"id": 60518, "ar_body": "الفاتحة", "body": "The Opening", "translator": 13, "from_page": "1", "index_number": 1, "type": 1},
            {"id": 1, "ar_body": "بِسْمِ", "body": "In the Name", "translator": 13, "from_page": "1", "part_number": 1, "part_page": 1}
        ]"#;

        let SourceData::Scripture { verses, headings } = parse_source(raw).unwrap() else {
            panic!("expected scripture");
        };
        assert_eq!(headings.len(), 1);
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].page, 1);
        assert_eq!(verses[0].verse, 1);
    }

    #[test]
    fn rejects_unknown_shape() {
        assert!(parse_source(r#"{"documents": []}"#).is_err());
        assert!(parse_source("not json").is_err());
    }
}
