//! Record transformation: canonical source records → unified [`Excerpt`]s.
//!
//! Each function is a pure mapping over one record; no array-wide state, so
//! applying it twice to the same record yields identical output.

use crate::adapters::{RawEntry, RawVerse, SourceData};
use crate::models::{CitationMeta, Excerpt, ExcerptKind, VerseMeta};
use crate::normalize::extract_hadith_number;

/// Transform one scripture verse. The excerpt id is `"{surah}:{verse}"`.
pub fn transform_verse(v: &RawVerse) -> Excerpt {
    Excerpt {
        id: format!("{}:{}", v.surah, v.verse),
        nass: v.nass.clone(),
        text: v.text.clone(),
        translator: v.translator,
        page: v.page,
        kind: ExcerptKind::Verse {
            meta: VerseMeta {
                surah: v.surah,
                verse: v.verse,
            },
        },
    }
}

/// Transform one hadith-collection record, classifying it as a chapter
/// title, a hadith, or generic prose.
///
/// A record is a chapter title when the source set an explicit title marker
/// or its id carries the corpus's reserved `C`/`B` prefix, regardless of any
/// citation numeral in `nass`. Otherwise it is a hadith when a leading
/// citation numeral is extractable, and plain text when neither holds.
pub fn transform_entry(e: &RawEntry) -> Excerpt {
    let hadith_num = extract_hadith_number(&e.nass);
    let meta = CitationMeta {
        volume: e.volume.unwrap_or(1),
        pp: e.pp.unwrap_or(0),
        hadith_num,
    };

    let is_chapter_title =
        e.mark.is_some() || e.id.starts_with('C') || e.id.starts_with('B');

    let kind = if is_chapter_title {
        ExcerptKind::ChapterTitle { meta }
    } else if hadith_num.is_some() {
        ExcerptKind::Hadith { meta }
    } else {
        ExcerptKind::Text { meta }
    };

    Excerpt {
        id: e.id.clone(),
        nass: e.nass.clone(),
        text: e.text.clone(),
        translator: e.translator,
        page: e.page,
        kind,
    }
}

/// Transform a whole normalized source into the content array, preserving
/// document order.
pub fn transform_content(source: &SourceData) -> Vec<Excerpt> {
    match source {
        SourceData::Scripture { verses, .. } => verses.iter().map(transform_verse).collect(),
        SourceData::Collection { entries, .. } => entries.iter().map(transform_entry).collect(),
    }
}
