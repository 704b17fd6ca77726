//! Heading range resolution.
//!
//! Headings arrive as a flat list with page numbers and optional parent
//! links; content arrives as an ordered array. This module computes each
//! heading's covered span over the content array and denormalizes it three
//! ways (by excerpt id, by array index, by page).
//!
//! The hadith path places each heading at the first content item on its
//! `from` page (probing up to [`PAGE_LOOKAHEAD`] subsequent pages on a miss)
//! and closes it at the next boundary heading in sorted-by-start order. The
//! lookahead bound and the nested-chapter boundary rule are tuned against
//! the existing corpus output and must not be changed without regenerating
//! it.

use std::collections::HashMap;

use crate::adapters::{RawHeading, RawQuranHeading};
use crate::models::{Excerpt, ExcerptKind, Heading, Span};

/// Pages probed past a heading's `from` page before giving up on placement.
const PAGE_LOOKAHEAD: u32 = 10;

/// Result of hadith heading resolution. Headings whose `from` page has no
/// content within the lookahead window are excluded from `headings` and
/// listed in `dropped` so the loss stays auditable.
#[derive(Debug, Clone)]
pub struct ResolvedHeadings {
    pub headings: Vec<Heading>,
    pub dropped: Vec<String>,
}

/// Resolve hadith-collection headings against the finished content array.
pub fn resolve_ranges(headings: &[RawHeading], content: &[Excerpt]) -> ResolvedHeadings {
    // Page → first content index on that page. Content is ordered, so the
    // first sighting of a page is its start.
    let mut page_map: HashMap<u32, usize> = HashMap::new();
    for (index, item) in content.iter().enumerate() {
        page_map.entry(item.page).or_insert(index);
    }

    let mut placed: Vec<(usize, &RawHeading)> = Vec::new();
    let mut dropped = Vec::new();
    for h in headings {
        match find_start_index(h.from, &page_map) {
            Some(start) => placed.push((start, h)),
            None => dropped.push(h.id.clone()),
        }
    }

    // Re-linearize: headings may arrive in a different order than their page
    // positions imply. The sort is stable, so original order breaks ties.
    placed.sort_by_key(|(start, _)| *start);

    let resolved = placed
        .iter()
        .enumerate()
        .map(|(i, &(start, h))| {
            let end = end_index(i, &placed, content.len());
            build_heading(h, start, end, content)
        })
        .collect();

    ResolvedHeadings {
        headings: resolved,
        dropped,
    }
}

/// Exact page lookup, then a bounded forward probe. Handles headings whose
/// page carries no content because the content starts a page or two later.
fn find_start_index(from: u32, page_map: &HashMap<u32, usize>) -> Option<usize> {
    if let Some(&index) = page_map.get(&from) {
        return Some(index);
    }
    (from + 1..=from + PAGE_LOOKAHEAD)
        .find_map(|page| page_map.get(&page))
        .copied()
}

/// Compute the end index for the heading at `i` in the sorted-by-start list.
///
/// A Book (no parent) runs until the next Book starts. A Chapter runs until
/// the next Book, or the next heading whose start strictly exceeds its own —
/// the strict comparison lets a Book and its first Chapter share a start
/// index while the Book's span still encloses the Chapter's.
fn end_index(i: usize, sorted: &[(usize, &RawHeading)], content_len: usize) -> usize {
    let (start, heading) = sorted[i];
    let is_book = heading.parent.is_none();
    let mut end = content_len - 1;

    for &(next_start, next) in &sorted[i + 1..] {
        let next_is_book = next.parent.is_none();
        if is_book {
            if next_is_book {
                end = next_start.saturating_sub(1);
                break;
            }
        } else if next_is_book || next_start > start {
            end = next_start.saturating_sub(1);
            break;
        }
    }

    end.max(start)
}

fn build_heading(h: &RawHeading, start: usize, end: usize, content: &[Excerpt]) -> Heading {
    let first = &content[start];
    let last = &content[end];

    // Citation coordinates: the heading's own when the source supplied them,
    // else the first covered excerpt's.
    let citation = first.citation();
    let volume = h.volume.or(citation.map(|m| m.volume)).unwrap_or(1);
    let pp = h.pp.or(citation.map(|m| m.pp)).unwrap_or(0);

    Heading {
        id: h.id.clone(),
        nass: h.nass.clone(),
        text: h.text.clone(),
        translator: h.translator,
        page: h.from,
        surah: None,
        volume: Some(volume),
        pp: Some(pp),
        parent: h.parent.clone(),
        range: Some(Span {
            start: first.id.clone(),
            end: last.id.clone(),
        }),
        index_range: Some(Span { start, end }),
        page_range: Some(Span {
            start: first.page,
            end: last.page,
        }),
    }
}

/// Resolve scripture headings: each surah's span is the run of its verses.
///
/// A surah heading with no verses in the content array keeps its identity
/// fields but carries no spans, matching the existing corpus output.
pub fn surah_ranges(headings: &[RawQuranHeading], content: &[Excerpt]) -> Vec<Heading> {
    let mut ranges: HashMap<u32, Span<usize>> = HashMap::new();
    for (index, item) in content.iter().enumerate() {
        if let ExcerptKind::Verse { meta } = &item.kind {
            ranges
                .entry(meta.surah)
                .and_modify(|span| span.end = index)
                .or_insert(Span {
                    start: index,
                    end: index,
                });
        }
    }

    headings
        .iter()
        .map(|h| {
            let span = ranges.get(&h.num);
            let (range, index_range, page_range) = match span {
                Some(span) => {
                    let first = &content[span.start];
                    let last = &content[span.end];
                    (
                        Some(Span {
                            start: first.id.clone(),
                            end: last.id.clone(),
                        }),
                        Some(span.clone()),
                        Some(Span {
                            start: first.page,
                            end: last.page,
                        }),
                    )
                }
                None => (None, None, None),
            };
            Heading {
                id: h.num.to_string(),
                nass: h.nass.clone(),
                text: h.text.clone(),
                translator: h.translator,
                page: h.page,
                surah: Some(h.num),
                volume: None,
                pp: None,
                parent: None,
                range,
                index_range,
                page_range,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{RawEntry, RawVerse};
    use crate::transform::{transform_entry, transform_verse};

    fn excerpt(id: &str, page: u32) -> Excerpt {
        transform_entry(&RawEntry {
            id: id.to_string(),
            nass: "حديث".to_string(),
            text: id.to_string(),
            translator: 1,
            page,
            volume: Some(1),
            pp: Some(0),
            mark: None,
        })
    }

    fn raw_heading(id: &str, from: u32, parent: Option<&str>) -> RawHeading {
        RawHeading {
            id: id.to_string(),
            nass: "عنوان".to_string(),
            text: id.to_string(),
            translator: 1,
            from,
            parent: parent.map(str::to_string),
            volume: None,
            pp: None,
        }
    }

    #[test]
    fn book_and_nested_chapter_share_start_and_cover_to_end() {
        let content: Vec<Excerpt> = ["B1", "H1", "C1", "H2", "H3"]
            .iter()
            .map(|id| excerpt(id, 1))
            .collect();
        let headings = vec![
            raw_heading("T5", 1, None),
            raw_heading("T6", 1, Some("T5")),
        ];

        let resolved = resolve_ranges(&headings, &content);
        assert!(resolved.dropped.is_empty());
        assert_eq!(resolved.headings.len(), 2);

        let book = &resolved.headings[0];
        assert_eq!(book.id, "T5");
        assert_eq!(book.index_range, Some(Span { start: 0, end: 4 }));
        assert_eq!(
            book.range,
            Some(Span {
                start: "B1".to_string(),
                end: "H3".to_string()
            })
        );

        let chapter = &resolved.headings[1];
        assert_eq!(chapter.id, "T6");
        assert_eq!(chapter.parent.as_deref(), Some("T5"));
        assert_eq!(chapter.index_range, Some(Span { start: 0, end: 4 }));
    }

    #[test]
    fn second_book_truncates_first_book_and_its_chapter() {
        let content: Vec<Excerpt> = vec![
            excerpt("B1", 1),
            excerpt("H1", 1),
            excerpt("H2", 2),
            excerpt("B2", 3),
            excerpt("H3", 3),
        ];
        let headings = vec![
            raw_heading("T1", 1, None),
            raw_heading("T2", 1, Some("T1")),
            raw_heading("T3", 3, None),
        ];

        let resolved = resolve_ranges(&headings, &content);
        let by_id = |id: &str| {
            resolved
                .headings
                .iter()
                .find(|h| h.id == id)
                .unwrap()
                .index_range
                .clone()
                .unwrap()
        };

        assert_eq!(by_id("T1"), Span { start: 0, end: 2 });
        assert_eq!(by_id("T2"), Span { start: 0, end: 2 });
        assert_eq!(by_id("T3"), Span { start: 3, end: 4 });
    }

    #[test]
    fn chapter_closes_at_next_sibling_chapter() {
        let content: Vec<Excerpt> = vec![
            excerpt("H1", 1),
            excerpt("H2", 2),
            excerpt("H3", 3),
            excerpt("H4", 4),
        ];
        let headings = vec![
            raw_heading("T1", 1, None),
            raw_heading("T2", 1, Some("T1")),
            raw_heading("T3", 3, Some("T1")),
        ];

        let resolved = resolve_ranges(&headings, &content);
        let chapter = resolved.headings.iter().find(|h| h.id == "T2").unwrap();
        assert_eq!(chapter.index_range, Some(Span { start: 0, end: 1 }));
        let book = resolved.headings.iter().find(|h| h.id == "T1").unwrap();
        assert_eq!(book.index_range, Some(Span { start: 0, end: 3 }));
    }

    #[test]
    fn start_falls_back_within_page_lookahead() {
        // Heading on page 5, content starts on page 7: placed via the probe.
        let content = vec![excerpt("H1", 7), excerpt("H2", 8)];
        let headings = vec![raw_heading("T1", 5, None)];

        let resolved = resolve_ranges(&headings, &content);
        assert!(resolved.dropped.is_empty());
        assert_eq!(
            resolved.headings[0].index_range,
            Some(Span { start: 0, end: 1 })
        );
    }

    #[test]
    fn heading_beyond_lookahead_is_dropped() {
        // Nearest content is 11 pages past the heading: outside the window.
        let content = vec![excerpt("H1", 20)];
        let headings = vec![raw_heading("T1", 9, None), raw_heading("T2", 20, None)];

        let resolved = resolve_ranges(&headings, &content);
        assert_eq!(resolved.dropped, vec!["T1".to_string()]);
        assert_eq!(resolved.headings.len(), 1);
        assert_eq!(resolved.headings[0].id, "T2");
    }

    #[test]
    fn headings_resorted_by_start_index() {
        let content = vec![excerpt("H1", 1), excerpt("H2", 5)];
        // Listed out of page order.
        let headings = vec![raw_heading("T2", 5, None), raw_heading("T1", 1, None)];

        let resolved = resolve_ranges(&headings, &content);
        assert_eq!(resolved.headings[0].id, "T1");
        assert_eq!(resolved.headings[1].id, "T2");
        assert_eq!(
            resolved.headings[0].index_range,
            Some(Span { start: 0, end: 0 })
        );
    }

    #[test]
    fn end_never_falls_below_start() {
        // Both books resolve to the same start; the first clamps to an
        // empty-but-valid single-item span.
        let content = vec![excerpt("H1", 1), excerpt("H2", 1)];
        let headings = vec![raw_heading("T1", 1, None), raw_heading("T2", 1, None)];

        let resolved = resolve_ranges(&headings, &content);
        let first = resolved.headings[0].index_range.clone().unwrap();
        assert!(first.start <= first.end);
        assert_eq!(first, Span { start: 0, end: 0 });
    }

    #[test]
    fn heading_citation_falls_back_to_first_covered_excerpt() {
        let content = vec![excerpt("H1", 1)];
        let headings = vec![raw_heading("T1", 1, None)];

        let resolved = resolve_ranges(&headings, &content);
        assert_eq!(resolved.headings[0].volume, Some(1));
        assert_eq!(resolved.headings[0].pp, Some(0));
    }

    fn verse(surah: u32, verse_num: u32, page: u32) -> Excerpt {
        transform_verse(&RawVerse {
            id: u64::from(surah * 1000 + verse_num),
            nass: "آية".to_string(),
            text: "verse".to_string(),
            translator: 13,
            page,
            surah,
            verse: verse_num,
        })
    }

    #[test]
    fn surah_ranges_cover_verse_runs() {
        let content = vec![verse(1, 1, 1), verse(1, 2, 1), verse(2, 1, 2)];
        let headings = vec![
            RawQuranHeading {
                nass: "الفاتحة".to_string(),
                text: "The Opening".to_string(),
                translator: 13,
                num: 1,
                page: 1,
            },
            RawQuranHeading {
                nass: "البقرة".to_string(),
                text: "The Cow".to_string(),
                translator: 13,
                num: 2,
                page: 2,
            },
        ];

        let resolved = surah_ranges(&headings, &content);
        assert_eq!(resolved[0].id, "1");
        assert_eq!(resolved[0].surah, Some(1));
        assert_eq!(resolved[0].index_range, Some(Span { start: 0, end: 1 }));
        assert_eq!(
            resolved[0].range,
            Some(Span {
                start: "1:1".to_string(),
                end: "1:2".to_string()
            })
        );
        assert_eq!(resolved[1].index_range, Some(Span { start: 2, end: 2 }));
    }

    #[test]
    fn surah_without_verses_keeps_identity_without_spans() {
        let content = vec![verse(1, 1, 1)];
        let headings = vec![RawQuranHeading {
            nass: "الناس".to_string(),
            text: "Mankind".to_string(),
            translator: 13,
            num: 114,
            page: 604,
        }];

        let resolved = surah_ranges(&headings, &content);
        assert_eq!(resolved[0].id, "114");
        assert!(resolved[0].index_range.is_none());
        assert!(resolved[0].range.is_none());
    }
}
