//! Fixed-size content chunking and artifact persistence.
//!
//! The content array is split into consecutive `chunk_size` slices and each
//! slice persisted as `content/{n}.json`. Addressing is purely positional:
//! `index / chunk_size` names the chunk and `index % chunk_size` the offset
//! within it, and the read side relies on that arithmetic exactly. Headings
//! and the consolidated index are written as single artifacts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Excerpt, GlobalIndex, Heading};

pub const HEADINGS_FILE: &str = "headings.json";
pub const INDEXES_FILE: &str = "indexes.json";
pub const CONTENT_DIR: &str = "content";

/// Number of chunk files for a content array of `total` items.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    total.div_ceil(chunk_size)
}

/// Chunk file holding the item at `index`.
pub fn chunk_of(index: usize, chunk_size: usize) -> usize {
    index / chunk_size
}

/// Offset of the item at `index` within its chunk.
pub fn offset_in_chunk(index: usize, chunk_size: usize) -> usize {
    index % chunk_size
}

/// Write all of a book's artifacts: headings, consolidated index, and
/// content chunks. `index.chunk_size` is the partition size — the two must
/// agree or read-side slicing silently returns wrong data.
pub fn write_book(
    out_dir: &Path,
    content: &[Excerpt],
    headings: &[Heading],
    index: &GlobalIndex,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    write_json(
        &out_dir.join(HEADINGS_FILE),
        &serde_json::json!({ "headings": headings }),
    )?;
    write_json(&out_dir.join(INDEXES_FILE), index)?;

    let content_dir = out_dir.join(CONTENT_DIR);
    fs::create_dir_all(&content_dir)
        .with_context(|| format!("failed to create {}", content_dir.display()))?;

    for (n, slice) in content.chunks(index.chunk_size).enumerate() {
        write_json(
            &content_dir.join(format!("{}.json", n)),
            &serde_json::json!({ "content": slice }),
        )?;
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
