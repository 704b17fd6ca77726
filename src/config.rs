use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Root of the persisted data tree: `books.json`, `translators.json`,
    /// and the per-book `books/<id>/` output directories.
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Items per persisted content chunk. The corpus was generated with 500;
    /// changing it only affects books migrated afterwards.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourceConfig {
    /// Remote source template with a `{{bookId}}` placeholder, resolved
    /// against the HuggingFace datasets host. Required only when a book's
    /// local source file is missing.
    pub url_template: Option<String>,
}

impl Config {
    pub fn book_dir(&self, book_id: u32) -> PathBuf {
        self.data.root.join("books").join(book_id.to_string())
    }

    pub fn books_path(&self) -> PathBuf {
        self.data.root.join("books.json")
    }

    pub fn translators_path(&self) -> PathBuf {
        self.data.root.join("translators.json")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }

    if let Some(ref template) = config.source.url_template {
        if !template.contains("{{bookId}}") {
            anyhow::bail!("source.url_template must contain a {{{{bookId}}}} placeholder");
        }
    }

    Ok(config)
}
