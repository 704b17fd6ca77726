//! Remote source download.
//!
//! Books whose raw source file is absent locally are fetched from the
//! HuggingFace datasets host: the configured template has `{{bookId}}`
//! substituted and the request authenticates with a bearer token from the
//! `HF_TOKEN` environment variable. Zip responses are extracted and the
//! relevant `.json` member located by exclusion of the archive's own
//! filename. Downloaded files are transient; the orchestrator deletes them
//! after a successful migration.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Environment variable holding the bearer token for the datasets host.
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Missing credential or URL template. Unlike a failed download, this aborts
/// the whole migration run rather than skipping the current book.
#[derive(Debug)]
pub struct MissingFetchConfig(pub String);

impl std::fmt::Display for MissingFetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote fetch not configured: {}", self.0)
    }
}

impl std::error::Error for MissingFetchConfig {}

/// Download a book's raw source into `out_dir` and return the path of the
/// JSON file to migrate from.
pub async fn download_source(
    book_id: u32,
    url_template: Option<&str>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let template = url_template.ok_or_else(|| {
        MissingFetchConfig("source.url_template is not set in the config file".to_string())
    })?;
    let token = std::env::var(TOKEN_ENV)
        .map_err(|_| MissingFetchConfig(format!("{} environment variable is not set", TOKEN_ENV)))?;

    let url = format!(
        "https://huggingface.co/datasets/{}",
        template.replace("{{bookId}}", &book_id.to_string())
    );
    let is_zip = url.ends_with(".zip");

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .with_context(|| format!("failed to download source for book {}", book_id))?;

    if !response.status().is_success() {
        bail!(
            "source download for book {} failed (HTTP {})",
            book_id,
            response.status()
        );
    }

    let bytes = response.bytes().await?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    if is_zip {
        let zip_path = out_dir.join("content.zip");
        fs::write(&zip_path, &bytes)
            .with_context(|| format!("failed to write {}", zip_path.display()))?;
        let json_path = extract_json_member(&zip_path, out_dir);
        // The archive is no longer needed whether or not extraction worked.
        let _ = fs::remove_file(&zip_path);
        json_path
    } else {
        let json_path = out_dir.join("content-old.json");
        fs::write(&json_path, &bytes)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        Ok(json_path)
    }
}

/// Extract the first `.json` member of the archive into `out_dir`.
fn extract_json_member(zip_path: &Path, out_dir: &Path) -> Result<PathBuf> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("failed to open {}", zip_path.display()))?;
    let mut archive =
        zip::ZipArchive::new(file).context("downloaded archive is not a valid zip")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() || !entry.name().ends_with(".json") {
            continue;
        }

        // Flatten any directory prefix inside the archive.
        let name = entry
            .name()
            .rsplit('/')
            .next()
            .unwrap_or("content-old.json")
            .to_string();
        let target = out_dir.join(name);

        let mut body = Vec::new();
        entry.read_to_end(&mut body)?;
        fs::write(&target, body)
            .with_context(|| format!("failed to write {}", target.display()))?;
        return Ok(target);
    }

    bail!("archive contains no .json member");
}
