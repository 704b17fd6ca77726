//! Catalog listing for the `books` command.

use anyhow::Result;

use crate::config::Config;
use crate::loader;
use crate::migrate;
use crate::models::BookKind;

/// List the catalog with each book's migration status.
pub fn run_books(config: &Config) -> Result<()> {
    let books = loader::load_books(config)?;

    println!("{:<8} {:<24} {:<10} {:<10} TITLE", "ID", "SLUG", "TYPE", "STATUS");
    println!("{}", "-".repeat(72));

    for book in &books {
        let kind = match book.kind {
            BookKind::Scripture => "scripture",
            BookKind::Hadith => "hadith",
        };
        let status = if migrate::artifacts_complete(&config.book_dir(book.id)) {
            "migrated"
        } else {
            "pending"
        };
        println!(
            "{:<8} {:<24} {:<10} {:<10} {}",
            book.id, book.slug, kind, status, book.title
        );
    }

    println!();
    println!("{} book(s) in catalog", books.len());
    Ok(())
}
