//! Catalog command handlers

use anyhow::{anyhow, Result};
use rand::rng;
use tracing::warn;

use shelf_core::{Book, Catalog, CatalogClient, CatalogError, Config, FETCH_FAILED_MESSAGE};

use crate::output::Output;

/// Shown by `featured` when no favorites are configured
const NO_FAVORITES_HINT: [&str; 2] = [
    "No favorite titles configured. Set some with:",
    "  shelf config set favorite_titles \"Title One, Title Two\"",
];

/// Fetch the catalog, turning failures into the generic message
pub async fn load_catalog(config: &Config) -> Result<Catalog> {
    let client = CatalogClient::new(config).map_err(|e| fetch_error(&e))?;

    match client.fetch_catalog().await {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            warn!(error = %e, recoverable = e.is_recoverable(), "catalog fetch failed");
            Err(fetch_error(&e))
        }
    }
}

/// The error reported for a failed fetch
fn fetch_error(e: &CatalogError) -> anyhow::Error {
    if e.is_recoverable() {
        anyhow!("{} {} (try again later)", e.user_message(), e)
    } else {
        anyhow!("{} {}", e.user_message(), e)
    }
}

/// Zero-based page index for a 1-based `--page` value (0 means the first page)
fn page_index(page: usize) -> usize {
    page.saturating_sub(1)
}

/// List the catalog: everything, a random selection, or one page
pub async fn list(
    config: &Config,
    random: Option<usize>,
    page: Option<usize>,
    page_size: Option<usize>,
    output: &Output,
) -> Result<()> {
    let catalog = load_catalog(config).await?;

    if let Some(count) = random {
        let picks = catalog.random_picks(count, &mut rng());
        let books: Vec<&Book> = picks.iter().collect();
        output.print_books(&books);
    } else if let Some(page) = page {
        let size = page_size.unwrap_or(config.page_size);
        let page = catalog.page(page_index(page), size);
        output.print_page(&page);
    } else {
        let books: Vec<&Book> = catalog.books().iter().collect();
        output.print_books(&books);
    }

    Ok(())
}

/// Search the catalog by title
pub async fn search(config: &Config, term: String, output: &Output) -> Result<()> {
    let catalog = load_catalog(config).await?;
    let found = catalog.filter_by_title(&term);
    output.print_books(&found);
    Ok(())
}

/// Show the configured favorite titles found in the catalog
pub async fn featured(config: &Config, output: &Output) -> Result<()> {
    if config.favorite_titles.is_empty() {
        for line in NO_FAVORITES_HINT {
            output.message(line);
        }
        return Ok(());
    }

    let catalog = load_catalog(config).await?;
    let featured = catalog.featured(&config.favorite_titles);
    output.print_books(&featured);
    Ok(())
}
