//! Catalog query result and selection helpers
//!
//! The catalog is fetched once at startup and never modified. Everything in
//! this module is a read-only view over it: title search, random picks,
//! pages and the featured shelf.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Book;

/// Status of the one-shot catalog fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    /// Fetch in flight
    Loading,
    /// Fetch failed; holds the error description
    Failed(String),
    /// Fetch succeeded
    Ready(Catalog),
}

impl CatalogState {
    /// Whether the fetch is still in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    /// Whether the fetch failed
    pub fn is_error(&self) -> bool {
        matches!(self, CatalogState::Failed(_))
    }

    /// The fetched books, if the fetch succeeded
    pub fn books(&self) -> Option<&[Book]> {
        self.catalog().map(Catalog::books)
    }

    /// The catalog, if the fetch succeeded
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}

/// One page of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage<'a> {
    /// Zero-based page index (after clamping)
    pub index: usize,
    /// Total number of pages (at least 1)
    pub total_pages: usize,
    /// Books on this page
    pub books: &'a [Book],
}

/// The fetched sequence of books
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl From<Vec<Book>> for Catalog {
    fn from(books: Vec<Book>) -> Self {
        Self::new(books)
    }
}

impl Catalog {
    /// Wrap a fetched list of books
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// All books in fetch order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Books whose title contains `term`, ignoring case
    ///
    /// Catalog order is preserved. An empty term matches everything.
    pub fn filter_by_title(&self, term: &str) -> Vec<&Book> {
        let needle = term.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title_matches(&needle))
            .collect()
    }

    /// Up to `count` distinct books in random order
    pub fn random_picks<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Book> {
        let mut shuffled = self.books.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        shuffled
    }

    /// The page at `index` when split into pages of `size` books
    ///
    /// A zero size is treated as one. Indices past the end clamp to the last
    /// page; an empty catalog has one empty page.
    pub fn page(&self, index: usize, size: usize) -> CatalogPage<'_> {
        let size = size.max(1);
        let total_pages = self.books.len().div_ceil(size).max(1);
        let index = index.min(total_pages - 1);

        let start = (index * size).min(self.books.len());
        let end = (start + size).min(self.books.len());

        CatalogPage {
            index,
            total_pages,
            books: &self.books[start..end],
        }
    }

    /// Catalog books whose titles appear in `titles`, in that order
    ///
    /// Titles match exactly. Unknown titles are skipped.
    pub fn featured(&self, titles: &[String]) -> Vec<&Book> {
        titles
            .iter()
            .filter_map(|title| self.books.iter().find(|b| &b.title == title))
            .collect()
    }
}
