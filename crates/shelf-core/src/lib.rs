//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a book catalog
//! viewer with a personal reading list.
//!
//! # Architecture
//!
//! - **Catalog**: fetched once from a GraphQL endpoint, read-only afterwards
//! - **Reading list**: in-memory, deduplicated by title, never persisted
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let catalog = CatalogClient::new(&config)?.fetch_catalog().await?;
//!
//! let mut list = ReadingList::new();
//! for book in catalog.filter_by_title("cat") {
//!     list.add_book(book.clone());
//! }
//! ```
//!
//! # Modules
//!
//! - `reading_list`: Reading list store and snapshot publishing
//! - `catalog`: Catalog state, search, random picks and pages
//! - `client`: GraphQL catalog client
//! - `models`: The `Book` type
//! - `error`: Catalog fetch errors
//! - `config`: Application configuration

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod reading_list;

pub use catalog::{Catalog, CatalogPage, CatalogState};
pub use client::CatalogClient;
pub use config::Config;
pub use error::{CatalogError, CatalogResult, FETCH_FAILED_MESSAGE};
pub use models::Book;
pub use reading_list::{
    spawn_reading_list_task, ReadingList, ReadingListCommand, ReadingListHandle,
    ReadingListSnapshot,
};
