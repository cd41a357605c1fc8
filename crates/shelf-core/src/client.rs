//! GraphQL catalog client
//!
//! Fetches the book catalog with a single POST of a fixed query. There is
//! no retry, caching or pagination: the catalog is read once at startup.

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::models::Book;

/// The query sent to the catalog endpoint
pub const BOOKS_QUERY: &str = "query Books {
  books {
    author
    coverPhotoURL
    readingLevel
    title
  }
}";

/// Client for the catalog endpoint
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    /// Build a client from configuration
    pub fn new(config: &Config) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::Client)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch all books
    pub async fn fetch_books(&self) -> CatalogResult<Vec<Book>> {
        info!(endpoint = %self.endpoint, "fetching catalog");

        let body = serde_json::json!({ "query": BOOKS_QUERY }).to_string();
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| self.request_error(source))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "catalog endpoint returned an error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| self.request_error(source))?;

        let books = parse_books_response(&text)?;
        info!(count = books.len(), "catalog fetched");
        Ok(books)
    }

    /// Fetch all books wrapped as a `Catalog`
    pub async fn fetch_catalog(&self) -> CatalogResult<Catalog> {
        self.fetch_books().await.map(Catalog::new)
    }

    fn request_error(&self, source: reqwest::Error) -> CatalogError {
        warn!(endpoint = %self.endpoint, error = %source, "catalog request failed");
        CatalogError::Request {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<BooksData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct BooksData {
    books: Option<Vec<Book>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Parse the JSON body of a `books` query response
///
/// Errors reported by the server win over any partial data.
pub fn parse_books_response(body: &str) -> CatalogResult<Vec<Book>> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(CatalogError::GraphQl(messages.join("; ")));
    }

    response
        .data
        .and_then(|data| data.books)
        .ok_or(CatalogError::MissingData)
}
