//! Catalog fetch errors
//!
//! The only failure the application models is "the catalog could not be
//! fetched". Variants classify the cause for logs; the UI only shows a
//! generic message.

use thiserror::Error;

/// Message shown to the user whenever the catalog fetch fails
pub const FETCH_FAILED_MESSAGE: &str = "Error :(";

/// Errors that can occur while fetching the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Could not build the HTTP client
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request could not be sent or the body could not be read
    #[error("Request to '{endpoint}' failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Catalog endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// Response body was not valid JSON of the expected shape
    #[error("Invalid catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GraphQL reported errors in the response
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Response had no `data.books` field
    #[error("Catalog response contained no books")]
    MissingData,
}

impl CatalogError {
    /// Whether trying again later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            CatalogError::Request { .. } => true,
            CatalogError::Status { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// The generic message shown in the UI
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
