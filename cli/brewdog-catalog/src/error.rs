//! Error handling for catalog operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to load a page from the catalog.
///
/// Callers present every variant the same way; the variants only exist so
/// the cause can be logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to the catalog failed")]
    Request(#[source] reqwest::Error),
    #[error("catalog responded with {0}")]
    Status(StatusCode),
    #[error("catalog response is not a list of beers")]
    Decode(#[source] serde_json::Error),
}

/// Errors while setting up a [crate::CatalogClient].
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog url")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{}", .0)]
    Other(String),
}
