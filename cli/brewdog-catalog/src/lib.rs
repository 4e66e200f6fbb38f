//! Client and data shaping for the beer catalog.
//!
//! This crate provides:
//! - Request URL construction for paged catalog queries ([query])
//! - An HTTP client for fetching a page of beers ([CatalogClient])
//! - Client side sorting and filtering of a loaded page ([transform])
//! - Page bookkeeping ([PageController])
//! - Mock server recording/replay for offline sessions and tests
//!
//! ## Usage
//!
//! ```ignore
//! use brewdog_catalog::{CatalogClient, CatalogClientConfig, CatalogQuery, ClientTrait, Page};
//!
//! let config = CatalogClientConfig::new(DEFAULT_CATALOG_URL.parse()?);
//! let client = CatalogClient::new(config)?;
//! let beers = client.fetch_page(&CatalogQuery::new(Page::FIRST)).await?;
//! let rows = transform(&beers, SortColumn::Name, SortDirection::Asc, "");
//! ```

mod client;
mod config;
mod error;
mod mock;
pub mod page;
pub mod query;
pub mod transform;
pub mod types;

pub use client::{CatalogClient, ClientTrait};
pub use config::{CatalogClientConfig, CatalogMockMode, DEFAULT_REQUEST_TIMEOUT};
pub use error::{CatalogClientError, FetchError};
pub use page::{Page, PageController};
pub use query::{CatalogQuery, DEFAULT_CATALOG_URL, PER_PAGE, build_url};
pub use transform::{SearchText, SortColumn, SortDirection, transform};
pub use types::{Abv, Beer};
