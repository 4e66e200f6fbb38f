//! HTTP client for the beer catalog.

use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, FetchError};
use crate::mock::MockGuard;
use crate::query::CatalogQuery;
use crate::types::Beer;

/// A client for the beer catalog.
///
/// Wraps a configured [reqwest::Client] and handles:
/// - HTTP client configuration with timeouts and headers
/// - Mock server recording/replay for testing
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    config: CatalogClientConfig,

    _mock_guard: Option<MockGuard>,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url.as_str())
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        // create a mock server if configured
        let mock_guard = MockGuard::new(&config);
        let base_url = match mock_guard {
            Some(ref mock) => mock.url(&config.catalog_url)?,
            None => config.catalog_url.clone(),
        };

        let http = build_http_client(&config)?;

        Ok(Self {
            http,
            base_url,
            config,
            _mock_guard: mock_guard,
        })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &Url {
        &self.config.catalog_url
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The catalog interface the browser needs.
///
/// This trait enables alternate implementations, for example canned
/// responses in tests.
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// The URL request paths are built against.
    fn base_url(&self) -> &Url;

    /// Fetch and parse one page of records from `url`.
    ///
    /// Exactly one request is sent. Network failures, non-success statuses
    /// and bodies that are not a list of beers are all a [FetchError].
    async fn fetch(&self, url: &Url) -> Result<Vec<Beer>, FetchError>;

    /// Fetch the page described by `query`.
    async fn fetch_page(&self, query: &CatalogQuery) -> Result<Vec<Beer>, FetchError> {
        let url = query.url(self.base_url());
        self.fetch(&url).await
    }
}

impl ClientTrait for CatalogClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<Vec<Beer>, FetchError> {
        debug!("sending catalog request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "catalog request unsuccessful");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Request)?;
        let beers: Vec<Beer> = serde_json::from_slice(&body).map_err(FetchError::Decode)?;

        debug!(n_records = beers.len(), "received catalog page");
        Ok(beers)
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        timeout = ?config.timeout,
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(config.timeout);

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}
