//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default timeout for a whole request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the beer catalog, e.g. `https://api.punkapi.com/v2/beers`.
    pub catalog_url: Url,
    /// Value of the `user-agent` header; reqwest's default if unset.
    pub user_agent: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Timeout for a whole request.
    pub timeout: Duration,
    /// Mock mode for testing.
    pub mock_mode: CatalogMockMode,
}

impl CatalogClientConfig {
    pub fn new(catalog_url: Url) -> Self {
        Self {
            catalog_url,
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            mock_mode: CatalogMockMode::None,
        }
    }
}

/// Mock recording/replay mode for integration testing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum CatalogMockMode {
    /// Use a real server without any mock recording or replaying.
    #[default]
    None,
    /// Proxy via a mock server and record interactions to a path.
    Record(PathBuf),
    /// Replay interactions from a path using a mock server.
    Replay(PathBuf),
}
