//! Request URL construction for the catalog API.

use url::Url;

use crate::page::Page;

/// Default location of the beer catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://api.punkapi.com/v2/beers";

/// Number of records requested per page.
pub const PER_PAGE: u32 = 10;

const PER_PAGE_PARAM: &str = "per_page";
const PAGE_PARAM: &str = "page";
const BEER_NAME_PARAM: &str = "beer_name";

/// A request for one page of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub page: Page,
    /// Server side name filter.
    pub beer_name: Option<String>,
}

impl CatalogQuery {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            beer_name: None,
        }
    }

    pub fn with_beer_name(mut self, beer_name: impl Into<String>) -> Self {
        self.beer_name = Some(beer_name.into());
        self
    }

    /// The request URL for this query relative to the catalog `base`.
    pub fn url(&self, base: &Url) -> Url {
        build_url(base, self.page, self.beer_name.as_deref())
    }
}

/// Build the request URL for `page` of the catalog at `base`.
///
/// `per_page` and `page` are always set. `beer_name` is only added for a
/// non-empty `search_text`. Any query already present on `base` is replaced.
pub fn build_url(base: &Url, page: Page, search_text: Option<&str>) -> Url {
    let mut url = base.clone();
    url.set_query(None);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(PER_PAGE_PARAM, &PER_PAGE.to_string());
        pairs.append_pair(PAGE_PARAM, &page.to_string());
        if let Some(text) = search_text.filter(|text| !text.is_empty()) {
            pairs.append_pair(BEER_NAME_PARAM, text);
        }
    }

    url
}
