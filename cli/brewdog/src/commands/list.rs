use anyhow::{Context, Result};
use bpaf::Bpaf;
use brewdog_catalog::{
    Beer,
    CatalogQuery,
    ClientTrait,
    Page,
    SearchText,
    SortColumn,
    SortDirection,
    transform,
};
use crossterm::style::Stylize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::utils::init::init_catalog_client;
use crate::utils::message::stdout_supports_color;
use crate::view::{self, FETCH_ERROR_MESSAGE, RowView};

/// The catalog could not be loaded.
///
/// Carries no cause on purpose, users get the same message for every
/// failure. The cause is logged.
#[derive(Debug, Error)]
#[error("{}", FETCH_ERROR_MESSAGE)]
pub struct FetchFailed;

#[derive(Bpaf, Clone, Debug)]
pub struct List {
    /// Page to print
    #[bpaf(long, short, argument("N"), fallback(Page::FIRST))]
    pub(crate) page: Page,

    /// Column to sort by: name, description, tagline or abv
    #[bpaf(long, argument("COLUMN"))]
    pub(crate) sort: Option<SortColumn>,

    /// Sort direction: asc or desc
    #[bpaf(long, argument("DIRECTION"))]
    pub(crate) direction: Option<SortDirection>,

    /// Only show beers of the page whose name, description or tagline
    /// contains TEXT
    #[bpaf(long, argument("TEXT"))]
    pub(crate) search: Option<String>,

    /// Let the catalog search beers by name across all pages
    #[bpaf(long("beer-name"), argument("TEXT"))]
    pub(crate) beer_name: Option<String>,

    /// Print rows as JSON
    #[bpaf(long)]
    pub(crate) json: bool,
}

impl List {
    #[instrument(name = "list", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = init_catalog_client(&config)?;
        let output = self.run(&client, &config).await?;
        println!("{output}");
        Ok(())
    }

    async fn run(&self, client: &impl ClientTrait, config: &Config) -> Result<String> {
        let column = self.sort.unwrap_or(config.sort_column);
        let direction = self.direction.unwrap_or(config.sort_direction);

        let rows = self.fetch_rows(client, column, direction).await?;
        if self.json {
            let rows = rows.iter().map(RowView::from).collect::<Vec<_>>();
            return serde_json::to_string_pretty(&rows).context("Could not serialize rows");
        }
        Ok(render_table(&rows, column, direction))
    }

    async fn fetch_rows(
        &self,
        client: &impl ClientTrait,
        column: SortColumn,
        direction: SortDirection,
    ) -> Result<Vec<Beer>, FetchFailed> {
        let mut query = CatalogQuery::new(self.page);
        if let Some(beer_name) = &self.beer_name {
            query = query.with_beer_name(beer_name);
        }

        let beers = client.fetch_page(&query).await.map_err(|err| {
            debug!(error = ?err, "fetching page failed");
            FetchFailed
        })?;
        debug!(n_records = beers.len(), page = %self.page, "fetched page");

        let search = SearchText::new(self.search.as_deref().unwrap_or_default());
        Ok(transform(&beers, column, direction, search.as_str()))
    }
}

fn render_table(rows: &[Beer], column: SortColumn, direction: SortDirection) -> String {
    let lines = view::table(rows, column, direction);
    let color = stdout_supports_color();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = line.text();
            let text = text.trim_end();
            if i == 0 && color {
                text.bold().to_string()
            } else {
                text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
