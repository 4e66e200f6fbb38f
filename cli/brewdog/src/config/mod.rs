use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use brewdog_catalog::{DEFAULT_CATALOG_URL, DEFAULT_REQUEST_TIMEOUT, SortColumn, SortDirection};
use config::{Config as HierarchicalConfig, Environment};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::app::ViewState;

/// Name of brewdog managed directories (config, state)
const BREWDOG_DIR_NAME: &str = "brewdog";
pub const BREWDOG_CONFIG_DIR_VAR: &str = "BREWDOG_CONFIG_DIR";
pub const BREWDOG_CONFIG_FILE: &str = "brewdog.toml";
const ENV_PREFIX: &str = "BREWDOG_";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Endpoint listing the beers
    pub catalog_url: Url,

    /// `User-Agent` sent with every catalog request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Give up on a catalog request after this many seconds
    pub request_timeout_secs: u64,

    /// Column the table is sorted by when a page is loaded
    pub sort_column: SortColumn,

    /// Direction the table is sorted in when a page is loaded
    pub sort_direction: SortDirection,

    /// Directory the configuration file is read from (default:
    /// `$XDG_CONFIG_HOME/brewdog`)
    #[serde(default)]
    pub config_dir: Option<PathBuf>,

    /// Directory for the interactive session log (default:
    /// `$XDG_STATE_HOME/brewdog`)
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Config {
    fn read_raw_config() -> Result<HierarchicalConfig> {
        let config_dir = match env::var(BREWDOG_CONFIG_DIR_VAR) {
            Ok(v) => {
                debug!("`${BREWDOG_CONFIG_DIR_VAR}` set: {v}");
                Some(PathBuf::from(v))
            },
            Err(_) => {
                let config_dir = dirs::config_dir().map(|dir| dir.join(BREWDOG_DIR_NAME));
                debug!("`${BREWDOG_CONFIG_DIR_VAR}` not set, using {config_dir:?}");
                config_dir
            },
        };
        let state_dir = dirs::state_dir()
            .or_else(dirs::cache_dir)
            .map(|dir| dir.join(BREWDOG_DIR_NAME));

        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", DEFAULT_CATALOG_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT.as_secs())?
            .set_default("sort_column", SortColumn::default().to_string())?
            .set_default("sort_direction", SortDirection::default().to_string())?;

        if let Some(state_dir) = state_dir.as_ref().and_then(|dir| dir.to_str()) {
            builder = builder.set_default("state_dir", state_dir)?;
        }
        if let Some(config_dir) = config_dir.as_ref().and_then(|dir| dir.to_str()) {
            // the config file cannot change the config dir
            builder = builder.set_override("config_dir", config_dir)?;
        }

        // read from /etc
        builder = builder.add_source(
            config::File::from(PathBuf::from("/etc").join(BREWDOG_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // user or explicit config dir file last
        if let Some(config_dir) = &config_dir {
            builder = builder.add_source(
                config::File::from(config_dir.join(BREWDOG_CONFIG_FILE))
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        // override via env variables
        let brewdog_envs = env::vars()
            .filter_map(|(k, v)| k.strip_prefix(ENV_PREFIX).map(|k| (k.to_owned(), v)))
            .collect::<HashMap<_, _>>();

        let builder = builder.add_source(
            Environment::default()
                .source(Some(brewdog_envs))
                .try_parsing(true),
        );

        Ok(builder.build()?)
    }

    /// Creates a [Config] from the environment and config files
    pub fn parse() -> Result<Config> {
        let final_config = Self::read_raw_config()?;
        let cli_config: Config = final_config
            .try_deserialize()
            .context("Could not parse config")?;
        Ok(cli_config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Sort/search state every freshly loaded page starts with.
    pub fn view_defaults(&self) -> ViewState {
        ViewState::new(self.sort_column, self.sort_direction)
    }
}
