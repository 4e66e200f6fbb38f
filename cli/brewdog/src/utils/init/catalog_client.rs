use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use brewdog_catalog::{CatalogClient, CatalogClientConfig, CatalogMockMode};
use tracing::debug;

use crate::config::Config;

/// Record all catalog traffic of this run to the given file.
pub const CATALOG_MOCK_RECORD_VAR: &str = "BREWDOG_CATALOG_MOCK_RECORD";
/// Serve catalog requests from a previous recording instead of the network.
pub const CATALOG_MOCK_REPLAY_VAR: &str = "BREWDOG_CATALOG_MOCK_REPLAY";

const DEFAULT_USER_AGENT: &str = concat!("brewdog/", env!("CARGO_PKG_VERSION"));

/// Initialize the catalog client
///
/// - Replay a recording if `$BREWDOG_CATALOG_MOCK_REPLAY` points to one
/// - Record to a file if `$BREWDOG_CATALOG_MOCK_RECORD` is set
/// - Talk to the configured catalog otherwise
pub fn init_catalog_client(config: &Config) -> Result<CatalogClient> {
    let client_config = catalog_client_config(config)?;
    debug!(
        catalog_url = %client_config.catalog_url,
        mock_mode = ?client_config.mock_mode,
        "using catalog client"
    );
    CatalogClient::new(client_config).context("Could not create catalog client")
}

fn catalog_client_config(config: &Config) -> Result<CatalogClientConfig> {
    let mut client_config = CatalogClientConfig::new(config.catalog_url.clone());
    client_config.timeout = config.request_timeout();
    client_config.user_agent = Some(
        config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
    );

    // Pass in a bool if we are running in CI, so requests can reflect this in the headers
    if std::env::var("CI").is_ok() {
        client_config
            .extra_headers
            .insert("brewdog-ci".to_string(), "true".to_string());
    }

    client_config.mock_mode = mock_mode()?;
    Ok(client_config)
}

fn mock_mode() -> Result<CatalogMockMode> {
    let record = std::env::var_os(CATALOG_MOCK_RECORD_VAR).map(PathBuf::from);
    let replay = std::env::var_os(CATALOG_MOCK_REPLAY_VAR).map(PathBuf::from);

    match (record, replay) {
        (None, None) => Ok(CatalogMockMode::None),
        (Some(_), Some(_)) => bail!(
            "only one of ${CATALOG_MOCK_RECORD_VAR} and ${CATALOG_MOCK_REPLAY_VAR} can be set"
        ),
        (Some(path), None) => Ok(CatalogMockMode::Record(path)),
        (None, Some(path)) => {
            if !path.exists() {
                bail!("path to mock data file doesn't exist: {}", path.display());
            }
            Ok(CatalogMockMode::Replay(path))
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn test_config() -> Config {
        Config {
            catalog_url: "http://localhost:1/v2/beers".parse().unwrap(),
            user_agent: None,
            request_timeout_secs: 3,
            sort_column: Default::default(),
            sort_direction: Default::default(),
            config_dir: None,
            state_dir: None,
        }
    }

    #[test]
    #[serial]
    fn defaults_without_mock() {
        let client_config = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, None::<&str>),
                (CATALOG_MOCK_REPLAY_VAR, None),
                ("CI", None),
            ],
            || catalog_client_config(&test_config()),
        )
        .unwrap();

        assert_eq!(client_config.mock_mode, CatalogMockMode::None);
        assert_eq!(client_config.timeout.as_secs(), 3);
        assert_eq!(client_config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
        assert!(client_config.extra_headers.is_empty());
    }

    #[test]
    #[serial]
    fn ci_header() {
        let client_config = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, None),
                (CATALOG_MOCK_REPLAY_VAR, None),
                ("CI", Some("1")),
            ],
            || catalog_client_config(&test_config()),
        )
        .unwrap();
        assert_eq!(
            client_config.extra_headers.get("brewdog-ci").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    #[serial]
    fn record_mode() {
        let mode = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, Some("/tmp/brewdog-recording.yaml")),
                (CATALOG_MOCK_REPLAY_VAR, None),
            ],
            mock_mode,
        )
        .unwrap();
        assert_eq!(
            mode,
            CatalogMockMode::Record("/tmp/brewdog-recording.yaml".into())
        );
    }

    #[test]
    #[serial]
    fn replay_requires_existing_file() {
        let result = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, None),
                (CATALOG_MOCK_REPLAY_VAR, Some("/does/not/exist.yaml")),
            ],
            mock_mode,
        );
        assert!(result.is_err());

        let recording = tempfile::NamedTempFile::new().unwrap();
        let path = recording.path().to_string_lossy().to_string();
        let mode = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, None),
                (CATALOG_MOCK_REPLAY_VAR, Some(path.as_str())),
            ],
            mock_mode,
        )
        .unwrap();
        assert_eq!(mode, CatalogMockMode::Replay(recording.path().to_path_buf()));
    }

    #[test]
    #[serial]
    fn record_and_replay_conflict() {
        let result = temp_env::with_vars(
            [
                (CATALOG_MOCK_RECORD_VAR, Some("a.yaml")),
                (CATALOG_MOCK_REPLAY_VAR, Some("b.yaml")),
            ],
            mock_mode,
        );
        assert!(result.is_err());
    }
}
