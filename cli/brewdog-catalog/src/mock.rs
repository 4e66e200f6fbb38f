//! Mock server infrastructure for recording and replaying catalog traffic.
//!
//! Recording proxies every request through a local `httpmock` server and
//! writes the interactions to a file when the client goes away. Replaying
//! serves a previous recording, so sessions can be reproduced offline.

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use httpmock::{MockServer, RecordingID};
use tracing::{debug, error};
use url::Url;

use crate::config::{CatalogClientConfig, CatalogMockMode};

/// Guard to keep a `MockServer` running until the `CatalogClient` is dropped.
#[allow(dead_code)] // https://github.com/rust-lang/rust/issues/122833
pub(crate) enum MockGuard {
    Record(MockRecorder),
    Replay(MockServer),
}

impl MockGuard {
    pub(crate) fn new(config: &CatalogClientConfig) -> Option<Self> {
        match &config.mock_mode {
            CatalogMockMode::None => None,
            CatalogMockMode::Record(path) => {
                let upstream = config.catalog_url.origin().ascii_serialization();
                let server = MockServer::start();
                let recording = start_recording(&server, &upstream);

                debug!(?path, server = server.base_url(), "mock server recording");
                Some(MockGuard::Record(MockRecorder {
                    path: path.to_path_buf(),
                    server,
                    recording,
                }))
            },
            CatalogMockMode::Replay(path) => {
                let server = MockServer::start();
                server.playback(path);
                debug!(?path, server = server.base_url(), "mock server replaying");

                Some(MockGuard::Replay(server))
            },
        }
    }

    fn server(&self) -> &MockServer {
        match self {
            MockGuard::Record(recorder) => &recorder.server,
            MockGuard::Replay(server) => server,
        }
    }

    /// The catalog URL as seen through the mock server.
    ///
    /// Only scheme, host and port are swapped, so the catalog path stays
    /// intact.
    pub(crate) fn url(&self, catalog_url: &Url) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.server().base_url())?;
        url.set_path(catalog_url.path());
        Ok(url)
    }
}

fn start_recording(server: &MockServer, upstream: &str) -> RecordingID {
    server.forward_to(upstream, |rule| {
        rule.filter(|when| {
            when.any_request();
        });
    });
    server.record(|rule| {
        rule.filter(|when| {
            when.any_request();
        });
    })
}

impl Debug for MockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let url = self.server().base_url();
        let mode = match self {
            MockGuard::Record(_) => "MockGuard::Record",
            MockGuard::Replay(_) => "MockGuard::Replay",
        };
        write!(f, "{mode} url={url}")
    }
}

/// In addition to keeping a `MockServer` running, also write any recorded
/// requests to a file when dropped.
pub(crate) struct MockRecorder {
    pub(crate) path: PathBuf,
    pub(crate) server: MockServer,
    pub(crate) recording: RecordingID,
}

impl Drop for MockRecorder {
    fn drop(&mut self) {
        // Something unique in the name, otherwise parallel recordings race
        // each other.
        let name = format!(
            "httpmock_{}",
            self.path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default()
        );

        // `record_save` appends a timestamp, so we rename after write.
        // https://github.com/alexliesenfeld/httpmock/issues/115
        let tempfile = match self.server.record_save(&self.recording, name) {
            Ok(tempfile) => tempfile,
            Err(err) => {
                error!(?err, path = ?self.path, "failed to save mock recording");
                return;
            },
        };
        debug!(
            src = %tempfile.as_path().display(),
            dest = %self.path.as_path().display(),
            "renaming recorded mock file"
        );
        match fs::rename(&tempfile, &self.path) {
            Ok(()) => debug!(path = ?self.path, "saved mock recording"),
            Err(err) => error!(%err, path = ?self.path, "failed to rename recorded mock file"),
        }
    }
}
