use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result};
use tracing::{debug, error};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;
use crate::utils::{STDERR_SUPPRESSED, TERMINAL_STDERR};

const LOG_FILE_PREFIX: &str = "brewdog";
const LOG_FILE_SUFFIX: &str = "log";

struct LockingTerminalStderr;
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LockingTerminalStderr {
    type Writer = LockingTerminalStderr;

    fn make_writer(&'a self) -> Self::Writer {
        LockingTerminalStderr
    }
}

impl std::io::Write for LockingTerminalStderr {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if STDERR_SUPPRESSED.load(Ordering::Relaxed) {
            return Ok(buf.len());
        }
        if let Ok(mut guard) = TERMINAL_STDERR.lock() {
            guard.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut guard) = TERMINAL_STDERR.lock() {
            guard.flush()?
        }
        Ok(())
    }
}

static LOG_FILE: OnceLock<Mutex<RollingFileAppender>> = OnceLock::new();

/// Writes to the log file once [init_log_file] succeeded, discards
/// everything before.
struct LockingLogFile;
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LockingLogFile {
    type Writer = LockingLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        LockingLogFile
    }
}

impl std::io::Write for LockingLogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Some(Ok(mut file)) = LOG_FILE.get().map(Mutex::lock) {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(Ok(mut file)) = LOG_FILE.get().map(Mutex::lock) {
            file.flush()?;
        }
        Ok(())
    }
}

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// The default filter for a verbosity level, used unless `RUST_LOG` is set.
pub(crate) fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,brewdog=error,brewdog_catalog=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,brewdog=warn,brewdog_catalog=warn",
        Verbosity::Verbose(1) => "off,brewdog=info,brewdog_catalog=info",
        Verbosity::Verbose(2) => "off,brewdog=debug,brewdog_catalog=debug",
        Verbosity::Verbose(3) => "off,brewdog=trace,brewdog_catalog=trace",
        // Also show what reqwest and friends are up to
        Verbosity::Verbose(4) => "debug,brewdog=trace,brewdog_catalog=trace",
        Verbosity::Verbose(_) => "trace",
    }
}

pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        let (subscriber, reload_handle) = create_registry_and_filter_reload_handle();
        subscriber.init();
        reload_handle
    });

    update_filters(filter_handle, log_filter(verbosity));
}

pub fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}

pub fn create_registry_and_filter_reload_handle() -> (
    impl tracing_subscriber::layer::SubscriberExt,
    Handle<EnvFilter, Registry>,
) {
    // Start permissive, `init_logger` narrows the filter right away.
    let filter = EnvFilter::new("trace");
    let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(LockingTerminalStderr)
        .event_format(tracing_subscriber::fmt::format());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(LockingLogFile);

    // The filter applies to both outputs.
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(log_layer)
        .with(file_layer);

    (registry, filter_reload_handle)
}

/// Start persisting logs to `brewdog.log` in `dir`.
///
/// Only the first call opens a file, later calls return the path of the
/// already open one.
pub(crate) fn init_log_file(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{LOG_FILE_PREFIX}.{LOG_FILE_SUFFIX}"));
    if LOG_FILE.get().is_some() {
        return Ok(path);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .context("Could not open log file")?;
    // a concurrent caller may have won, either file is fine
    let _ = LOG_FILE.set(Mutex::new(appender));

    debug!(path = %path.display(), "logging to file");
    Ok(path)
}
