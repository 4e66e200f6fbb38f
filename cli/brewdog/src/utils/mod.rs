use std::io::Stderr;
use std::sync::atomic::AtomicBool;
use std::sync::{LazyLock, Mutex};

pub mod init;
pub mod message;

pub static TERMINAL_STDERR: LazyLock<Mutex<Stderr>> =
    LazyLock::new(|| Mutex::new(std::io::stderr()));

/// Set while the interactive browser owns the terminal.
///
/// Log output and messages to stderr are dropped in the meantime, logs still
/// reach the log file.
pub static STDERR_SUPPRESSED: AtomicBool = AtomicBool::new(false);
