use std::fmt::Display;
use std::sync::atomic::Ordering;

use crossterm::style::Stylize;

use crate::utils::STDERR_SUPPRESSED;

/// Write a message to stderr.
///
/// Messages are dropped while the browser owns the terminal.
fn print_message(v: impl Display) {
    #[cfg(test)]
    {
        let history = crate::utils::message::history::History::global();
        history.push_message(format!("{v}"));
    }

    if STDERR_SUPPRESSED.load(Ordering::Relaxed) {
        return;
    }
    eprintln!("{v}");
}

pub(crate) fn error(v: impl Display) {
    print_message(format_error(v));
}

/// double width character, add an additional space for alignment
pub(crate) fn warning(v: impl Display) {
    print_message(std::format_args!("⚠️  {v}"));
}

pub fn format_error(v: impl Display) -> String {
    let icon = if stderr_supports_color() {
        "✘".red().to_string()
    } else {
        "✘".to_string()
    };
    format!("{icon} ERROR: {v}")
}

pub fn stdout_supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn stderr_supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stderr).is_some()
}

/// Messages printed through this module in the current thread.
///
/// Tests run on separate threads, so a thread local history keeps their
/// messages apart without passing a writer through every caller.
#[cfg(test)]
pub mod history {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    thread_local! {
        static THREAD_HISTORY: Rc<RefCell<VecDeque<String>>> = {
            Rc::new(RefCell::new(VecDeque::new()))
        };
    }

    pub(crate) struct History {
        messages: Rc<RefCell<VecDeque<String>>>,
    }

    impl History {
        pub(crate) fn global() -> History {
            let messages = THREAD_HISTORY.with(|h| h.clone());
            History { messages }
        }

        /// Snapshot of the messages, oldest first.
        pub(crate) fn messages(&self) -> VecDeque<String> {
            self.messages.borrow().clone()
        }

        pub(crate) fn push_message(&self, message: String) {
            self.messages.borrow_mut().push_back(message);
        }

        pub(crate) fn clear(&self) {
            self.messages.borrow_mut().clear();
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::utils::message::warning;

        #[test]
        fn concurrent_1() {
            warning("1");
            assert_eq!(&History::global().messages(), &["⚠️  1"])
        }

        #[test]
        fn concurrent_2() {
            warning("2");
            assert_eq!(&History::global().messages(), &["⚠️  2"])
        }

        #[test]
        fn clear() {
            warning("gone");
            History::global().clear();
            assert!(History::global().messages().is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::history::History;
    use super::*;

    #[test]
    fn error_is_prefixed() {
        error("an error occurred :/");
        let messages = History::global().messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("ERROR: an error occurred :/"));
    }
}
