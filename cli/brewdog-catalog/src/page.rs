//! Page numbers and the controller that moves between them.

use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 1-based catalog page number.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Page(NonZeroU32);

impl Page {
    pub const FIRST: Page = Page(NonZeroU32::MIN);

    /// Returns `None` for page `0`.
    pub fn new(page: u32) -> Option<Self> {
        NonZeroU32::new(page).map(Page)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The following page.
    ///
    /// There is no upper bound: the catalog decides when a page is empty.
    pub fn next(self) -> Page {
        Page(self.0.saturating_add(1))
    }

    /// The preceding page, or `self` on the first page.
    pub fn previous(self) -> Page {
        NonZeroU32::new(self.0.get() - 1)
            .map(Page)
            .unwrap_or(self)
    }

    pub fn has_previous(self) -> bool {
        self != Page::FIRST
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageParseError {
    #[error("page must be a number: {0}")]
    NotANumber(String),
    #[error("pages start at 1")]
    Zero,
}

impl FromStr for Page {
    type Err = PageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .trim()
            .parse::<u32>()
            .map_err(|_| PageParseError::NotANumber(s.to_string()))?;
        Page::new(number).ok_or(PageParseError::Zero)
    }
}

/// Owns the current page.
///
/// Page transitions are the only thing that should cause a new fetch, so both
/// transitions report whether the page actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageController {
    current: Page,
}

impl PageController {
    pub fn new(start: Page) -> Self {
        Self { current: start }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Move to the next page.
    pub fn next(&mut self) -> bool {
        let next = self.current.next();
        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Move to the previous page; a no-op on page 1.
    pub fn previous(&mut self) -> bool {
        let previous = self.current.previous();
        let changed = previous != self.current;
        self.current = previous;
        changed
    }

    /// Whether the "previous" control is enabled.
    pub fn has_previous(&self) -> bool {
        self.current.has_previous()
    }
}
