//! Interaction state of the catalog browser.
//!
//! [App] owns everything the browser remembers: the current page, the
//! sort/search state of the table and the most recent fetch result. It never
//! performs I/O itself. Transitions hand back a [FetchRequest] when the
//! caller has to go to the network, and fetch results are fed back through
//! [App::complete].

use brewdog_catalog::{
    Beer,
    CatalogQuery,
    FetchError,
    Page,
    PageController,
    SearchText,
    SortColumn,
    SortDirection,
    transform,
};
use tracing::debug;

/// User intents the browser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextPage,
    PreviousPage,
    /// Activate a column header.
    SortBy(SortColumn),
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    CursorUp,
    CursorDown,
    Quit,
}

/// Sort and search state of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub column: SortColumn,
    pub direction: SortDirection,
    /// The search box content as typed.
    pub search_input: String,
}

impl ViewState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column,
            direction,
            search_input: String::new(),
        }
    }

    /// Activating the active column flips the direction, any other column
    /// becomes active and keeps the current direction.
    pub fn sort_by(&mut self, column: SortColumn) {
        if column == self.column {
            self.direction = self.direction.toggle();
        } else {
            self.column = column;
        }
    }

    pub fn search(&self) -> SearchText {
        SearchText::new(&self.search_input)
    }
}

/// What the table currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// A fetch is in flight, nothing is rendered.
    Loading,
    Loaded(Vec<Beer>),
    Failed,
}

/// A fetch the caller must perform and report back via [App::complete].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: CatalogQuery,
}

#[derive(Debug)]
pub struct App {
    pages: PageController,
    defaults: ViewState,
    view: ViewState,
    load: LoadState,
    cursor: usize,
    /// Sequence number of the latest issued request.
    latest: u64,
    quit: bool,
}

impl App {
    pub fn new(start: Page, defaults: ViewState) -> Self {
        Self {
            pages: PageController::new(start),
            view: defaults.clone(),
            defaults,
            load: LoadState::Loading,
            cursor: 0,
            latest: 0,
            quit: false,
        }
    }

    /// Request the initial page.
    pub fn start(&mut self) -> FetchRequest {
        self.request_current_page()
    }

    fn request_current_page(&mut self) -> FetchRequest {
        self.latest += 1;
        self.load = LoadState::Loading;
        // the table is torn down while loading, so its state goes with it
        self.view = self.defaults.clone();
        self.cursor = 0;

        let request = FetchRequest {
            seq: self.latest,
            query: CatalogQuery::new(self.pages.current()),
        };
        debug!(seq = request.seq, page = %request.query.page, "requesting page");
        request
    }

    /// Apply `action`.
    ///
    /// Only page changes return a [FetchRequest]; sorting, searching and
    /// cursor movement work on the loaded page.
    pub fn handle(&mut self, action: Action) -> Option<FetchRequest> {
        match action {
            Action::NextPage => {
                if self.pages.next() {
                    return Some(self.request_current_page());
                }
            },
            Action::PreviousPage => {
                if self.pages.previous() {
                    return Some(self.request_current_page());
                }
            },
            Action::SortBy(column) => {
                if self.is_loaded() {
                    self.view.sort_by(column);
                }
            },
            Action::SearchInput(c) => {
                if self.is_loaded() {
                    self.view.search_input.push(c);
                    self.clamp_cursor();
                }
            },
            Action::SearchBackspace => {
                self.view.search_input.pop();
                self.clamp_cursor();
            },
            Action::SearchClear => {
                self.view.search_input.clear();
                self.clamp_cursor();
            },
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorDown => {
                self.cursor += 1;
                self.clamp_cursor();
            },
            Action::Quit => self.quit = true,
        }
        None
    }

    /// Deliver the result of the request numbered `seq`.
    ///
    /// Results of anything but the latest request are discarded, so a slow
    /// response for a page the user already left never replaces a newer one.
    /// Returns whether the result was applied.
    pub fn complete(&mut self, seq: u64, result: Result<Vec<Beer>, FetchError>) -> bool {
        if seq != self.latest {
            debug!(seq, latest = self.latest, "discarding stale response");
            return false;
        }

        self.load = match result {
            Ok(beers) => {
                debug!(seq, n_records = beers.len(), "page loaded");
                LoadState::Loaded(beers)
            },
            Err(err) => {
                debug!(seq, error = ?err, "failed to load page");
                LoadState::Failed
            },
        };
        self.clamp_cursor();
        true
    }

    fn clamp_cursor(&mut self) {
        let n_rows = self.visible_rows().len();
        self.cursor = self.cursor.min(n_rows.saturating_sub(1));
    }

    fn is_loaded(&self) -> bool {
        matches!(self.load, LoadState::Loaded(_))
    }

    /// The loaded records in display order with the search applied.
    pub fn visible_rows(&self) -> Vec<Beer> {
        match &self.load {
            LoadState::Loaded(beers) => transform(
                beers,
                self.view.column,
                self.view.direction,
                self.view.search().as_str(),
            ),
            LoadState::Loading | LoadState::Failed => Vec::new(),
        }
    }

    pub fn page(&self) -> Page {
        self.pages.current()
    }

    pub fn has_previous_page(&self) -> bool {
        self.pages.has_previous()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
