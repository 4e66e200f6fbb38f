//! Rendering of the browser state into styled text.
//!
//! Everything in here is a pure function of [App]. The terminal driver only
//! paints the resulting [Frame] and asks it which [Action] a mouse click
//! landed on.

use std::ops::Range;

use brewdog_catalog::{Beer, SortColumn, SortDirection};
use serde::Serialize;
use textwrap::core::display_width;

use crate::app::{Action, App, LoadState};

pub const TITLE: &str = "Brewdog API";
/// Shown in place of the table whenever a fetch fails.
pub const FETCH_ERROR_MESSAGE: &str = "an error occurred :/";
pub const PREVIOUS_PAGE_LABEL: &str = "last page";
pub const NEXT_PAGE_LABEL: &str = "next page";

/// Descriptions are cut to this many characters in the table.
const DESCRIPTION_PREVIEW_CHARS: usize = 20;
const COLUMN_GAP: &str = "  ";
/// Trails every browser row whose beer has an image.
pub const IMAGE_MARKER: &str = "▣";
const IMAGE_HEADER: &str = "Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Title,
    Header,
    ActiveHeader,
    Button,
    DisabledButton,
    Selected,
    Detail,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

impl Segment {
    fn new(text: impl Into<String>, style: SegmentStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SegmentStyle::Plain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    fn push(&mut self, segment: Segment) -> Range<u16> {
        let start = self.width();
        self.segments.push(segment);
        start..self.width()
    }

    pub fn width(&self) -> u16 {
        let width: usize = self.segments.iter().map(|s| display_width(&s.text)).sum();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// The line without styling.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

impl From<Segment> for Line {
    fn from(segment: Segment) -> Self {
        Line {
            segments: vec![segment],
        }
    }
}

/// A screen region that triggers `action` when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub row: u16,
    pub columns: Range<u16>,
    pub action: Action,
}

/// One rendered screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
    pub targets: Vec<ClickTarget>,
}

impl Frame {
    fn push_line(&mut self, line: impl Into<Line>) -> u16 {
        let row = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        self.lines.push(line.into());
        row
    }

    fn push_target(&mut self, row: u16, columns: Range<u16>, action: Action) {
        self.targets.push(ClickTarget {
            row,
            columns,
            action,
        });
    }

    /// The action bound to the cell at (`column`, `row`), if any.
    pub fn target_at(&self, column: u16, row: u16) -> Option<Action> {
        self.targets
            .iter()
            .find(|target| target.row == row && target.columns.contains(&column))
            .map(|target| target.action)
    }
}

/// A [Beer] as it appears in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: u64,
    pub name: String,
    pub tagline: String,
    /// Shortened description.
    pub description: String,
    /// Full description.
    pub title: String,
    pub abv: String,
    pub image_url: Option<String>,
}

impl From<&Beer> for RowView {
    fn from(beer: &Beer) -> Self {
        let description = single_line(&beer.description);
        RowView {
            id: beer.id,
            name: single_line(&beer.name),
            tagline: single_line(&beer.tagline),
            description: preview(&description),
            title: description,
            abv: single_line(&format!("{}%", beer.abv)),
            image_url: beer.image_url.as_deref().map(single_line),
        }
    }
}

impl RowView {
    fn cell(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Name => &self.name,
            SortColumn::Description => &self.description,
            SortColumn::Tagline => &self.tagline,
            SortColumn::Abv => &self.abv,
        }
    }
}

/// `text` with every control character replaced by a space.
///
/// Catalog text is printed to a raw mode terminal, where a stray `\n` or `\r`
/// would move the cursor and tear the table apart.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// The first characters of `description` followed by `...`.
///
/// The ellipsis is appended even when nothing was cut.
fn preview(description: &str) -> String {
    let mut preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

/// Widths of the table columns, in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    name: usize,
    description: usize,
    tagline: usize,
    abv: usize,
}

impl ColumnWidths {
    pub const FULL: ColumnWidths = ColumnWidths {
        name: 24,
        description: DESCRIPTION_PREVIEW_CHARS + 3,
        tagline: 36,
        abv: 7,
    };
    const MIN_NAME: usize = 10;
    const MIN_TAGLINE: usize = 10;

    /// The widest layout whose rows fit into `width` terminal columns.
    ///
    /// Taglines give up space first, then names. Descriptions and ABV keep
    /// their width, so below [ColumnWidths::min_width] rows overflow.
    pub fn fitting(width: u16) -> Self {
        let mut widths = Self::FULL;
        let mut excess = widths.row_width().saturating_sub(usize::from(width));

        let cut = excess.min(widths.tagline - Self::MIN_TAGLINE);
        widths.tagline -= cut;
        excess -= cut;

        let cut = excess.min(widths.name - Self::MIN_NAME);
        widths.name -= cut;

        widths
    }

    /// Width of the narrowest layout.
    pub fn min_width() -> usize {
        ColumnWidths {
            name: Self::MIN_NAME,
            tagline: Self::MIN_TAGLINE,
            ..Self::FULL
        }
        .row_width()
    }

    fn get(&self, column: SortColumn) -> usize {
        match column {
            SortColumn::Name => self.name,
            SortColumn::Description => self.description,
            SortColumn::Tagline => self.tagline,
            SortColumn::Abv => self.abv,
        }
    }

    /// Width of a browser row including the image marker.
    pub fn row_width(&self) -> usize {
        let columns: usize = SortColumn::ALL.into_iter().map(|c| self.get(c)).sum();
        columns + SortColumn::ALL.len() * COLUMN_GAP.len() + display_width(IMAGE_MARKER)
    }
}

/// Pad or cut `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = display_width(c.encode_utf8(&mut [0; 4]));
        if used + w > width {
            break;
        }
        fitted.push(c);
        used += w;
    }
    fitted.extend(std::iter::repeat_n(' ', width - used));
    fitted
}

fn header_text(column: SortColumn, active: SortColumn, direction: SortDirection) -> String {
    if column != active {
        return column.title().to_string();
    }
    let marker = match direction {
        SortDirection::Asc => '▲',
        SortDirection::Desc => '▼',
    };
    format!("{} {marker}", column.title())
}

/// The column header line, with the range each header occupies.
pub fn header_line(
    active: SortColumn,
    direction: SortDirection,
    widths: ColumnWidths,
) -> (Line, Vec<(SortColumn, Range<u16>)>) {
    let mut line = Line::default();
    let mut regions = Vec::new();
    for (i, column) in SortColumn::ALL.into_iter().enumerate() {
        if i > 0 {
            line.push(Segment::plain(COLUMN_GAP));
        }
        let style = if column == active {
            SegmentStyle::ActiveHeader
        } else {
            SegmentStyle::Header
        };
        let text = fit(&header_text(column, active, direction), widths.get(column));
        regions.push((column, line.push(Segment::new(text, style))));
    }
    (line, regions)
}

fn cells(row: &RowView, widths: ColumnWidths) -> Vec<String> {
    SortColumn::ALL
        .into_iter()
        .map(|column| fit(row.cell(column), widths.get(column)))
        .collect()
}

fn joined(cells: &[String], style: SegmentStyle) -> Line {
    Line::from(Segment::new(cells.join(COLUMN_GAP).trim_end().to_string(), style))
}

/// A browser row, marked with [IMAGE_MARKER] if the beer has an image.
pub fn row_line(row: &RowView, widths: ColumnWidths, style: SegmentStyle) -> Line {
    let mut cells = cells(row, widths);
    let marker = if row.image_url.is_some() { IMAGE_MARKER } else { "" };
    cells.push(marker.to_string());
    joined(&cells, style)
}

/// A non-interactive table of `beers`, as printed by `brewdog list`.
///
/// Not bound to a screen, so columns get their full width and every row ends
/// with the image URL.
pub fn table(beers: &[Beer], column: SortColumn, direction: SortDirection) -> Vec<Line> {
    let widths = ColumnWidths::FULL;
    let (mut header, _) = header_line(column, direction, widths);
    header.push(Segment::plain(COLUMN_GAP));
    header.push(Segment::new(IMAGE_HEADER, SegmentStyle::Header));

    let rows = beers.iter().map(|beer| {
        let row = RowView::from(beer);
        let mut cells = cells(&row, widths);
        cells.push(row.image_url.unwrap_or_default());
        joined(&cells, SegmentStyle::Plain)
    });
    std::iter::once(header).chain(rows).collect()
}

/// Render the whole browser for a screen `width` columns wide.
pub fn render(app: &App, width: u16) -> Frame {
    let mut frame = Frame::default();

    let beers = match app.load_state() {
        LoadState::Loading => return frame,
        LoadState::Failed => {
            frame.push_line(Segment::new(TITLE, SegmentStyle::Title));
            frame.push_line(Segment::new(FETCH_ERROR_MESSAGE, SegmentStyle::Error));
            return frame;
        },
        LoadState::Loaded(_) => app.visible_rows(),
    };
    let view = app.view_state();

    frame.push_line(Segment::new(TITLE, SegmentStyle::Title));
    frame.push_line(Segment::plain(format!(
        "search: {}",
        single_line(&view.search_input)
    )));

    let mut pagination = Line::default();
    let previous_style = if app.has_previous_page() {
        SegmentStyle::Button
    } else {
        SegmentStyle::DisabledButton
    };
    let previous = pagination.push(Segment::new(format!("[{PREVIOUS_PAGE_LABEL}]"), previous_style));
    pagination.push(Segment::plain(format!("  page {}  ", app.page())));
    let next = pagination.push(Segment::new(format!("[{NEXT_PAGE_LABEL}]"), SegmentStyle::Button));
    let row = frame.push_line(pagination);
    if app.has_previous_page() {
        frame.push_target(row, previous, Action::PreviousPage);
    }
    frame.push_target(row, next, Action::NextPage);

    frame.push_line(Line::default());

    let widths = ColumnWidths::fitting(width);
    let (header, regions) = header_line(view.column, view.direction, widths);
    let row = frame.push_line(header);
    for (column, columns) in regions {
        frame.push_target(row, columns, Action::SortBy(column));
    }

    let rows = beers.iter().map(RowView::from).collect::<Vec<_>>();
    for (i, row) in rows.iter().enumerate() {
        let style = if i == app.cursor() {
            SegmentStyle::Selected
        } else {
            SegmentStyle::Plain
        };
        frame.push_line(row_line(row, widths, style));
    }

    if let Some(row) = rows.get(app.cursor()) {
        frame.push_line(Line::default());
        let mut detail = vec![row.title.clone()];
        if let Some(image_url) = &row.image_url {
            detail.push(format!("image: {image_url}"));
        }
        for text in &detail {
            for line in textwrap::wrap(text, usize::from(width.max(1))) {
                frame.push_line(Segment::new(line.into_owned(), SegmentStyle::Detail));
            }
        }
    }

    frame
}
