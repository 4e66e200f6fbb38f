//! Interactive terminal browser.
//!
//! Terminal events and finished fetches are multiplexed in a single loop.
//! Fetches run as separate tasks and report back through a channel, tagged
//! with the sequence number [App] handed out for them.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use brewdog_catalog::{Beer, CatalogClient, ClientTrait, FetchError, Page, SortColumn};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    DisableMouseCapture,
    EnableMouseCapture,
    Event,
    EventStream,
    KeyCode,
    KeyEvent,
    KeyEventKind,
    KeyModifiers,
    MouseButton,
    MouseEvent,
    MouseEventKind,
};
use crossterm::style::{PrintStyledContent, StyledContent, Stylize};
use crossterm::terminal::{
    self,
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{debug, error, instrument};

use crate::app::{Action, App, FetchRequest};
use crate::config::Config;
use crate::utils::STDERR_SUPPRESSED;
use crate::utils::init::{init_catalog_client, init_log_file};
use crate::utils::message;
use crate::view::{self, Frame, Segment, SegmentStyle};

type Completion = (u64, Result<Vec<Beer>, FetchError>);

/// Assumed when the terminal does not report its size.
const FALLBACK_WIDTH: u16 = 80;

#[derive(Bpaf, Clone, Debug)]
pub struct Browse {
    /// Page to start on
    #[bpaf(long, short, argument("N"), fallback(Page::FIRST))]
    pub(crate) page: Page,
}

impl Default for Browse {
    fn default() -> Self {
        Browse { page: Page::FIRST }
    }
}

impl Browse {
    #[instrument(name = "browse", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        // the screen belongs to the browser, so logs go to a file instead
        if let Some(state_dir) = &config.state_dir {
            match init_log_file(state_dir) {
                Ok(path) => debug!(path = %path.display(), "session log"),
                Err(err) => message::warning(format!("{err:#}")),
            }
        }

        let client = Arc::new(init_catalog_client(&config)?);
        let mut app = App::new(self.page, config.view_defaults());

        let session = TerminalSession::enter()?;
        let width = match terminal::size() {
            Ok((columns, _)) => columns,
            Err(err) => {
                debug!(%err, "could not query terminal size");
                FALLBACK_WIDTH
            },
        };
        let result =
            event_loop(&mut app, client, EventStream::new(), &mut io::stdout(), width).await;
        drop(session);
        result
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
///
/// Dropping the session restores the terminal, also when the browser bails
/// out with an error.
struct TerminalSession;

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Could not enable raw mode")?;
        STDERR_SUPPRESSED.store(true, Ordering::Relaxed);
        let session = TerminalSession;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("Could not set up terminal")?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen) {
            error!(%err, "failed to restore terminal");
        }
        if let Err(err) = disable_raw_mode() {
            error!(%err, "failed to disable raw mode");
        }
        STDERR_SUPPRESSED.store(false, Ordering::Relaxed);
    }
}

/// Drive `app` with terminal `events` until it quits or `events` ends.
///
/// Every frame is laid out for a screen `width` columns wide, following
/// resize events.
async fn event_loop(
    app: &mut App,
    client: Arc<CatalogClient>,
    mut events: impl Stream<Item = io::Result<Event>> + Unpin,
    out: &mut impl Write,
    mut width: u16,
) -> Result<()> {
    let (tx, mut rx) = unbounded_channel::<Completion>();

    spawn_fetch(&client, app.start(), &tx);
    let mut frame = view::render(app, width);
    draw(out, &frame)?;

    while !app.should_quit() {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    debug!("terminal event stream closed");
                    break;
                };
                let event = event.context("Could not read terminal event")?;
                if let Event::Resize(columns, _) = event {
                    width = columns;
                }
                if let Some(action) = map_event(&event, &frame) {
                    if let Some(request) = app.handle(action) {
                        spawn_fetch(&client, request, &tx);
                    }
                }
            },
            Some((seq, result)) = rx.recv() => {
                app.complete(seq, result);
            },
        }

        frame = view::render(app, width);
        draw(out, &frame)?;
    }

    Ok(())
}

fn spawn_fetch(
    client: &Arc<CatalogClient>,
    request: FetchRequest,
    tx: &UnboundedSender<Completion>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch_page(&request.query).await;
        // nobody listens anymore once the browser quit
        let _ = tx.send((request.seq, result));
    });
}

/// Translate a terminal event into an [Action].
///
/// Mouse clicks are resolved against the click targets of the `frame` that
/// is currently on screen.
fn map_event(event: &Event, frame: &Frame) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => frame.target_at(*column, *row),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Left | KeyCode::PageUp => Action::PreviousPage,
        KeyCode::Right | KeyCode::PageDown => Action::NextPage,
        KeyCode::F(n @ 1..=4) => Action::SortBy(SortColumn::ALL[usize::from(n - 1)]),
        KeyCode::Up => Action::CursorUp,
        KeyCode::Down => Action::CursorDown,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Esc => Action::SearchClear,
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Action::SearchInput(c)
        },
        _ => return None,
    };
    Some(action)
}

fn styled(segment: &Segment) -> StyledContent<&str> {
    let text = segment.text.as_str();
    match segment.style {
        SegmentStyle::Plain => text.stylize(),
        SegmentStyle::Title => text.bold(),
        SegmentStyle::Header => text.underlined(),
        SegmentStyle::ActiveHeader => text.bold().underlined(),
        SegmentStyle::Button => text.cyan(),
        SegmentStyle::DisabledButton => text.dark_grey(),
        SegmentStyle::Selected => text.reverse(),
        SegmentStyle::Detail => text.italic(),
        SegmentStyle::Error => text.red(),
    }
}

fn draw(out: &mut impl Write, frame: &Frame) -> Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row))?;
        for segment in &line.segments {
            queue!(out, PrintStyledContent(styled(segment)))?;
        }
    }
    out.flush()?;
    Ok(())
}
