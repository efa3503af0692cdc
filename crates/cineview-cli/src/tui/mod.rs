//! Interactive browser TUI.
//!
//! Uses `ratatui` + `crossterm` for rendering. Fetch results arrive on the
//! browser's channel and are applied between frames on the same
//! current-thread runtime that runs the requests.

/// Focus, input, and animation state.
pub mod state;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cineview_api::tmdb::TmdbApi;
use cineview_core::browser::Browser;
use cineview_core::overlay::OverlayController;
use cineview_core::pages::Page;
use cineview_core::route::Route;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::{BrowserViewState, InputMode, settle_animations};

/// Redraw interval while idle or animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Runs the browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(browser: &mut Browser<A>, animation: Duration) -> Result<()>
where
    A: TmdbApi + Sync + 'static,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserViewState::new(animation);

    let result = run_event_loop(&mut terminal, browser, &mut state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut Browser<A>,
    state: &mut BrowserViewState,
) -> Result<()>
where
    A: TmdbApi + Sync + 'static,
{
    let mut mounted = browser.page_mount();
    loop {
        let now = Instant::now();
        browser.drain();
        if browser.page_mount() != mounted {
            mounted = browser.page_mount();
            state.reset_focus();
        }
        if let Some(page) = browser.page_mut() {
            settle_animations(page, now, state.animation);
        }
        browser.tick(now);
        if let Some(page) = browser.page() {
            state.clamp_focus(page);
        }

        let overlay = browser.overlay().map(OverlayController::view);
        let screen = ui::Screen {
            route: browser.route(),
            page: browser.page(),
            overlay: overlay.as_ref(),
            state,
            now,
        };
        terminal
            .draw(|frame| ui::draw(frame, &screen))
            .context("failed to draw TUI")?;

        if event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
                && handle_key(browser, state, key)
            {
                return Ok(());
            }
            continue;
        }

        // Yield to the fetch tasks until a result lands or the next frame is due.
        tokio::select! {
            Some(envelope) = browser.next_event() => {
                browser.apply(envelope);
            }
            () = tokio::time::sleep(FRAME_INTERVAL) => {}
        }
    }
}

/// Dispatches a key press. Returns `true` to exit.
fn handle_key<A>(browser: &mut Browser<A>, state: &mut BrowserViewState, key: KeyEvent) -> bool
where
    A: TmdbApi + Sync + 'static,
{
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    match state.input_mode {
        InputMode::Search => {
            handle_search_input(browser, state, key.code);
            false
        }
        InputMode::Normal if browser.overlay().is_some() => {
            handle_overlay_input(browser, state, key.code)
        }
        InputMode::Normal => handle_normal_input(browser, state, key.code),
    }
}

/// Handles key input in search mode.
fn handle_search_input<A>(browser: &mut Browser<A>, state: &mut BrowserViewState, key: KeyCode)
where
    A: TmdbApi + Sync + 'static,
{
    match key {
        KeyCode::Esc => state.cancel_search(),
        KeyCode::Enter => {
            if let Some(route) = state.submit_search() {
                browser.navigate(route);
            }
        }
        KeyCode::Backspace => state.search_pop(),
        KeyCode::Char(c) => state.search_push(c),
        _ => {}
    }
}

/// Handles key input while the overlay is open. Returns `true` to exit.
fn handle_overlay_input<A>(
    browser: &mut Browser<A>,
    state: &mut BrowserViewState,
    key: KeyCode,
) -> bool
where
    A: TmdbApi + Sync + 'static,
{
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Backspace => {
            if let Some(route) = browser.close_overlay() {
                tracing::debug!(%route, "overlay closed");
            }
        }
        KeyCode::Char('o') => {
            if let Some(overlay) = browser.overlay() {
                open_in_browser(state, &overlay.target().web_url());
            }
        }
        _ => {}
    }
    false
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input<A>(
    browser: &mut Browser<A>,
    state: &mut BrowserViewState,
    key: KeyCode,
) -> bool
where
    A: TmdbApi + Sync + 'static,
{
    let now = Instant::now();
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(page) = browser.page() {
                state.move_up(page);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(page) = browser.page() {
                state.move_down(page);
            }
        }
        KeyCode::Tab => {
            if let Some(page) = browser.page() {
                state.next_row(page);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(page) = browser.page_mut() {
                state.move_left(page, now);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(page) = browser.page_mut() {
                state.move_right(page, now);
            }
        }
        KeyCode::Enter => {
            if let Some(selection) = browser.page().and_then(|p| state.focused_selection(p)) {
                browser.select(selection);
            }
        }
        KeyCode::Char('b') => {
            let banner = match browser.page() {
                Some(Page::Catalog(catalog)) => catalog.banner_selection(),
                _ => None,
            };
            if let Some(selection) = banner {
                browser.select(selection);
            }
        }
        KeyCode::Char('o') => {
            if let Some(selection) = browser.page().and_then(|p| state.focused_selection(p)) {
                open_in_browser(state, &selection.target().web_url());
            }
        }
        KeyCode::Char('1') => browser.navigate(Route::Home { movie: None }),
        KeyCode::Char('2') => browser.navigate(Route::Tv { show: None }),
        KeyCode::Char('/') => state.begin_search(),
        _ => {}
    }
    false
}

/// Opens `url` with the system handler, reporting failures in the footer.
fn open_in_browser(state: &mut BrowserViewState, url: &str) {
    match open::that(url) {
        Ok(()) => state.status = Some(format!("Opened {url}")),
        Err(err) => {
            tracing::warn!(url, "failed to open browser: {err}");
            state.status = Some(format!("Could not open {url}"));
        }
    }
}
