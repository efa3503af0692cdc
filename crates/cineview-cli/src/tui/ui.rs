//! TUI rendering logic for the browser.

use std::time::Instant;

use cineview_core::carousel::Carousel;
use cineview_core::content::ContentItem;
use cineview_core::loadable::Loadable;
use cineview_core::overlay::{
    Avatar, CreditsView, ImageView, OverlayView, PersonView, rating_view,
};
use cineview_core::pages::{CatalogPage, CatalogRow, GridStatus, Page, SearchGrid, SearchPage};
use cineview_core::route::{MIN_KEYWORD_CHARS, Route};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::state::{BrowserViewState, InputMode, visible_cards};

const LOADING: &str = "Loading...";

/// Everything one frame draws.
#[derive(Debug)]
pub struct Screen<'a> {
    /// Current route.
    pub route: &'a Route,
    /// Mounted page, if any.
    pub page: Option<&'a Page>,
    /// Overlay presentation, if one is open.
    pub overlay: Option<&'a OverlayView>,
    /// Focus and input state.
    pub state: &'a BrowserViewState,
    /// Frame time, for animations.
    pub now: Instant,
}

/// Draws the browser UI.
pub fn draw(frame: &mut Frame, screen: &Screen<'_>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Min(5),    // page
        Constraint::Length(3), // footer
    ])
    .areas(frame.area());

    draw_header(frame, header, screen);
    match screen.page {
        Some(Page::Catalog(catalog)) => draw_catalog(frame, body, catalog, screen),
        Some(Page::Search(search)) => draw_search(frame, body, search, screen),
        None => frame.render_widget(Paragraph::new(LOADING), body),
    }
    draw_footer(frame, footer, screen);

    if let Some(view) = screen.overlay {
        draw_overlay(frame, body, view);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn rating_text(item: &ContentItem) -> String {
    rating_view(item.vote_average(), item.vote_count())
        .map_or_else(|| String::from("not rated"), |r| format!("* {}", r.average))
}

fn year_text(item: &ContentItem) -> String {
    item.year()
        .map_or_else(|| String::from("----"), |y| y.to_string())
}

/// Draws the tabs, search box, and current route.
fn draw_header(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let [tabs_area, route_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    let active = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let tab = |label: &'static str, on: bool| {
        Span::styled(label, if on { active } else { Style::default() })
    };

    let tabs = if screen.state.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled("Search: ", active),
            Span::raw(screen.state.search_input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(vec![
            tab(" [1] Movies ", matches!(screen.route, Route::Home { .. })),
            tab(" [2] TV ", matches!(screen.route, Route::Tv { .. })),
            tab(" [/] Search ", matches!(screen.route, Route::Search { .. })),
        ])
    };
    frame.render_widget(
        Paragraph::new(tabs).block(Block::default().borders(Borders::ALL).title(" cineview ")),
        tabs_area,
    );

    frame.render_widget(
        Paragraph::new(screen.route.to_string())
            .block(Block::default().borders(Borders::ALL).title(" Route ")),
        route_area,
    );
}

/// Draws the banner and the category carousels.
fn draw_catalog(frame: &mut Frame, area: Rect, catalog: &CatalogPage, screen: &Screen<'_>) {
    let mut constraints = vec![Constraint::Length(5)];
    constraints.extend(catalog.rows().iter().map(|_| Constraint::Fill(1)));
    let areas = Layout::vertical(constraints).split(area);

    let mut areas = areas.iter().copied();
    if let Some(banner_area) = areas.next() {
        draw_banner(frame, banner_area, catalog, screen.state.focus.row == 0);
    }
    for (index, (row, row_area)) in catalog.rows().iter().zip(areas).enumerate() {
        let focused = screen.state.focus.row == index.saturating_add(1);
        draw_row(frame, row_area, row, focused.then_some(screen.state.focus.column), screen);
    }
}

fn draw_banner(frame: &mut Frame, area: Rect, catalog: &CatalogPage, focused: bool) {
    let lines = match catalog.banner() {
        Loadable::Ready(Some(item)) => vec![
            Line::from(vec![
                Span::styled(
                    item.display_name().to_owned(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}  {}", year_text(item), rating_text(item))),
            ]),
            Line::from(item.overview().to_owned()),
        ],
        Loadable::Ready(None) => vec![Line::from("Nothing featured right now")],
        Loadable::Pending | Loadable::Failed(_) => vec![Line::from(LOADING)],
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Featured (b) ")
        .border_style(focus_style(focused));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

/// Draws one carousel row; `focus` is the focused card when the row is active.
fn draw_row(
    frame: &mut Frame,
    area: Rect,
    row: &CatalogRow,
    focus: Option<usize>,
    screen: &Screen<'_>,
) {
    let Some(carousel) = row.carousel.ready() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", row.title))
            .border_style(focus_style(focus.is_some()));
        frame.render_widget(Paragraph::new(LOADING).block(block), area);
        return;
    };

    let title = match carousel.max_page_index() {
        Some(max) if max > 0 => format!(
            " {} ({}/{}) ",
            row.title,
            carousel.page_index().saturating_add(1),
            max.saturating_add(1)
        ),
        _ => format!(" {} ", row.title),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(focus_style(focus.is_some()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if carousel.contents().is_empty() {
        frame.render_widget(Paragraph::new("No titles"), inner);
        return;
    }
    draw_cards(frame, inner, carousel, focus, screen);
}

fn draw_cards(
    frame: &mut Frame,
    area: Rect,
    carousel: &Carousel,
    focus: Option<usize>,
    screen: &Screen<'_>,
) {
    let cards = visible_cards(carousel, screen.now, screen.state.animation);
    let slots = u32::try_from(carousel.page_size()).unwrap_or(u32::MAX);
    let columns =
        Layout::horizontal((0..slots).map(|_| Constraint::Ratio(1, slots))).split(area);
    let settled = !carousel.is_transitioning();

    for (position, (item, card_area)) in cards.into_iter().zip(columns.iter()).enumerate() {
        let focused = settled && focus == Some(position);
        let style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let lines = vec![
            Line::styled(item.display_name().to_owned(), style),
            Line::from(format!("{}  {}", year_text(item), rating_text(item))),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused));
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(block),
            *card_area,
        );
    }
}

/// Draws the movie and show result grids.
fn draw_search(frame: &mut Frame, area: Rect, search: &SearchPage, screen: &Screen<'_>) {
    if search.is_prompt() {
        let prompt = format!(
            "Press / and type at least {MIN_KEYWORD_CHARS} characters to search movies and TV shows."
        );
        frame.render_widget(
            Paragraph::new(prompt)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Search ")),
            area,
        );
        return;
    }

    let [movies, shows] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    for (index, (grid, grid_area)) in search.grids().iter().zip([movies, shows]).enumerate() {
        let focused = screen.state.focus.row == index;
        draw_grid(
            frame,
            grid_area,
            grid,
            search.keyword(),
            focused.then_some(screen.state.focus.column),
        );
    }
}

fn draw_grid(
    frame: &mut Frame,
    area: Rect,
    grid: &SearchGrid,
    keyword: &str,
    focus: Option<usize>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} for \"{keyword}\" ", grid.title))
        .border_style(focus_style(focus.is_some()));

    let items = match grid.status() {
        GridStatus::Searching => {
            frame.render_widget(Paragraph::new("Searching...").block(block), area);
            return;
        }
        GridStatus::NoResults => {
            frame.render_widget(Paragraph::new("No results").block(block), area);
            return;
        }
        GridStatus::Results(items) => items,
    };

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "{}  ({})  {}",
                item.display_name(),
                year_text(item),
                rating_text(item)
            ))
        })
        .collect();
    let list = List::new(rows).block(block).highlight_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(focus);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn avatar_text(avatar: &Avatar) -> &str {
    match avatar {
        Avatar::Loading => "...",
        Avatar::Image(url) => url,
        Avatar::Placeholder(text) => text,
    }
}

fn person_line(person: &PersonView) -> Line<'_> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            person.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}  ", person.role)),
        Span::styled(
            avatar_text(&person.avatar),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Draws the detail overlay over the page area.
fn draw_overlay(frame: &mut Frame, area: Rect, view: &OverlayView) {
    let popup = area.inner(Margin::new(area.width / 10, area.height / 10));
    frame.render_widget(Clear, popup);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if let Some(tagline) = &view.tagline {
        lines.push(Line::styled(
            tagline.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    if !view.genres.is_empty() {
        lines.push(Line::from(view.genres.join(" / ")));
    }
    if !view.facts.is_empty() {
        lines.push(Line::from(view.facts.join("  ")));
    }
    lines.push(match &view.rating {
        Some(rating) => Line::from(format!("* {} ({} votes)", rating.average, rating.votes)),
        None => Line::from("Not rated yet"),
    });
    lines.push(match &view.image {
        ImageView::Image(url) => Line::styled(format!("Backdrop: {url}"), dim),
        ImageView::Placeholder(text) => Line::styled(format!("Backdrop: {text}"), dim),
    });
    lines.push(Line::default());
    lines.push(Line::from(view.overview.as_str()));
    lines.push(Line::default());

    match &view.credits {
        CreditsView::Loading => lines.push(Line::from(LOADING)),
        CreditsView::Ready { cast, crew } => {
            lines.push(Line::styled("Cast", bold));
            lines.extend(cast.iter().map(person_line));
            lines.push(Line::styled("Crew", bold));
            lines.extend(crew.iter().map(person_line));
        }
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} [{}] ", view.title, view.kind))
        .title_bottom(format!(" {}  (o) open  (Esc) close ", view.web_url))
        .border_style(Style::default().fg(Color::Yellow));
    if let Some(id) = &view.transition_id {
        block = block.title_bottom(Line::styled(format!(" {id} "), dim).right_aligned());
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        popup,
    );
}

/// Draws the footer with key hints and the status line.
fn draw_footer(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let hints = match (screen.state.input_mode, screen.overlay.is_some()) {
        (InputMode::Search, _) => "Enter: search  Esc: cancel",
        (InputMode::Normal, true) => "o: open in browser  Esc/Backspace: close  q: quit",
        (InputMode::Normal, false) => {
            "arrows/hjkl: move  Enter: details  b: featured  Tab: next row  1/2: movies/TV  /: search  o: open  q: quit"
        }
    };
    let mut spans = vec![Span::raw(hints)];
    if let Some(status) = &screen.state.status {
        spans.push(Span::styled(
            format!("  | {status}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
