//! UI rendering for the terminal user interface.
//!
//! `draw` lays out the frame, brings the lyrics panel up to date for the
//! area it will occupy and then renders either the gallery or the album view
//! with `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Tab, View};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::session::{LoopMode, SessionState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "open album / play track");
    map.insert("esc", "back");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next track");
    // H/L is filled dynamically from config.
    map.insert("t", "lyrics");
    map.insert("c", "credits");
    map.insert("/", "filter");
    map.insert("r", "loop mode");
    map.insert("q", "quit");
    map
});

/// Render the controls help text for `view`, incorporating scrub seconds.
fn controls_text(view: View, scrub_seconds: u64) -> String {
    let order: &[&str] = match view {
        View::Gallery => &["j/k", "gg/G", "enter", "/", "r", "q"],
        View::Album => &[
            "j/k", "h/l", "H/L", "enter", "space/p", "t", "c", "r", "esc", "q",
        ],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(elapsed)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => {
                total.map(|t| format!("-{}", format_mmss(t.saturating_sub(elapsed))))
            }
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn loop_text(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::NoLoop => "PLAYBACK: No-loop",
        LoopMode::LoopAll => "PLAYBACK: Loop-album",
        LoopMode::LoopOne => "PLAYBACK: Repeat-one",
    }
}

fn state_text(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "Stopped",
        SessionState::Playing => "Playing",
        SessionState::Paused => "Paused",
        SessionState::Ended => "Ended",
    }
}

/// Compute the centered window `[start, end)` of a list of `total` rows with
/// `height` visible rows, keeping `selected` in the middle when possible.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let start = selected.saturating_sub(half).min(total - height);
    (start, start + height)
}

fn padded_block(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Screen regions of the album view.
struct AlbumAreas {
    tracks: Rect,
    now_playing: Rect,
    panel: Rect,
}

fn album_areas(main: Rect) -> AlbumAreas {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(cols[1]);
    AlbumAreas {
        tracks: cols[0],
        now_playing: right[0],
        panel: right[1],
    }
}

fn panel_block(app: &App) -> Block<'static> {
    let tab_span = |tab: Tab, label: &'static str| {
        let span = Span::raw(label);
        if app.active_tab == Some(tab) {
            span.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            span.add_modifier(Modifier::DIM)
        }
    };
    let title = Line::from(vec![
        Span::raw(" "),
        tab_span(Tab::Lyrics, "[t] lyrics"),
        Span::raw(" "),
        tab_span(Tab::Credits, "[c] credits"),
        Span::raw(" "),
    ]);
    Block::default().borders(Borders::ALL).title(title)
}

/// Inner (width, height) of the lyrics panel when it is on screen.
fn lyrics_area(app: &App, panel: Rect) -> Option<(u16, u16)> {
    if app.view != View::Album || app.active_tab != Some(Tab::Lyrics) {
        return None;
    }
    if !app.tab_available(Tab::Lyrics) {
        return None;
    }
    let inner = panel_block(app).inner(panel);
    Some((inner.width, inner.height))
}

/// Render the entire UI into `frame`. Also advances the lyrics panel by one
/// frame, which is why `app` is borrowed mutably.
pub fn draw(
    frame: &mut Frame,
    app: &mut App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let areas = album_areas(chunks[2]);
    let lyrics = lyrics_area(app, areas.panel);
    app.sync_lyrics(lyrics, ui_settings);
    let app = &*app;

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" lyricdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    match app.view {
        View::Gallery => draw_gallery(frame, app, chunks[2]),
        View::Album => draw_album(frame, app, &areas, ui_settings),
    }

    let footer = Paragraph::new(controls_text(app.view, controls_settings.scrub_seconds))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.view {
        View::Gallery => {
            parts.push(format!("ALBUMS: {}", app.albums.len()));
            let q = app.filter_query.trim();
            if app.filter_mode || !q.is_empty() {
                let mut filter_part = String::from("FILTER:");
                if !q.is_empty() {
                    filter_part.push(' ');
                    filter_part.push_str(q);
                }
                parts.push(filter_part);
            }
            if let Some(dir) = &app.library_root {
                parts.push(format!("Dir: {}", dir));
            }
        }
        View::Album => {
            if let Some(album) = app.current_album() {
                parts.push(format!("ALBUM: {}", album.display()));
            }
            parts.push(state_text(app.session.state()).to_string());
        }
    }
    parts.push(loop_text(app.session.loop_mode).to_string());

    let mut text = parts.join(" • ");
    if let Some(msg) = app.status_message() {
        text.push('\n');
        text.push_str(&msg);
    }
    text
}

/// Title with the fuzzy-matched characters emphasized.
fn highlighted_title(title: String, query: &str) -> Line<'static> {
    let Some(positions) = App::fuzzy_match_positions(&title, query).filter(|_| !query.is_empty())
    else {
        return Line::from(title);
    };

    let mut spans = Vec::new();
    let mut pos_iter = positions.into_iter().peekable();
    for (ci, ch) in title.chars().enumerate() {
        if pos_iter.peek() == Some(&ci) {
            pos_iter.next();
            spans.push(Span::raw(ch.to_string()).add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    Line::from(spans)
}

fn draw_gallery(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.display_indices();
    let q = app.filter_query.trim();

    // Only build items for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = visible_window(display.len(), list_height, sel_pos);

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let album = &app.albums[i];
            let mut line = highlighted_title(album.display(), q);
            if let Some(artist) = album.artist.as_deref().filter(|a| !a.trim().is_empty()) {
                line.push_span(Span::raw(format!("  {}", artist)).add_modifier(Modifier::DIM));
            }
            line.push_span(
                Span::raw(format!("  [{} tracks]", album.tracks.len())).add_modifier(Modifier::DIM),
            );
            ListItem::new(line)
        })
        .collect();

    let empty = display.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" albums "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !empty {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);

    if empty {
        let msg = if app.has_albums() {
            "No album matches the filter"
        } else {
            "No albums found"
        };
        let inner = Block::default().borders(Borders::ALL).inner(area);
        frame.render_widget(Paragraph::new(msg).alignment(Alignment::Center).dim(), inner);
    }
}

fn draw_album(frame: &mut Frame, app: &App, areas: &AlbumAreas, ui: &UiSettings) {
    let Some(album) = app.current_album() else {
        return;
    };

    // Track list
    let playing = app.session.current();
    let list_height = areas.tracks.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(album.tracks.len(), list_height, app.track_cursor);
    let items: Vec<ListItem> = album.tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let marker = if playing == Some(start + offset) { "▶ " } else { "  " };
            let mut line = Line::from(format!("{}{}", marker, track.display()));
            if let Some(d) = track.duration {
                line.push_span(Span::raw(format!("  {}", format_mmss(d))).add_modifier(Modifier::DIM));
            }
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", album.title)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if !album.tracks.is_empty() {
        state.select(Some(app.track_cursor.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, areas.tracks, &mut state);

    // Now playing
    let now_playing = match app.playing_track() {
        Some(track) => {
            let time = now_playing_time_text(app.session.elapsed(), track.duration, ui);
            match time {
                Some(time) => format!("{} [{}]", track.title, time),
                None => track.title.clone(),
            }
        }
        None => "-".to_string(),
    };
    let np = Paragraph::new(now_playing).block(padded_block(" now playing "));
    frame.render_widget(np, areas.now_playing);

    // Tab panel
    let block = panel_block(app);
    let inner = block.inner(areas.panel);
    frame.render_widget(block, areas.panel);

    let Some(track) = app.shown_track() else {
        return;
    };
    match app.active_tab {
        None => {
            let hint = Paragraph::new("Press t for lyrics or c for credits")
                .alignment(Alignment::Center)
                .dim();
            frame.render_widget(hint, inner);
        }
        Some(Tab::Credits) => {
            let text = track
                .credits
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or("No credits for this track");
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
        }
        Some(Tab::Lyrics) => draw_lyrics(frame, app, inner),
    }
}

fn draw_lyrics(frame: &mut Frame, app: &App, inner: Rect) {
    let Some(layout) = app.lyrics.layout().filter(|l| l.line_count() > 0) else {
        let msg = Paragraph::new("No lyrics for this track")
            .alignment(Alignment::Center)
            .dim();
        frame.render_widget(msg, inner);
        return;
    };

    let active = app.active_line();
    let offset = app.lyrics.offset() as usize;
    let lines: Vec<Line> = layout
        .rows()
        .iter()
        .skip(offset)
        .take(inner.height as usize)
        .map(|row| {
            let line = Line::from(row.text.as_str());
            match active {
                Some(a) if a == row.line => line.add_modifier(Modifier::BOLD).reversed(),
                Some(_) => line.add_modifier(Modifier::DIM),
                None => line,
            }
        })
        .collect();

    // Rows are already wrapped to `inner.width`; no further wrapping here.
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
