//! Live search: a text input over a result list

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;
use tracing::debug;

use super::{
    render_lines, Action, Screen, ScreenContext, ScreenEvent, ScreenKind, StatusInfo, Target, Tick,
};
use crate::content::{search, Archive};
use crate::view::chrome;
use crate::view::text_input::{TextInputEvent, TextInputState};
use crate::view::theme::THEME;

pub const BLINK_INTERVAL: Duration = Duration::from_millis(530);

const CHAR_LIMIT: usize = 100;

/// Rows used by everything around the result list: input box, blank,
/// count, blank, blank, hint
const CHROME_ROWS: usize = 8;

/// A hit, detached from the archive so the screen can own it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub volume: u32,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub category: String,
}

pub struct SearchScreen {
    archive: Arc<Archive>,
    input: TextInputState,
    results: Vec<SearchResult>,
    cursor: usize,
    in_list: bool,
    width: u16,
    height: u16,
    blink_generation: u64,
}

impl SearchScreen {
    pub fn new(ctx: &ScreenContext, query: &str) -> Self {
        let mut input = TextInputState::new("/ ")
            .with_placeholder("Search articles...")
            .with_char_limit(CHAR_LIMIT)
            .with_value(query);
        input.focus();

        let mut screen = Self {
            archive: Arc::clone(&ctx.archive),
            input,
            results: Vec::new(),
            cursor: 0,
            in_list: false,
            width: ctx.width,
            height: ctx.height,
            blink_generation: 0,
        };
        screen.refresh();
        screen
    }

    pub fn query(&self) -> &str {
        &self.input.value
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn in_list(&self) -> bool {
        self.in_list
    }

    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    fn refresh(&mut self) {
        self.results = search(&self.archive, &self.input.value)
            .into_iter()
            .map(|hit| SearchResult {
                volume: hit.volume,
                slug: hit.article.slug.clone(),
                title: hit.article.title.clone(),
                author: hit.article.author.clone(),
                category: hit.article.category.clone(),
            })
            .collect();
        self.cursor = 0;
    }

    /// Show the cursor and start a new blink cycle; ticks of older cycles
    /// are ignored from now on
    fn restart_blink(&mut self) -> Action {
        self.blink_generation += 1;
        self.input.cursor_visible = true;
        Action::Schedule {
            delay: BLINK_INTERVAL,
            tick: Tick::Blink {
                generation: self.blink_generation,
            },
        }
    }

    fn focus_input(&mut self) -> Option<Action> {
        self.in_list = false;
        self.input.focus();
        Some(self.restart_blink())
    }

    fn open_selected(&self) -> Option<Action> {
        let result = self.results.get(self.cursor)?;
        match self.archive.article_index(result.volume, &result.slug) {
            Some(index) => Some(Action::Navigate(Target::Article {
                volume: result.volume,
                index,
            })),
            None => {
                debug!(slug = %result.slug, volume = result.volume, "search hit no longer resolves");
                None
            }
        }
    }

    /// How many results fit, leaving room for the "more" line when needed
    fn max_visible(&self) -> usize {
        let rows = (self.height as usize).saturating_sub(CHROME_ROWS);
        if self.results.len() * 2 <= rows {
            self.results.len()
        } else {
            (rows.saturating_sub(2) / 2).max(1)
        }
    }

    fn result_lines(&self, index: usize, result: &SearchResult) -> [Line<'static>; 2] {
        let selected = self.in_list && index == self.cursor;
        let (marker, title, meta) = if selected {
            (
                Span::styled("▸ ", THEME.fg(THEME.green)),
                THEME.bold(THEME.green_bright),
                THEME.fg(THEME.green),
            )
        } else {
            (
                Span::raw("  "),
                THEME.fg(THEME.text),
                THEME.fg(THEME.secondary),
            )
        };
        let sep = Span::styled(" │ ", THEME.hint());
        [
            Line::from(vec![marker, Span::styled(result.title.clone(), title)]),
            Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("vol.{}", result.volume), meta),
                sep.clone(),
                Span::styled(
                    result.category.clone(),
                    THEME.fg(THEME.category_color(&result.category)),
                ),
                sep,
                Span::styled(result.author.clone(), THEME.fg(THEME.secondary)),
            ]),
        ]
    }

    fn layout(&self) -> Vec<Line<'static>> {
        let width = self.width as usize;
        let input_line = self.input.render_line(&THEME, width.saturating_sub(4));
        let mut lines = chrome::box_frame(&THEME, "SEARCH", vec![input_line], width);
        lines.push(Line::default());

        if self.input.value.is_empty() {
            lines.push(Line::styled(
                "  Type to search across titles, descriptions, tags, authors...",
                THEME.hint(),
            ));
            return lines;
        }
        if self.results.is_empty() {
            lines.push(Line::styled(
                "  No results found.",
                THEME.fg(THEME.secondary),
            ));
            return lines;
        }

        lines.push(Line::styled(
            format!("  {} result(s)", self.results.len()),
            THEME.fg(THEME.secondary),
        ));
        lines.push(Line::default());

        let max = self.max_visible();
        let start = (self.cursor + 1).saturating_sub(max);
        for (i, result) in self.results.iter().enumerate().skip(start).take(max) {
            lines.extend(self.result_lines(i, result));
        }
        if self.results.len() > max {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("  ... and {} more results", self.results.len() - max),
                THEME.hint(),
            ));
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            "  Tab/↓ to results  |  Enter to open  |  Esc to close",
            THEME.hint(),
        ));
        lines
    }
}

impl Screen for SearchScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Search
    }

    fn init(&mut self) -> Option<Action> {
        Some(self.restart_blink())
    }

    fn resume(&mut self) -> Option<Action> {
        if self.input.focused {
            Some(self.restart_blink())
        } else {
            None
        }
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action> {
        let key = match event {
            ScreenEvent::Key(key) => key,
            ScreenEvent::Resize { width, height } => {
                self.width = *width;
                self.height = *height;
                return None;
            }
            ScreenEvent::Tick(Tick::Blink { generation }) => {
                if *generation != self.blink_generation || !self.input.focused {
                    return None;
                }
                self.input.toggle_blink();
                return Some(Action::Schedule {
                    delay: BLINK_INTERVAL,
                    tick: Tick::Blink {
                        generation: self.blink_generation,
                    },
                });
            }
            ScreenEvent::Tick(_) => return None,
        };

        match key.code {
            KeyCode::Esc if self.in_list => self.focus_input(),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Tab | KeyCode::Down => {
                if !self.in_list {
                    if !self.results.is_empty() {
                        self.in_list = true;
                        self.cursor = 0;
                        self.input.blur();
                    }
                } else if self.cursor + 1 < self.results.len() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Up if self.in_list => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    None
                } else {
                    self.focus_input()
                }
            }
            KeyCode::Enter if self.in_list => self.open_selected(),
            _ if self.in_list => None,
            _ => {
                if let Some(TextInputEvent::Changed(_)) = self.input.handle_key(key) {
                    self.refresh();
                }
                None
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        render_lines(frame, area, self.layout());
    }

    fn status(&self) -> StatusInfo {
        StatusInfo::new("SEARCH", None)
    }
}
