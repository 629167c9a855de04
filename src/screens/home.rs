//! Home screen: connection animation, then the main menu

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{
    digit_index, global_shortcut, render_lines, Action, Screen, ScreenContext, ScreenEvent,
    ScreenKind, StatusInfo, Target, Tick,
};
use crate::content::Archive;
use crate::view::chrome;
use crate::view::theme::THEME;
use crate::view::viewport::ScrollState;

pub const CONNECT_TICK: Duration = Duration::from_millis(300);

const CONNECTION_LINES: [(&str, bool); 4] = [
    ("Connecting to terminull.local...", false),
    ("SSH-2.0 | xterm-256color | UTF-8", false),
    ("Identity verified.", false),
    ("Connection established.", true),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Connecting,
    Identity,
    Loading,
    Done,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::Connecting => Phase::Identity,
            Phase::Identity => Phase::Loading,
            Phase::Loading | Phase::Done => Phase::Done,
        }
    }

    /// Connection lines visible in this phase
    fn lines_shown(self) -> usize {
        self as usize + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub description: String,
    pub target: Target,
}

pub struct HomeScreen {
    archive: Arc<Archive>,
    username: String,
    today: NaiveDate,
    width: u16,
    phase: Phase,
    cursor: usize,
    items: Vec<MenuItem>,
}

impl HomeScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        Self {
            items: menu_items(&ctx.archive),
            archive: Arc::clone(&ctx.archive),
            username: ctx.username.clone(),
            today: ctx.today,
            width: ctx.width,
            phase: Phase::Connecting,
            cursor: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    fn select(&mut self, index: usize) -> Option<Action> {
        let item = self.items.get(index)?;
        self.cursor = index;
        Some(Action::Navigate(item.target.clone()))
    }

    /// Lines of the finished screen and the row of the menu cursor
    fn layout(&self) -> (Vec<Line<'static>>, usize) {
        let width = self.width as usize;
        let mut lines: Vec<Line<'static>> = CONNECTION_LINES
            .iter()
            .take(self.phase.lines_shown())
            .map(|(text, bright)| chrome::connection_line(&THEME, text, *bright))
            .collect();

        if self.phase < Phase::Done {
            return (lines, 0);
        }

        lines.push(Line::default());
        lines.extend(chrome::logo(&THEME));
        lines.push(chrome::tagline(&THEME, self.archive.latest_volume(), width));
        lines.push(Line::default());
        lines.extend(chrome::system_info(&THEME, &self.username, self.today, width));
        lines.push(Line::default());
        lines.push(Line::styled("MAIN MENU", THEME.title()));
        lines.push(chrome::divider(&THEME, width));
        lines.push(Line::default());

        let menu_start = lines.len();
        for (i, item) in self.items.iter().enumerate() {
            let selected = i == self.cursor;
            let (marker, number, label, desc) = if selected {
                (
                    Span::styled("▸ ", THEME.fg(THEME.green)),
                    THEME.bold(THEME.green_bright),
                    THEME.bold(THEME.green_bright),
                    THEME.fg(THEME.green),
                )
            } else {
                (
                    Span::raw("  "),
                    THEME.bold(THEME.green),
                    THEME.fg(THEME.text),
                    THEME.fg(THEME.secondary),
                )
            };
            let mut spans = vec![
                marker,
                Span::styled(format!("[{}]", i + 1), number),
                Span::raw(" "),
                Span::styled(item.label.clone(), label),
            ];
            if !item.description.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled("─", THEME.hint()));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(item.description.clone(), desc));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::default());
        lines.extend(chrome::motd(&THEME, width));
        lines.push(Line::default());
        lines.extend(chrome::footer(&THEME, width));

        (lines, menu_start + self.cursor)
    }
}

/// One entry per volume, one per page, then help
pub fn menu_items(archive: &Archive) -> Vec<MenuItem> {
    let volumes = archive.volumes.iter().map(|v| MenuItem {
        label: format!("Vol {} — Table of Contents", v.number),
        description: format!("{} articles", v.articles.len()),
        target: Target::Volume { number: v.number },
    });
    let pages = archive.pages.iter().map(|p| MenuItem {
        label: p.title.clone(),
        description: p.description.clone(),
        target: Target::Page {
            slug: p.slug.clone(),
        },
    });
    let help = MenuItem {
        label: "Help — Keyboard Reference".to_string(),
        description: "Navigation and key bindings".to_string(),
        target: Target::Help,
    };
    volumes.chain(pages).chain(std::iter::once(help)).collect()
}

impl Screen for HomeScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Home
    }

    fn init(&mut self) -> Option<Action> {
        Some(Action::Schedule {
            delay: CONNECT_TICK,
            tick: Tick::Connect,
        })
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action> {
        match event {
            ScreenEvent::Resize { width, .. } => {
                self.width = *width;
                None
            }
            ScreenEvent::Tick(Tick::Connect) => {
                if self.phase == Phase::Done {
                    return None;
                }
                self.phase = self.phase.next();
                (self.phase < Phase::Done).then_some(Action::Schedule {
                    delay: CONNECT_TICK,
                    tick: Tick::Connect,
                })
            }
            ScreenEvent::Tick(_) => None,
            ScreenEvent::Key(_) if self.phase < Phase::Done => {
                // Any key skips the animation
                self.phase = Phase::Done;
                None
            }
            ScreenEvent::Key(key) => {
                if let Some(index) = digit_index(key) {
                    return self.select(index);
                }
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => {
                        if self.cursor + 1 < self.items.len() {
                            self.cursor += 1;
                        }
                        None
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        self.cursor = self.cursor.saturating_sub(1);
                        None
                    }
                    KeyCode::Enter => self.select(self.cursor),
                    KeyCode::Char('q') => Some(Action::Quit),
                    KeyCode::Esc => Some(Action::Back),
                    _ => global_shortcut(key),
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (lines, cursor_row) = self.layout();
        let mut scroll = ScrollState::new(area.height as usize);
        scroll.set_content_height(lines.len());
        scroll.ensure_visible(cursor_row, 1);
        let visible = lines.into_iter().skip(scroll.offset).collect();
        render_lines(frame, area, visible);
    }

    fn status(&self) -> StatusInfo {
        StatusInfo::new("HOME", None)
    }
}
