//! Volume table of contents

use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{
    digit_index, global_shortcut, render_lines, Action, Screen, ScreenContext, ScreenEvent,
    ScreenKind, StatusInfo, Target,
};
use crate::content::{Archive, Volume};
use crate::view::chrome::{self, truncate};
use crate::view::theme::THEME;
use crate::view::viewport::ScrollState;

pub struct VolumeScreen {
    archive: Arc<Archive>,
    number: u32,
    width: u16,
    cursor: usize,
}

impl VolumeScreen {
    pub fn new(ctx: &ScreenContext, number: u32) -> Self {
        Self {
            archive: Arc::clone(&ctx.archive),
            number,
            width: ctx.width,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn volume(&self) -> Option<&Volume> {
        self.archive.volume(self.number)
    }

    fn article_count(&self) -> usize {
        self.volume().map_or(0, |v| v.articles.len())
    }

    fn open(&mut self, index: usize) -> Option<Action> {
        if index >= self.article_count() {
            return None;
        }
        self.cursor = index;
        Some(Action::Navigate(Target::Article {
            volume: self.number,
            index,
        }))
    }

    /// Lines of the screen and the row of the cursor
    fn layout(&self) -> (Vec<Line<'static>>, usize) {
        let mut lines = vec![
            Line::styled(
                format!("VOLUME {} -- TABLE OF CONTENTS", self.number),
                THEME.title(),
            ),
            chrome::divider(&THEME, self.width as usize),
            Line::default(),
        ];

        let volume = match self.volume() {
            None => {
                lines.push(Line::styled(
                    format!("  Volume {} not found.", self.number),
                    THEME.fg(THEME.secondary),
                ));
                return (lines, 0);
            }
            Some(v) if v.articles.is_empty() => {
                lines.push(Line::styled(
                    "  No articles in this volume.",
                    THEME.fg(THEME.secondary),
                ));
                return (lines, 0);
            }
            Some(v) => v,
        };

        lines.push(Line::styled(
            format!("  {:<4}{:<38}{:<20}{}", "#", "TITLE", "AUTHOR", "CATEGORY"),
            THEME.hint(),
        ));
        lines.push(Line::styled(format!("  {}", "─".repeat(76)), THEME.hint()));

        let first_row = lines.len();
        for (i, article) in volume.articles.iter().enumerate() {
            let category_color = THEME.category_color(&article.category);
            let selected = i == self.cursor;
            let (marker, number, title, author, category) = if selected {
                (
                    Span::styled("▸ ", THEME.fg(THEME.green)),
                    THEME.bold(THEME.green_bright),
                    THEME.fg(THEME.green_bright),
                    THEME.fg(THEME.green),
                    THEME.bold(category_color),
                )
            } else {
                (
                    Span::raw("  "),
                    THEME.fg(THEME.green),
                    THEME.fg(THEME.text),
                    THEME.fg(THEME.secondary),
                    THEME.fg(category_color),
                )
            };
            lines.push(Line::from(vec![
                marker,
                Span::styled(format!("{:<4}", format!("{:02}", article.order)), number),
                Span::styled(format!("{:<38}", truncate(&article.title, 36)), title),
                Span::styled(format!("{:<20}", truncate(&article.author, 18)), author),
                Span::styled(article.category.clone(), category),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            "  Enter to read  |  j/k navigate  |  q back",
            THEME.hint(),
        ));
        (lines, first_row + self.cursor)
    }
}

impl Screen for VolumeScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Volume
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action> {
        let key = match event {
            ScreenEvent::Key(key) => key,
            ScreenEvent::Resize { width, .. } => {
                self.width = *width;
                return None;
            }
            ScreenEvent::Tick(_) => return None,
        };

        if let Some(index) = digit_index(key) {
            return self.open(index);
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.article_count() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Enter => self.open(self.cursor),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Back),
            _ => global_shortcut(key),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (lines, cursor_row) = self.layout();
        let mut scroll = ScrollState::new(area.height as usize);
        scroll.set_content_height(lines.len());
        scroll.ensure_visible(cursor_row, 1);
        render_lines(frame, area, lines.into_iter().skip(scroll.offset).collect());
    }

    fn status(&self) -> StatusInfo {
        StatusInfo::new("TOC", Some(self.number))
    }
}
