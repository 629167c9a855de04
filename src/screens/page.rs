//! Static page reader

use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Frame;

use super::{global_shortcut, Action, Screen, ScreenContext, ScreenEvent, ScreenKind, StatusInfo};
use crate::content::{Archive, Page};
use crate::view::chrome;
use crate::view::markdown::render_markdown;
use crate::view::theme::THEME;
use crate::view::viewport::Viewport;

pub struct PageScreen {
    archive: Arc<Archive>,
    slug: String,
    width: u16,
    viewport: Viewport,
}

impl PageScreen {
    pub fn new(ctx: &ScreenContext, slug: &str) -> Self {
        let mut screen = Self {
            archive: Arc::clone(&ctx.archive),
            slug: slug.to_string(),
            width: ctx.width,
            viewport: Viewport::new(ctx.height as usize),
        };
        screen.viewport.set_lines(screen.layout());
        screen
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn page(&self) -> Option<&Page> {
        self.archive.page(&self.slug)
    }

    fn layout(&self) -> Vec<Line<'static>> {
        let Some(page) = self.page() else {
            return vec![Line::raw("Page not found.")];
        };
        let width = self.width as usize;
        let mut lines = vec![
            Line::styled(page.title.to_uppercase(), THEME.title()),
            chrome::divider(&THEME, width),
            Line::default(),
        ];
        lines.extend(render_markdown(&page.body, &THEME, width.saturating_sub(2)));
        lines
    }
}

impl Screen for PageScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Page
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action> {
        let key = match event {
            ScreenEvent::Key(key) => key,
            ScreenEvent::Resize { width, height } => {
                self.viewport.set_height(*height as usize);
                if *width != self.width {
                    self.width = *width;
                    self.viewport.set_lines(self.layout());
                }
                return None;
            }
            ScreenEvent::Tick(_) => return None,
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('g') => {
                self.viewport.goto_top();
                None
            }
            KeyCode::Char('G') => {
                self.viewport.goto_bottom();
                None
            }
            _ if self.viewport.handle_key(key) => None,
            _ => global_shortcut(key),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.viewport.render(frame, area);
    }

    fn status(&self) -> StatusInfo {
        match self.page() {
            Some(page) => StatusInfo::new(page.title.to_uppercase(), None),
            None => StatusInfo::new("PAGE", None),
        }
    }
}
