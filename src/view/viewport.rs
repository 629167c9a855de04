//! Scrollable view over pre-rendered lines
//!
//! Article, page and help screens lay their content out once per width and
//! keep it in a [`Viewport`]; only the scroll offset changes on key presses.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Pure scroll state - knows nothing about content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Scroll offset in rows
    pub offset: usize,
    /// Viewport height
    pub viewport: usize,
    /// Total content height
    pub content_height: usize,
}

impl ScrollState {
    pub fn new(viewport: usize) -> Self {
        Self {
            offset: 0,
            viewport,
            content_height: 0,
        }
    }

    /// Update viewport height
    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height;
        self.clamp_offset();
    }

    /// Update content height (call when content changes)
    pub fn set_content_height(&mut self, height: usize) {
        self.content_height = height;
        self.clamp_offset();
    }

    /// Maximum scroll offset
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scroll to ensure a region is visible
    /// If region is taller than viewport, shows the top
    pub fn ensure_visible(&mut self, y: usize, height: usize) {
        if y < self.offset {
            self.offset = y;
        } else if y + height > self.offset + self.viewport {
            if height > self.viewport {
                self.offset = y;
            } else {
                self.offset = y + height - self.viewport;
            }
        }
        self.clamp_offset();
    }

    /// Scroll by delta rows (positive = down, negative = up)
    pub fn scroll_by(&mut self, delta: isize) {
        if delta < 0 {
            self.offset = self.offset.saturating_sub(delta.unsigned_abs());
        } else {
            self.offset = self.offset.saturating_add(delta as usize);
        }
        self.clamp_offset();
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }
}

/// Lines plus scroll state, with the pager key bindings
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    lines: Vec<Line<'static>>,
    scroll: ScrollState,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            lines: Vec::new(),
            scroll: ScrollState::new(height),
        }
    }

    /// Replace the content, keeping the offset where it still fits
    pub fn set_lines(&mut self, lines: Vec<Line<'static>>) {
        self.scroll.set_content_height(lines.len());
        self.lines = lines;
    }

    pub fn set_height(&mut self, height: usize) {
        self.scroll.set_viewport(height);
    }

    pub fn height(&self) -> usize {
        self.scroll.viewport
    }

    pub fn offset(&self) -> usize {
        self.scroll.offset
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn goto_top(&mut self) {
        self.scroll.goto_top();
    }

    pub fn goto_bottom(&mut self) {
        self.scroll.goto_bottom();
    }

    /// Scrolling keys. Returns whether the key was one of them.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let page = self.scroll.viewport.max(1) as isize;
        let half = (page / 2).max(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll.scroll_by(-1),
            KeyCode::Char('d') => self.scroll.scroll_by(half),
            KeyCode::Char('u') => self.scroll.scroll_by(-half),
            KeyCode::PageDown | KeyCode::Char('f') | KeyCode::Char(' ') => {
                self.scroll.scroll_by(page)
            }
            KeyCode::PageUp | KeyCode::Char('b') => self.scroll.scroll_by(-page),
            KeyCode::Home => self.scroll.goto_top(),
            KeyCode::End => self.scroll.goto_bottom(),
            _ => return false,
        }
        true
    }

    /// Lines currently inside the window
    pub fn visible(&self) -> &[Line<'static>] {
        let start = self.scroll.offset.min(self.lines.len());
        let end = (start + self.scroll.viewport).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = area.intersection(frame.area());
        if area.is_empty() {
            return;
        }
        frame.render_widget(Paragraph::new(self.visible().to_vec()), area);
    }
}
