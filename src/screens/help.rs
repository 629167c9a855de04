//! Keyboard reference

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{Action, Screen, ScreenContext, ScreenEvent, ScreenKind, StatusInfo};
use crate::view::chrome;
use crate::view::theme::THEME;
use crate::view::viewport::Viewport;

const SECTIONS: [(&str, &[(&str, &str)]); 3] = [
    (
        "NAVIGATION",
        &[
            ("j / ↓", "Move down"),
            ("k / ↑", "Move up"),
            ("Enter", "Select item"),
            ("Esc / q", "Go back"),
            ("1-9", "Quick jump to item"),
        ],
    ),
    (
        "ARTICLE READER",
        &[
            ("j / ↓", "Scroll down"),
            ("k / ↑", "Scroll up"),
            ("d", "Half page down"),
            ("u", "Half page up"),
            ("g", "Go to top"),
            ("G", "Go to bottom"),
            ("p", "Previous article"),
            ("n", "Next article"),
        ],
    ),
    (
        "GLOBAL",
        &[
            ("?", "Toggle help"),
            ("/", "Open search"),
            ("Ctrl+C", "Quit / disconnect"),
        ],
    ),
];

pub struct HelpScreen {
    viewport: Viewport,
}

impl HelpScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        let mut viewport = Viewport::new(ctx.height as usize);
        viewport.set_lines(layout(ctx.width as usize));
        Self { viewport }
    }
}

fn layout(width: usize) -> Vec<Line<'static>> {
    let section = THEME.bold(THEME.cyan);
    let key = THEME.bold(THEME.green);
    let desc = THEME.fg(THEME.text);

    let mut lines = Vec::new();
    for (i, (title, entries)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::styled(*title, section));
        lines.push(Line::default());
        for (k, d) in entries.iter() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{k:<12}"), key),
                Span::styled(*d, desc),
            ]));
        }
    }
    chrome::box_frame(&THEME, "KEYBOARD REFERENCE", lines, width)
}

impl Screen for HelpScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Help
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action> {
        match event {
            ScreenEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => Some(Action::Back),
                _ => {
                    self.viewport.handle_key(key);
                    None
                }
            },
            ScreenEvent::Resize { width, height } => {
                self.viewport.set_height(*height as usize);
                self.viewport.set_lines(layout(*width as usize));
                None
            }
            ScreenEvent::Tick(_) => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.viewport.render(frame, area);
    }

    fn status(&self) -> StatusInfo {
        StatusInfo::new("HELP", None)
    }
}
