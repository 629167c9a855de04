//! Screens of the BBS
//!
//! Every frame on a session's navigation stack is a [`Screen`] trait object.
//! Screens never touch the stack themselves: they answer events with an
//! [`Action`] and the navigator applies it.

pub mod article;
pub mod help;
pub mod home;
pub mod page;
pub mod search;
pub mod volume;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::content::Archive;

pub use article::ArticleScreen;
pub use help::HelpScreen;
pub use home::HomeScreen;
pub use page::PageScreen;
pub use search::SearchScreen;
pub use volume::VolumeScreen;

/// Widest content column; wider terminals leave the rest blank
pub const CONTENT_MAX_WIDTH: u16 = 78;

/// Where a navigation request leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Volume { number: u32 },
    /// Article by position inside its volume
    Article { volume: u32, index: usize },
    Page { slug: String },
    Help,
    Search { query: String },
}

/// Timer kinds re-injected into the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Home connection animation step
    Connect,
    /// Search cursor blink; ticks from an older generation are stale
    Blink { generation: u64 },
}

/// Follow-up requested by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Target),
    Replace(Target),
    Back,
    Quit,
    Schedule { delay: Duration, tick: Tick },
}

/// Input delivered to a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Key(KeyEvent),
    /// New content area size
    Resize { width: u16, height: u16 },
    Tick(Tick),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Home,
    Volume,
    Article,
    Page,
    Help,
    Search,
}

/// What the status bar shows for a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub label: String,
    pub volume: Option<u32>,
}

impl StatusInfo {
    pub fn new(label: impl Into<String>, volume: Option<u32>) -> Self {
        Self {
            label: label.into(),
            volume,
        }
    }
}

/// Session-wide inputs every screen is built from
#[derive(Debug, Clone)]
pub struct ScreenContext {
    pub archive: Arc<Archive>,
    pub site_url: String,
    /// Sanitized display name
    pub username: String,
    pub today: NaiveDate,
    /// Content area width, at most [`CONTENT_MAX_WIDTH`]
    pub width: u16,
    /// Content area height (terminal height minus the status bar)
    pub height: u16,
}

impl ScreenContext {
    /// Update the content area for a terminal of the given size
    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        let (w, h) = content_size(width, height);
        self.width = w;
        self.height = h;
    }
}

/// Content area for a terminal of `width` x `height`
pub fn content_size(width: u16, height: u16) -> (u16, u16) {
    (width.min(CONTENT_MAX_WIDTH), height.saturating_sub(1).max(1))
}

pub trait Screen {
    fn kind(&self) -> ScreenKind;

    /// Runs once right after the screen becomes the top frame
    fn init(&mut self) -> Option<Action> {
        None
    }

    /// Runs when the frame above this one was popped
    fn resume(&mut self) -> Option<Action> {
        None
    }

    fn handle_event(&mut self, event: &ScreenEvent) -> Option<Action>;

    fn render(&self, frame: &mut Frame, area: Rect);

    fn status(&self) -> StatusInfo;
}

pub type BoxedScreen = Box<dyn Screen + Send>;

/// Construct the screen a navigation target names
pub fn build_screen(target: Target, ctx: &ScreenContext) -> BoxedScreen {
    match target {
        Target::Volume { number } => Box::new(VolumeScreen::new(ctx, number)),
        Target::Article { volume, index } => Box::new(ArticleScreen::new(ctx, volume, index)),
        Target::Page { slug } => Box::new(PageScreen::new(ctx, &slug)),
        Target::Help => Box::new(HelpScreen::new(ctx)),
        Target::Search { query } => Box::new(SearchScreen::new(ctx, &query)),
    }
}

/// `?` and `/`, available on every browsing screen
fn global_shortcut(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('?') => Some(Action::Navigate(Target::Help)),
        KeyCode::Char('/') => Some(Action::Navigate(Target::Search {
            query: String::new(),
        })),
        _ => None,
    }
}

/// Digit quick-jump: `1`-`9` pick items 0-8, `0` the tenth
fn digit_index(key: &KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Char('0') => Some(9),
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// Render pre-laid-out lines into `area`, clipped to the frame
fn render_lines(frame: &mut Frame, area: Rect, lines: Vec<ratatui::text::Line<'static>>) {
    let area = area.intersection(frame.area());
    if area.is_empty() {
        return;
    }
    frame.render_widget(ratatui::widgets::Paragraph::new(lines), area);
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_content_size() {
        assert_eq!(content_size(120, 40), (78, 39));
        assert_eq!(content_size(60, 20), (60, 19));
        assert_eq!(content_size(10, 0), (10, 1));
    }

    #[test]
    fn test_build_screen_kinds() {
        let ctx = ctx();
        let cases = [
            (Target::Volume { number: 1 }, ScreenKind::Volume),
            (Target::Article { volume: 1, index: 0 }, ScreenKind::Article),
            (
                Target::Page {
                    slug: "about".to_string(),
                },
                ScreenKind::Page,
            ),
            (Target::Help, ScreenKind::Help),
            (
                Target::Search {
                    query: String::new(),
                },
                ScreenKind::Search,
            ),
        ];
        for (target, kind) in cases {
            assert_eq!(build_screen(target, &ctx).kind(), kind);
        }
    }

    #[test]
    fn test_digit_index() {
        let k = |c| KeyEvent::new(KeyCode::Char(c), crossterm::event::KeyModifiers::NONE);
        assert_eq!(digit_index(&k('1')), Some(0));
        assert_eq!(digit_index(&k('9')), Some(8));
        assert_eq!(digit_index(&k('0')), Some(9));
        assert_eq!(digit_index(&k('a')), None);
    }
}
