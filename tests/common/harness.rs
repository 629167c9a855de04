// Navigator test harness on a TestBackend

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use terminull::content::Archive;
use terminull::navigator::{Effect, Navigator};
use terminull::screens::{ScreenContext, ScreenKind};
use terminull::session::{Geometry, SessionEvent};

/// Drives one navigator synchronously and renders it into a test buffer.
/// Timer effects are collected instead of scheduled.
pub struct TestHarness {
    pub navigator: Navigator,
    terminal: Terminal<TestBackend>,
    pub effects: Vec<Effect>,
}

impl TestHarness {
    pub fn new(archive: Arc<Archive>, width: u16, height: u16) -> anyhow::Result<Self> {
        let ctx = ScreenContext {
            archive,
            site_url: "https://terminull.test".to_string(),
            username: "tester".to_string(),
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            width,
            height,
        };
        let mut navigator = Navigator::new(ctx, Geometry { width, height });
        let effects = navigator.start();
        let mut harness = TestHarness {
            navigator,
            terminal: Terminal::new(TestBackend::new(width, height))?,
            effects,
        };
        harness.render()?;
        Ok(harness)
    }

    /// A harness already past the connection animation
    pub fn ready(archive: Arc<Archive>, width: u16, height: u16) -> anyhow::Result<Self> {
        let mut harness = Self::new(archive, width, height)?;
        harness.send(SessionEvent::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        )))?;
        harness.effects.clear();
        Ok(harness)
    }

    pub fn send(&mut self, event: SessionEvent) -> anyhow::Result<()> {
        let effects = self.navigator.handle(event);
        self.effects.extend(effects);
        self.render()
    }

    pub fn send_key(&mut self, code: KeyCode) -> anyhow::Result<()> {
        self.send(SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    pub fn type_char(&mut self, c: char) -> anyhow::Result<()> {
        self.send_key(KeyCode::Char(c))
    }

    pub fn type_text(&mut self, text: &str) -> anyhow::Result<()> {
        for c in text.chars() {
            self.type_char(c)?;
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) -> anyhow::Result<()> {
        self.terminal.backend_mut().resize(width, height);
        self.send(SessionEvent::Resize { width, height })
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let navigator = &self.navigator;
        self.terminal.draw(|frame| navigator.render(frame))?;
        Ok(())
    }

    pub fn kind(&self) -> Option<ScreenKind> {
        self.navigator.active_kind()
    }

    pub fn exited(&self) -> bool {
        self.effects.contains(&Effect::Exit)
    }

    /// Rows of the last frame, trailing spaces trimmed
    pub fn screen_rows(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    pub fn screen_to_string(&self) -> String {
        self.screen_rows().join("\n")
    }

    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen:\n{screen}"
        );
    }

    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen not to contain '{text}'\nScreen:\n{screen}"
        );
    }
}
