//! One connected user
//!
//! A session owns a terminal, a [`Navigator`] and the receiving end of its
//! event channel. Everything that happens to the session (keys, resizes,
//! timer ticks, disconnects) arrives as a [`SessionEvent`] on that channel
//! and is processed in order. Sessions share nothing but the archive.

pub mod identity;

use std::io;
use std::sync::Arc;

use chrono::NaiveDate;
use crossterm::event::{Event, KeyEvent};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::content::Archive;
use crate::navigator::{Effect, Navigator};
use crate::screens::{ScreenContext, Tick};

pub use identity::sanitize_username;

/// Events waiting for a session before senders block
pub const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyEvent),
    /// Terminal size changed
    Resize { width: u16, height: u16 },
    Tick(Tick),
    /// Transport closed or interrupted
    Quit,
}

impl SessionEvent {
    /// Translate a terminal event; mouse, focus and paste events are dropped
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(SessionEvent::Key(key)),
            Event::Resize(width, height) => Some(SessionEvent::Resize { width, height }),
            _ => None,
        }
    }
}

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub const MIN_WIDTH: u16 = 40;
    pub const MAX_WIDTH: u16 = 300;
    pub const MIN_HEIGHT: u16 = 10;
    pub const MAX_HEIGHT: u16 = 100;

    /// Size reported by the transport; zero means unknown and falls back
    /// to 80x24
    pub fn from_transport(width: u16, height: u16) -> Self {
        let width = if width == 0 { 80 } else { width };
        let height = if height == 0 { 24 } else { height };
        Self {
            width: width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
            height: height.clamp(Self::MIN_HEIGHT, Self::MAX_HEIGHT),
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Everything a session is created from
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub archive: Arc<Archive>,
    pub site_url: String,
    /// User name as the transport reported it
    pub username: String,
    pub geometry: Geometry,
    pub today: NaiveDate,
}

pub struct Session<B: Backend> {
    terminal: Terminal<B>,
    navigator: Navigator,
    events: mpsc::Receiver<SessionEvent>,
    /// Timers must not keep the session alive on their own
    timers: mpsc::WeakSender<SessionEvent>,
    username: String,
}

impl<B: Backend> Session<B> {
    /// Create a session and the sender that feeds it. The session ends when
    /// it quits or every sender is dropped.
    pub fn new(backend: B, options: SessionOptions) -> io::Result<(Self, mpsc::Sender<SessionEvent>)> {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let username = sanitize_username(&options.username);
        let ctx = ScreenContext {
            archive: options.archive,
            site_url: options.site_url,
            username: username.clone(),
            today: options.today,
            width: options.geometry.width,
            height: options.geometry.height,
        };
        let session = Self {
            terminal: Terminal::new(backend)?,
            navigator: Navigator::new(ctx, options.geometry),
            events: rx,
            timers: tx.downgrade(),
            username,
        };
        Ok((session, tx))
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Process events until the navigator exits or the channel closes
    pub async fn run(&mut self) -> io::Result<()> {
        let geometry = self.navigator.geometry();
        info!(
            user = %self.username,
            width = geometry.width,
            height = geometry.height,
            "session started"
        );

        let effects = self.navigator.start();
        let mut done = self.apply(effects);
        self.draw()?;

        while !done {
            let Some(event) = self.events.recv().await else {
                debug!(user = %self.username, "event channel closed");
                break;
            };
            let effects = self.navigator.handle(event);
            done = self.apply(effects);
            if !done {
                self.draw()?;
            }
        }

        info!(user = %self.username, "session ended");
        Ok(())
    }

    /// Carry out navigator effects; returns whether the session must end
    fn apply(&mut self, effects: Vec<Effect>) -> bool {
        let mut exit = false;
        for effect in effects {
            match effect {
                Effect::Schedule { delay, tick } => {
                    let timers = self.timers.clone();
                    tokio::spawn(async move {
                        sleep(delay).await;
                        if let Some(tx) = timers.upgrade() {
                            // A closed channel means the session is gone
                            let _ = tx.send(SessionEvent::Tick(tick)).await;
                        }
                    });
                }
                Effect::Exit => exit = true,
            }
        }
        exit
    }

    fn draw(&mut self) -> io::Result<()> {
        let navigator = &self.navigator;
        self.terminal.draw(|frame| navigator.render(frame))?;
        Ok(())
    }
}
