//! Per-session navigation stack
//!
//! The navigator owns every screen of one session. It turns [`SessionEvent`]s
//! into screen events, applies the [`Action`]s screens answer with and hands
//! the session driver the [`Effect`]s it has to carry out (timers, exit).

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use tracing::debug;

use crate::screens::{
    build_screen, content_size, Action, BoxedScreen, HomeScreen, ScreenContext, ScreenEvent,
    ScreenKind, StatusInfo, Target, Tick,
};
use crate::session::{Geometry, SessionEvent};
use crate::view::status_bar::render_status_bar;
use crate::view::theme::THEME;

/// Deepest the stack gets; navigating further replaces the top frame
pub const MAX_STACK_DEPTH: usize = 20;

/// Work the session driver does on the navigator's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `SessionEvent::Tick(tick)` after `delay`
    Schedule { delay: Duration, tick: Tick },
    Exit,
}

pub struct Navigator {
    ctx: ScreenContext,
    geometry: Geometry,
    stack: Vec<BoxedScreen>,
    terminated: bool,
}

impl Navigator {
    /// A stack holding the home screen. `ctx` size fields are overwritten
    /// from `geometry`.
    pub fn new(mut ctx: ScreenContext, geometry: Geometry) -> Self {
        ctx.set_terminal_size(geometry.width, geometry.height);
        let home: BoxedScreen = Box::new(HomeScreen::new(&ctx));
        Self {
            ctx,
            geometry,
            stack: vec![home],
            terminated: false,
        }
    }

    /// Run the root screen's init action
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let action = self.stack.last_mut().and_then(|s| s.init());
        self.apply(action, &mut effects);
        effects
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.terminated {
            return effects;
        }

        match event {
            SessionEvent::Quit => self.terminate(&mut effects),
            SessionEvent::Key(key) if key.kind != KeyEventKind::Press => {}
            SessionEvent::Key(key)
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                debug!("interrupt");
                self.terminate(&mut effects);
            }
            SessionEvent::Resize { width, height } => {
                self.geometry = Geometry { width, height };
                self.ctx.set_terminal_size(width, height);
                let (w, h) = content_size(width, height);
                let resize = ScreenEvent::Resize {
                    width: w,
                    height: h,
                };
                // Every frame learns the size, so Back never shows a stale layout
                let mut actions = Vec::new();
                for screen in &mut self.stack {
                    actions.push(screen.handle_event(&resize));
                }
                for action in actions {
                    self.apply(action, &mut effects);
                }
            }
            SessionEvent::Key(key) => {
                let action = self
                    .stack
                    .last_mut()
                    .and_then(|s| s.handle_event(&ScreenEvent::Key(key)));
                self.apply(action, &mut effects);
            }
            SessionEvent::Tick(tick) => {
                let action = self
                    .stack
                    .last_mut()
                    .and_then(|s| s.handle_event(&ScreenEvent::Tick(tick)));
                self.apply(action, &mut effects);
            }
        }
        effects
    }

    /// Apply an action and whatever follow-up actions it triggers
    fn apply(&mut self, action: Option<Action>, effects: &mut Vec<Effect>) {
        let mut next = action;
        while let Some(action) = next.take() {
            if self.terminated {
                return;
            }
            next = match action {
                Action::Navigate(target) => self.push(target),
                Action::Replace(target) => self.replace(target),
                Action::Back => {
                    if self.stack.len() <= 1 {
                        debug!("back at root frame");
                        self.terminate(effects);
                        None
                    } else {
                        self.stack.pop();
                        debug!(depth = self.stack.len(), "popped frame");
                        self.stack.last_mut().and_then(|s| s.resume())
                    }
                }
                Action::Quit => {
                    self.terminate(effects);
                    None
                }
                Action::Schedule { delay, tick } => {
                    effects.push(Effect::Schedule { delay, tick });
                    None
                }
            };
        }
    }

    fn push(&mut self, target: Target) -> Option<Action> {
        let mut screen = build_screen(target.clone(), &self.ctx);
        let action = screen.init();
        if self.stack.len() < MAX_STACK_DEPTH {
            self.stack.push(screen);
            debug!(?target, depth = self.stack.len(), "pushed frame");
        } else if let Some(top) = self.stack.last_mut() {
            *top = screen;
            debug!(?target, depth = self.stack.len(), "stack full, replaced top frame");
        }
        action
    }

    fn replace(&mut self, target: Target) -> Option<Action> {
        let mut screen = build_screen(target.clone(), &self.ctx);
        let action = screen.init();
        match self.stack.last_mut() {
            Some(top) => *top = screen,
            None => self.stack.push(screen),
        }
        debug!(?target, depth = self.stack.len(), "replaced top frame");
        action
    }

    fn terminate(&mut self, effects: &mut Vec<Effect>) {
        if !self.terminated {
            self.terminated = true;
            effects.push(Effect::Exit);
        }
    }

    /// Draw the top frame into the content area and the status bar on the
    /// last row
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        if area.is_empty() {
            return;
        }
        let (width, height) = content_size(area.width, area.height);
        let content = Rect::new(area.x, area.y, width, height.min(area.height));
        if let Some(screen) = self.stack.last() {
            screen.render(frame, content);
        }

        let status = self.status();
        let bar = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        render_status_bar(frame, bar, &THEME, &status.label, status.volume);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn active_kind(&self) -> Option<ScreenKind> {
        self.stack.last().map(|s| s.kind())
    }

    pub fn status(&self) -> StatusInfo {
        self.stack
            .last()
            .map(|s| s.status())
            .unwrap_or_else(|| StatusInfo::new("", None))
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }
}
