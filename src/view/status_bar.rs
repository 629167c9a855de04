//! Bottom status line
//!
//! `terminull // vol.N [ LABEL ]` on the left, key hints on the right.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

pub const KEY_HINTS: &str = "? help | j/k nav | / search";

/// Status bar text padded to `width` columns. The hints are pushed right
/// with at least one space between the halves.
pub fn status_text(label: &str, volume: Option<u32>, width: usize) -> String {
    let mut left = String::from("terminull");
    if let Some(n) = volume {
        left.push_str(&format!(" // vol.{n}"));
    }
    if !label.is_empty() {
        left.push_str(&format!(" [ {label} ]"));
    }

    let gap = width
        .saturating_sub(left.width() + KEY_HINTS.width())
        .max(1);
    let mut bar = format!("{left}{}{KEY_HINTS}", " ".repeat(gap));
    let used = bar.width();
    if used < width {
        bar.push_str(&" ".repeat(width - used));
    }
    bar
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    label: &str,
    volume: Option<u32>,
) {
    let area = area.intersection(frame.area());
    if area.is_empty() {
        return;
    }
    let style = Style::default().fg(theme.secondary).bg(theme.bg_surface);
    let text = status_text(label, volume, area.width as usize);
    frame.render_widget(Paragraph::new(Line::from(text)).style(style), area);
}
