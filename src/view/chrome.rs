//! Shared BBS decorations: box frames, dividers, logo and home screen
//! panels

use chrono::NaiveDate;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

const LOGO: [&str; 5] = [
    r" _                      _             _ _ ",
    r"| |_ ___ _ __ _ __ ___ (_)_ __  _   _| | |",
    r"| __/ _ \ '__| '_ ` _ \| | '_ \| | | | | |",
    r"| ||  __/ |  | | | | | | | | | | |_| | | |",
    r" \__\___|_|  |_| |_| |_|_|_| |_|\__,_|_|_|",
];

const MOTD: [&str; 3] = [
    "Knowledge wants to be free.",
    "Share what you learn. Teach what you know.",
    "The terminal is your canvas.",
];

/// Shorten `s` to at most `max` columns, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Cut a styled line to at most `max` columns
pub fn fit_line(line: Line<'static>, max: usize) -> Line<'static> {
    if line.width() <= max {
        return line;
    }
    let mut used = 0;
    let mut spans = Vec::new();
    for span in line.spans {
        let w = span.content.width();
        if used + w <= max {
            used += w;
            spans.push(span);
            continue;
        }
        let mut text = String::new();
        for ch in span.content.chars() {
            let cw = ch.width().unwrap_or(0);
            if used + cw > max {
                break;
            }
            text.push(ch);
            used += cw;
        }
        spans.push(Span::styled(text, span.style));
        break;
    }
    Line::from(spans)
}

/// Draw a box-drawing frame around content lines, with an optional
/// `[ TITLE ]` in the top border. `width` is the outer width, at least 10.
pub fn box_frame(
    theme: &Theme,
    title: &str,
    lines: Vec<Line<'static>>,
    width: usize,
) -> Vec<Line<'static>> {
    let width = width.max(10);
    let inner = width - 2;
    let border = theme.fg(theme.border_bright);
    let mut out = Vec::with_capacity(lines.len() + 2);

    if title.is_empty() {
        out.push(Line::styled(format!("┌{}┐", "─".repeat(inner)), border));
    } else {
        // "┌─" + "[ " + title + " ]" + fill + "┐"
        let title = truncate(title, inner.saturating_sub(5));
        let label = format!("[ {title} ]");
        let fill = inner.saturating_sub(1 + label.width());
        out.push(Line::from(vec![
            Span::styled("┌─", border),
            Span::styled(label, theme.fg(theme.cyan)),
            Span::styled(format!("{}┐", "─".repeat(fill)), border),
        ]));
    }

    for line in lines {
        let line = fit_line(line, inner - 1);
        let pad = inner - 1 - line.width();
        let mut spans = vec![Span::styled("│", border), Span::raw(" ")];
        spans.extend(line.spans.into_iter().map(|s| {
            if s.style == Default::default() {
                s.style(theme.fg(theme.secondary))
            } else {
                s
            }
        }));
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled("│", border));
        out.push(Line::from(spans));
    }

    out.push(Line::styled(format!("└{}┘", "─".repeat(inner)), border));
    out
}

/// A horizontal rule of `─`
pub fn divider(theme: &Theme, width: usize) -> Line<'static> {
    Line::styled("─".repeat(width), theme.fg(theme.border_bright))
}

/// One line of the connection sequence on the home screen
pub fn connection_line(theme: &Theme, text: &str, bright: bool) -> Line<'static> {
    let color = if bright { theme.green } else { theme.green_dim };
    Line::styled(text.to_string(), theme.fg(color))
}

pub fn logo(theme: &Theme) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::styled(l.to_string(), theme.fg(theme.green)))
        .collect()
}

/// The centred zine tagline, naming the latest volume when there is one
pub fn tagline(theme: &Theme, latest_volume: Option<u32>, width: usize) -> Line<'static> {
    let base = "h a c k e r   e - z i n e";
    let text = match latest_volume {
        Some(n) if n > 0 => format!("[ {base}   / /   v o l . {n} ]"),
        _ => format!("[ {base} ]"),
    };
    let pad = width.saturating_sub(text.width()) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(text, theme.fg(theme.green)),
    ])
}

/// Box with the connection details shown after the animation
pub fn system_info(
    theme: &Theme,
    username: &str,
    date: NaiveDate,
    width: usize,
) -> Vec<Line<'static>> {
    let lines = vec![
        Line::raw(format!(
            "Connected: {}  |  User: {username}  |  Node: terminull.local",
            date.format("%Y-%m-%d")
        )),
        Line::raw("Protocol: SSH-2.0  |  Term: xterm-256color  |  Charset: UTF-8"),
    ];
    box_frame(theme, "SYSTEM INFO", lines, width.min(78))
}

/// Message of the day box
pub fn motd(theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let lines = MOTD.iter().map(|l| Line::raw(*l)).collect();
    box_frame(theme, "MOTD", lines, width.min(78))
}

pub fn footer(theme: &Theme, width: usize) -> Vec<Line<'static>> {
    vec![
        divider(theme, width),
        Line::styled(
            "terminull v1.0 // no tracking // no ads // just text",
            theme.hint(),
        ),
        Line::styled("Ctrl+C to disconnect", theme.hint()),
    ]
}
