//! Markdown layout for terminal display
//!
//! Article and page bodies are parsed with pulldown-cmark into styled lines,
//! then word wrapped to the content width. Block prefixes (blockquote bars,
//! list bullets) are carried separately from the text so wrapped
//! continuation lines keep the right indentation.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

/// A styled run of text
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

/// A line of styled spans with its block prefix.
///
/// `indent` is drawn before the first visual row, `hang` before every row
/// produced by wrapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledLine {
    pub indent: Vec<StyledSpan>,
    pub hang: Vec<StyledSpan>,
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        self.spans.push(StyledSpan {
            text: text.into(),
            style,
        });
    }

    /// Text without prefix or styling
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn continuation(&self) -> Self {
        Self {
            indent: self.hang.clone(),
            hang: self.hang.clone(),
            spans: Vec::new(),
        }
    }

    pub fn to_line(&self) -> Line<'static> {
        Line::from(
            self.indent
                .iter()
                .chain(self.spans.iter())
                .map(|s| Span::styled(s.text.clone(), s.style))
                .collect::<Vec<_>>(),
        )
    }
}

fn spans_width(spans: &[StyledSpan]) -> usize {
    spans.iter().map(|s| s.text.width()).sum()
}

/// Split `s` after as many characters as fit in `width` columns, always
/// taking at least one character so callers make progress.
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut taken = 0;
    for (idx, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(1);
        if taken + w > width && idx > 0 {
            return s.split_at(idx);
        }
        taken += w;
    }
    (s, "")
}

/// Word-wrap styled lines to fit within a given width.
/// Breaks at word boundaries (spaces) when possible, preserving styling.
pub fn wrap_styled_lines(lines: &[StyledLine], max_width: usize) -> Vec<StyledLine> {
    if max_width == 0 {
        return lines.to_vec();
    }

    let mut result = Vec::new();

    for line in lines {
        let indent_width = spans_width(&line.indent);
        if indent_width + spans_width(&line.spans) <= max_width {
            result.push(line.clone());
            continue;
        }

        // Flatten spans into (word-with-leading-spaces, style) segments
        let mut segments: Vec<(String, Style)> = Vec::new();
        for span in &line.spans {
            let mut chars = span.text.chars().peekable();
            while chars.peek().is_some() {
                let mut segment = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch != ' ' {
                        break;
                    }
                    segment.push(ch);
                    chars.next();
                }
                while let Some(&ch) = chars.peek() {
                    if ch == ' ' {
                        break;
                    }
                    segment.push(ch);
                    chars.next();
                }
                if !segment.is_empty() {
                    segments.push((segment, span.style));
                }
            }
        }

        let mut current = StyledLine {
            indent: line.indent.clone(),
            hang: line.hang.clone(),
            spans: Vec::new(),
        };
        let mut available = max_width.saturating_sub(indent_width).max(1);
        let hang_available = max_width.saturating_sub(spans_width(&line.hang)).max(1);
        let mut current_width = 0;

        for (segment, style) in segments {
            let mut segment = segment.as_str();
            loop {
                let seg_width = segment.width();
                if current_width + seg_width <= available {
                    current.push(segment, style);
                    current_width += seg_width;
                    break;
                }
                if current_width > 0 {
                    // Start a new row; spaces at a break are dropped
                    result.push(std::mem::replace(&mut current, line.continuation()));
                    available = hang_available;
                    current_width = 0;
                    segment = segment.trim_start();
                    if segment.is_empty() {
                        break;
                    }
                    continue;
                }
                // Longer than a whole row: break mid-word
                let (take, rest) = split_at_width(segment, available);
                current.push(take, style);
                current_width += take.width();
                if rest.is_empty() {
                    break;
                }
                result.push(std::mem::replace(&mut current, line.continuation()));
                available = hang_available;
                current_width = 0;
                segment = rest;
            }
        }

        if !current.spans.is_empty() {
            result.push(current);
        }
    }

    result
}

/// Line assembly state while walking parser events
struct LineBuilder<'t> {
    theme: &'t Theme,
    lines: Vec<StyledLine>,
    current: Option<StyledLine>,
    /// Quote depth at the end of the last block, when a blank line is owed
    pending_blank: Option<usize>,
    quote_depth: usize,
    /// Next number for ordered lists, `None` for bullet lists
    lists: Vec<Option<u64>>,
    /// The next line opened is the first line of a list item
    item_start: bool,
}

impl<'t> LineBuilder<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            current: None,
            pending_blank: None,
            quote_depth: 0,
            lists: Vec::new(),
            item_start: false,
        }
    }

    fn quote_prefix(&self, depth: usize) -> Vec<StyledSpan> {
        (0..depth)
            .map(|_| StyledSpan {
                text: "│ ".to_string(),
                style: self.theme.fg(self.theme.green_dim),
            })
            .collect()
    }

    fn list_marker(&mut self) -> String {
        match self.lists.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{n}. ");
                *n += 1;
                marker
            }
            _ => "• ".to_string(),
        }
    }

    fn open_line(&mut self) {
        if self.current.is_some() {
            return;
        }
        if let Some(depth) = self.pending_blank.take() {
            if !self.lines.is_empty() {
                let mut blank = StyledLine::new();
                blank.indent = self.quote_prefix(depth);
                self.lines.push(blank);
            }
        }

        let mut indent = self.quote_prefix(self.quote_depth);
        let mut hang = indent.clone();
        if !self.lists.is_empty() {
            let nesting = "  ".repeat(self.lists.len() - 1);
            let marker = if self.item_start {
                self.item_start = false;
                self.list_marker()
            } else {
                String::new()
            };
            let marker_width = marker.width().max(2);
            indent.push(StyledSpan {
                text: format!("{nesting}{marker:<marker_width$}"),
                style: self.theme.fg(self.theme.green),
            });
            hang.push(StyledSpan {
                text: format!("{nesting}{}", " ".repeat(marker_width)),
                style: Style::default(),
            });
        }

        self.current = Some(StyledLine {
            indent,
            hang,
            spans: Vec::new(),
        });
    }

    fn break_line(&mut self) {
        if let Some(line) = self.current.take() {
            self.lines.push(line);
        }
    }

    fn end_block(&mut self) {
        self.break_line();
        self.pending_blank = Some(self.quote_depth);
    }

    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.open_line();
        if let Some(line) = self.current.as_mut() {
            line.push(text, style);
        }
    }

    /// Push text that may contain newlines, one line per part
    fn push_multiline(&mut self, text: &str, style: Style) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.open_line();
                self.break_line();
            }
            self.push(part, style);
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        self.break_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Parse markdown text into styled lines for terminal rendering
pub fn parse_markdown(text: &str, theme: &Theme) -> Vec<StyledLine> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options);
    let mut out = LineBuilder::new(theme);

    // Style stack for nested formatting
    let base = theme.fg(theme.text);
    let mut style_stack: Vec<Style> = vec![base];
    let mut in_code_block = false;
    let code_style = Style::default().fg(theme.cyan).bg(theme.bg_surface);

    for event in parser {
        let current = *style_stack.last().unwrap_or(&base);
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => out.break_line(),
                Tag::Heading { level, .. } => {
                    out.break_line();
                    let color = match level {
                        HeadingLevel::H1 => theme.gold,
                        HeadingLevel::H2 => theme.green,
                        _ => theme.cyan,
                    };
                    style_stack.push(current.fg(color).add_modifier(Modifier::BOLD));
                }
                Tag::BlockQuote(_) => {
                    out.break_line();
                    out.quote_depth += 1;
                    style_stack.push(current.fg(theme.secondary));
                }
                Tag::CodeBlock(kind) => {
                    out.break_line();
                    in_code_block = true;
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            out.push(&format!("[{lang}]"), theme.hint());
                            out.break_line();
                        }
                    }
                }
                Tag::HtmlBlock => out.break_line(),
                Tag::List(start) => {
                    out.break_line();
                    out.lists.push(start);
                }
                Tag::Item => {
                    out.break_line();
                    out.item_start = true;
                }
                Tag::Strong => style_stack.push(current.add_modifier(Modifier::BOLD)),
                Tag::Emphasis => style_stack.push(current.add_modifier(Modifier::ITALIC)),
                Tag::Strikethrough => {
                    style_stack.push(current.add_modifier(Modifier::CROSSED_OUT))
                }
                Tag::Link { .. } | Tag::Image { .. } => {
                    style_stack.push(current.add_modifier(Modifier::UNDERLINED).fg(theme.cyan))
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph | TagEnd::HtmlBlock => out.end_block(),
                TagEnd::Heading(_) => {
                    style_stack.pop();
                    out.end_block();
                }
                TagEnd::BlockQuote(_) => {
                    style_stack.pop();
                    out.break_line();
                    out.quote_depth = out.quote_depth.saturating_sub(1);
                    out.pending_blank = Some(out.quote_depth);
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    out.end_block();
                }
                TagEnd::List(_) => {
                    out.lists.pop();
                    if out.lists.is_empty() {
                        out.end_block();
                    } else {
                        out.break_line();
                    }
                }
                TagEnd::Item => out.break_line(),
                TagEnd::Strong
                | TagEnd::Emphasis
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image => {
                    style_stack.pop();
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    out.push_multiline(&text, code_style);
                } else {
                    out.push_multiline(&text, current);
                }
            }
            Event::Code(code) => {
                out.push(&format!("`{code}`"), code_style);
            }
            Event::Html(html) => {
                out.push_multiline(&html, theme.hint());
            }
            Event::InlineHtml(html) => out.push(&html, theme.hint()),
            Event::SoftBreak => out.push(" ", current),
            Event::HardBreak => {
                out.open_line();
                out.break_line();
            }
            Event::Rule => {
                out.break_line();
                out.push(&"─".repeat(40), theme.fg(theme.border_bright));
                out.end_block();
            }
            _ => {}
        }
    }

    out.finish()
}

/// Parse, wrap and convert a markdown body for a viewport `width` columns
/// wide
pub fn render_markdown(text: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let parsed = parse_markdown(text, theme);
    wrap_styled_lines(&parsed, width)
        .iter()
        .map(StyledLine::to_line)
        .collect()
}
