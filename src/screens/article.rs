//! Article reader

use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{
    global_shortcut, Action, Screen, ScreenContext, ScreenEvent, ScreenKind, StatusInfo, Target,
};
use crate::content::{transform, Archive, Article, Volume};
use crate::view::chrome;
use crate::view::markdown::render_markdown;
use crate::view::theme::THEME;
use crate::view::viewport::Viewport;

pub struct ArticleScreen {
    archive: Arc<Archive>,
    site_url: String,
    volume: u32,
    index: usize,
    width: u16,
    viewport: Viewport,
}

impl ArticleScreen {
    pub fn new(ctx: &ScreenContext, volume: u32, index: usize) -> Self {
        let mut screen = Self {
            archive: Arc::clone(&ctx.archive),
            site_url: ctx.site_url.clone(),
            volume,
            index,
            width: ctx.width,
            viewport: Viewport::new(ctx.height as usize),
        };
        screen.viewport.set_lines(screen.layout());
        screen
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn volume_ref(&self) -> Option<&Volume> {
        self.archive.volume(self.volume)
    }

    fn article(&self) -> Option<&Article> {
        self.archive.article(self.volume, self.index)
    }

    fn sibling(&self, index: Option<usize>) -> Option<Action> {
        let index = index?;
        self.archive.article(self.volume, index)?;
        Some(Action::Replace(Target::Article {
            volume: self.volume,
            index,
        }))
    }

    fn layout(&self) -> Vec<Line<'static>> {
        let Some(article) = self.article() else {
            return vec![Line::raw("Article not found.")];
        };
        let width = self.width as usize;

        let mut author = article.author.clone();
        if !article.handle.is_empty() {
            author.push_str(&format!(" (@{})", article.handle));
        }
        let tags = if article.tags.is_empty() {
            "none".to_string()
        } else {
            article.tags.join(", ")
        };
        let meta = vec![
            Line::raw(format!(
                "Article #{:02}  |  {}  |  {}",
                article.order,
                article.category.to_uppercase(),
                article.date_label()
            )),
            Line::raw(format!("Author: {author}")),
            Line::raw(format!("Tags: {tags}")),
        ];
        let title = format!("VOL {} // {}", self.volume, article.title);
        let mut lines = chrome::box_frame(&THEME, &title, meta, width);
        lines.push(Line::default());

        let body = transform(&article.body, &self.site_url, self.volume, &article.slug);
        lines.extend(
            render_markdown(&body, &THEME, width.saturating_sub(2))
                .into_iter()
                .map(|line| {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans);
                    Line::from(spans)
                }),
        );

        lines.push(Line::default());
        lines.push(chrome::divider(&THEME, width));
        lines.push(Line::default());

        if let Some(volume) = self.volume_ref() {
            let nav = THEME.hint();
            let link = THEME.fg(THEME.cyan);
            if let Some(prev) = self
                .index
                .checked_sub(1)
                .and_then(|i| volume.articles.get(i))
            {
                lines.push(Line::from(vec![
                    Span::styled("  [p] prev  ", nav),
                    Span::styled(prev.title.clone(), link),
                ]));
            }
            if let Some(next) = volume.articles.get(self.index + 1) {
                lines.push(Line::from(vec![
                    Span::styled("  [n] next  ", nav),
                    Span::styled(next.title.clone(), link),
                ]));
            }
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            "  [q] back to table of contents",
            THEME.hint(),
        ));
        lines
    }
}

impl Screen for ArticleScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Article
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
            KeyCode::Char('p') => self.sibling(self.index.checked_sub(1)),
            KeyCode::Char('n') => self.sibling(Some(self.index + 1)),
            KeyCode::Char('g') => {
                self.viewport.goto_top();
                None
            }
            KeyCode::Char('G') => {
                self.viewport.goto_bottom();
                None
            }
            _ => {
                if self.viewport.handle_key(key) {
                    None
                } else {
                    global_shortcut(key)
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.viewport.render(frame, area);
    }

    fn status(&self) -> StatusInfo {
        match self.article() {
            Some(article) => StatusInfo::new(article.title.clone(), Some(self.volume)),
            None => StatusInfo::new("ARTICLE", Some(self.volume)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn long_ctx() -> ScreenContext {
        let mut archive = archive();
        let body: String = (0..80).map(|i| format!("Paragraph {i}.\n\n")).collect();
        archive.volumes[0].articles[1].body = body;
        archive.volumes[0].articles[1].tags = vec!["asm".to_string(), "x86".to_string()];
        archive.volumes[0].articles[1].handle = "aleph".to_string();
        let mut ctx = ctx();
        ctx.archive = Arc::new(archive);
        ctx
    }

    #[test]
    fn test_sibling_navigation() {
        let ctx = ctx();
        let mut first = ArticleScreen::new(&ctx, 1, 0);
        assert_eq!(first.handle_event(&key('p')), None);
        assert_eq!(
            first.handle_event(&key('n')),
            Some(Action::Replace(Target::Article {
                volume: 1,
                index: 1
            }))
        );

        let mut last = ArticleScreen::new(&ctx, 1, 2);
        assert_eq!(last.handle_event(&key('n')), None);
        assert_eq!(
            last.handle_event(&key('p')),
            Some(Action::Replace(Target::Article {
                volume: 1,
                index: 1
            }))
        );
    }

    #[test]
    fn test_scrolling() {
        let mut screen = ArticleScreen::new(&long_ctx(), 1, 1);
        screen.handle_event(&key('j'));
        screen.handle_event(&key('j'));
        assert_eq!(screen.viewport().offset(), 2);
        screen.handle_event(&key('G'));
        assert!(screen.viewport().scroll().at_bottom());
        assert!(screen.viewport().offset() > 0);
        screen.handle_event(&key('g'));
        assert_eq!(screen.viewport().offset(), 0);
        screen.handle_event(&key('d'));
        assert_eq!(screen.viewport().offset(), 11);
    }

    #[test]
    fn test_keys() {
        let mut screen = ArticleScreen::new(&ctx(), 1, 0);
        assert_eq!(screen.handle_event(&key('q')), Some(Action::Back));
        assert_eq!(screen.handle_event(&code(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(
            screen.handle_event(&key('?')),
            Some(Action::Navigate(Target::Help))
        );
        assert_eq!(screen.handle_event(&key('x')), None);
    }

    #[test]
    fn test_render_metadata() {
        let screen = ArticleScreen::new(&long_ctx(), 1, 1);
        let rows = render_rows(&screen, 78, 23);
        assert!(rows[0].starts_with("┌─[ VOL 1 // Shellcode ]"));
        assert!(rows[1].contains("Article #02  |  GUIDE  |  undated"));
        assert!(rows[2].contains("Author: Author (@aleph)"));
        assert!(rows[3].contains("Tags: asm, x86"));
        assert_eq!(rows[6], "  Paragraph 0.");
        assert_eq!(screen.status(), StatusInfo::new("Shellcode", Some(1)));
    }

    #[test]
    fn test_footer_links() {
        let screen = ArticleScreen::new(&ctx(), 1, 1);
        let rows = render_rows(&screen, 78, 23).join("\n");
        assert!(rows.contains("[p] prev  Intro"));
        assert!(rows.contains("[n] next  Radio Hacking"));
        assert!(rows.contains("[q] back to table of contents"));
    }

    #[test]
    fn test_body_is_transformed() {
        let mut archive = archive();
        archive.volumes[0].articles[0].body = "![net](n.png)".to_string();
        let mut ctx = ctx();
        ctx.archive = Arc::new(archive);
        let screen = ArticleScreen::new(&ctx, 1, 0);
        let rows = render_rows(&screen, 78, 23).join("\n");
        assert!(rows.contains("[IMAGE: net] — view at https://z.example/vol/1/intro"));
    }

    #[test]
    fn test_missing_article() {
        let mut screen = ArticleScreen::new(&ctx(), 1, 9);
        let rows = render_rows(&screen, 40, 5);
        assert_eq!(rows[0], "Article not found.");
        assert_eq!(screen.handle_event(&key('n')), None);
        assert_eq!(screen.status(), StatusInfo::new("ARTICLE", Some(1)));
    }

    #[test]
    fn test_resize_relayouts() {
        let mut screen = ArticleScreen::new(&long_ctx(), 1, 1);
        let before = screen.viewport().lines().len();
        screen.handle_event(&ScreenEvent::Resize {
            width: 40,
            height: 10,
        });
        assert_eq!(screen.viewport().height(), 10);
        assert!(screen.viewport().lines().iter().all(|l| l.width() <= 40));
        assert!(screen.viewport().lines().len() >= before);
    }
}
