use ratatui::style::{Color, Modifier, Style};

/// Colour palette for every screen.
///
/// xterm-256 indices so the look survives terminals without truecolor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub green: Color,
    pub green_bright: Color,
    pub green_dim: Color,
    pub gold: Color,
    pub cyan: Color,
    pub cyan_dim: Color,
    pub pink: Color,
    pub pink_dim: Color,
    pub red: Color,
    pub text: Color,
    pub secondary: Color,
    pub muted: Color,
    pub border_bright: Color,
    pub bg_surface: Color,
}

/// The one theme the BBS ships with
pub const THEME: Theme = Theme::terminull();

impl Theme {
    pub const fn terminull() -> Self {
        Self {
            green: Color::Indexed(148),
            green_bright: Color::Indexed(191),
            green_dim: Color::Indexed(100),
            gold: Color::Indexed(220),
            cyan: Color::Indexed(81),
            cyan_dim: Color::Indexed(67),
            pink: Color::Indexed(206),
            pink_dim: Color::Indexed(132),
            red: Color::Indexed(203),
            text: Color::Indexed(252),
            secondary: Color::Indexed(244),
            muted: Color::Indexed(239),
            border_bright: Color::Indexed(240),
            bg_surface: Color::Indexed(234),
        }
    }

    /// Badge colour for an article category
    pub fn category_color(&self, category: &str) -> Color {
        match category {
            "guide" => self.cyan,
            "editorial" => self.gold,
            "writeup" => self.green,
            "tool" => self.pink,
            "security-news" => self.red,
            "ascii-art" => self.green_bright,
            "fiction" => self.pink_dim,
            "interview" => self.cyan_dim,
            _ => self.secondary,
        }
    }

    pub fn fg(&self, color: Color) -> Style {
        Style::default().fg(color)
    }

    pub fn bold(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Section headings (screen titles, MAIN MENU)
    pub fn title(&self) -> Style {
        self.bold(self.gold)
    }

    pub fn hint(&self) -> Style {
        self.fg(self.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::terminull()
    }
}
