use ratatui::style::{Color, Modifier, Style};

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub muted: Color,

    // Semantic colors
    pub accent: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::gruvbox_dark()
    }
}

impl Theme {
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg0).bg(self.bg0)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Text that is mid-transition
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default().fg(self.fg1).bg(self.bg2)
    }

    pub fn counter(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}
