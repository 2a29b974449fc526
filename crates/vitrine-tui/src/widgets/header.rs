use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use vitrine_core::Clock;

use crate::app::App;

pub struct HeaderWidget;

impl HeaderWidget {
    /// Brand line plus either inline nav links or the menu toggle hint
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let page = app.runtime.page();
        let Some(header) = page.header.as_ref() else {
            return;
        };
        let theme = &app.theme;
        let scrolled = app.runtime.header().is_some_and(|h| h.is_scrolled());

        let mut spans = vec![Span::styled(
            format!(" {} ", header.brand),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        if let Some(tagline) = &header.tagline {
            spans.push(Span::styled(tagline.clone(), theme.dimmed()));
        }

        let links = page.nav_links();
        if !links.is_empty() {
            spans.push(Span::raw("  "));
            if app.is_compact() && app.runtime.menu_enabled() {
                let label = if app.runtime.menu_state().is_open() {
                    "[m] close menu"
                } else {
                    "[m] menu"
                };
                spans.push(Span::styled(label, Style::default().fg(theme.fg1)));
            } else {
                for (i, link) in links.iter().enumerate() {
                    spans.push(Span::styled(
                        format!("{}:{} ", i + 1, link.label),
                        Style::default().fg(theme.fg1),
                    ));
                }
            }
        }

        // Scrolled headers get a solid background and a rule underneath
        let (style, borders) = if scrolled {
            (Style::default().bg(theme.bg1), Borders::BOTTOM)
        } else {
            (Style::default().bg(theme.bg0), Borders::NONE)
        };
        let block = Block::default()
            .borders(borders)
            .border_style(Style::default().fg(theme.muted))
            .style(style);

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
