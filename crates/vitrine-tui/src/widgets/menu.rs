use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use vitrine_core::Clock;

use crate::app::App;

pub struct MenuWidget;

impl MenuWidget {
    /// Overlay listing nav links; drawn only while the menu is open
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        if !app.runtime.menu_state().is_open() {
            return;
        }
        let theme = &app.theme;
        let links = app.runtime.page().nav_links();

        let width = links
            .iter()
            .map(|l| l.label.chars().count() as u16 + 6)
            .max()
            .unwrap_or(10)
            .max(16)
            .min(area.width);
        let height = (links.len() as u16 + 2).min(area.height);
        let popup_area = Rect::new(
            area.x + area.width.saturating_sub(width),
            area.y,
            width,
            height,
        );

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Menu ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let lines: Vec<Line> = links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let style = if i == app.menu_selection {
                    theme.selected()
                } else {
                    Style::default().fg(theme.fg0)
                };
                Line::from(Span::styled(format!(" {} {}", i + 1, link.label), style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}
