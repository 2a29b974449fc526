use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;
use vitrine_core::Clock;

use crate::app::{App, Focus};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let focus_str = match app.focus {
            Focus::Page => "PAGE",
            Focus::Menu => "MENU",
            Focus::Form => "FORM",
        };

        let status_text = match &app.status_message {
            Some(msg) => format!(" {} | {}", focus_str, msg),
            None => {
                let caps = app.runtime.capabilities();
                let motion = if caps.animations_enabled() {
                    "motion"
                } else {
                    "static"
                };
                format!(" {} | {} | {}", focus_str, app.runtime.page().title, motion)
            }
        };

        let help_hint = match app.focus {
            Focus::Form => " Tab:next field  C-s:send  Esc:leave ",
            Focus::Menu => " j/k:move  Enter:go  Esc:close ",
            Focus::Page => " q:quit  j/k:scroll  m:menu  Tab:form ",
        };
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let bar = Style::default().bg(theme.bg2);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.fg0)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
