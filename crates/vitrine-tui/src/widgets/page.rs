use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use vitrine_core::form::StatusCategory;
use vitrine_core::Clock;

use crate::app::{App, Focus, RevealPhase};
use crate::layout::{LineKind, PageLine};

pub struct PageWidget;

impl PageWidget {
    /// Render the scrolled page body
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let top = app.scroll.current_scroll() as usize;
        let lines: Vec<Line> = app
            .layout
            .lines
            .iter()
            .skip(top)
            .take(area.height as usize)
            .map(|line| Self::render_line(line, app))
            .collect();

        frame.render_widget(Paragraph::new(lines).style(app.theme.base()), area);
    }

    fn render_line<C: Clock>(line: &PageLine, app: &App<C>) -> Line<'static> {
        let theme = &app.theme;

        // Reveal targets stay blank until their entrance starts
        let phase = app.reveal_phase(line.reveal);
        if phase == RevealPhase::Hidden {
            return Line::default();
        }
        let entering = phase == RevealPhase::Entering;
        let pick = |style: Style| if entering { theme.dimmed() } else { style };

        match &line.kind {
            LineKind::Blank => Line::default(),
            LineKind::Heading { .. } | LineKind::FormHeading => {
                Line::from(Span::styled(line.text.clone(), pick(theme.heading())))
            }
            LineKind::Body { .. } => Line::from(Span::styled(
                line.text.clone(),
                pick(Style::default().fg(theme.fg0)),
            )),
            LineKind::Counter { element, .. } => {
                let display = app
                    .runtime
                    .counters()
                    .counter(*element)
                    .map(|c| c.display().to_string())
                    .unwrap_or_default();
                Line::from(vec![
                    Span::styled(display, pick(theme.counter())),
                    Span::raw("  "),
                    Span::styled(line.text.clone(), pick(theme.dimmed())),
                ])
            }
            LineKind::Field { index } => {
                let value = app
                    .runtime
                    .form()
                    .and_then(|f| f.value_at(*index))
                    .unwrap_or_default()
                    .replace('\n', " ");
                let focused = app.focus == Focus::Form && app.field_focus == *index;
                let value_style = if focused {
                    theme.selected()
                } else {
                    Style::default().fg(theme.fg1).add_modifier(Modifier::UNDERLINED)
                };
                let caret = if focused { "▏" } else { "" };
                Line::from(vec![
                    Span::styled(format!("{}: ", line.text), theme.dimmed()),
                    Span::styled(format!("{}{}", value, caret), value_style),
                ])
            }
            LineKind::Status => {
                let Some(form) = app.runtime.form() else {
                    return Line::default();
                };
                let status = form.status();
                let color = match status.category() {
                    Some(StatusCategory::Success) => theme.success,
                    Some(StatusCategory::Error) => theme.error,
                    None => theme.fg0,
                };
                Line::from(Span::styled(
                    status.message().to_string(),
                    Style::default().fg(color),
                ))
            }
        }
    }
}
