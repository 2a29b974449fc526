use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use vitrine_core::Clock;

use crate::app::App;
use crate::widgets::{CursorWidget, HeaderWidget, MenuWidget, PageWidget, StatusBarWidget};

/// Screen regions: optional header, scrolled content, status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub content: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect, has_header: bool) -> ScreenAreas {
    let header_height = if has_header { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    ScreenAreas {
        header: chunks[0],
        content: chunks[1],
        status: chunks[2],
    }
}

/// Draw one frame, relaying out first if the content area changed
pub fn draw<C: Clock>(frame: &mut Frame, app: &mut App<C>) {
    let areas = screen_layout(frame.area(), app.runtime.page().header.is_some());
    app.ensure_size(areas.content.width, areas.content.height);

    HeaderWidget::render(frame, areas.header, app);
    PageWidget::render(frame, areas.content, app);
    StatusBarWidget::render(frame, areas.status, app);
    MenuWidget::render(frame, areas.content, app);
    CursorWidget::render(frame, frame.area(), app);
}
