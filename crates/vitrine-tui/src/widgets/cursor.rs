use ratatui::{
    layout::{Position, Rect},
    style::Style,
    Frame,
};
use vitrine_core::Clock;

use crate::app::App;

pub struct CursorWidget;

impl CursorWidget {
    /// Draw the trailing dot over whatever is beneath it
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let cursor = app.runtime.cursor();
        if !cursor.is_visible() {
            return;
        }
        let (x, y) = cursor.position();
        if x < 0.0 || y < 0.0 {
            return;
        }
        let position = Position::new(x.round() as u16, y.round() as u16);
        if !area.contains(position) {
            return;
        }

        if let Some(cell) = frame.buffer_mut().cell_mut(position) {
            cell.set_symbol("●")
                .set_style(Style::default().fg(app.theme.accent));
        }
    }
}
