mod cursor;
mod header;
mod menu;
mod page;
mod status_bar;

pub use cursor::CursorWidget;
pub use header::HeaderWidget;
pub use menu::MenuWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;
