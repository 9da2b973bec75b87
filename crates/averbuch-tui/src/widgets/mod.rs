mod cursor;
mod help;
mod page;
mod status_bar;

pub use cursor::CursorWidget;
pub use help::HelpWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;
