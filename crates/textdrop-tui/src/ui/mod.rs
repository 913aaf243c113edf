//! UI components and widgets.

mod cards;
mod help;
pub mod modals;

pub use cards::{CARD_CHROME, CardList, CardListState};
pub use help::HelpOverlay;

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub notice: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area; the notice row collapses when empty.
    pub fn new(area: Rect, show_notice: bool) -> Self {
        let [header, notice, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(u16::from(show_notice)),
            Constraint::Min(CARD_CHROME + 1),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            header,
            notice,
            main,
            footer,
        }
    }
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
