//! Terminal user interface for textdrop.
//!
//! This crate provides an interactive TUI for loading text files, reading
//! their previews, and saving the generated `.txt` downloads, built with
//! ratatui.
//!
//! # Overview
//!
//! - **Cards** - one card per decoded file with name, size, and preview
//! - **Show more/less** - expand a card to its full content
//! - **Downloads** - write `arquivo_<name>.txt` next to the other outputs
//! - **Notices** - a single banner describing the last selection batch
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use textdrop_tui::{TuiConfig, UserSettings};
//!
//! let config = TuiConfig {
//!     files: vec![PathBuf::from("notes.txt")],
//!     settings: UserSettings::load(),
//!     persist_settings: true,
//! };
//! textdrop_tui::run(config).unwrap();
//! ```
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Select next/previous file
//! - `Enter`/`o`/`Space` - Show more/less
//! - `s`/`S` - Save selected/all downloads
//! - `a` - Add files
//! - `?` - Help
//! - `q` - Quit

use std::path::PathBuf;

pub mod app;
mod event;
mod theme;
mod ui;

pub use app::state::UserSettings;
pub use app::{App, AppResult};
pub use theme::{Theme, ThemeVariant};

/// Startup options for the TUI.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Files imported as the first batch.
    pub files: Vec<PathBuf>,
    /// Effective settings, after command-line overrides.
    pub settings: UserSettings,
    /// Write theme changes back to the settings file.
    pub persist_settings: bool,
}

/// Run the TUI application.
pub fn run(config: TuiConfig) -> AppResult<()> {
    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    let app = App::new(config)?;
    let terminal = ratatui::init();
    let result = rt.block_on(app.run(terminal));
    ratatui::restore();

    // Shutdown runtime immediately to cancel background tasks
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
