//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    /// Scroll the selected card's body.
    ScrollUp,
    ScrollDown,

    // Card operations
    ToggleExpand,
    Save,
    SaveAll,

    // Selection
    /// Prompt for more files to add.
    OpenFiles,

    // UI toggles
    ToggleHelp,
    ToggleTheme,

    Cancel,

    // Application
    Quit,
    ForceQuit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::ForceQuit,

            (KeyCode::Esc, _) => KeyAction::Cancel,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,

            // Jump
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,

            // Body scrolling
            (KeyCode::PageUp, _) => KeyAction::ScrollUp,
            (KeyCode::PageDown, _) => KeyAction::ScrollDown,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => KeyAction::ScrollUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => KeyAction::ScrollDown,

            // Expand/collapse
            (KeyCode::Enter, _) => KeyAction::ToggleExpand,
            (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
            (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleExpand,

            // Downloads
            (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Save,
            (KeyCode::Char('S'), KeyModifiers::SHIFT) => KeyAction::SaveAll,

            (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::OpenFiles,

            // UI toggles
            (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::ToggleHelp,
            (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::ToggleHelp,
            (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleTheme,

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Select previous/next file" },
                KeyBinding { keys: "g/G", description: "Jump to first/last file" },
                KeyBinding { keys: "Ctrl-u/d", description: "Scroll file content" },
            ],
        },
        HelpSection {
            title: "Files",
            bindings: vec![
                KeyBinding { keys: "Enter/o", description: "Show more/less" },
                KeyBinding { keys: "s", description: "Save generated .txt" },
                KeyBinding { keys: "S", description: "Save all generated .txt" },
                KeyBinding { keys: "a", description: "Add files" },
            ],
        },
        HelpSection {
            title: "General",
            bindings: vec![
                KeyBinding { keys: "t", description: "Toggle dark/light theme" },
                KeyBinding { keys: "Esc", description: "Dismiss message" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}
