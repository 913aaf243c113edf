//! Application constants.

/// Lines scrolled by Ctrl-u/Ctrl-d inside a card.
pub const SCROLL_STEP: isize = 10;

/// Channel buffer size for background import and save events.
pub const EVENT_CHANNEL_SIZE: usize = 100;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;
