//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use textdrop_ingest::ImportProgress;

use crate::app::input::InputState;
use crate::theme::Theme;
use crate::ui::help::centered;

/// Modal with a single-line text input.
pub struct InputModal<'a> {
    theme: &'a Theme,
    input: &'a InputState,
    title: &'a str,
    prompt: &'a str,
}

impl<'a> InputModal<'a> {
    pub fn new(theme: &'a Theme, input: &'a InputState, title: &'a str, prompt: &'a str) -> Self {
        Self {
            theme,
            input,
            title,
            prompt,
        }
    }

    /// Spans for the visible part of the buffer with a block cursor.
    fn input_spans(&self, width: usize) -> Vec<Span<'static>> {
        let chars: Vec<char> = self.input.buffer().chars().collect();
        let cursor = self.input.cursor_chars();
        let max_visible = width.saturating_sub(4).max(1);

        let start = cursor.saturating_sub(max_visible - 1);
        let end = (start + max_visible).min(chars.len());
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

        let before: String = chars[start..cursor].iter().collect();
        let at: String = chars.get(cursor).map(|c| c.to_string()).unwrap_or_else(|| " ".into());
        let after: String = chars
            .get(cursor + 1..end.max(cursor + 1))
            .map(|s| s.iter().collect())
            .unwrap_or_default();

        vec![
            Span::raw("  "),
            Span::raw(before),
            Span::styled(at, cursor_style),
            Span::raw(after),
        ]
    }
}

impl Widget for InputModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_width = 64.min(area.width.saturating_sub(4));
        let popup_height = if self.input.error().is_some() { 8 } else { 7 };
        let popup_height = popup_height.min(area.height.saturating_sub(2));
        let popup_area = centered(popup_width, popup_height, area);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(self.theme.border);

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![
            Line::styled(self.prompt, self.theme.help_desc),
            Line::raw(""),
            Line::from(self.input_spans(inner.width as usize)),
        ];

        if let Some(error) = self.input.error() {
            lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(self.theme.error),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" Enter ", self.theme.help_key),
            Span::raw("Confirm  "),
            Span::styled(" Esc ", self.theme.help_key),
            Span::raw("Cancel"),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Progress of the imports still running.
pub struct ImportProgressBar<'a> {
    theme: &'a Theme,
    progress: &'a ImportProgress,
    label: &'a str,
}

impl<'a> ImportProgressBar<'a> {
    pub fn new(theme: &'a Theme, progress: &'a ImportProgress, label: &'a str) -> Self {
        Self {
            theme,
            progress,
            label,
        }
    }
}

impl Widget for ImportProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let done = self.progress.decoded + self.progress.failed;
        let mut text = format!("{} {}/{}", self.label, done, self.progress.accepted);
        if let Some(name) = &self.progress.last_file {
            let room = (area.width as usize).saturating_sub(text.width() + 3);
            if room > 0 && name.width() <= room {
                text.push_str(&format!(" · {name}"));
            }
        }

        Gauge::default()
            .gauge_style(self.theme.progress_bar.patch(Style::new().bg(
                self.theme.progress_bg.fg.unwrap_or(self.theme.background),
            )))
            .ratio(self.progress.ratio().clamp(0.0, 1.0))
            .label(text)
            .render(area, buf);
    }
}
