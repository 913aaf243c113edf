//! Card list widget: one bordered card per decoded file.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, StatefulWidget, Widget};
use unicode_width::UnicodeWidthStr;

use textdrop_core::{FileView, Labels, ViewCollection};

use crate::theme::Theme;

/// Rows a card spends outside its body: two borders and the action row.
pub const CARD_CHROME: u16 = 3;

/// Columns a tab expands to.
const TAB_WIDTH: usize = 4;

/// Selection and scroll state for the card list.
#[derive(Debug, Clone, Default)]
pub struct CardListState {
    /// Index of the selected card.
    pub selected: usize,
    /// Index of the first card drawn.
    pub offset: usize,
    /// Body scroll (in lines) of the selected card.
    pub scroll: usize,
}

impl CardListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a card, resetting body scroll when the selection changes.
    pub fn select(&mut self, index: usize) {
        if index != self.selected {
            self.selected = index;
            self.scroll = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.select(self.selected - 1);
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.select(self.selected + 1);
        }
    }

    pub fn jump_to_top(&mut self) {
        self.select(0);
    }

    pub fn jump_to_bottom(&mut self, len: usize) {
        self.select(len.saturating_sub(1));
    }

    /// Scroll the selected card's body; clamped when rendered.
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    /// Keep indices in range after the list changed.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            *self = Self::default();
            return;
        }
        if self.selected >= len {
            self.select(len - 1);
        }
        self.offset = self.offset.min(self.selected);
    }

    /// Adjust `offset` so the selected card fits in `viewport` rows.
    pub fn ensure_visible(&mut self, heights: &[u16], viewport: u16) {
        if self.selected < self.offset {
            self.offset = self.selected;
            return;
        }
        let span = |offset: usize, selected: usize| -> u32 {
            heights[offset..=selected].iter().map(|&h| u32::from(h)).sum()
        };
        while self.offset < self.selected && span(self.offset, self.selected) > u32::from(viewport)
        {
            self.offset += 1;
        }
    }
}

/// Number of rendered lines in a block of text.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Height of a card whose body is capped at `max_body` lines.
pub fn card_height(view: &FileView, max_body: usize) -> u16 {
    let body = line_count(view.visible_text()).clamp(1, max_body.max(1));
    CARD_CHROME + body as u16
}

fn expand_tabs(line: &str) -> String {
    if line.contains('\t') {
        line.replace('\t', &" ".repeat(TAB_WIDTH))
    } else {
        line.to_string()
    }
}

/// Card list showing name, size, preview, and actions of each file.
pub struct CardList<'a> {
    views: &'a ViewCollection,
    theme: &'a Theme,
    labels: Labels,
}

impl<'a> CardList<'a> {
    pub fn new(views: &'a ViewCollection, theme: &'a Theme, labels: Labels) -> Self {
        Self { views, theme, labels }
    }

    fn render_card(
        &self,
        view: &FileView,
        selected: bool,
        scroll: &mut usize,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let border_style = if selected {
            self.theme.border_selected
        } else {
            self.theme.border
        };
        let title = Line::from(vec![
            Span::styled(format!(" {}", view.name), self.theme.card_title),
            Span::styled(format!(" - {} ", view.display_size()), self.theme.card_meta),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let body_height = inner.height.saturating_sub(1) as usize;
        let text = view.visible_text();
        let total = line_count(text);
        let max_scroll = total.saturating_sub(body_height);
        let first = if selected {
            *scroll = (*scroll).min(max_scroll);
            *scroll
        } else {
            0
        };

        for (row, line) in text.split('\n').skip(first).take(body_height).enumerate() {
            let line = Line::styled(expand_tabs(line), self.theme.card_body);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }

        let actions_y = inner.y + inner.height - 1;
        let actions = self.actions_line(view, first, body_height, total, inner.width);
        buf.set_line(inner.x, actions_y, &actions, inner.width);
    }

    fn actions_line(
        &self,
        view: &FileView,
        first: usize,
        body_height: usize,
        total: usize,
        width: u16,
    ) -> Line<'static> {
        let toggle_label = if view.expanded {
            self.labels.show_less
        } else {
            self.labels.show_more
        };
        let toggle_style = if view.is_truncated() {
            self.theme.button
        } else {
            self.theme.button_disabled
        };

        let mut spans = vec![
            Span::styled(format!(" {toggle_label} "), toggle_style),
            Span::raw(" "),
            Span::styled(format!(" {} ", self.labels.download), self.theme.button_primary),
            Span::styled(format!(" → {}", view.download_name), self.theme.card_meta),
        ];

        if total > body_height && body_height > 0 {
            let last = (first + body_height).min(total);
            let position = format!("{}-{}/{} ", first + 1, last, total);
            let used: usize = spans.iter().map(|s| s.content.width()).sum();
            let pad = (width as usize).saturating_sub(used + position.width());
            if pad > 0 {
                spans.push(Span::raw(" ".repeat(pad)));
                spans.push(Span::styled(position, Style::new().fg(self.theme.muted)));
            }
        }

        Line::from(spans)
    }
}

impl StatefulWidget for CardList<'_> {
    type State = CardListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.clamp(self.views.len());
        if self.views.is_empty() || area.height < CARD_CHROME || area.width == 0 {
            return;
        }

        let max_body = (area.height - CARD_CHROME) as usize;
        let heights: Vec<u16> = self
            .views
            .iter()
            .map(|view| card_height(view, max_body))
            .collect();
        state.ensure_visible(&heights, area.height);

        let bottom = area.bottom();
        let mut y = area.y;
        for (index, view) in self.views.iter().enumerate().skip(state.offset) {
            let height = heights[index].min(bottom.saturating_sub(y));
            if height < CARD_CHROME {
                break;
            }
            let card_area = Rect::new(area.x, y, area.width, height);
            self.render_card(view, index == state.selected, &mut state.scroll, card_area, buf);
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textdrop_core::{BlobStore, FileHandle};

    fn view(store: &BlobStore, name: &str, content: &str) -> FileView {
        let handle = FileHandle::in_memory(name, "text/plain", content.as_bytes());
        let download = store.create(content.as_bytes(), "text/plain");
        FileView::new(&handle, content.to_string(), 3, download, format!("arquivo_{name}.txt"))
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| {
                (area.x..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_navigation_resets_scroll() {
        let mut state = CardListState::new();
        state.move_down(3);
        state.scroll_by(5);
        assert_eq!(state.scroll, 5);
        state.move_down(3);
        assert_eq!((state.selected, state.scroll), (2, 0));
        state.move_down(3);
        assert_eq!(state.selected, 2);
        state.jump_to_top();
        assert_eq!(state.selected, 0);
        state.scroll_by(-4);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut state = CardListState { selected: 5, offset: 4, scroll: 2 };
        state.clamp(2);
        assert_eq!(state.selected, 1);
        assert_eq!(state.offset, 1);
        state.clamp(0);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_and_up() {
        let heights = [5, 5, 5, 5];
        let mut state = CardListState { selected: 3, offset: 0, scroll: 0 };
        state.ensure_visible(&heights, 10);
        assert_eq!(state.offset, 2);

        state.select(1);
        state.ensure_visible(&heights, 10);
        assert_eq!(state.offset, 1);
    }

    #[test]
    fn test_card_height_caps_body() {
        let store = BlobStore::new();
        let mut long = view(&store, "long.txt", "1\n2\n3\n4\n5\n6");
        assert_eq!(card_height(&long, 20), CARD_CHROME + 3);
        long.toggle();
        assert_eq!(card_height(&long, 20), CARD_CHROME + 6);
        assert_eq!(card_height(&long, 4), CARD_CHROME + 4);
    }

    #[test]
    fn test_render_shows_preview_and_actions() {
        let store = BlobStore::new();
        let mut views = ViewCollection::new();
        views.push(view(&store, "notas.txt", "um\ndois\ntres\nquatro"));

        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 10);
        let mut buf = Buffer::empty(area);
        let mut state = CardListState::new();
        CardList::new(&views, &theme, textdrop_core::Locale::PtBr.labels())
            .render(area, &mut buf, &mut state);

        let text = buffer_text(&buf);
        assert!(text.contains("notas.txt - 0.02 KB"));
        assert!(text.contains("tres"));
        assert!(!text.contains("quatro"));
        assert!(text.contains("Ver Mais"));
        assert!(text.contains("Baixar TXT Gerado"));
        assert!(text.contains("arquivo_notas.txt.txt"));
    }
}
