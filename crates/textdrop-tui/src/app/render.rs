//! Application rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, StatefulWidget, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use textdrop_core::{BatchNotice, Locale, ViewCollection};
use textdrop_ingest::ImportProgress;

use crate::theme::Theme;
use crate::ui::modals::{ImportProgressBar, InputModal};
use crate::ui::{AppLayout, CardList, CardListState, HelpOverlay, format_size};

use super::input::InputState;
use super::state::{AppMode, StatusMessage};

/// Render context containing all the state needed for rendering.
pub struct RenderContext<'a> {
    pub mode: AppMode,
    pub theme: &'a Theme,
    pub locale: Locale,
    pub views: &'a ViewCollection,
    pub cards: &'a mut CardListState,
    pub notice: &'a BatchNotice,
    pub progress: Option<&'a ImportProgress>,
    pub input_state: Option<&'a InputState>,
    pub status: Option<&'a StatusMessage>,
}

/// Main render function for the application.
pub fn render_app(ctx: RenderContext, area: Rect, buf: &mut Buffer) {
    // Fill entire area with theme background color
    let base_style = Style::default()
        .bg(ctx.theme.background)
        .fg(ctx.theme.foreground);
    buf.set_style(area, base_style);

    let layout = AppLayout::new(area, !ctx.notice.is_none());

    render_header(&ctx, layout.header, buf);
    render_notice(&ctx, layout.notice, buf);
    render_footer(&ctx, layout.footer, buf);

    let labels = ctx.locale.labels();
    if ctx.views.is_empty() {
        let message = if ctx.progress.is_some() {
            labels.loading
        } else {
            labels.empty
        };
        render_empty(ctx.theme, message, layout.main, buf);
    } else {
        CardList::new(ctx.views, ctx.theme, labels).render(layout.main, buf, ctx.cards);
    }

    match ctx.mode {
        AppMode::Help => HelpOverlay::new(ctx.theme).render(area, buf),
        AppMode::Opening => {
            if let Some(input) = ctx.input_state {
                let (title, prompt) = match ctx.locale {
                    Locale::PtBr => ("Abrir arquivos", "Caminhos separados por espaço:"),
                    Locale::En => ("Open files", "Paths separated by spaces:"),
                };
                InputModal::new(ctx.theme, input, title, prompt).render(area, buf);
            }
        }
        AppMode::Normal | AppMode::Quit => {}
    }
}

fn render_header(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let title = ctx.locale.labels().title;
    let stats = if ctx.views.is_empty() {
        String::new()
    } else {
        format!(
            "{} · {} ",
            ctx.views.len(),
            format_size(ctx.views.total_size())
        )
    };

    let used = title.width() + 2 + stats.width();
    let pad = (area.width as usize).saturating_sub(used);
    let line = Line::from(vec![
        Span::styled(format!(" {title} "), ctx.theme.title),
        Span::raw(" ".repeat(pad)),
        Span::raw(stats),
    ]);

    Paragraph::new(line).style(ctx.theme.header).render(area, buf);
}

fn render_notice(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let message = ctx.notice.message(ctx.locale);
    Paragraph::new(Line::styled(format!(" {message}"), ctx.theme.notice())).render(area, buf);
}

fn render_empty(theme: &Theme, message: &str, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    let row = Rect::new(area.x, y, area.width, 1);
    Paragraph::new(Line::styled(message, Style::new().fg(theme.muted)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(row, buf);
}

fn render_footer(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    if let Some(status) = ctx.status {
        let color = if status.success {
            ctx.theme.success
        } else {
            ctx.theme.error
        };
        let line = Line::styled(
            format!(" {}", status.text),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        );
        Paragraph::new(line).style(ctx.theme.footer).render(area, buf);
        return;
    }

    if let Some(progress) = ctx.progress {
        let label = ctx.locale.labels().loading;
        ImportProgressBar::new(ctx.theme, progress, label).render(area, buf);
        return;
    }

    let mut keys: Vec<(&str, &str)> = vec![("a", "Open")];
    if !ctx.views.is_empty() {
        keys.extend([("j/k", "Nav"), ("Enter", "More/Less"), ("s", "Save"), ("S", "Save all")]);
    }
    keys.extend([("?", "Help"), ("q", "Quit")]);

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {key} "), ctx.theme.help_key),
                Span::styled(format!("{desc} "), ctx.theme.help_desc),
            ]
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .style(ctx.theme.footer)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use textdrop_core::{BlobStore, FileHandle, FileView};

    fn text_of(buf: &Buffer) -> String {
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

    fn render(views: &ViewCollection, notice: &BatchNotice, locale: Locale) -> String {
        let theme = Theme::default();
        let mut cards = CardListState::new();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let ctx = RenderContext {
            mode: AppMode::Normal,
            theme: &theme,
            locale,
            views,
            cards: &mut cards,
            notice,
            progress: None,
            input_state: None,
            status: None,
        };
        render_app(ctx, area, &mut buf);
        text_of(&buf)
    }

    #[test]
    fn test_notice_banner_shown_only_when_set() {
        let views = ViewCollection::new();
        let text = render(&views, &BatchNotice::NoValidText, Locale::PtBr);
        assert!(text.contains("Nenhum arquivo de texto válido foi selecionado."));
        assert!(text.contains("Upload e Gerar TXT"));

        let text = render(&views, &BatchNotice::None, Locale::PtBr);
        assert!(!text.contains("Nenhum arquivo de texto"));
    }

    #[test]
    fn test_cards_rendered_with_english_labels() {
        let store = BlobStore::new();
        let handle = FileHandle::in_memory("notes.txt", "text/plain", b"hello".as_slice());
        let download = store.create(b"hello".as_slice(), "text/plain");
        let mut views = ViewCollection::new();
        views.push(FileView::new(
            &handle,
            "hello".to_string(),
            50,
            download,
            "arquivo_notes.txt.txt".to_string(),
        ));

        let text = render(&views, &BatchNotice::SomeIgnored, Locale::En);
        assert!(text.contains("notes.txt - 0.00 KB"));
        assert!(text.contains("hello"));
        assert!(text.contains("Show More"));
        assert!(text.contains("Download Generated TXT"));
    }
}
