use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::EditorBuffer;
use crate::session::{PreviewState, PreviewSurface, Surface};

use super::{overlays, status, style};

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub toolbar: Rect,
    pub body: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

pub fn split_screen(area: Rect, toast_active: bool) -> ScreenLayout {
    let footer_rows = 1 + u16::from(toast_active);
    let toolbar = Rect { height: 1.min(area.height), ..area };
    let body = Rect {
        y: area.y + toolbar.height,
        height: area.height.saturating_sub(toolbar.height + footer_rows),
        ..area
    };
    let toast = toast_active.then(|| Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    });
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    ScreenLayout {
        toolbar,
        body,
        toast,
        status,
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = split_screen(area, model.active_toast().is_some());

    status::render_toolbar(model, frame, layout.toolbar);
    match model.session.surface() {
        Surface::Edit(_) => render_editor(model, frame, layout.body),
        Surface::Preview(surface) => render_preview(model, surface, frame, layout.body),
    }
    if let Some(toast_area) = layout.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.editor;
    let block = Block::default().title(" Edit ").borders(Borders::ALL);
    let inner = block.inner(area);

    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines) as usize;
    let visible_height = inner.height as usize;
    let start = model.editor_scroll_offset.min(total_lines.saturating_sub(1));
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();
    let text_width = (inner.width as usize).saturating_sub(gutter_width + 1);
    let skip = horizontal_offset(
        &buf.line_at(cursor.line).unwrap_or_default(),
        cursor.col,
        text_width,
    );

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text: String = buf
            .line_at(line_idx)
            .unwrap_or_default()
            .chars()
            .skip(skip)
            .collect();
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);
        let mut spans = vec![Span::styled(line_num, style::gutter_style())];
        if line_idx == cursor.line {
            spans.extend(cursor_spans(&line_text, cursor.col.saturating_sub(skip)));
        } else {
            spans.push(Span::raw(line_text));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Chars to drop from the start of every line so the cursor stays on screen.
pub fn horizontal_offset(line: &str, col: usize, text_width: usize) -> usize {
    if text_width == 0 {
        return 0;
    }
    let before: Vec<char> = line.chars().take(col).collect();
    let mut width: usize = before.iter().map(|c| c.width().unwrap_or(0)).sum();
    let mut skip = 0;
    while width >= text_width && skip < before.len() {
        width -= before[skip].width().unwrap_or(0);
        skip += 1;
    }
    skip
}

/// Split a line around the cursor column, highlighting the char under it.
fn cursor_spans(line: &str, col: usize) -> Vec<Span<'static>> {
    let chars: Vec<char> = line.chars().collect();
    let col = col.min(chars.len());
    let before: String = chars[..col].iter().collect();
    let under = chars.get(col).map_or_else(|| " ".to_string(), char::to_string);
    let after: String = chars.get(col + 1..).unwrap_or_default().iter().collect();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    spans.push(Span::styled(under, style::cursor_style()));
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

fn render_preview(model: &Model, surface: PreviewSurface<'_>, frame: &mut Frame, area: Rect) {
    let typography = surface.typography;
    let updating = if model.session.preview_state() == PreviewState::Recomputing {
        " · updating"
    } else {
        ""
    };
    let title = format!(
        " Preview · {} {}{updating} ",
        typography.family,
        typography.size
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    let text_style = Style::default().fg(style::preview_color(
        typography.color,
        style::background_mode(),
    ));
    let mut lines = vec![Line::styled(
        format!("<div style=\"{}\">", typography.css()),
        style::container_style(),
    )];
    lines.extend(
        surface
            .markup
            .lines()
            .map(|line| Line::styled(line.to_string(), text_style)),
    );
    lines.push(Line::styled("</div>", style::container_style()));

    let scroll = u16::try_from(model.preview_scroll_offset).unwrap_or(u16::MAX);
    let preview = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(Clear, area);
    frame.render_widget(preview, area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Cursor position as shown to the user (1-based).
pub fn cursor_label(buf: &EditorBuffer) -> String {
    let c = buf.cursor();
    format!("Ln {}, Col {}", c.line + 1, c.col + 1)
}
