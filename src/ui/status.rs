use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::session::{PreviewState, ViewMode};

use super::{render, style};

/// One row of toolbar controls; selectors show their current value.
pub fn render_toolbar(model: &Model, frame: &mut Frame, area: Rect) {
    let typography = model.session.typography();
    let previewing = model.session.view_mode() == ViewMode::Previewing;

    let mut spans = vec![Span::raw(" ")];
    let mut button = |key: &'static str, label: String| {
        spans.push(Span::styled(key, style::toolbar_key_style()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, style::toolbar_value_style()));
        spans.push(Span::raw("  "));
    };
    button("^B", "Bold".to_string());
    button("^E", "Italic".to_string());
    button("F2", typography.family.to_string());
    button("F3", typography.size.to_string());
    button("F4", typography.color.to_string());
    button(
        "^P",
        format!("Preview: {}", if previewing { "on" } else { "off" }),
    );

    let toolbar = Paragraph::new(Line::from(spans)).style(style::toolbar_style());
    frame.render_widget(toolbar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;
    let previewing = session.view_mode() == ViewMode::Previewing;

    let mode = if previewing {
        "PREVIEW".to_string()
    } else {
        format!("EDIT  {}", render::cursor_label(&model.editor))
    };
    let preview_state = match session.preview_state() {
        PreviewState::Idle if session.last_preview_error().is_some() => "stale",
        PreviewState::Idle => "ready",
        PreviewState::Recomputing => "updating",
    };

    let status = format!(
        " {mode}  preview: {preview_state}  requests: {}  chars: {}  F1:help  ^S:submit  ^Q:quit",
        session.requests_issued(),
        session.content().chars().count(),
    );

    let status_bar = Paragraph::new(status).style(style::status_style(previewing));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = style::toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
