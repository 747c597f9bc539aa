use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::typography;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let options = typography::options();
    let families = options
        .families
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ");
    let sizes = options
        .sizes
        .iter()
        .map(|s| s.px().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let colors = options
        .colors
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Editor", section_style));
    all_lines.push(Line::raw("  Type, Enter, Backspace, Delete"));
    all_lines.push(Line::raw("  Arrows, Home/End    Navigate"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Buffer start / end"));
    all_lines.push(Line::raw("  PageUp/PageDown     Scroll editor"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Toolbar", section_style));
    all_lines.push(Line::raw("  Ctrl-b              Append bold text"));
    all_lines.push(Line::raw("  Ctrl-e              Append italic text"));
    all_lines.push(Line::raw("  F2 / Shift-F2       Next / previous font"));
    all_lines.push(Line::raw("  F3 / Shift-F3       Next / previous size"));
    all_lines.push(Line::raw("  F4 / Shift-F4       Next / previous color"));
    all_lines.push(Line::styled(format!("    fonts: {families}"), dim_style));
    all_lines.push(Line::styled(format!("    sizes: {sizes} px"), dim_style));
    all_lines.push(Line::styled(format!("    colors: {colors}"), dim_style));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Preview", section_style));
    all_lines.push(Line::raw("  Ctrl-p              Toggle preview"));
    all_lines.push(Line::raw("  Up/Down, PgUp/PgDn  Scroll preview"));
    all_lines.push(Line::raw("  Esc                 Back to editor"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Ctrl-s              Submit content"));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw("  Ctrl-q              Quit"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .take(content_height as usize)
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
