use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::session::{MarkupFragment, ViewMode};

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize", format!("width={w} height={h}"));
                Some(Message::Resize(*w, *h))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::F(1) => Some(Message::ToggleHelp),
                KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::Quit)
                }
                _ => Some(Message::HideHelp),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        // Bindings shared by both surfaces
        match key.code {
            KeyCode::Char('q') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::Submit),
            KeyCode::Char('p') if ctrl => return Some(Message::TogglePreview),
            KeyCode::Char('b') if ctrl => return Some(Message::AppendMarkup(MarkupFragment::Bold)),
            KeyCode::Char('e') if ctrl => {
                return Some(Message::AppendMarkup(MarkupFragment::Italic));
            }
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::CycleFontFamily(shift)),
            KeyCode::F(3) => return Some(Message::CycleFontSize(shift)),
            KeyCode::F(4) => return Some(Message::CycleFontColor(shift)),
            _ => {}
        }

        match model.session.view_mode() {
            ViewMode::Previewing => Self::handle_preview_key(key, model),
            ViewMode::Editing => Self::handle_editor_key(key, model),
        }
    }

    fn handle_preview_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let page = usize::from(model.body_height().max(1));
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::PreviewScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::PreviewScrollDown(1)),
            KeyCode::PageUp => Some(Message::PreviewScrollUp(page)),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PreviewScrollDown(page)),
            KeyCode::Esc => Some(Message::TogglePreview),
            _ => None,
        }
    }

    fn handle_editor_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = usize::from(model.body_height().max(1));
        match key.code {
            KeyCode::Left if ctrl => Some(Message::EditorMoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::EditorMoveWordRight),
            KeyCode::Home if ctrl => Some(Message::EditorMoveToStart),
            KeyCode::End if ctrl => Some(Message::EditorMoveToEnd),
            KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::EditorMoveHome),
            KeyCode::End => Some(Message::EditorMoveEnd),
            KeyCode::PageUp => Some(Message::EditorScrollUp(page)),
            KeyCode::PageDown => Some(Message::EditorScrollDown(page)),
            KeyCode::Enter => Some(Message::EditorSplitLine),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::EditorInsertChar(c))
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
