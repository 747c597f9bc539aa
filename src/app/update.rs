use crate::app::{Model, ToastLevel};
use crate::editor::Direction;
use crate::session::{MarkupFragment, PreviewCompletion, Resolution, ViewMode};
use crate::typography::{FontColor, FontFamily, FontSize};

/// All possible events and actions in the application.
///
/// These represent user input, preview traffic, and window events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Split line at cursor (Enter)
    EditorSplitLine,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    EditorMoveHome,
    /// Move cursor to end of line (End)
    EditorMoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    EditorMoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    EditorMoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    EditorMoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    EditorMoveToEnd,
    /// Scroll editor viewport up by n lines
    EditorScrollUp(usize),
    /// Scroll editor viewport down by n lines
    EditorScrollDown(usize),

    // Toolbar
    /// Append a markup shortcut to the content
    AppendMarkup(MarkupFragment),
    SetFontFamily(FontFamily),
    SetFontSize(FontSize),
    SetFontColor(FontColor),
    /// Step through font families (`true` = backwards)
    CycleFontFamily(bool),
    /// Step through font sizes (`true` = backwards)
    CycleFontSize(bool),
    /// Step through font colors (`true` = backwards)
    CycleFontColor(bool),
    /// Switch between the edit and preview surfaces
    TogglePreview,
    /// Hand the content to the save callback
    Submit,

    // Preview
    /// A conversion finished on the worker
    PreviewResolved(PreviewCompletion),
    /// Scroll preview up by n lines
    PreviewScrollUp(usize),
    /// Scroll preview down by n lines
    PreviewScrollDown(usize),

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Messages that only apply to the edit surface.
    pub const fn is_editing(&self) -> bool {
        matches!(
            self,
            Self::EditorInsertChar(_)
                | Self::EditorDeleteBack
                | Self::EditorDeleteForward
                | Self::EditorSplitLine
                | Self::EditorMoveCursor(_)
                | Self::EditorMoveHome
                | Self::EditorMoveEnd
                | Self::EditorMoveWordLeft
                | Self::EditorMoveWordRight
                | Self::EditorMoveToStart
                | Self::EditorMoveToEnd
                | Self::EditorScrollUp(_)
                | Self::EditorScrollDown(_)
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Preview
/// requests issued by the session are only queued; handing them to the worker
/// and invoking the save callback happen in the side-effect pass.
pub fn update(mut model: Model, msg: Message) -> Model {
    if msg.is_editing() && model.session.view_mode() == ViewMode::Previewing {
        return model;
    }

    match msg {
        // Editor
        Message::EditorInsertChar(ch) => {
            let changed = model.editor.insert_char(ch);
            sync_content(&mut model, changed);
        }
        Message::EditorDeleteBack => {
            let changed = model.editor.delete_back();
            sync_content(&mut model, changed);
        }
        Message::EditorDeleteForward => {
            let changed = model.editor.delete_forward();
            sync_content(&mut model, changed);
        }
        Message::EditorSplitLine => {
            let changed = model.editor.split_line();
            sync_content(&mut model, changed);
        }
        Message::EditorMoveCursor(dir) => {
            model.editor.move_cursor(dir);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveHome => model.editor.move_home(),
        Message::EditorMoveEnd => model.editor.move_end(),
        Message::EditorMoveWordLeft => {
            model.editor.move_word_left();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveWordRight => {
            model.editor.move_word_right();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToStart => {
            model.editor.move_to_start();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToEnd => {
            model.editor.move_to_end();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            let max = model.editor.line_count().saturating_sub(1);
            model.editor_scroll_offset = (model.editor_scroll_offset + n).min(max);
        }

        // Toolbar
        Message::AppendMarkup(fragment) => {
            model.session.append_markup(fragment);
            model.editor.set_text(model.session.content());
            editor_ensure_cursor_visible(&mut model);
        }
        Message::SetFontFamily(family) => model.session.set_font_family(family),
        Message::SetFontSize(size) => model.session.set_font_size(size),
        Message::SetFontColor(color) => model.session.set_font_color(color),
        Message::CycleFontFamily(back) => {
            let family = model.session.typography().family;
            let family = if back { family.prev() } else { family.next() };
            model.session.set_font_family(family);
        }
        Message::CycleFontSize(back) => {
            let size = model.session.typography().size;
            let size = if back { size.prev() } else { size.next() };
            model.session.set_font_size(size);
        }
        Message::CycleFontColor(back) => {
            let color = model.session.typography().color;
            let color = if back { color.prev() } else { color.next() };
            model.session.set_font_color(color);
        }
        Message::TogglePreview => {
            model.session.toggle_view_mode();
            model.preview_scroll_offset = 0;
        }
        // Invoking the callback is a side effect.
        Message::Submit => {}

        // Preview
        Message::PreviewResolved(completion) => {
            if let Resolution::Failed(err) = model.session.resolve(completion) {
                model.show_toast(ToastLevel::Error, format!("Preview failed: {err}"));
                editor_ensure_cursor_visible(&mut model);
            }
        }
        Message::PreviewScrollUp(n) => {
            model.preview_scroll_offset = model.preview_scroll_offset.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            let max = model.preview_rows().saturating_sub(1);
            model.preview_scroll_offset = model.preview_scroll_offset.saturating_add(n).min(max);
        }

        // Overlays
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        // Window
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
            editor_ensure_cursor_visible(&mut model);
        }
        Message::Redraw => {}

        // Application
        Message::Quit => model.should_quit = true,
    }
    model
}

/// Push the buffer text into the session after an edit.
fn sync_content(model: &mut Model, changed: bool) {
    if changed {
        model.session.edit_content(model.editor.text());
    }
    editor_ensure_cursor_visible(model);
}

/// Ensure the editor cursor line is visible in the body area.
pub(super) fn editor_ensure_cursor_visible(model: &mut Model) {
    let cursor_line = model.editor.cursor().line;
    let visible_height = usize::from(model.body_height());
    if visible_height == 0 {
        model.editor_scroll_offset = cursor_line;
        return;
    }

    if cursor_line < model.editor_scroll_offset {
        model.editor_scroll_offset = cursor_line;
    } else if cursor_line >= model.editor_scroll_offset + visible_height {
        model.editor_scroll_offset = cursor_line + 1 - visible_height;
    }
}
