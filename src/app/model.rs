use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use crate::editor::EditorBuffer;
use crate::session::Session;

/// Rows taken by the toolbar, the body border and the status bar.
pub const CHROME_ROWS: u16 = 4;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Default)]
pub struct Model {
    /// Content, typography, view mode and derived preview
    pub session: Session,
    /// Raw-text editing surface mirroring the session content
    pub editor: EditorBuffer,
    /// First visible line of the edit surface
    pub editor_scroll_offset: usize,
    /// First visible row of the preview surface
    pub preview_scroll_offset: usize,
    /// Terminal width
    pub width: u16,
    /// Terminal height
    pub height: u16,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Last save failure, written by the session's save callback
    pub(super) save_failure: Rc<RefCell<Option<String>>>,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model around a session, with the editor seeded from its content.
    pub fn new(session: Session, size: (u16, u16)) -> Self {
        let editor = EditorBuffer::from_text(session.content());
        Self {
            session,
            editor,
            width: size.0,
            height: size.1,
            ..Self::default()
        }
    }

    /// Rows available inside the body block.
    ///
    /// An active toast takes one more row, matching `ui::split_screen`.
    pub fn body_height(&self) -> u16 {
        let toast_rows = u16::from(self.toast.is_some());
        self.height.saturating_sub(CHROME_ROWS + toast_rows)
    }

    /// Rows the preview surface occupies once wrapped to the body width.
    ///
    /// Counts the container lines around the markup. Wrapping is estimated by
    /// display width, so word wrapping may use a few more rows.
    pub fn preview_rows(&self) -> usize {
        let text_width = usize::from(self.width.saturating_sub(2)).max(1);
        let rows = |line: &str| line.width().div_ceil(text_width).max(1);
        let typography = self.session.typography();
        let open = format!("<div style=\"{}\">", typography.css());
        rows(&open)
            + self
                .session
                .preview_markup()
                .lines()
                .map(rows)
                .sum::<usize>()
            + rows("</div>")
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
