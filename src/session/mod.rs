//! The editing session: raw content, typography, view mode and the derived
//! preview.
//!
//! A [`Session`] never talks to the markdown collaborator directly. Changes
//! that affect the preview queue a [`PreviewRequest`]; the runtime takes them
//! with [`Session::take_requests`], runs the conversion wherever it likes, and
//! feeds the answer back through [`Session::resolve`]. Answers to superseded
//! requests are dropped there, so completion order never matters.

mod pipeline;

pub use pipeline::{PreviewCompletion, PreviewPipeline, PreviewRequest, PreviewState, Resolution};

use crate::convert::ConvertError;
use crate::typography::{FontColor, FontFamily, FontSize, Typography};

/// One-click markup insertions offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupFragment {
    Bold,
    Italic,
}

impl MarkupFragment {
    pub const ALL: [Self; 2] = [Self::Bold, Self::Italic];

    /// The literal text appended to the content.
    pub const fn literal(self) -> &'static str {
        match self {
            Self::Bold => "<b>Bold text</b>",
            Self::Italic => "<i>Italic text</i>",
        }
    }
}

/// Which surface is exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Editing,
    Previewing,
}

impl ViewMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Editing => Self::Previewing,
            Self::Previewing => Self::Editing,
        }
    }
}

/// The preview markup together with the typography it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSurface<'a> {
    pub markup: &'a str,
    pub typography: Typography,
}

impl PreviewSurface<'_> {
    /// The markup wrapped in a container carrying the typography as inline style.
    pub fn to_html(&self) -> String {
        format!(
            "<div style=\"{}\">{}</div>",
            self.typography.css(),
            self.markup
        )
    }
}

/// What the rendering layer should show for the current view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface<'a> {
    /// The raw content, editable.
    Edit(&'a str),
    Preview(PreviewSurface<'a>),
}

type SaveCallback = Box<dyn FnMut(&str)>;

pub struct Session {
    content: String,
    typography: Typography,
    view_mode: ViewMode,
    pipeline: PreviewPipeline,
    outbox: Vec<PreviewRequest>,
    on_save: SaveCallback,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("content_len", &self.content.len())
            .field("typography", &self.typography)
            .field("view_mode", &self.view_mode)
            .field("preview_state", &self.pipeline.state())
            .field("pending_requests", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

/// An empty session with nothing queued.
///
/// Unlike [`Session::new`] it issues no preview request, so it is cheap to use
/// as a placeholder (e.g. with `std::mem::take`).
impl Default for Session {
    fn default() -> Self {
        Self {
            content: String::new(),
            typography: Typography::default(),
            view_mode: ViewMode::Editing,
            pipeline: PreviewPipeline::new(),
            outbox: Vec::new(),
            on_save: Box::new(|_| {}),
        }
    }
}

impl Session {
    /// Empty content with default typography.
    pub fn new() -> Self {
        Self::with_initial(String::new(), Typography::default())
    }

    /// Start from existing content and typography.
    ///
    /// The first preview request for `content` is queued immediately.
    pub fn with_initial(content: impl Into<String>, typography: Typography) -> Self {
        let mut session = Self {
            content: content.into(),
            typography,
            ..Self::default()
        };
        session.schedule_preview();
        session
    }

    /// Install the callback invoked by [`Session::submit`].
    #[must_use]
    pub fn with_on_save(mut self, on_save: impl FnMut(&str) + 'static) -> Self {
        self.on_save = Box::new(on_save);
        self
    }

    pub fn set_on_save(&mut self, on_save: impl FnMut(&str) + 'static) {
        self.on_save = Box::new(on_save);
    }

    /// Replace the raw content.
    pub fn edit_content(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.content {
            return;
        }
        self.content = text;
        self.schedule_preview();
    }

    /// Append a markup fragment to the end of the raw content.
    pub fn append_markup(&mut self, fragment: MarkupFragment) {
        self.content.push_str(fragment.literal());
        self.schedule_preview();
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        if self.typography.family == family {
            return;
        }
        self.typography.family = family;
        self.schedule_preview();
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        if self.typography.size == size {
            return;
        }
        self.typography.size = size;
        self.schedule_preview();
    }

    /// Color is applied when the preview is wrapped, so no conversion is needed.
    pub const fn set_font_color(&mut self, color: FontColor) {
        self.typography.color = color;
    }

    pub const fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    /// Hand the current raw content to the save callback.
    pub fn submit(&mut self) {
        tracing::debug!(bytes = self.content.len(), "submitting content");
        (self.on_save)(&self.content);
    }

    /// Feed a conversion result back in.
    pub fn resolve(&mut self, completion: PreviewCompletion) -> Resolution {
        let seq = completion.seq;
        let resolution = self.pipeline.resolve(completion);
        match &resolution {
            Resolution::Applied => tracing::debug!(seq, "preview applied"),
            Resolution::Stale => tracing::debug!(
                seq,
                latest = self.pipeline.latest_seq(),
                "discarding stale preview"
            ),
            Resolution::Failed(err) => {
                tracing::warn!(seq, %err, "preview conversion failed, keeping previous markup");
            }
        }
        resolution
    }

    /// Requests queued since the last call, oldest first.
    pub fn take_requests(&mut self) -> Vec<PreviewRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn typography(&self) -> Typography {
        self.typography
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn preview_markup(&self) -> &str {
        self.pipeline.markup()
    }

    pub const fn preview_state(&self) -> PreviewState {
        self.pipeline.state()
    }

    pub const fn last_preview_error(&self) -> Option<&ConvertError> {
        self.pipeline.last_error()
    }

    /// Total number of conversion requests issued over the session's life.
    pub const fn requests_issued(&self) -> u64 {
        self.pipeline.latest_seq()
    }

    pub fn preview_surface(&self) -> PreviewSurface<'_> {
        PreviewSurface {
            markup: self.pipeline.markup(),
            typography: self.typography,
        }
    }

    /// The surface selected by the current view mode.
    pub fn surface(&self) -> Surface<'_> {
        match self.view_mode {
            ViewMode::Editing => Surface::Edit(&self.content),
            ViewMode::Previewing => Surface::Preview(self.preview_surface()),
        }
    }

    fn schedule_preview(&mut self) {
        let request = self.pipeline.schedule(self.content.as_str());
        tracing::debug!(seq = request.seq, bytes = request.source.len(), "preview requested");
        self.outbox.push(request);
    }
}

#[cfg(test)]
mod tests;
