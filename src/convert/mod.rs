//! Markdown to markup conversion.
//!
//! The session only knows the [`MarkdownConverter`] trait. [`ComrakConverter`]
//! is the stock implementation; [`PreviewWorker`] runs any converter on a
//! background thread so slow conversions never block input handling.

mod worker;

pub use worker::PreviewWorker;

use comrak::{Options, markdown_to_html};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The converter rejected the input or panicked.
    #[error("conversion failed: {0}")]
    Failed(String),
    /// The conversion thread is no longer running.
    #[error("conversion worker stopped")]
    WorkerGone,
}

/// Turns raw markdown into rendered markup.
///
/// Implementations must be pure: the same source always yields the same markup
/// and nothing outside the return value is touched.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Failed`] when the source cannot be converted.
    fn convert(&self, source: &str) -> Result<String, ConvertError>;
}

impl<F> MarkdownConverter for F
where
    F: Fn(&str) -> Result<String, ConvertError> + Send + Sync,
{
    fn convert(&self, source: &str) -> Result<String, ConvertError> {
        self(source)
    }
}

/// CommonMark + GFM rendering to HTML via comrak.
///
/// Raw HTML in the source is passed through untouched, so inline markup such
/// as `<b>Bold text</b>` shows up in the preview as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComrakConverter {
    gfm: bool,
    raw_html: bool,
}

impl Default for ComrakConverter {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: true,
        }
    }
}

impl ComrakConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the GFM extensions (tables, strikethrough, autolinks, task lists).
    #[must_use]
    pub const fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Pass raw HTML through (`true`) or replace it with a comment (`false`).
    #[must_use]
    pub const fn with_raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }
}

impl MarkdownConverter for ComrakConverter {
    fn convert(&self, source: &str) -> Result<String, ConvertError> {
        let mut options = Options::default();
        if self.gfm {
            options.extension.strikethrough = true;
            options.extension.table = true;
            options.extension.autolink = true;
            options.extension.tasklist = true;
        }
        options.render.unsafe_ = self.raw_html;
        Ok(markdown_to_html(source, &options))
    }
}
