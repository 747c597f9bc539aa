//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Conversions run on a [`PreviewWorker`](crate::convert::PreviewWorker);
//! their completions re-enter the loop as [`Message::PreviewResolved`].

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{CHROME_ROWS, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::convert::{ComrakConverter, MarkdownConverter};
use crate::typography::Typography;

type SaveCallback = Box<dyn FnMut(&str) -> anyhow::Result<()>>;

/// Main application struct that owns the settings the event loop starts from.
pub struct App {
    content: String,
    typography: Typography,
    start_in_preview: bool,
    converter: Arc<dyn MarkdownConverter>,
    on_save: Option<SaveCallback>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application with empty content and default typography.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            typography: Typography::default(),
            start_in_preview: false,
            converter: Arc::new(ComrakConverter::new()),
            on_save: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Seed the raw content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the initial typography.
    #[must_use]
    pub const fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = typography;
        self
    }

    /// Start on the preview surface instead of the editor.
    #[must_use]
    pub const fn with_preview(mut self, enabled: bool) -> Self {
        self.start_in_preview = enabled;
        self
    }

    /// Replace the markdown converter.
    #[must_use]
    pub fn with_converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Install the callback invoked on submit (Ctrl+S).
    ///
    /// An error is logged and shown as a toast; the session is unchanged.
    #[must_use]
    pub fn with_on_save(
        mut self,
        on_save: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.on_save = Some(Box::new(on_save));
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("content_len", &self.content.len())
            .field("typography", &self.typography)
            .field("start_in_preview", &self.start_in_preview)
            .field("has_on_save", &self.on_save.is_some())
            .finish_non_exhaustive()
    }
}
