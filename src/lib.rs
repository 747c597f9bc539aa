// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. typography::TypographyError)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A terminal markdown editor with a live HTML preview.
//!
//! Markpad keeps raw markdown content, a typography selection and a view
//! mode, and derives an HTML preview from the content in the background:
//! - Bold / italic markup shortcuts
//! - Font family, size and color selectors
//! - Edit / preview toggle
//! - Submit hands the content to a save callback
//!
//! ## Architecture
//!
//! The core is [`session::Session`], which owns all state and issues
//! sequence-numbered conversion requests. Results that arrive out of order
//! are discarded unless they answer the newest request.
//!
//! The terminal front end uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`typography`]: Font family, size and color sets
//! - [`session`]: Content state and the preview pipeline
//! - [`convert`]: Markdown conversion and the background worker
//! - [`editor`]: Raw-text editing buffer
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved default flags
//! - [`perf`]: Timing and event logging

pub mod app;
pub mod config;
pub mod convert;
pub mod editor;
pub mod perf;
pub mod session;
pub mod typography;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::convert::{ComrakConverter, ConvertError, MarkdownConverter, PreviewWorker};
    pub use crate::session::{MarkupFragment, Session, Surface, ViewMode};
    pub use crate::typography::{FontColor, FontFamily, FontSize, Typography};
}
