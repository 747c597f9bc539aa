//! Terminal UI components.
//!
//! - toolbar with the markup shortcuts and typography selectors
//! - body showing the edit or preview surface
//! - toast and status rows, help overlay
//! - [`style`]: Theming and colors

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::centered_popup_rect;
pub use render::{ScreenLayout, horizontal_offset, line_number_width, render, split_screen};
