//! Raw-text editing surface.
//!
//! A rope-backed buffer with a cursor. The app forwards every change it makes
//! here to [`Session::edit_content`](crate::session::Session::edit_content).

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
