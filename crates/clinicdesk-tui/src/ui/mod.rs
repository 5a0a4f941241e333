//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/status bars and overlays
//! - `doctors`: the doctor list and detail panels
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod doctors;
pub mod input;
pub mod render;
pub mod styles;
