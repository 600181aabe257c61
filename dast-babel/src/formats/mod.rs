//! Format implementations
//!
//! This module contains all format implementations that convert between the
//! editor value and its text representations.

pub mod dast;
pub mod editor;
pub mod html;

pub use dast::DastFormat;
pub use editor::EditorFormat;
pub use html::{HtmlFormat, ImportOptions};
