//! Report rendering.

pub mod json;
pub mod terminal;

pub use terminal::{format_line, format_warnings, write_line};
