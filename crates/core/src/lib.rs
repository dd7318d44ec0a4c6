//! Core shared types and errors (format-agnostic).

pub mod color;
pub mod error;

pub use color::Color;
pub use error::{FormatError, FormatResult};
