//! Preprocessor directive formatting.
//!
//! - [`indenter`]: tracks conditional nesting depth and rewrites directive indentation

pub mod indenter;

pub use indenter::{DirectiveIndenter, IndentParams};
