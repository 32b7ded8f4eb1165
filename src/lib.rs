//! reindent-pp - Preprocessor directive reindenter
//!
//! Rewrites the whitespace after the `#` of every preprocessor directive so
//! that it reflects the directive's conditional nesting depth. Code between
//! directives is never touched.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{Directive, DirectiveLine};
pub use error::{Imbalance, ReindentError, Result};
pub use format::{DirectiveIndenter, IndentParams};
pub use process::{format_file, format_str};
