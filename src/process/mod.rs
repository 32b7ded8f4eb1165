//! File processing pipeline.
//!
//! Reindenting is all-or-nothing per input: the whole input is read and
//! transformed into memory, and output is only written once the final
//! depth has been checked. A failing input never produces partial output.
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes reindented output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{format_file, format_str};
