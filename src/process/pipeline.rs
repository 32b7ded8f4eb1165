//! Single-pass reindent pipeline
//!
//! Splits the input into lines (terminators kept), runs every line through a
//! [`DirectiveIndenter`], and only hands output to the writer after the
//! final depth check has passed.

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::format::{DirectiveIndenter, IndentParams};
use crate::Result;

/// Reindent a whole input held in memory
///
/// Line terminators (`\n` or `\r\n`) and a missing final newline are
/// preserved exactly.
pub fn format_str(input: &str, config: &Config) -> Result<String> {
    let mut indenter = DirectiveIndenter::new(IndentParams::from_config(config));
    let mut output = String::with_capacity(input.len() + input.len() / 8);

    for line in input.split_inclusive('\n') {
        output.push_str(&indenter.process_line(line)?);
    }
    indenter.finish()?;

    Ok(output)
}

/// Reindent everything from `reader` and write the result to `writer`
///
/// Nothing is written when the input fails to reindent.
pub fn format_file<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    config: &Config,
    source_name: &str,
) -> Result<()> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let output = format_str(&input, config)?;
    tracing::debug!(
        source = source_name,
        lines = input.split_inclusive('\n').count(),
        changed = output != input,
        "reindented"
    );

    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}
