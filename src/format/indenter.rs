/// `DirectiveIndenter` - depth-based directive indentation
///
/// Tracks the conditional nesting depth across a sequence of lines and
/// rewrites the whitespace between the marker and the keyword of every
/// directive line to `depth` copies of the indent unit.
use std::borrow::Cow;

use crate::config::Config;
use crate::directive::{Directive, DirectiveLine};
use crate::error::{Imbalance, ReindentError, Result};

/// Parameters for directive indentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentParams {
    /// String emitted once per nesting level
    pub unit: String,
    /// Character introducing a directive line
    pub marker: char,
    /// Extra keywords accepted without changing depth
    pub neutral_directives: Vec<String>,
}

impl Default for IndentParams {
    fn default() -> Self {
        Self {
            unit: "  ".to_string(),
            marker: '#',
            neutral_directives: Vec::new(),
        }
    }
}

impl IndentParams {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            unit: config.indent_unit(),
            marker: config.marker,
            neutral_directives: config.neutral_directives.clone(),
        }
    }

    fn is_neutral(&self, keyword: &str) -> bool {
        self.neutral_directives.iter().any(|k| k == keyword)
    }
}

/// `DirectiveIndenter` tracks nesting depth and reindents directive lines
pub struct DirectiveIndenter {
    params: IndentParams,
    /// Current nesting level
    depth: usize,
    /// 1-based number of the last line processed
    line_number: usize,
}

impl DirectiveIndenter {
    #[must_use]
    pub fn new(params: IndentParams) -> Self {
        Self {
            params,
            depth: 0,
            line_number: 0,
        }
    }

    /// Current nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of lines processed so far
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Process one line (including its terminator, if any)
    ///
    /// Plain lines are returned borrowed and untouched. Directive lines are
    /// rebuilt as marker + unit × depth + remainder.
    pub fn process_line<'a>(&mut self, line: &'a str) -> Result<Cow<'a, str>> {
        self.line_number += 1;

        let Some(parsed) = DirectiveLine::parse(line, self.params.marker) else {
            return Ok(Cow::Borrowed(line));
        };

        let directive = match parsed.directive() {
            Some(directive) => Some(directive),
            None if self.params.is_neutral(parsed.keyword) => None,
            None => {
                return Err(ReindentError::InvalidDirective {
                    line: self.line_number,
                    keyword: parsed.keyword.to_string(),
                });
            }
        };

        if let Some(directive) = directive.filter(|d| d.outdents_before()) {
            self.close_level(directive)?;
        }

        let rendered = self.render(parsed.remainder);

        if directive.is_some_and(Directive::indents_after) {
            self.depth += 1;
            tracing::trace!(line = self.line_number, depth = self.depth, "opened level");
        }

        // Already-correct lines stay borrowed
        if rendered == line {
            Ok(Cow::Borrowed(line))
        } else {
            Ok(Cow::Owned(rendered))
        }
    }

    /// Check the final depth once all lines have been processed
    pub fn finish(&self) -> Result<()> {
        if self.depth == 0 {
            Ok(())
        } else {
            Err(ReindentError::UnbalancedDirective {
                line: self.line_number,
                reason: Imbalance::Unclosed { depth: self.depth },
            })
        }
    }

    fn close_level(&mut self, directive: Directive) -> Result<()> {
        if self.depth == 0 {
            return Err(ReindentError::UnbalancedDirective {
                line: self.line_number,
                reason: Imbalance::UnexpectedClose(directive),
            });
        }
        self.depth -= 1;
        tracing::trace!(line = self.line_number, depth = self.depth, %directive, "closed level");
        Ok(())
    }

    fn render(&self, remainder: &str) -> String {
        let indent_len = self.params.unit.len() * self.depth;
        let mut out = String::with_capacity(
            self.params.marker.len_utf8() + indent_len + remainder.len(),
        );
        out.push(self.params.marker);
        for _ in 0..self.depth {
            out.push_str(&self.params.unit);
        }
        out.push_str(remainder);
        out
    }
}
