//! Error types and result aliases for reindent-pp.
//!
//! - [`ReindentError`]: everything that can abort a reindent pass
//! - [`Result<T>`]: crate-wide alias over [`ReindentError`]
//!
//! The binary wraps these in `anyhow` for configuration and argument errors.

use std::fmt;

use crate::directive::Directive;

pub type Result<T> = std::result::Result<T, ReindentError>;

/// Why a directive sequence failed to balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imbalance {
    /// A closing directive (`endif`, `else`, `elif`) appeared at depth 0
    UnexpectedClose(Directive),
    /// Input ended with open conditionals
    Unclosed { depth: usize },
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imbalance::UnexpectedClose(directive) => {
                write!(f, "`{}` without a matching opening directive", directive.keyword())
            }
            Imbalance::Unclosed { depth: 1 } => {
                write!(f, "input ended with 1 unclosed conditional")
            }
            Imbalance::Unclosed { depth } => {
                write!(f, "input ended with {depth} unclosed conditionals")
            }
        }
    }
}

/// Errors raised while reindenting a single input
///
/// Messages leave out the line number; callers prefix it from [`ReindentError::line`].
#[derive(Debug, thiserror::Error)]
pub enum ReindentError {
    /// A directive line whose keyword is not recognized
    #[error("invalid directive `{keyword}`")]
    InvalidDirective { line: usize, keyword: String },

    /// Opening and closing directives do not match up
    #[error("unbalanced directive: {reason}")]
    UnbalancedDirective { line: usize, reason: Imbalance },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReindentError {
    /// 1-based line the error refers to, if any
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ReindentError::InvalidDirective { line, .. }
            | ReindentError::UnbalancedDirective { line, .. } => Some(*line),
            ReindentError::Io(_) => None,
        }
    }
}
