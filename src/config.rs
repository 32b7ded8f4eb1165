//! Configuration management for reindent-pp.
//!
//! This module provides the [`Config`] struct which controls reindenting.
//! Configuration can be loaded from:
//! - TOML files (`reindent-pp.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being reindented up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::directive::Directive;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["reindent-pp.toml"];

/// Shape of a directive keyword
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

fn default_indent() -> usize {
    2
}
fn default_marker() -> char {
    '#'
}

/// Main configuration struct for reindent-pp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per nesting level (default: 2)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Indent with one tab per level instead of spaces (default: false)
    #[serde(default)]
    pub use_tabs: bool,

    /// Character that introduces a directive line (default: `#`)
    #[serde(default = "default_marker")]
    pub marker: char,

    /// Extra directive keywords accepted without affecting depth,
    /// e.g. `error`, `warning`, `line`
    #[serde(default)]
    pub neutral_directives: Vec<String>,

    /// Additional file extensions picked up when walking directories
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub indent: Option<usize>,
    pub use_tabs: Option<bool>,
    pub marker: Option<char>,
    #[serde(default)]
    pub neutral_directives: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: 2,
            use_tabs: false,
            marker: '#',
            neutral_directives: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 16;

    /// The string emitted once per nesting level
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent)
        }
    }

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        if self.marker.is_whitespace() || self.marker.is_alphanumeric() || self.marker == '_' {
            return Some(format!(
                "marker {:?} must be a punctuation character",
                self.marker
            ));
        }
        for keyword in &self.neutral_directives {
            if !KEYWORD_RE.is_match(keyword) {
                return Some(format!("neutral directive {keyword:?} is not a keyword"));
            }
            if Directive::from_keyword(keyword).is_some() {
                return Some(format!(
                    "neutral directive `{keyword}` is already a recognized directive"
                ));
            }
        }
        None
    }

    /// Add neutral directives, skipping duplicates
    pub fn add_neutral_directives<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            let keyword = keyword.into();
            if !self.neutral_directives.contains(&keyword) {
                self.neutral_directives.push(keyword);
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.use_tabs {
            self.use_tabs = v;
        }
        if let Some(v) = partial.marker {
            self.marker = v;
        }
        // Lists accumulate across files
        self.add_neutral_directives(partial.neutral_directives.iter().cloned());
        for ext in &partial.extensions {
            if !self.extensions.contains(ext) {
                self.extensions.push(ext.clone());
            }
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config has the lowest priority
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so more specific files come later
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Unreadable or malformed files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in &Self::discover_config_files(start_path) {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => {
                        tracing::debug!(path = %path.display(), "applying config file");
                        config.apply_partial(&partial);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to parse config, skipping");
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read config, skipping");
                }
            }
        }
        config
    }
}
