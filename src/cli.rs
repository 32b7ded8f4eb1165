//! Command-line interface for reindent-pp.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to reindent (empty or `-` means stdin)
    pub inputs: Vec<PathBuf>,

    /// Number of spaces per nesting level
    pub indent: Option<usize>,

    /// Indent with tabs
    pub tabs: bool,

    /// Directive marker character
    pub marker: Option<char>,

    /// Extra neutral directive keywords
    pub allow: Vec<String>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Report files that would change without writing them
    pub check: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Additional source extensions for directory walks
    pub extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,

    /// Silent mode (no status output)
    pub silent: bool,
}

impl CliArgs {
    /// Whether input comes from stdin rather than named files
    #[must_use]
    pub fn use_stdin(&self) -> bool {
        self.inputs.is_empty() || (self.inputs.len() == 1 && self.inputs[0].as_os_str() == "-")
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("reindent-pp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reindents preprocessor directives to reflect their nesting depth")
        .long_about(
            "Reindents preprocessor directives to reflect their nesting depth.\n\n\
             With no FILE (or `-`), reads stdin and writes stdout. Otherwise every \
             FILE is rewritten IN PLACE; the original content is replaced.",
        )
        .arg(
            Arg::new("inputs")
                .help("Files or directories to reindent in place")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Number of spaces per nesting level [default: 2]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tabs")
                .short('t')
                .long("tabs")
                .help("Indent with one tab per nesting level")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .help("Character introducing a directive line [default: #]")
                .value_name("CHAR")
                .value_parser(clap::value_parser!(char)),
        )
        .arg(
            Arg::new("allow")
                .short('a')
                .long("allow")
                .help("Accept an extra directive keyword that does not affect nesting (can be repeated, e.g., -a error -a warning)")
                .value_name("KEYWORD")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Don't write anything; list files that would change and exit with status 1")
                .action(ArgAction::SetTrue)
                .conflicts_with("stdout"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively process directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional source extension for directory walks (can be repeated, e.g., -x inl)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no status output)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let strings = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default()
    };

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        indent: matches.get_one::<usize>("indent").copied(),
        tabs: matches.get_flag("tabs"),
        marker: matches.get_one::<char>("marker").copied(),
        allow: strings("allow"),
        stdout: matches.get_flag("stdout"),
        check: matches.get_flag("check"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: strings("exclude"),
        extensions: strings("extension"),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        build_cli().debug_assert();
        assert_eq!(build_cli().get_name(), "reindent-pp");
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse_args_from(vec!["reindent-pp"]);
        assert!(args.inputs.is_empty());
        assert!(args.use_stdin());
        assert_eq!(args.indent, None);
        assert_eq!(args.marker, None);
        assert!(!args.tabs);
        assert!(!args.stdout);
        assert!(!args.check);
    }

    #[test]
    fn test_dash_means_stdin() {
        let args = parse_args_from(vec!["reindent-pp", "-"]);
        assert!(args.use_stdin());

        let args = parse_args_from(vec!["reindent-pp", "a.h", "-"]);
        assert!(!args.use_stdin());
    }

    #[test]
    fn test_multiple_inputs() {
        let args = parse_args_from(vec!["reindent-pp", "a.h", "b.c"]);
        assert_eq!(
            args.inputs,
            vec![PathBuf::from("a.h"), PathBuf::from("b.c")]
        );
        assert!(!args.use_stdin());
    }

    #[test]
    fn test_indent_and_tabs() {
        let args = parse_args_from(vec!["reindent-pp", "-i", "4", "-t", "a.h"]);
        assert_eq!(args.indent, Some(4));
        assert!(args.tabs);
    }

    #[test]
    fn test_marker() {
        let args = parse_args_from(vec!["reindent-pp", "--marker", "%"]);
        assert_eq!(args.marker, Some('%'));
    }

    #[test]
    fn test_marker_rejects_multiple_chars() {
        assert!(build_cli()
            .try_get_matches_from(vec!["reindent-pp", "--marker", "##"])
            .is_err());
    }

    #[test]
    fn test_allow_multiple() {
        let args = parse_args_from(vec![
            "reindent-pp",
            "-a",
            "error",
            "--allow",
            "warning",
            "a.h",
        ]);
        assert_eq!(args.allow, vec!["error", "warning"]);
    }

    #[test]
    fn test_check_conflicts_with_stdout() {
        assert!(build_cli()
            .try_get_matches_from(vec!["reindent-pp", "--check", "--stdout", "a.h"])
            .is_err());
    }

    #[test]
    fn test_exclude_and_extensions() {
        let args = parse_args_from(vec![
            "reindent-pp",
            "-r",
            "-e",
            "third_party",
            "-x",
            "inl",
            "-x",
            ".tcc",
            "src/",
        ]);
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["third_party"]);
        assert_eq!(args.extensions, vec!["inl", ".tcc"]);
    }

    #[test]
    fn test_debug_and_silent() {
        let args = parse_args_from(vec!["reindent-pp", "-D", "-S", "a.h"]);
        assert!(args.debug);
        assert!(args.silent);
    }
}
