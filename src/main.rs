//! reindent-pp - Preprocessor directive reindenter

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use glob::Pattern;
use reindent_pp::{format_file, parse_args, CliArgs, Config, ReindentError};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// C-family extensions picked up when walking directories
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "h", "cc", "hh", "cpp", "hpp", "cxx", "hxx", "inc", "C", "H",
];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// What happened to one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Changed,
    Skipped,
}

fn main() -> ExitCode {
    let args = parse_args();
    init_tracing(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `--debug` forces the debug level; otherwise `RUST_LOG` or warnings only
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when any input failed or, with `--check`, would change
fn run(args: &CliArgs) -> anyhow::Result<bool> {
    if args.use_stdin() {
        let config = build_config(args, None)?;
        return process_stdin(&config, args);
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own.
    let base_config = match &args.config {
        Some(_) => Some(build_config(args, None)?),
        None => None,
    };
    let walk_config = match &base_config {
        Some(config) => config.clone(),
        None => build_config(args, None)?,
    };

    let (files, mut failures) = collect_files(args, &walk_config.extensions);
    if files.is_empty() && failures == 0 {
        if !args.silent {
            eprintln!("No source files found to reindent.");
        }
        return Ok(true);
    }

    let mut changed = Vec::new();
    let mut unchanged = 0usize;

    for path in &files {
        let result = match &base_config {
            Some(config) => process_single_file(path, config, args),
            None => build_config(args, Some(path.as_path()))
                .and_then(|config| process_single_file(path, &config, args)),
        };

        match result {
            Ok(Outcome::Changed) => changed.push(path),
            Ok(Outcome::Unchanged) => unchanged += 1,
            Ok(Outcome::Skipped) => {}
            Err(e) => {
                failures += 1;
                report_error(&path.display().to_string(), &e);
            }
        }
    }

    if args.check {
        for path in &changed {
            println!("{}", path.display());
        }
    }

    if !args.silent {
        let verb = if args.check { "would be reindented" } else { "reindented" };
        if failures == 0 {
            eprintln!(
                "{} files {verb}, {unchanged} already correct.",
                changed.len()
            );
        } else {
            eprintln!(
                "{} files {verb}, {unchanged} already correct, {failures} errors.",
                changed.len()
            );
        }
    }

    Ok(failures == 0 && !(args.check && !changed.is_empty()))
}

/// Print a per-input failure as `name:line: message` when the line is known
fn report_error(name: &str, err: &anyhow::Error) {
    match err.downcast_ref::<ReindentError>() {
        Some(reindent) => match reindent.line() {
            Some(line) => eprintln!("{name}:{line}: {reindent}"),
            None => eprintln!("{name}: {reindent}"),
        },
        None => eprintln!("{name}: {err:#}"),
    }
}

/// Build configuration from CLI args and config files
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        Config::from_discovered_files(&start)
    };

    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    if args.tabs {
        config.use_tabs = true;
    }
    if let Some(marker) = args.marker {
        config.marker = marker;
    }
    config.add_neutral_directives(args.allow.iter().cloned());
    for ext in &args.extensions {
        if !config.extensions.contains(ext) {
            config.extensions.push(ext.clone());
        }
    }

    tracing::debug!(
        indent = config.indent,
        use_tabs = config.use_tabs,
        marker = %config.marker,
        neutral_directives = ?config.neutral_directives,
        extensions = ?config.extensions,
        "configuration"
    );

    if let Some(error) = config.validate() {
        bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
///
/// Returns the files plus the number of inputs that do not exist.
fn collect_files(args: &CliArgs, extra_extensions: &[String]) -> (Vec<PathBuf>, usize) {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                None
            }
        })
        .collect();

    let mut files = Vec::new();
    let mut missing = 0;

    for input in &args.inputs {
        if input.is_file() {
            // Named files are taken regardless of extension
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let max_depth = if args.recursive { 256 } else { 1 };
            for entry in WalkDir::new(input)
                .follow_links(true)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                // Patterns apply below the input, not to its own ancestors
                .filter_entry(|e| {
                    let relative = e.path().strip_prefix(input).unwrap_or(e.path());
                    e.depth() == 0 || !is_excluded(relative, &exclude_patterns)
                })
                .filter_map(std::result::Result::ok)
            {
                let path = entry.path();
                if path.is_file() && is_source_file(path, extra_extensions) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            missing += 1;
            eprintln!("{}: no such file or directory", input.display());
        }
    }

    (files, missing)
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against each path component (covers file and directory names)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a source extension
/// Checks against both default extensions and any custom extensions provided
fn is_source_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS.contains(&ext)
                || custom_extensions
                    .iter()
                    .any(|custom| custom.strip_prefix('.').unwrap_or(custom) == ext)
        })
}

/// Reindent one file in place (or to stdout / not at all, per flags)
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> anyhow::Result<Outcome> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = fs::metadata(path)?;
    if metadata.len() > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                metadata.len() / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(Outcome::Skipped);
    }

    let mut contents = Vec::new();
    File::open(path)?.read_to_end(&mut contents)?;

    if !args.silent && !args.stdout && !args.check {
        eprintln!("Reindenting: {}", path.display());
    }

    let mut output = Vec::with_capacity(contents.len());
    format_file(
        BufReader::new(Cursor::new(&contents)),
        &mut output,
        config,
        &path.display().to_string(),
    )?;

    let outcome = if output == contents {
        Outcome::Unchanged
    } else {
        Outcome::Changed
    };

    if args.stdout {
        io::stdout().write_all(&output)?;
    } else if !args.check && outcome == Outcome::Changed {
        write_in_place(path, &output, &metadata.permissions())?;
    }

    Ok(outcome)
}

/// Replace the file behind `path` with `contents`
///
/// Symlinks are resolved first so the link target is rewritten and the link
/// survives. The new content goes to a sibling temporary file that is renamed
/// over the target, except for files with several hard links, which are
/// overwritten directly so every link keeps seeing the same file.
fn write_in_place(path: &Path, contents: &[u8], permissions: &fs::Permissions) -> anyhow::Result<()> {
    let target = fs::canonicalize(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;

    if has_other_hard_links(&target)? {
        fs::write(&target, contents)
            .with_context(|| format!("failed to overwrite {}", target.display()))?;
        tracing::debug!(path = %target.display(), bytes = contents.len(), "overwrote hard-linked file");
        return Ok(());
    }

    let dir = target.parent().unwrap_or_else(|| Path::new("/"));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions.clone())?;
    tmp.persist(&target)
        .with_context(|| format!("failed to replace {}", target.display()))?;
    tracing::debug!(path = %target.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(unix)]
fn has_other_hard_links(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(fs::metadata(path)?.nlink() > 1)
}

#[cfg(not(unix))]
fn has_other_hard_links(_path: &Path) -> io::Result<bool> {
    Ok(false)
}

/// Read at most `limit` bytes; `None` if the input is longer
fn read_capped<R: Read>(reader: R, limit: u64) -> io::Result<Option<Vec<u8>>> {
    let mut contents = Vec::new();
    reader.take(limit + 1).read_to_end(&mut contents)?;
    if contents.len() as u64 > limit {
        Ok(None)
    } else {
        Ok(Some(contents))
    }
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> anyhow::Result<bool> {
    let Some(stdin_contents) = read_capped(io::stdin().lock(), DEFAULT_MAX_FILE_SIZE)? else {
        bail!(
            "stdin input too large (exceeds limit of {} MB)",
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    };

    let mut output = Vec::new();
    if let Err(e) = format_file(
        BufReader::new(Cursor::new(&stdin_contents)),
        &mut output,
        config,
        "stdin",
    ) {
        report_error("stdin", &anyhow::Error::from(e));
        return Ok(false);
    }

    if args.check {
        return Ok(output == stdin_contents);
    }

    io::stdout().write_all(&output)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("a/b/config.h"), &[]));
        assert!(is_source_file(Path::new("main.cpp"), &[]));
        assert!(!is_source_file(Path::new("notes.txt"), &[]));
        assert!(!is_source_file(Path::new("Makefile"), &[]));
        assert!(is_source_file(Path::new("impl.inl"), &["inl".to_string()]));
        assert!(is_source_file(Path::new("impl.tcc"), &[".tcc".to_string()]));
    }

    #[test]
    fn test_read_capped() {
        let input: &[u8] = b"#if A\n#endif\n";
        assert_eq!(read_capped(input, 64).unwrap().as_deref(), Some(input));
        assert_eq!(read_capped(input, input.len() as u64).unwrap().as_deref(), Some(input));
        assert_eq!(read_capped(input, 4).unwrap(), None);
    }

    #[test]
    fn test_is_excluded() {
        let patterns = vec![Pattern::new("third_party").unwrap(), Pattern::new("*.gen.h").unwrap()];
        assert!(is_excluded(Path::new("src/third_party/zlib.h"), &patterns));
        assert!(is_excluded(Path::new("out/config.gen.h"), &patterns));
        assert!(!is_excluded(Path::new("src/config.h"), &patterns));
        assert!(!is_excluded(Path::new("src/config.h"), &[]));
    }
}
