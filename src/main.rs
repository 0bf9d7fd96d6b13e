use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use scrub::{Config, run_with_config};

/// scrub - strip emoji and non-essential comments from source files.
///
/// Recursively clean source files: emoji are removed everywhere, comments
/// are removed unless protected, string literals are never touched. By
/// default it:
///
///   - respects .gitignore / .ignore / git exclude files
///   - previews cleaned files on stdout (use --write to rewrite in place)
///   - keeps comments whose content starts with `!!`
///   - allows adding extra exclude globs
#[derive(Parser, Debug)]
#[command(
    name = "scrub",
    author,
    version,
    about = "Strip emoji and comments from source files, respecting .gitignore",
    long_about = r#"Recursively clean source files: emoji are removed everywhere,
comments are removed unless protected, string literals are never touched.

By default it:
  • respects .gitignore / .ignore / git exclude files
  • previews cleaned files on stdout (use --write to rewrite in place)
  • keeps comments whose content starts with `!!`
  • allows adding extra exclude globs

Typical usage:
  scrub -t py
  scrub -t py,rs --write src tests
"#
)]
struct Args {
    /// File extensions / types to include (e.g. py, rs).
    ///
    /// Can be repeated or comma-separated:
    ///   scrub -t py
    ///   scrub -t py,rs
    ///   scrub -t py -t rs
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ',',
        required = true
    )]
    exts: Vec<String>,

    /// Paths to scan (files or directories). Defaults to current directory.
    ///
    /// You can pass multiple:
    ///   scrub -t py src tests tools
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout.
    ///
    /// Only files whose cleaned text differs from the original are
    /// rewritten; each rewrite is reported on stderr.
    #[arg(long = "write", short = 'w')]
    write: bool,

    /// Force a language identifier for every file instead of deriving it
    /// from the extension (e.g. --lang python).
    ///
    /// Unknown identifiers fall back to the default C-style grammar
    /// (`"`/`'` strings, `//` and `/* */` comments).
    #[arg(long = "lang", value_name = "ID")]
    lang: Option<String>,

    /// Follow symbolic links during traversal.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Disable reading .gitignore / .ignore / git exclude files.
    ///
    /// By default, scrub honours:
    ///   - .gitignore files in the tree
    ///   - .ignore files
    ///   - global Git exclude config
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Additional glob patterns to exclude (files or directories).
    ///
    /// Patterns are evaluated relative to each PATH root and use glob-style
    /// matching (via globset), e.g.:
    ///
    ///   scrub -t py --exclude 'migrations/**'
    ///   scrub -t py --exclude 'tests/**,*.gen.py'
    ///
    /// Multiple flags and comma-separated values are both allowed.
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Maximum file size to clean, in bytes (skip larger files).
    ///
    /// Useful when you want to avoid churning through big generated artifacts.
    #[arg(long = "max-bytes", value_name = "N")]
    max_bytes: Option<u64>,

    /// Output as a JSON array of objects { "path": "...", "content": "..." }
    /// holding the cleaned text (conflicts with --write).
    #[arg(long = "json", conflicts_with = "write")]
    json: bool,

    /// Print an explicit END marker after each file in preview mode.
    ///
    /// This is handy if you want a clear end-of-file delimiter for tooling.
    #[arg(long = "end-marker")]
    end_marker: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Normalise extensions to lowercase, no leading dot.
    let mut ext_set = HashSet::new();
    for e in &args.exts {
        let norm = e.trim().trim_start_matches('.').to_ascii_lowercase();
        if !norm.is_empty() {
            ext_set.insert(norm);
        }
    }

    if ext_set.is_empty() {
        bail!("No valid extensions provided (after normalisation).");
    }

    let cfg = Config {
        exts: ext_set,
        paths: args.paths,
        follow_symlinks: args.follow_symlinks,

        no_gitignore: args.no_gitignore,
        json: args.json,
        excludes: args.excludes,
        max_bytes: args.max_bytes,
        write: args.write,
        lang: args.lang,
        end_marker: args.end_marker,
    };

    run_with_config(cfg)
}
