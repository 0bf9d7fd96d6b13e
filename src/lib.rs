use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

pub mod emoji;
pub mod grammar;
pub mod scanner;

use crate::emoji::strip_emoji;
use crate::grammar::{grammar_for, language_id_for_ext};
use crate::scanner::strip_comments;

/// Clean a piece of source text: strip emoji everywhere, then strip
/// comments according to the grammar for `language_id`.
///
/// Pure and infallible. Unknown identifiers use the default (C-style)
/// grammar; text without emoji or eligible comments comes back unchanged.
/// Idempotent: cleaning the output again yields the same output.
pub fn clean(text: &str, language_id: &str) -> String {
    // Emoji go first so a stray emoji next to a comment marker cannot
    // shift span boundaries during classification.
    let grammar = grammar_for(language_id);
    let mut text = strip_emoji(text);

    // Deleting a comment can splice its neighbours into a brand-new
    // comment opener (`<!-` + `->` left behind by a removed `<!--x-->`
    // becomes `<!-->`), so the pass runs to a fixpoint. Every changed
    // pass strictly shrinks the text, so this terminates.
    loop {
        let stripped = strip_comments(&text, grammar);
        if stripped == text {
            return stripped;
        }
        text = stripped;
    }
}

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub exts: HashSet<String>,
    pub paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub no_gitignore: bool,
    pub json: bool,
    pub excludes: Vec<String>,
    pub max_bytes: Option<u64>,
    pub write: bool,
    pub lang: Option<String>,
    pub end_marker: bool,
}

#[derive(serde::Serialize)]
struct FileEntry {
    path: String,
    file_name: String,
    content: String,
}

pub fn run_with_config(cfg: Config) -> Result<()> {
    let exclude_globset = build_exclude_globset(&cfg.excludes)?;

    let mut had_error = false;
    let mut first_file = true;

    if cfg.json {
        println!("[");
    }

    for raw_root in &cfg.paths {
        // Canonicalise roots so running from arbitrary working dirs is reliable.
        let canon_root = match raw_root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Skipping root {:?}: {}", raw_root, e);
                had_error = true;
                continue;
            }
        };

        let mut builder = WalkBuilder::new(&canon_root);
        builder.follow_links(cfg.follow_symlinks);

        // Helps avoid edge cases where process CWD is invalid and global ignores need a base.
        builder.current_dir(canon_root.clone());

        if cfg.no_gitignore {
            builder
                .git_ignore(false)
                .git_exclude(false)
                .git_global(false)
                .ignore(false);
        } else {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .git_global(true)
                .ignore(true)
                .require_git(false);
        }

        // Values moved into the 'static filter closure must be owned separately.
        let root_for_filter = canon_root.clone();
        let exclude_globset = exclude_globset.clone();

        builder.filter_entry(move |entry: &DirEntry| {
            // Always keep the root.
            if entry.depth() == 0 {
                return true;
            }

            // Apply user exclude globs, relative to the current root.
            if let Some(ref gs) = exclude_globset {
                let path = entry.path();
                let rel = path.strip_prefix(&root_for_filter).unwrap_or(path);
                let rel_norm = normalize_for_matching(rel);

                if gs.is_match(&rel_norm) {
                    return false;
                }

                // If this is a directory, also try a trailing slash to make patterns
                // like `tests/**` able to prune the whole subtree early.
                if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false)
                    && !rel_norm.ends_with('/')
                {
                    let rel_dir = format!("{rel_norm}/");
                    if gs.is_match(&rel_dir) {
                        return false;
                    }
                }
            }

            true
        });

        let walker = builder.build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    eprintln!("Walk error: {err}");
                    had_error = true;
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if !matches_ext(path, &cfg.exts) {
                continue;
            }

            let display_path = make_display_path(&canon_root, path);

            if let Some(limit) = cfg.max_bytes
                && let Ok(meta) = fs::metadata(path)
                && meta.len() > limit
            {
                eprintln!(
                    "Skipping {} (size {} bytes > max {} bytes)",
                    display_path,
                    meta.len(),
                    limit
                );
                continue;
            }

            let outcome = if cfg.write {
                clean_file_in_place(path, &display_path, cfg.lang.as_deref())
            } else if cfg.json {
                let res =
                    print_cleaned_json(path, &display_path, cfg.lang.as_deref(), first_file);
                if res.is_ok() {
                    first_file = false;
                }
                res
            } else {
                print_cleaned(path, &display_path, cfg.end_marker, cfg.lang.as_deref())
            };

            if let Err(err) = outcome {
                eprintln!("Error processing {}: {:#}", display_path, err);
                had_error = true;
            }
        }
    }

    if cfg.json {
        println!("\n]");
    }

    if had_error {
        anyhow::bail!("One or more files could not be processed. See stderr for details.");
    }

    Ok(())
}

/// Build a GlobSet from the user–provided `--exclude` patterns.
/// Returns `Ok(None)` if there are no patterns.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();

    for pat in patterns {
        let pat = pat.trim();
        if pat.is_empty() {
            continue;
        }

        let glob =
            Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .context("Failed to build exclude glob set")?;

    Ok(Some(set))
}

/// Case-insensitive extension match, using the provided extension set.
pub fn matches_ext(path: &Path, exts: &HashSet<String>) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => exts.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Produce a display path relative to `root` (stable regardless of current working directory).
pub fn make_display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);

    // If root is a file and path == root, rel is empty.
    if rel.as_os_str().is_empty() {
        return path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
    }

    normalize_for_matching(rel)
}

/// Resolve the language identifier for a file: an explicit `--lang` wins,
/// otherwise the extension decides.
fn language_id_for_file<'a>(path: &Path, lang: Option<&'a str>) -> &'a str {
    match lang {
        Some(id) => id,
        None => {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            language_id_for_ext(ext)
        }
    }
}

/// Read a file lossily and return its cleaned text.
fn read_and_clean(path: &Path, display_path: &str, lang: Option<&str>) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", display_path))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(clean(&text, language_id_for_file(path, lang)))
}

/// Print a single cleaned file with header (and optional end marker).
pub fn print_cleaned(
    path: &Path,
    display_path: &str,
    end_marker: bool,
    lang: Option<&str>,
) -> Result<()> {
    let text = read_and_clean(path, display_path, lang)?;

    println!("========== FILE: {} ==========", display_path);
    print!("{text}");

    // Ensure there is a trailing newline before the separator between files.
    if !text.ends_with('\n') {
        println!();
    }

    if end_marker {
        println!("========== END FILE: {} ==========\n", display_path);
    } else {
        println!();
    }

    Ok(())
}

/// Print one JSON entry, preceded by a separator when it is not the first.
///
/// All fallible work happens before anything is printed, so a file that
/// cannot be read never leaves a dangling `,` behind in the array.
fn print_cleaned_json(
    path: &Path,
    display_path: &str,
    lang: Option<&str>,
    first: bool,
) -> Result<()> {
    let text = read_and_clean(path, display_path, lang)?;

    let entry = FileEntry {
        path: display_path.to_string(),
        file_name: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        content: text,
    };

    let json = serde_json::to_string(&entry)?;
    if !first {
        println!(",");
    }
    print!("{}", json);

    Ok(())
}

/// Rewrite a file with its cleaned text, but only when something changed.
fn clean_file_in_place(path: &Path, display_path: &str, lang: Option<&str>) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", display_path))?;
    let original = String::from_utf8_lossy(&bytes).into_owned();

    let cleaned = clean(&original, language_id_for_file(path, lang));
    if cleaned == original {
        return Ok(());
    }

    fs::write(path, &cleaned).with_context(|| format!("Failed to write {}", display_path))?;
    eprintln!("cleaned {}", display_path);

    Ok(())
}

/// Convert paths to a stable, slash-separated form for matching/printing.
fn normalize_for_matching(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn matches_ext_is_case_insensitive_and_requires_extension() {
        let mut exts = HashSet::new();
        exts.insert("py".to_string());

        assert!(matches_ext(Path::new("foo.PY"), &exts));
        assert!(matches_ext(Path::new("dir/bar.py"), &exts));
        assert!(!matches_ext(Path::new("README"), &exts));
        assert!(!matches_ext(Path::new("script.sh"), &exts));
    }

    #[test]
    fn clean_is_idempotent() {
        let samples = [
            ("x = 1; // gone 🎉\nlet s = \"// kept\";", "javascript"),
            ("# gone\nx = \"# kept\"\n", "python"),
            ("/* unterminated", "javascript"),
            ("// !!keep\ncode();\n", "javascript"),
        ];

        for (src, lang) in samples {
            let once = clean(src, lang);
            assert_eq!(clean(&once, lang), once, "not idempotent for {src:?}");
        }
    }

    #[test]
    fn clean_is_idempotent_when_deletion_splices_a_new_opener() {
        // Removing the inner comment leaves `<!-` + `->` touching, which
        // reads as a fresh unterminated opener and must also be cleaned.
        let out = clean("<!-<!--x-->->", "html");
        assert_eq!(out, "");
        assert_eq!(clean(&out, "html"), out);

        let out = clean("/*/**/*/ x();", "javascript");
        assert_eq!(clean(&out, "javascript"), out);
    }

    #[test]
    fn clean_removes_emoji_inside_strings_and_comments() {
        let out = clean("let s = \"hi 🎉\"; // done ✅", "javascript");
        assert_eq!(out, "let s = \"hi \"; ");
    }

    #[test]
    fn clean_with_unknown_language_uses_c_style() {
        let out = clean("a(); // gone\nb();", "some-made-up-lang");
        assert_eq!(out, "a(); \nb();");
    }

    #[test]
    fn clean_returns_input_unchanged_when_nothing_applies() {
        let src = "fn main() { println!(\"hello\"); }\n";
        assert_eq!(clean(src, "rust"), src);
    }

    #[test]
    fn clean_emoji_only_input_yields_empty() {
        assert_eq!(clean("✨🚀", "python"), "");
    }
}
