//! Static lexical grammar table: which string and comment delimiters each
//! supported language identifier uses.
//!
//! Grammars are value objects. Several identifiers alias to the same
//! instance, so lookup hands out `&'static` references rather than copies.

/// One string-literal form recognised by a grammar, in priority order.
///
/// Multi-character quotes must be listed before any single-character prefix
/// of theirs (`"""` before `"`), otherwise the shorter form wins the tie at
/// the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringForm {
    /// Symmetric delimiter with backslash escapes: `"`, `'`, `` ` ``,
    /// `"""`, `'''`.
    Quote(&'static str),
    /// Lua long bracket: `[==[ ... ]==]`, where the opener and closer must
    /// carry the same number of `=` signs. No escapes inside.
    LongBracket,
}

/// Lexical rules for one language: string forms plus up to one single-line
/// and one multi-line comment marker. A grammar may define neither comment
/// marker, in which case comment stripping is a no-op.
#[derive(Debug)]
pub struct Grammar {
    pub strings: &'static [StringForm],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
}

use StringForm::{LongBracket, Quote};

/// Fallback for unknown language identifiers as well.
static C_STYLE: Grammar = Grammar {
    strings: &[Quote("\""), Quote("'")],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
};

/// Like C, plus template literals.
static JS_STYLE: Grammar = Grammar {
    strings: &[Quote("\""), Quote("'"), Quote("`")],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
};

/// Triple quotes double as docstrings; stripping them would break code, so
/// they are kept as strings and only `#` comments are removed.
static PYTHON: Grammar = Grammar {
    strings: &[Quote("\"\"\""), Quote("'''"), Quote("\""), Quote("'")],
    line_comment: Some("#"),
    block_comment: None,
};

static LUA: Grammar = Grammar {
    strings: &[Quote("\""), Quote("'"), LongBracket],
    line_comment: Some("--"),
    block_comment: Some(("--[[", "]]")),
};

/// Hash line comments only: shell, R, YAML, dockerfiles.
static HASH_LINE: Grammar = Grammar {
    strings: &[Quote("\""), Quote("'")],
    line_comment: Some("#"),
    block_comment: None,
};

static HTML: Grammar = Grammar {
    strings: &[Quote("\""), Quote("'")],
    line_comment: None,
    block_comment: Some(("<!--", "-->")),
};

/// Look up the grammar for a language identifier.
///
/// The identifier namespace is a closed table; anything unrecognised gets
/// the default C-style grammar.
pub fn grammar_for(language_id: &str) -> &'static Grammar {
    match language_id {
        "javascript" | "typescript" | "javascriptreact" | "typescriptreact" => &JS_STYLE,
        "c" | "cpp" | "java" | "go" | "rust" | "swift" | "kotlin" | "php" => &C_STYLE,
        "python" => &PYTHON,
        "lua" => &LUA,
        "r" | "yaml" | "shellscript" | "bash" | "dockerfile" => &HASH_LINE,
        "html" => &HTML,
        _ => &C_STYLE,
    }
}

/// Map a (lowercased, dot-less) file extension to a language identifier.
///
/// Unknown extensions map to an empty identifier, which `grammar_for`
/// resolves to the default grammar.
pub fn language_id_for_ext(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "java" => "java",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "py" | "pyi" => "python",
        "lua" => "lua",
        "r" => "r",
        "yaml" | "yml" => "yaml",
        "sh" | "bash" | "zsh" => "shellscript",
        "php" => "php",
        "html" | "htm" => "html",
        _ => "",
    }
}
