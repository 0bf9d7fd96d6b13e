//! Single-pass lexical scanner: classifies string-literal and comment spans
//! so that only genuine comment text is removed.
//!
//! This is a lexer, not a parser. It never validates nesting or syntax; it
//! only has to delimit strings and comments correctly, including strings
//! that contain comment-like substrings.

use crate::grammar::{Grammar, StringForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Str,
    BlockComment,
    LineComment,
}

/// A classified maximal region of the input. `start`/`end` are byte
/// offsets into the scanned text; `inner` is the content without the
/// delimiter markers. Spans are ephemeral: produced lazily during the scan
/// and consumed immediately.
#[derive(Debug)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    pub inner: &'a str,
}

/// Comments whose trimmed content starts with this marker are preserved.
const PROTECT_MARKER: &str = "!!";

/// Remove comment spans from `text` according to `grammar`, leaving string
/// literals, protected comments and plain code verbatim.
///
/// Single left-to-right pass, no backtracking once a span is committed.
/// Unterminated strings and comments are conditions, not errors: both
/// extend to end of input and keep their classification.
pub fn strip_comments(text: &str, grammar: &Grammar) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(span) = find_next_span(text, pos, grammar) {
        // Plain code between spans is always emitted verbatim.
        out.push_str(&text[pos..span.start]);

        match span.kind {
            SpanKind::Str => out.push_str(&text[span.start..span.end]),
            SpanKind::BlockComment | SpanKind::LineComment => {
                if span.inner.trim().starts_with(PROTECT_MARKER) {
                    out.push_str(&text[span.start..span.end]);
                }
            }
        }

        pos = span.end;
    }

    out.push_str(&text[pos..]);
    out
}

/// Find the next string or comment span at or after `pos`.
///
/// The earliest start offset wins. Ties at the same offset resolve to
/// whichever candidate is considered first: string forms in grammar order,
/// then the block comment, then the line comment. Strings therefore always
/// beat comments starting at the same position, and block comments beat
/// line comments (deterministic tie-break).
fn find_next_span<'a>(text: &'a str, pos: usize, grammar: &Grammar) -> Option<Span<'a>> {
    let mut best: Option<Span<'a>> = None;

    for form in grammar.strings {
        let cand = match form {
            StringForm::Quote(delim) => {
                find_at_or_after(text, pos, delim).map(|at| match_quote(text, at, delim))
            }
            StringForm::LongBracket => find_long_bracket(text, pos),
        };
        commit_if_earlier(&mut best, cand);
    }

    if let Some((open, close)) = grammar.block_comment {
        let cand = find_at_or_after(text, pos, open).map(|at| match_block(text, at, open, close));
        commit_if_earlier(&mut best, cand);
    }

    if let Some(marker) = grammar.line_comment {
        let cand = find_at_or_after(text, pos, marker).map(|at| match_line(text, at, marker));
        commit_if_earlier(&mut best, cand);
    }

    best
}

fn commit_if_earlier<'a>(best: &mut Option<Span<'a>>, cand: Option<Span<'a>>) {
    if let Some(c) = cand {
        match best {
            Some(b) if b.start <= c.start => {}
            _ => *best = Some(c),
        }
    }
}

fn find_at_or_after(text: &str, pos: usize, needle: &str) -> Option<usize> {
    text[pos..].find(needle).map(|off| pos + off)
}

/// String span from the `delim` at `pos` to the nearest unescaped closing
/// `delim`, even across lines. Escape = preceding backslash; `\\` pairs
/// are consumed so they cannot escape the closer. Unterminated strings
/// extend to end of input and stay strings.
fn match_quote<'a>(text: &'a str, pos: usize, delim: &str) -> Span<'a> {
    let bytes = text.as_bytes();
    let body = pos + delim.len();
    let mut i = body;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        // Delimiters are ASCII, so a byte-level comparison cannot match in
        // the middle of a multi-byte character.
        if bytes[i..].starts_with(delim.as_bytes()) {
            return Span {
                kind: SpanKind::Str,
                start: pos,
                end: i + delim.len(),
                inner: &text[body..i],
            };
        }
        i += 1;
    }

    Span {
        kind: SpanKind::Str,
        start: pos,
        end: text.len(),
        inner: &text[body..],
    }
}

/// Next long-bracket string opener (`[`, `=`*n, `[`) at or after `pos`.
fn find_long_bracket(text: &str, pos: usize) -> Option<Span<'_>> {
    let mut at = pos;
    while let Some(off) = text[at..].find('[') {
        let open = at + off;
        if let Some(span) = match_long_bracket(text, open) {
            return Some(span);
        }
        at = open + 1;
    }
    None
}

/// Long-bracket string at `pos`: `[==[ ... ]==]` where the closer must
/// carry the same number of `=` as the opener. No closer means the string
/// runs to end of input.
fn match_long_bracket(text: &str, pos: usize) -> Option<Span<'_>> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }

    let mut i = pos + 1;
    while bytes.get(i) == Some(&b'=') {
        i += 1;
    }
    if bytes.get(i) != Some(&b'[') {
        return None;
    }

    let level = i - pos - 1;
    let body = i + 1;
    let closer = format!("]{}]", "=".repeat(level));

    Some(match text[body..].find(&closer) {
        Some(off) => Span {
            kind: SpanKind::Str,
            start: pos,
            end: body + off + closer.len(),
            inner: &text[body..body + off],
        },
        None => Span {
            kind: SpanKind::Str,
            start: pos,
            end: text.len(),
            inner: &text[body..],
        },
    })
}

/// Block comment from `open` at `pos` to the nearest following `close`
/// (inclusive), or to end of input when it never closes.
fn match_block<'a>(text: &'a str, pos: usize, open: &str, close: &str) -> Span<'a> {
    let body = pos + open.len();
    match text[body..].find(close) {
        Some(off) => Span {
            kind: SpanKind::BlockComment,
            start: pos,
            end: body + off + close.len(),
            inner: &text[body..body + off],
        },
        None => Span {
            kind: SpanKind::BlockComment,
            start: pos,
            end: text.len(),
            inner: &text[body..],
        },
    }
}

/// Line comment from `marker` at `pos` to the end of the current line,
/// excluding the line terminator itself.
fn match_line<'a>(text: &'a str, pos: usize, marker: &str) -> Span<'a> {
    let body = pos + marker.len();
    let end = text[body..].find('\n').map_or(text.len(), |off| body + off);
    Span {
        kind: SpanKind::LineComment,
        start: pos,
        end,
        inner: &text[body..end],
    }
}
