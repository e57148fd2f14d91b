//! Statement canonicalizer: converts raw SQL to its normal form
//!
//! The normal form is what gets digested, so two statements that differ only
//! in cosmetics (case, whitespace, comments, a trailing `;`, WITH-clause alias
//! names, literal values) must normalize to the same string.
//!
//! # Pipeline
//!
//! `lowercase → strip comments → strip ; → collapse whitespace → append \n
//!  → rewrite WITH aliases → blank literals`
//!
//! Each step is gated by its [`NormalizationOptions`] switch. The order is
//! fixed: alias detection assumes whitespace was already collapsed, and
//! number blanking relies on the trailing newline as a right boundary.
//!
//! # Guarantees
//!
//! - **Total**: every input string has a normal form
//! - **Deterministic**: same input and options, same output
//! - **Local**: the alias counter lives in one call; no shared state

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::nesting::parse_nesting;
use crate::options::NormalizationOptions;

// ── Patterns ───────────────────────────────────────────────

/// `/* ... */` closed at the nearest `*/`, unless it opens with `/*+`
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*(?:[^+].*?)?\*/").expect("valid comment pattern"));

static TRAILING_SEMICOLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r";[ \t\n\r\x0B\x0C]*\z").expect("valid semicolon pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\x0B\x0C]+").expect("valid whitespace pattern"));

/// Alias definition at the very start of a segment: `with x as` or `, x as`
static WITH_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:with[ \t\n\r\x0B\x0C]+|,[ \t\n\r\x0B\x0C]*)([^ \t\n\r\x0B\x0C.]+)[ \t\n\r\x0B\x0C]+as",
    )
    .expect("valid alias pattern")
});

/// Single-quoted literal; `''` is an escaped quote
static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^']|'')*'").expect("valid string pattern"));

/// Integer with whitespace on both sides (the whitespace is consumed)
static NUMBER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\n\r\x0B\x0C][0-9]+[ \t\n\r\x0B\x0C]").expect("valid number pattern")
});

// ── Public API ─────────────────────────────────────────────

/// Canonicalize a raw statement.
///
/// Never fails. Malformed input (unterminated quotes or comments,
/// unbalanced parentheses) is left unchanged where a step cannot match it.
pub fn canonicalize(input: &str, options: &NormalizationOptions) -> String {
    // ── Step 1: Case folding ───────────────────────────
    let mut stmt = if options.lowercase {
        input.to_lowercase()
    } else {
        input.to_string()
    };

    // ── Step 2: Comments ───────────────────────────────
    if options.strip_comments {
        stmt = COMMENT.replace_all(&stmt, "").into_owned();
        trace!(stmt = %stmt, "stripped comments");
    }

    // ── Step 3: Trailing semicolon ─────────────────────
    if options.strip_trailing_semicolon {
        stmt = TRAILING_SEMICOLON.replace(&stmt, "").into_owned();
    }

    // ── Step 4: Whitespace ─────────────────────────────
    if options.collapse_whitespace {
        stmt = WHITESPACE
            .replace_all(&stmt, " ")
            .trim_matches(is_sql_whitespace)
            .to_string();
        trace!(stmt = %stmt, "collapsed whitespace");
    }

    // ── Step 5: Trailing newline ───────────────────────
    if options.append_trailing_newline {
        stmt.push('\n');
    }

    // ── Step 6: WITH-clause aliases ────────────────────
    if options.rewrite_with_aliases {
        stmt = rewrite_with_aliases(stmt);
    }

    // ── Step 7: Literals ───────────────────────────────
    if options.blank_literals {
        stmt = blank_literals(&stmt);
    }

    stmt
}

/// Replace WITH-clause alias names by `^0001^`, `^0002^`, ... in order of
/// definition.
///
/// Definitions are only looked for in text outside every parenthesis, so a
/// `, x as` inside a subquery or select list is not taken for a CTE. Each
/// alias is then replaced everywhere in the statement, nested bodies
/// included, wherever it is followed by whitespace or the end of input.
pub fn rewrite_with_aliases(stmt: String) -> String {
    if !WITH_ALIAS.is_match(&stmt) {
        return stmt;
    }

    let tree = parse_nesting(&stmt);
    let aliases: Vec<String> = tree
        .top_level_text()
        .filter_map(|segment| WITH_ALIAS.captures(segment))
        .map(|caps| caps[1].to_string())
        .collect();

    let mut stmt = stmt;
    for (seq, alias) in (1u32..).zip(aliases) {
        let placeholder = format!("^{:04X}^", seq);
        debug!(alias = %alias, placeholder = %placeholder, "rewriting WITH alias");
        stmt = replace_alias(&stmt, &alias, &placeholder);
    }
    stmt
}

/// Replace quoted strings with `?` and whitespace-delimited integers with
/// ` ? `.
pub fn blank_literals(stmt: &str) -> String {
    let without_strings = STRING_LITERAL.replace_all(stmt, "?");
    NUMBER_LITERAL
        .replace_all(&without_strings, " ? ")
        .into_owned()
}

// ── Helpers ────────────────────────────────────────────────

/// Space, tab, newline, carriage return, vertical tab, form feed: the set
/// every pattern above treats as whitespace
fn is_sql_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Replace each occurrence of `alias` that is followed by whitespace or the
/// end of `stmt`. The following character is kept.
fn replace_alias(stmt: &str, alias: &str, placeholder: &str) -> String {
    let mut out = String::with_capacity(stmt.len());
    let mut rest = stmt;

    while let Some(pos) = rest.find(alias) {
        let end = pos + alias.len();
        let bounded = rest[end..].chars().next().map_or(true, is_sql_whitespace);
        if bounded {
            out.push_str(&rest[..pos]);
            out.push_str(placeholder);
            rest = &rest[end..];
        } else {
            // Advance one character so overlapping occurrences are still seen
            let step = pos + rest[pos..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&rest[..step]);
            rest = &rest[step..];
        }
    }

    out.push_str(rest);
    out
}
