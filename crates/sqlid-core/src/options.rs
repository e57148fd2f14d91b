//! Normalization switches
//!
//! Every switch is independent and defaults to enabled. The canonicalizer
//! accepts any combination; couplings between switches (such as keeping
//! comments whenever whitespace is kept) belong to the callers.

use serde::{Deserialize, Serialize};

/// Which canonicalization steps to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    /// Fold the whole statement to lowercase
    pub lowercase: bool,
    /// Remove `/* ... */` comments, keeping `/*+ ... */` hints
    pub strip_comments: bool,
    /// Remove a final `;` and the whitespace after it
    pub strip_trailing_semicolon: bool,
    /// Squeeze whitespace runs to one space and trim the ends
    pub collapse_whitespace: bool,
    /// Append a single `\n`
    pub append_trailing_newline: bool,
    /// Replace WITH-clause alias names by positional placeholders
    pub rewrite_with_aliases: bool,
    /// Replace string and integer literals by `?`
    pub blank_literals: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        NormalizationOptions {
            lowercase: true,
            strip_comments: true,
            strip_trailing_semicolon: true,
            collapse_whitespace: true,
            append_trailing_newline: true,
            rewrite_with_aliases: true,
            blank_literals: true,
        }
    }
}

impl NormalizationOptions {
    /// All steps disabled: `canonicalize` returns its input unchanged.
    pub fn raw() -> Self {
        NormalizationOptions {
            lowercase: false,
            strip_comments: false,
            strip_trailing_semicolon: false,
            collapse_whitespace: false,
            append_trailing_newline: false,
            rewrite_with_aliases: false,
            blank_literals: false,
        }
    }

    pub fn with_lowercase(mut self, on: bool) -> Self {
        self.lowercase = on;
        self
    }

    pub fn with_strip_comments(mut self, on: bool) -> Self {
        self.strip_comments = on;
        self
    }

    pub fn with_strip_trailing_semicolon(mut self, on: bool) -> Self {
        self.strip_trailing_semicolon = on;
        self
    }

    pub fn with_collapse_whitespace(mut self, on: bool) -> Self {
        self.collapse_whitespace = on;
        self
    }

    pub fn with_append_trailing_newline(mut self, on: bool) -> Self {
        self.append_trailing_newline = on;
        self
    }

    pub fn with_rewrite_with_aliases(mut self, on: bool) -> Self {
        self.rewrite_with_aliases = on;
        self
    }

    pub fn with_blank_literals(mut self, on: bool) -> Self {
        self.blank_literals = on;
        self
    }
}
