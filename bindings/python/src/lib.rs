//! Python bindings for SQL ID
//!
//! Thin wrapper around `sqlid-core` — ZERO logic here.
//! All behavior comes from the canonical Rust implementation.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use sqlid_core::NormalizationOptions;

#[allow(clippy::too_many_arguments)]
fn options(
    lowercase: bool,
    strip_comments: bool,
    strip_trailing_semicolon: bool,
    collapse_whitespace: bool,
    append_trailing_newline: bool,
    rewrite_with_aliases: bool,
    blank_literals: bool,
) -> NormalizationOptions {
    NormalizationOptions {
        lowercase,
        strip_comments,
        strip_trailing_semicolon,
        collapse_whitespace,
        append_trailing_newline,
        rewrite_with_aliases,
        blank_literals,
    }
}

/// Canonicalize a SQL statement.
///
/// Every keyword switch defaults to True.
///
/// Args:
///     sql: raw statement text
///
/// Returns:
///     The normal form that gets digested
#[pyfunction]
#[pyo3(signature = (
    sql,
    lowercase = true,
    strip_comments = true,
    strip_trailing_semicolon = true,
    collapse_whitespace = true,
    append_trailing_newline = true,
    rewrite_with_aliases = true,
    blank_literals = true
))]
#[allow(clippy::too_many_arguments)]
fn canonicalize(
    sql: &str,
    lowercase: bool,
    strip_comments: bool,
    strip_trailing_semicolon: bool,
    collapse_whitespace: bool,
    append_trailing_newline: bool,
    rewrite_with_aliases: bool,
    blank_literals: bool,
) -> String {
    let opts = options(
        lowercase,
        strip_comments,
        strip_trailing_semicolon,
        collapse_whitespace,
        append_trailing_newline,
        rewrite_with_aliases,
        blank_literals,
    );
    sqlid_core::canonicalize(sql, &opts)
}

/// Encode an already canonicalized statement.
///
/// Returns:
///     (sql_id, sql_hash) tuple
#[pyfunction]
fn encode(normal_form: &str) -> (String, u32) {
    let sqlid = sqlid_core::encode(normal_form);
    (sqlid.id, sqlid.hash)
}

/// Canonicalize and encode in one call.
///
/// Returns:
///     (sql_id, sql_hash) tuple
#[pyfunction]
#[pyo3(signature = (
    sql,
    lowercase = true,
    strip_comments = true,
    strip_trailing_semicolon = true,
    collapse_whitespace = true,
    append_trailing_newline = true,
    rewrite_with_aliases = true,
    blank_literals = true
))]
#[allow(clippy::too_many_arguments)]
fn sql_id(
    sql: &str,
    lowercase: bool,
    strip_comments: bool,
    strip_trailing_semicolon: bool,
    collapse_whitespace: bool,
    append_trailing_newline: bool,
    rewrite_with_aliases: bool,
    blank_literals: bool,
) -> (String, u32) {
    let opts = options(
        lowercase,
        strip_comments,
        strip_trailing_semicolon,
        collapse_whitespace,
        append_trailing_newline,
        rewrite_with_aliases,
        blank_literals,
    );
    let sqlid = sqlid_core::sql_id(sql, &opts);
    (sqlid.id, sqlid.hash)
}

/// Recover the 32-bit value of a SQL ID (equals its sql_hash).
///
/// Raises:
///     ValueError: If the identifier has characters outside the alphabet
#[pyfunction]
fn decode(identifier: &str) -> PyResult<u32> {
    sqlid_core::decode(identifier).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// SQL ID Python module — content-based SQL statement identifiers
#[pymodule]
fn sqlid(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(canonicalize, m)?)?;
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(sql_id, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    Ok(())
}
