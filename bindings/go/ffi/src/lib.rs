//! C-FFI layer for SQL ID — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `sqlid-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `sqlid_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use sqlid_core::NormalizationOptions;

/// Result from a SQL ID FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `sqlid_free_string()`.
#[repr(C)]
pub struct SqlIdResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl SqlIdResult {
    fn ok(value: String) -> Self {
        match CString::new(value) {
            Ok(c) => SqlIdResult {
                result: c.into_raw(),
                error: std::ptr::null_mut(),
            },
            Err(_) => SqlIdResult::err("output contains an interior NUL byte".into()),
        }
    }

    fn err(msg: String) -> Self {
        let c = CString::new(msg).unwrap_or_default();
        SqlIdResult {
            result: std::ptr::null_mut(),
            error: c.into_raw(),
        }
    }
}

/// Normalization switches as a bit set, bit 0 first:
/// lowercase, strip_comments, strip_trailing_semicolon, collapse_whitespace,
/// append_trailing_newline, rewrite_with_aliases, blank_literals.
/// `SQLID_DEFAULT_FLAGS` (0x7F) enables all of them.
pub const SQLID_DEFAULT_FLAGS: u32 = 0x7F;

fn options_from_flags(flags: u32) -> NormalizationOptions {
    let bit = |n: u32| flags & (1 << n) != 0;
    NormalizationOptions {
        lowercase: bit(0),
        strip_comments: bit(1),
        strip_trailing_semicolon: bit(2),
        collapse_whitespace: bit(3),
        append_trailing_newline: bit(4),
        rewrite_with_aliases: bit(5),
        blank_literals: bit(6),
    }
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn sqlid_json(sqlid: &sqlid_core::SqlId) -> SqlIdResult {
    match serde_json::to_string(sqlid) {
        Ok(json) => SqlIdResult::ok(json),
        Err(e) => SqlIdResult::err(format!("Serialization error: {}", e)),
    }
}

/// Canonicalize a SQL statement with the given flag bits.
///
/// # Safety
/// `sql` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `sqlid_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn sqlid_canonicalize(sql: *const c_char, flags: u32) -> SqlIdResult {
    let sql = match cstr_to_str(sql) {
        Some(s) => s,
        None => return SqlIdResult::err("null or invalid UTF-8 input".into()),
    };

    SqlIdResult::ok(sqlid_core::canonicalize(sql, &options_from_flags(flags)))
}

/// Encode an already canonicalized statement.
/// Returns JSON: { "id": string, "hash": number }
///
/// # Safety
/// `normal_form` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `sqlid_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn sqlid_encode(normal_form: *const c_char) -> SqlIdResult {
    let normal_form = match cstr_to_str(normal_form) {
        Some(s) => s,
        None => return SqlIdResult::err("null or invalid UTF-8 input".into()),
    };

    sqlid_json(&sqlid_core::encode(normal_form))
}

/// Canonicalize and encode in one call.
/// Returns JSON: { "id": string, "hash": number }
///
/// # Safety
/// `sql` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `sqlid_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn sqlid_sql_id(sql: *const c_char, flags: u32) -> SqlIdResult {
    let sql = match cstr_to_str(sql) {
        Some(s) => s,
        None => return SqlIdResult::err("null or invalid UTF-8 input".into()),
    };

    sqlid_json(&sqlid_core::sql_id(sql, &options_from_flags(flags)))
}

/// Decode a SQL ID into its 32-bit value, written to `out`.
/// Returns null on success, or an error message the caller must free.
///
/// # Safety
/// `identifier` must be a valid null-terminated UTF-8 C string and `out`
/// a valid pointer to a `u32`.
#[no_mangle]
pub unsafe extern "C" fn sqlid_decode(identifier: *const c_char, out: *mut u32) -> *mut c_char {
    if out.is_null() {
        return SqlIdResult::err("null output pointer".into()).error;
    }
    let identifier = match cstr_to_str(identifier) {
        Some(s) => s,
        None => return SqlIdResult::err("null or invalid UTF-8 input".into()).error,
    };

    match sqlid_core::decode(identifier) {
        Ok(value) => {
            *out = value;
            std::ptr::null_mut()
        }
        Err(e) => SqlIdResult::err(e.to_string()).error,
    }
}

/// Free a string previously returned by a SQL ID FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a SQL ID FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn sqlid_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
