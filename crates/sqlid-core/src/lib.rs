//! SQL ID Core - content-based identifiers for SQL statements
//!
//! Statements that differ only cosmetically (case, whitespace, comments,
//! trailing semicolons, WITH-clause alias names, literal values) get the
//! same identifier, so queries captured from logs or traces can be grouped.
//!
//! # Architecture
//!
//! ```text
//! SQL text → Canonicalizer → Normal Form → Digest Encoder → (id, hash)
//!                 ↓
//!          Nesting Parser (WITH-alias detection)
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input and options always produce identical output
//! - **Total**: Every string has a normal form, an identifier and a hash
//! - **Stateless**: No state survives a call; safe to use from many threads
//!
//! The identifier follows the scheme databases use for their own SQL IDs but
//! makes no attempt to reproduce any vendor's values.

pub mod digest;
pub mod error;
pub mod nesting;
pub mod normalizer;
pub mod options;

pub use digest::{decode, encode, Digest, ALPHABET};
pub use error::{Error, Result};
pub use nesting::{parse_nesting, Node, ParseTree};
pub use normalizer::canonicalize;
pub use options::NormalizationOptions;

/// Identifier and hash of one statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SqlId {
    /// Base-32 identifier of the digest's low 64 bits
    pub id: String,
    /// Last 32-bit word of the digest
    pub hash: u32,
}

/// Canonicalize `raw_sql` and encode the normal form.
pub fn sql_id(raw_sql: &str, options: &NormalizationOptions) -> SqlId {
    encode(&canonicalize(raw_sql, options))
}
