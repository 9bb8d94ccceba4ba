//! crates/rec_io/src/lib.rs
//! I/O crate for the recommendation engine.
//!
//! - Wire types for request/response (camelCase JSON).
//! - JSON Schema (draft 7) shape checks before any typed parsing.
//! - Bounded, offline file loading.
//! - Canonical JSON bytes + atomic writes, SHA-256 digests and IDs.
//!
//! Semantic checks (duplicates, solved > attempted, budget ceiling) live in
//! the pipeline; this crate only guarantees the shape.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for rec_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Reading an input failed.
    #[error("read error: {0}")]
    Read(String),

    /// Writing an artifact failed.
    #[error("write error: {0}")]
    Write(String),

    /// Rejected path (URL-like, missing parent, not a file).
    #[error("path error: {0}")]
    Path(String),

    /// Input exceeded a size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// JSON syntax / typed-deserialization errors with a JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema violation (first violation, deterministic).
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    /// Parameter values outside their domain.
    #[error("domain error: {0}")]
    Domain(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; report the root.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod schema;
pub mod wire;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
