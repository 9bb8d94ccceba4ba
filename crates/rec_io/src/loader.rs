//! Loader: read local JSON inputs (request, optional params), check their
//! shape against the embedded draft 7 schemas and return typed values.
//! No network I/O; URL-like paths are refused before touching the filesystem.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use rec_core::variables::Params;

use crate::schema::{self, SchemaKind};
use crate::wire::RecommendationRequest;
use crate::{looks_like_url_strict, IoError, IoResult};

/// Upper bound on any input file.
pub const MAX_INPUT_BYTES: u64 = 4 * 1024 * 1024;

// ----------------------------- Targeted loaders -----------------------------

pub fn load_request(path: &Path) -> IoResult<RecommendationRequest> {
    let bytes = read_bytes_with_limits(path)?;
    parse_request_bytes(&bytes)
}

/// Parse + shape-check a request already in memory.
pub fn parse_request_bytes(bytes: &[u8]) -> IoResult<RecommendationRequest> {
    parse_checked(SchemaKind::RecommendationRequest, bytes)
}

/// Load a parameter file; missing fields take their defaults, then domains are checked.
pub fn load_params(path: &Path) -> IoResult<Params> {
    let bytes = read_bytes_with_limits(path)?;
    let params: Params = parse_checked(SchemaKind::Params, &bytes)?;
    params.validate_domains().map_err(|e| IoError::Domain(e.to_string()))?;
    Ok(params)
}

// ----------------------------- Helpers -----------------------------

fn parse_checked<T: DeserializeOwned>(kind: SchemaKind, bytes: &[u8]) -> IoResult<T> {
    let v = parse_json_bytes(bytes)?;
    schema::validate_value(kind, &v)?;
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })
}

/// Parse JSON, keeping line/column of syntax errors in the message.
pub fn parse_json_bytes(bytes: &[u8]) -> IoResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{e} (line {}, column {})", e.line(), e.column()),
    })
}

/// Read a local file, refusing URLs and anything above `MAX_INPUT_BYTES`.
pub fn read_bytes_with_limits(path: &Path) -> IoResult<Vec<u8>> {
    let shown = path.display().to_string();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Path(format!("{shown}: only local files are accepted")));
    }
    let f = File::open(path).map_err(|e| IoError::Read(format!("{shown} ({e})")))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Read(format!("{shown} ({e})")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{shown} exceeds {MAX_INPUT_BYTES} bytes")));
    }
    Ok(buf)
}
