//! crates/rec_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Use `sha256_canonical(..)` for JSON values/structs (goes through canonical_json).
//! - Use `sha256_hex(..)` for raw bytes (e.g. the request file as read).
//! - Hex digests are lowercase.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoResult;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// Prefix of recommendation IDs.
pub const REC_ID_PREFIX: &str = "REC:";

/// `REC:<hex>` for a recommendation derived from canonical bytes.
pub fn rec_id_from_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(format!("{REC_ID_PREFIX}{}", sha256_canonical(value)?))
}

/// `RUN:<hex>` for a run record; the record itself carries no timestamp, so
/// identical runs share an ID.
pub fn run_id_from_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(format!("RUN:{}", sha256_canonical(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hashing_ignores_key_order() {
        let a = json!({"x": 1, "y": [1, 2]});
        let b = json!({"y": [1, 2], "x": 1});
        assert_eq!(sha256_canonical(&a).unwrap(), sha256_canonical(&b).unwrap());
        let c = json!({"y": [2, 1], "x": 1});
        assert_ne!(sha256_canonical(&a).unwrap(), sha256_canonical(&c).unwrap());
    }

    #[test]
    fn ids_are_prefixed() {
        let v = json!({"a": 1});
        assert!(rec_id_from_canonical(&v).unwrap().starts_with("REC:"));
        let run = run_id_from_canonical(&v).unwrap();
        assert_eq!(run.len(), 4 + 64);
    }
}
