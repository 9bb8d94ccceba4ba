//! rec_core — Core types, weighting parameters, ordering helpers, fixed-point ratios.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! engine (`rec_algo`, `rec_io`, `rec_pipeline`, `rec_cli`).
//!
//! - Identifiers: `TopicName`, `Level`
//! - Inventory / progress / allocation maps (canonical `BTreeMap` order)
//! - `Params`: weighting rule, mastery floor, budget ceiling
//! - Integer-first numerics: `Ppm` (parts per million)
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidTopicName(String),
        InvalidRatio,
        InvalidDecimal(String),
        DomainOutOfRange(&'static str),
        ProgressInconsistent { solved: u64, attempted: u64 },
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidTopicName(s) => write!(f, "invalid topic name: {s:?}"),
                CoreError::InvalidRatio => write!(f, "invalid ratio"),
                CoreError::InvalidDecimal(s) => write!(f, "invalid decimal: {s:?}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::ProgressInconsistent { solved, attempted } => {
                    write!(f, "solved ({solved}) exceeds attempted ({attempted})")
                }
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod rounding;
pub mod variables;

pub use errors::CoreError;
pub use ids::{Level, TopicName};
pub use rounding::Ppm;
