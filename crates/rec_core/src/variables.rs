//! variables.rs — Allocation parameters with safe defaults and domain checks.
//!
//! A parameter set is small on purpose: which weighting rule to use, the
//! mastery floor for the default rule, and a ceiling on the requested budget.
//! Everything else about an allocation is fixed by the algorithm.

use core::fmt;
use core::str::FromStr;

use crate::rounding::Ppm;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ------------ Macros ------------

/// Define an enum with explicit wire tokens, `as_token` and `FromStr`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident => { $($(#[$vmeta:meta])* $variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {}: {other} (expected one of: {})",
                        stringify!($name),
                        [$($token),+].join(", ")
                    )),
                }
            }
        }
    };
}

// ------------ Canonical enums (wire tokens explicit) ------------

wire_enum!(
    /// How a level's weight is derived before apportionment.
    WeightingRule => {
        /// `available × clamp(1 − solved/attempted, floor, 1)`.
        Mastery = "mastery",
        /// `available`; progress is ignored.
        Availability = "availability",
        /// `1` for every level that has availability.
        Even = "even",
    }
);

impl Default for WeightingRule {
    fn default() -> Self { WeightingRule::Mastery }
}

/// ------------ Params ------------

/// Default mastery floor ε = 0.1.
pub const DEFAULT_MASTERY_FLOOR_PPM: u32 = 100_000;

/// Default ceiling on `totalQuestions`.
pub const DEFAULT_MAX_BUDGET: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    pub weighting: WeightingRule,
    /// Lower clamp on the mastery factor, in ppm (1..=1_000_000).
    pub mastery_floor_ppm: u32,
    pub max_budget: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            weighting: WeightingRule::Mastery,
            mastery_floor_ppm: DEFAULT_MASTERY_FLOOR_PPM,
            max_budget: DEFAULT_MAX_BUDGET,
        }
    }
}

/// -------- Validation (domains) --------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarsError {
    Domain(String),
}

impl fmt::Display for VarsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarsError::Domain(m) => write!(f, "parameter domain error: {m}"),
        }
    }
}

impl std::error::Error for VarsError {}

pub type VarsResult<T> = Result<T, VarsError>;

impl Params {
    /// Validate numeric domains.
    pub fn validate_domains(&self) -> VarsResult<()> {
        self.mastery_floor()?;
        if self.max_budget == 0 {
            return Err(VarsError::Domain("max_budget must be >= 1".into()));
        }
        Ok(())
    }

    /// Mastery floor as a fraction in (0, 1].
    pub fn mastery_floor(&self) -> VarsResult<Ppm> {
        // A zero floor would let a fully mastered level starve to weight 0.
        match self.mastery_floor_ppm {
            0 => Err(VarsError::Domain("mastery_floor_ppm must be in 1..=1000000, got 0".into())),
            v => Ppm::new(v).map_err(|_| {
                VarsError::Domain(format!("mastery_floor_ppm must be in 1..=1000000, got {v}"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounding::PPM_ONE;

    #[test]
    fn defaults_are_valid() {
        let p = Params::default();
        assert!(p.validate_domains().is_ok());
        assert_eq!(p.mastery_floor().unwrap().to_string(), "0.1");
        assert_eq!(p.weighting, WeightingRule::Mastery);
    }

    #[test]
    fn floor_domain() {
        let mut p = Params::default();
        p.mastery_floor_ppm = 0;
        assert!(p.validate_domains().is_err());
        p.mastery_floor_ppm = PPM_ONE + 1;
        assert!(p.validate_domains().is_err());
        p.mastery_floor_ppm = PPM_ONE;
        assert!(p.validate_domains().is_ok());
    }

    #[test]
    fn budget_ceiling_domain() {
        let p = Params { max_budget: 0, ..Params::default() };
        assert!(matches!(p.validate_domains(), Err(VarsError::Domain(_))));
        // the floor itself is still fine
        assert_eq!(p.mastery_floor().unwrap().get(), DEFAULT_MASTERY_FLOOR_PPM);
    }

    #[test]
    fn weighting_tokens_round_trip_through_fromstr() {
        for w in WeightingRule::ALL {
            assert_eq!(w.as_token().parse::<WeightingRule>().unwrap(), *w);
        }
        assert!("proportional".parse::<WeightingRule>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn params_json_defaults_and_strictness() {
        let p: Params = serde_json::from_str(r#"{"weighting":"even"}"#).unwrap();
        assert_eq!(p.weighting, WeightingRule::Even);
        assert_eq!(p.mastery_floor_ppm, DEFAULT_MASTERY_FLOOR_PPM);
        assert!(serde_json::from_str::<Params>(r#"{"floor":1}"#).is_err());
    }
}
