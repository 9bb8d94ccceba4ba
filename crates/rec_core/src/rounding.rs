//! Integer-first fractions in the closed interval [0, 1].
//!
//! Weights never touch floating point: a fraction is carried as parts per
//! million (`Ppm`), rounded toward zero once at construction, and everything
//! downstream is exact integer arithmetic. Identical inputs therefore produce
//! identical weights on every platform.

use core::fmt;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One whole, in parts per million.
pub const PPM_ONE: u32 = 1_000_000;

/// Decimal digits carried by `Ppm`.
const PPM_DIGITS: usize = 6;

/// Fraction in [0, 1] with a fixed denominator of 1_000_000.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Ppm(u32);

impl Ppm {
    pub const ZERO: Ppm = Ppm(0);
    pub const ONE: Ppm = Ppm(PPM_ONE);

    pub fn new(v: u32) -> Result<Self, CoreError> {
        if v <= PPM_ONE { Ok(Self(v)) } else { Err(CoreError::DomainOutOfRange("ppm must be <= 1_000_000")) }
    }

    #[inline]
    pub const fn get(self) -> u32 { self.0 }

    /// `floor(num / den)` in ppm. Requires `den > 0` and `num <= den`.
    pub fn from_ratio_floor(num: u64, den: u64) -> Result<Self, CoreError> {
        if den == 0 || num > den {
            return Err(CoreError::InvalidRatio);
        }
        let v = (num as u128) * (PPM_ONE as u128) / (den as u128);
        // num <= den bounds v by PPM_ONE
        Ok(Self(v as u32))
    }

    #[inline]
    pub fn clamp_to(self, lo: Ppm, hi: Ppm) -> Ppm {
        debug_assert!(lo <= hi);
        Ppm(self.0.clamp(lo.0, hi.0))
    }

    /// Parse a plain decimal such as `0.1`, `.25`, `1` or `1.000000`.
    /// At most six fractional digits; no sign, no exponent; value must be <= 1.
    pub fn parse_decimal(s: &str) -> Result<Self, CoreError> {
        let t = s.trim();
        let bad = || CoreError::InvalidDecimal(s.to_string());

        let (int_part, frac_part) = t.split_once('.').unwrap_or((t, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(bad());
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) || frac_part.len() > PPM_DIGITS {
            return Err(bad());
        }

        let int_v: u64 = if int_part.is_empty() { 0 } else { int_part.parse().map_err(|_| bad())? };
        if int_v > 1 {
            return Err(CoreError::DomainOutOfRange("fraction must be <= 1"));
        }
        let frac_v: u64 = if frac_part.is_empty() {
            0
        } else {
            let raw: u64 = frac_part.parse().map_err(|_| bad())?;
            raw * 10u64.pow((PPM_DIGITS - frac_part.len()) as u32)
        };

        let total = int_v * PPM_ONE as u64 + frac_v;
        if total > PPM_ONE as u64 {
            return Err(CoreError::DomainOutOfRange("fraction must be <= 1"));
        }
        Ok(Ppm(total as u32))
    }
}

impl TryFrom<u32> for Ppm {
    type Error = CoreError;
    fn try_from(v: u32) -> Result<Self, Self::Error> { Ppm::new(v) }
}

impl From<Ppm> for u32 {
    fn from(p: Ppm) -> Self { p.0 }
}

/// Shortest decimal rendering: `0.1`, `0.25`, `1`, `0`.
impl fmt::Display for Ppm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / PPM_ONE;
        let frac = self.0 % PPM_ONE;
        if frac == 0 {
            return write!(f, "{int}");
        }
        let digits = format!("{frac:06}");
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}
