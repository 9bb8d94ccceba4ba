//! Per-entry weights for the apportionment.
//!
//! A weight is an exact integer: availability times a mastery factor in ppm
//! for the default rule, or availability / 1 for the flat rules. Entries with
//! no availability always weigh 0 and therefore never receive anything.

use rec_core::entities::LevelProgress;
use rec_core::variables::WeightingRule;
use rec_core::Ppm;

/// `clamp(1 − solved/attempted, floor, 1)`, truncated toward zero in ppm.
///
/// No progress record, or a record with `attempted == 0`, counts as untouched
/// and yields `1`.
pub fn mastery_factor(progress: Option<&LevelProgress>, floor: Ppm) -> Ppm {
    let raw = match progress {
        Some(p) if p.attempted > 0 => {
            // unsolved <= attempted, so the ratio is always in range.
            Ppm::from_ratio_floor(p.unsolved(), p.attempted).unwrap_or(Ppm::ONE)
        }
        _ => Ppm::ONE,
    };
    raw.clamp_to(floor, Ppm::ONE)
}

/// Integer weight of one (topic, level) entry under `rule`.
///
/// Bounded by `u64::MAX × 1_000_000`, well inside u128.
pub fn entry_weight(
    rule: WeightingRule,
    floor: Ppm,
    available: u64,
    progress: Option<&LevelProgress>,
) -> u128 {
    if available == 0 {
        return 0;
    }
    match rule {
        WeightingRule::Mastery => {
            available as u128 * mastery_factor(progress, floor).get() as u128
        }
        WeightingRule::Availability => available as u128,
        WeightingRule::Even => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Ppm { Ppm::new(100_000).unwrap() }

    fn lp(solved: u64, attempted: u64) -> LevelProgress { LevelProgress { solved, attempted } }

    #[test]
    fn factor_without_data_is_one() {
        assert_eq!(mastery_factor(None, floor()), Ppm::ONE);
        assert_eq!(mastery_factor(Some(&lp(0, 0)), floor()), Ppm::ONE);
    }

    #[test]
    fn factor_tracks_unsolved_share() {
        assert_eq!(mastery_factor(Some(&lp(3, 4)), floor()).get(), 250_000);
        assert_eq!(mastery_factor(Some(&lp(0, 9)), floor()), Ppm::ONE);
        // 2/3 unsolved → 666_666 (truncated)
        assert_eq!(mastery_factor(Some(&lp(1, 3)), floor()).get(), 666_666);
    }

    #[test]
    fn factor_is_clamped_at_floor() {
        assert_eq!(mastery_factor(Some(&lp(10, 10)), floor()).get(), 100_000);
        assert_eq!(mastery_factor(Some(&lp(99, 100)), floor()).get(), 100_000);
        let half = Ppm::new(500_000).unwrap();
        assert_eq!(mastery_factor(Some(&lp(3, 4)), half).get(), 500_000);
    }

    #[test]
    fn weights_per_rule() {
        let p = lp(3, 4);
        assert_eq!(entry_weight(WeightingRule::Mastery, floor(), 20, Some(&p)), 20 * 250_000);
        assert_eq!(entry_weight(WeightingRule::Mastery, floor(), 20, None), 20 * 1_000_000);
        assert_eq!(entry_weight(WeightingRule::Availability, floor(), 20, Some(&p)), 20);
        assert_eq!(entry_weight(WeightingRule::Even, floor(), 20, Some(&p)), 1);
    }

    #[test]
    fn empty_levels_weigh_nothing() {
        for rule in WeightingRule::ALL {
            assert_eq!(entry_weight(*rule, floor(), 0, None), 0);
        }
    }

    #[test]
    fn extreme_inputs_fit() {
        let w = entry_weight(WeightingRule::Mastery, floor(), u64::MAX, None);
        assert_eq!(w, u64::MAX as u128 * 1_000_000);
    }
}
