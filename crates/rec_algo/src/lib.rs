// crates/rec_algo/src/lib.rs
#![forbid(unsafe_code)]

use rec_core::determinism::EntryKey;
use rec_core::entities::{Allocation, Inventory, Progress};
use rec_core::variables::{Params, WeightingRule, DEFAULT_MASTERY_FLOOR_PPM};
use rec_core::Ppm;

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod largest_remainder;

    pub use largest_remainder::{apportion_capped, ApportionError, Candidate};
}

pub mod weighting;

pub use weighting::{entry_weight, mastery_factor};

use allocation::{apportion_capped, ApportionError, Candidate};

// ----------------------------- Errors ------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("progress for topic {topic:?} level {level}: solved exceeds attempted")]
    ProgressInconsistent { topic: String, level: u32 },
    #[error("mastery floor must be in 1..=1000000 ppm, got {0}")]
    InvalidFloor(u32),
    #[error("weight arithmetic overflow (budget or availability too large)")]
    Overflow,
}

impl From<ApportionError> for AllocError {
    fn from(e: ApportionError) -> Self {
        match e {
            ApportionError::Overflow => AllocError::Overflow,
        }
    }
}

// ----------------------------- Strategy seam -----------------------------------------

/// Turns a budget, an inventory and optional progress into per-entry counts.
///
/// Implementations are pure: no I/O, no shared mutable state, identical inputs
/// give identical output.
pub trait Allocator: Send + Sync {
    fn allocate(
        &self,
        budget: u64,
        inventory: &Inventory,
        progress: Option<&Progress>,
    ) -> Result<Allocation, AllocError>;

    /// Stable engine-facing name, recorded in run records.
    fn name(&self) -> &'static str;
}

/// Weighted largest remainder with capacity capping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LargestRemainderAllocator {
    rule: WeightingRule,
    floor: Ppm,
}

impl LargestRemainderAllocator {
    pub fn new(rule: WeightingRule, floor: Ppm) -> Result<Self, AllocError> {
        if floor == Ppm::ZERO {
            return Err(AllocError::InvalidFloor(0));
        }
        Ok(Self { rule, floor })
    }

    pub fn from_params(params: &Params) -> Result<Self, AllocError> {
        let floor = params
            .mastery_floor()
            .map_err(|_| AllocError::InvalidFloor(params.mastery_floor_ppm))?;
        Self::new(params.weighting, floor)
    }

    pub fn rule(&self) -> WeightingRule { self.rule }

    pub fn floor(&self) -> Ppm { self.floor }
}

impl Default for LargestRemainderAllocator {
    fn default() -> Self {
        Self { rule: WeightingRule::default(), floor: Ppm::new(DEFAULT_MASTERY_FLOOR_PPM).unwrap_or(Ppm::ONE) }
    }
}

impl Allocator for LargestRemainderAllocator {
    fn allocate(
        &self,
        budget: u64,
        inventory: &Inventory,
        progress: Option<&Progress>,
    ) -> Result<Allocation, AllocError> {
        if let Some(p) = progress {
            check_progress(p)?;
        }

        let candidates: Vec<Candidate<EntryKey<'_>>> = inventory
            .entries()
            .map(|(key, available)| {
                let lp = progress.and_then(|p| p.get(key.topic, key.level));
                Candidate {
                    weight: entry_weight(self.rule, self.floor, available, lp),
                    capacity: available,
                    key,
                }
            })
            .collect();

        let counts = apportion_capped(budget, &candidates)?;

        let mut out = Allocation::zeroed_like(inventory);
        for (c, n) in candidates.iter().zip(counts) {
            out.set(c.key.topic, c.key.level, n);
        }
        Ok(out)
    }

    fn name(&self) -> &'static str { "largest_remainder" }
}

/// Fail fast on `solved > attempted`, first offender in canonical order.
fn check_progress(progress: &Progress) -> Result<(), AllocError> {
    for (key, lp) in progress.entries() {
        if lp.check().is_err() {
            return Err(AllocError::ProgressInconsistent {
                topic: key.topic.to_string(),
                level: key.level.get(),
            });
        }
    }
    Ok(())
}

// ----------------------------- Tests -------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rec_core::entities::LevelProgress;
    use rec_core::{Level, TopicName};

    fn t(s: &str) -> TopicName { s.parse().unwrap() }

    fn inv(rows: &[(&str, u32, u64)]) -> Inventory {
        let mut i = Inventory::new();
        for &(topic, level, n) in rows {
            i.insert(t(topic), Level(level), n);
        }
        i
    }

    fn progress(rows: &[(&str, u32, u64, u64)]) -> Progress {
        let mut p = Progress::new();
        for &(topic, level, solved, attempted) in rows {
            p.insert(t(topic), Level(level), LevelProgress { solved, attempted });
        }
        p
    }

    fn counts(a: &Allocation) -> Vec<(String, u32, u64)> {
        a.entries().map(|(k, n)| (k.topic.to_string(), k.level.get(), n)).collect()
    }

    #[test]
    fn ten_over_three_levels() {
        let i = inv(&[("Math", 1, 20), ("Math", 2, 15), ("Math", 3, 10)]);
        let a = LargestRemainderAllocator::default().allocate(10, &i, None).unwrap();
        assert_eq!(a.total(), 10);
        assert_eq!(
            counts(&a),
            vec![("Math".into(), 1, 5), ("Math".into(), 2, 3), ("Math".into(), 3, 2)]
        );
    }

    #[test]
    fn zero_budget_gives_zeros_with_full_shape() {
        let i = inv(&[("Math", 1, 20), ("Art", 2, 5)]);
        let a = LargestRemainderAllocator::default().allocate(0, &i, None).unwrap();
        assert_eq!(a.total(), 0);
        assert_eq!(a.entries().count(), 2);
    }

    #[test]
    fn underfunded_inventory_is_handed_out_in_full() {
        let i = inv(&[("Math", 1, 20), ("Math", 2, 12), ("Art", 1, 5)]);
        let a = LargestRemainderAllocator::default().allocate(100, &i, None).unwrap();
        assert_eq!(a.total(), 37);
        for (k, n) in a.entries() {
            assert_eq!(n, i.available(k.topic, k.level));
        }
    }

    #[test]
    fn odd_unit_goes_to_first_topic_by_name() {
        let i = inv(&[("Physics", 1, 10), ("Chemistry", 1, 10)]);
        let a = LargestRemainderAllocator::default().allocate(11, &i, None).unwrap();
        assert_eq!(a.get(&t("Chemistry"), Level(1)), 6);
        assert_eq!(a.get(&t("Physics"), Level(1)), 5);
    }

    #[test]
    fn mastered_level_never_outranks_untouched_one() {
        let i = inv(&[("Math", 1, 10), ("Math", 2, 10)]);
        let p = progress(&[("Math", 1, 10, 10)]);
        for budget in 0..=20 {
            let a = LargestRemainderAllocator::default().allocate(budget, &i, Some(&p)).unwrap();
            assert!(a.get(&t("Math"), Level(1)) <= a.get(&t("Math"), Level(2)), "budget {budget}");
            assert_eq!(a.total(), budget.min(20));
        }
    }

    #[test]
    fn weaker_topic_gets_more() {
        let i = inv(&[("Math", 1, 50), ("Art", 1, 50)]);
        let p = progress(&[("Math", 1, 9, 10), ("Art", 1, 1, 10)]);
        let a = LargestRemainderAllocator::default().allocate(10, &i, Some(&p)).unwrap();
        // weights 0.1 vs 0.9
        assert_eq!(a.get(&t("Math"), Level(1)), 1);
        assert_eq!(a.get(&t("Art"), Level(1)), 9);
    }

    #[test]
    fn progress_for_unknown_entries_is_ignored() {
        let i = inv(&[("Math", 1, 5)]);
        let p = progress(&[("History", 1, 0, 3), ("Math", 4, 1, 1)]);
        let a = LargestRemainderAllocator::default().allocate(3, &i, Some(&p)).unwrap();
        assert_eq!(a.get(&t("Math"), Level(1)), 3);
        assert_eq!(a.get(&t("History"), Level(1)), 0);
    }

    #[test]
    fn inconsistent_progress_is_rejected() {
        let i = inv(&[("Math", 1, 5)]);
        let p = progress(&[("Math", 2, 4, 3)]);
        let err = LargestRemainderAllocator::default().allocate(3, &i, Some(&p)).unwrap_err();
        assert_eq!(err, AllocError::ProgressInconsistent { topic: "Math".into(), level: 2 });
    }

    #[test]
    fn floor_comes_from_params_and_must_be_positive() {
        assert_eq!(
            LargestRemainderAllocator::new(WeightingRule::Mastery, Ppm::ZERO),
            Err(AllocError::InvalidFloor(0))
        );
        let params = Params { mastery_floor_ppm: 2_000_000, ..Params::default() };
        assert_eq!(
            LargestRemainderAllocator::from_params(&params),
            Err(AllocError::InvalidFloor(2_000_000))
        );
        let quarter = Params { mastery_floor_ppm: 250_000, ..Params::default() };
        let lr = LargestRemainderAllocator::from_params(&quarter).unwrap();
        assert_eq!(lr.floor().get(), 250_000);
        assert_eq!(lr.rule(), WeightingRule::Mastery);
    }

    #[test]
    fn empty_and_dry_topics_contribute_nothing() {
        let mut i = inv(&[("Math", 1, 0), ("Math", 2, 0), ("Art", 1, 4)]);
        i.add_topic(t("Music"));
        let a = LargestRemainderAllocator::default().allocate(10, &i, None).unwrap();
        assert_eq!(a.total(), 4);
        assert_eq!(a.topic_total(&t("Math")), 0);
        assert_eq!(a.topics().count(), 3);

        let dry = inv(&[("Math", 1, 0)]);
        let a = LargestRemainderAllocator::default().allocate(10, &dry, None).unwrap();
        assert_eq!(a.total(), 0);
    }

    #[test]
    fn even_rule_splits_by_level_count_within_capacity() {
        let i = inv(&[("Math", 1, 100), ("Math", 2, 1), ("Math", 3, 0)]);
        let lr = LargestRemainderAllocator::new(WeightingRule::Even, Ppm::ONE).unwrap();
        let a = lr.allocate(10, &i, None).unwrap();
        assert_eq!(counts(&a), vec![("Math".into(), 1, 9), ("Math".into(), 2, 1), ("Math".into(), 3, 0)]);
    }

    #[test]
    fn availability_rule_ignores_progress() {
        let i = inv(&[("Math", 1, 30), ("Math", 2, 10)]);
        let p = progress(&[("Math", 1, 30, 30)]);
        let lr = LargestRemainderAllocator::from_params(&Params {
            weighting: WeightingRule::Availability,
            ..Params::default()
        })
        .unwrap();
        let a = lr.allocate(8, &i, Some(&p)).unwrap();
        assert_eq!(a.get(&t("Math"), Level(1)), 6);
        assert_eq!(a.get(&t("Math"), Level(2)), 2);
    }

    #[test]
    fn works_behind_a_trait_object() {
        let engines: Vec<Box<dyn Allocator>> = vec![Box::new(LargestRemainderAllocator::default())];
        let i = inv(&[("Math", 1, 3)]);
        for e in &engines {
            assert_eq!(e.name(), "largest_remainder");
            assert_eq!(e.allocate(2, &i, None).unwrap().total(), 2);
        }
    }
}
