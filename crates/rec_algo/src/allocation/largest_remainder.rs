//! Largest Remainder (Hamilton) apportionment with per-candidate capacity.
//!
//! Contract:
//! - Each candidate carries an integer `weight` and a `capacity` (hard cap).
//!   Candidates with weight 0 or capacity 0 never receive anything.
//! - If the open capacity does not exceed `budget`, every open candidate is
//!   filled to capacity (nothing is invented).
//! - Otherwise the budget is split exactly:
//!     * share_i = budget × w_i / W          (W = Σ open weights)
//!     * floor_i = ⌊budget × w_i / W⌋, rem_i = budget × w_i mod W
//!     * leftovers go one each by remainder ↓, then canonical key ↑
//!     * candidates above capacity are clamped, leave the open set, and the
//!       freed units are re-apportioned over the rest; repeat until no clamp.
//!       Freed units follow the weights of the still-open candidates; they are
//!       not carried forward to the next-largest remainder.
//! - The result sums to exactly `min(budget, Σ capacity of open candidates)`.
//!
//! Determinism:
//! - Integer-only (u128). Remainders share the denominator W, so comparing
//!   them is exact. No RNG; ties resolve by the candidate key.

use core::cmp::Ordering;

use rec_core::determinism::StableOrd;

/// One apportionment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate<K> {
    pub key: K,
    pub weight: u128,
    pub capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApportionError {
    /// `budget × weight` left the u128 range.
    Overflow,
}

/// Apportion `budget` over `candidates`; returns one count per candidate, in input order.
pub fn apportion_capped<K: StableOrd>(
    budget: u64,
    candidates: &[Candidate<K>],
) -> Result<Vec<u64>, ApportionError> {
    let mut out = vec![0u64; candidates.len()];

    let mut open: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.weight > 0 && c.capacity > 0)
        .map(|(i, _)| i)
        .collect();

    if budget == 0 || open.is_empty() {
        return Ok(out);
    }

    // Underfunded inventory: hand out everything there is.
    let open_capacity: u128 = open.iter().map(|&i| candidates[i].capacity as u128).sum();
    if open_capacity <= budget as u128 {
        for &i in &open {
            out[i] = candidates[i].capacity;
        }
        return Ok(out);
    }

    // From here on `remaining < Σ open capacity` holds at the top of every round,
    // so the open set cannot run dry while units remain.
    let mut remaining = budget;
    loop {
        let tentative = hamilton_round(remaining, candidates, &open)?;

        let clamped: Vec<usize> = open
            .iter()
            .zip(&tentative)
            .filter(|&(&i, &s)| s > candidates[i].capacity)
            .map(|(&i, _)| i)
            .collect();

        if clamped.is_empty() {
            for (&i, s) in open.iter().zip(tentative) {
                out[i] = s;
            }
            break;
        }

        for &i in &clamped {
            out[i] = candidates[i].capacity;
            remaining -= candidates[i].capacity;
        }
        open.retain(|i| !clamped.contains(i));
    }

    debug_assert_eq!(out.iter().map(|&s| s as u128).sum::<u128>(), budget as u128);
    Ok(out)
}

/// One uncapped Hamilton round over `open`; returns counts aligned with `open`.
fn hamilton_round<K: StableOrd>(
    seats: u64,
    candidates: &[Candidate<K>],
    open: &[usize],
) -> Result<Vec<u64>, ApportionError> {
    let total_w: u128 = open
        .iter()
        .try_fold(0u128, |acc, &i| acc.checked_add(candidates[i].weight))
        .ok_or(ApportionError::Overflow)?;
    debug_assert!(total_w > 0);

    let mut floors: Vec<u64> = Vec::with_capacity(open.len());
    let mut rems: Vec<u128> = Vec::with_capacity(open.len());
    for &i in open {
        let prod = (seats as u128)
            .checked_mul(candidates[i].weight)
            .ok_or(ApportionError::Overflow)?;
        // prod / total_w <= seats, so the floor fits in u64.
        floors.push((prod / total_w) as u64);
        rems.push(prod % total_w);
    }

    let given: u64 = floors.iter().sum();
    let leftover = (seats - given) as usize;
    if leftover > 0 {
        distribute_leftovers(leftover, &mut floors, &rems, candidates, open);
    }
    Ok(floors)
}

/// Assign `leftover` single units by largest remainder (deterministic ranking):
/// remainder ↓, then candidate key ↑.
fn distribute_leftovers<K: StableOrd>(
    leftover: usize,
    floors: &mut [u64],
    rems: &[u128],
    candidates: &[Candidate<K>],
    open: &[usize],
) {
    let mut ranking: Vec<usize> = (0..open.len()).collect();
    ranking.sort_by(|&a, &b| rank_cmp(rems[a], &candidates[open[a]].key, rems[b], &candidates[open[b]].key));

    // Σ rem = leftover × W with every rem < W, so leftover < open.len().
    debug_assert!(leftover <= ranking.len());
    for &slot in ranking.iter().take(leftover) {
        floors[slot] += 1;
    }
}

#[inline]
fn rank_cmp<K: StableOrd>(rem_a: u128, key_a: &K, rem_b: u128, key_b: &K) -> Ordering {
    rem_b.cmp(&rem_a).then_with(|| key_a.stable_cmp(key_b))
}
