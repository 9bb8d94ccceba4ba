//! ALLOCATE stage: run the configured allocator and re-check its contract.
//!
//! The allocator is trusted to be correct; the post-check makes a broken
//! implementation fail loudly instead of emitting a wrong recommendation.

use tracing::{debug, info};

use rec_algo::Allocator;
use rec_core::entities::Allocation;

use crate::load::NormalizedInput;
use crate::PipelineError;

/// Allocate and verify conservation and capacity.
pub fn allocate_stage(
    allocator: &dyn Allocator,
    input: &NormalizedInput,
) -> Result<Allocation, PipelineError> {
    let available = input.inventory.total_available();
    debug!(
        allocator = allocator.name(),
        budget = input.budget,
        available = %available,
        entries = input.inventory.entry_count(),
        "allocating"
    );

    let allocation = allocator.allocate(input.budget, &input.inventory, input.progress.as_ref())?;

    check_contract(input, &allocation)?;

    let saturated = allocation
        .entries()
        .filter(|(k, n)| *n > 0 && *n == input.inventory.available(k.topic, k.level))
        .count();
    debug!(saturated, "entries filled to capacity");

    info!(
        budget = input.budget,
        available = %available,
        recommended = allocation.total(),
        topics = input.inventory.topic_count(),
        "allocation complete"
    );
    Ok(allocation)
}

fn check_contract(input: &NormalizedInput, a: &Allocation) -> Result<(), PipelineError> {
    for (k, n) in a.entries() {
        let cap = input.inventory.available(k.topic, k.level);
        if n > cap {
            return Err(PipelineError::Invariant(format!(
                "{}/{}: recommended {n} exceeds available {cap}",
                k.topic, k.level
            )));
        }
    }
    if a.entries().count() != input.inventory.entry_count() {
        return Err(PipelineError::Invariant("allocation shape differs from inventory".into()));
    }
    let expected = (input.budget as u128).min(input.inventory.total_available());
    if a.total() as u128 != expected {
        return Err(PipelineError::Invariant(format!(
            "recommended {} but expected {expected}",
            a.total()
        )));
    }
    Ok(())
}
