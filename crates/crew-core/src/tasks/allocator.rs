use crate::error::{GameError, Result};
use crate::tasks::TaskId;
use crate::tasks::catalog::{all_ids, descriptor};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub selected: Vec<TaskId>,
    /// Skipped ids first, then whatever was never reached.
    pub leftover: Vec<TaskId>,
}

/// Picks tasks from the front of `pool` whose weights at `index` add up to
/// exactly `target`.
///
/// Ids that would overshoot (or have no weight at this table size) are set
/// aside and lead the returned leftover, so the next allocation tries them
/// first. When the pool runs dry the rest of the catalog, minus `reserved`,
/// is shuffled onto the end once; running dry a second time is an error.
pub fn allocate<R: Rng + ?Sized>(
    pool: &[TaskId],
    target: u32,
    index: usize,
    reserved: &[TaskId],
    rng: &mut R,
) -> Result<Allocation> {
    let mut queue: VecDeque<TaskId> = pool.iter().copied().collect();
    let mut selected = Vec::new();
    let mut skipped = Vec::new();
    let mut total = 0u32;
    let mut reshuffled = false;

    while total < target {
        let Some(id) = queue.pop_front() else {
            if reshuffled {
                return Err(GameError::allocation(format!(
                    "difficulty {target} is out of reach, reached {total} after reshuffling"
                )));
            }
            reshuffled = true;
            let excluded: HashSet<TaskId> = pool.iter().chain(reserved).copied().collect();
            let mut fresh: Vec<TaskId> = all_ids().filter(|id| !excluded.contains(id)).collect();
            fresh.shuffle(rng);
            debug!(fresh = fresh.len(), "task pool exhausted, reshuffling catalog");
            queue.extend(fresh);
            continue;
        };

        match descriptor(id).and_then(|d| d.difficulty_at(index)) {
            Some(weight) if total + u32::from(weight) <= target => {
                total += u32::from(weight);
                selected.push(id);
            }
            _ => skipped.push(id),
        }
    }

    skipped.extend(queue);
    Ok(Allocation {
        selected,
        leftover: skipped,
    })
}
