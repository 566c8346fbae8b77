use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;
use thiserror::Error;

use super::grid::{Grid, Position};

/// No free cell was left to place an entity on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell left on the grid")]
pub struct SpawnExhausted;

/// Pick a uniformly random cell that is not in `occupied`
///
/// Samples over the free-cell set directly, so a crowded board degrades into
/// an explicit [`SpawnExhausted`] instead of a spin.
pub fn random_empty_position<R: Rng>(
    rng: &mut R,
    grid: Grid,
    occupied: &HashSet<Position>,
) -> Result<Position, SpawnExhausted> {
    grid.cells()
        .filter(|cell| !occupied.contains(cell))
        .choose(rng)
        .ok_or(SpawnExhausted)
}
