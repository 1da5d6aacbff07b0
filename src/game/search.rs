//! Reachable-cell search for unit movement.
//!
//! Breadth-first expansion bounded by the unit's movement range, with
//! asymmetric traversal rules: water is never enterable, fortified
//! enemy cells (defence >= power) block entry outright, and weaker
//! enemy cells can be entered but grant no further reach.

use std::collections::{HashMap, VecDeque};

use crate::game::{Coord, HexGrid, MarkerGrid, PlayerId, PlayerState, UNMARKED};

/// Compute the set of cells the unit standing at `start` may move into.
///
/// Returns a board-shaped overlay where each cell holds the remaining
/// movement budget with which it can be reached, or [`UNMARKED`] if it
/// cannot. The start cell itself is always `UNMARKED`: a unit cannot
/// move onto its own cell.
///
/// Returns `None` (invalid, distinct from an empty overlay) when the
/// start coordinate is out of bounds or does not hold a unit.
#[must_use]
pub fn reachable_cells(
    grid: &HexGrid,
    players: &HashMap<PlayerId, PlayerState>,
    start: Coord,
) -> Option<MarkerGrid> {
    let start_cell = grid.get(start)?;
    let occupant = start_cell.occupant()?;
    let unit = *players.values().find_map(|player| player.object(occupant))?;
    if !unit.kind.is_unit() {
        return None;
    }

    let power = unit.power();
    let budget = i16::try_from(unit.range()).unwrap_or(i16::MAX);

    // Ownership comparisons are against the start cell rather than the
    // unit, so a unit standing on unclaimed ground still expands
    // through unclaimed ground.
    let start_owner = start_cell.owner();

    let mut mirror = MarkerGrid::new(grid.width(), grid.height());
    let mut frontier: VecDeque<(Coord, i16)> = VecDeque::new();
    frontier.push_back((start, budget));

    while let Some((coord, remaining)) = frontier.pop_front() {
        let Some(cell) = grid.get(coord) else {
            continue;
        };
        if cell.cell_type().is_water() {
            continue;
        }

        let mut stop = mirror.get(coord).is_some_and(|seen| seen > 0);
        if cell.owner() != start_owner {
            if cell.defence() >= power {
                continue;
            }
            // Capturable, but a captured cell grants no further reach.
            stop = true;
        }

        let best = mirror.get(coord).unwrap_or(UNMARKED).max(remaining);
        mirror.set(coord, best);

        if remaining <= 0 || stop {
            continue;
        }

        let (neighbours, count) = grid.adjacent(coord);
        for next in &neighbours[..count as usize] {
            frontier.push_back((*next, remaining - 1));
        }
    }

    mirror.set(start, UNMARKED);
    Some(mirror)
}
