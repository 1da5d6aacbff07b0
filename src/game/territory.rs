//! Territory ledger: defence coverage, ownership transfer, capital area.
//!
//! Keeps per-cell ownership, per-player territory counters, and
//! per-cell defence values mutually consistent after every action.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::game::{Coord, HexGrid, MarkerGrid, OwnerTransition, PlayerId, PlayerState};

/// Recompute defence coverage for the whole board.
///
/// Resets every cell to zero, then for every object owned by every
/// active player raises the defence of the object's own cell and of
/// every same-owner neighbouring cell to the maximum of its current
/// value and the object's defence stat.
///
/// A full recompute from zero is required: objects can be destroyed or
/// moved, and stale partial values would otherwise persist.
pub fn recount_defence_coverage(grid: &mut HexGrid, players: &HashMap<PlayerId, PlayerState>) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if let Some(cell) = grid.get_mut(Coord::new(x, y)) {
                cell.set_defence(0);
            }
        }
    }

    for player in players.values() {
        for object in player.objects() {
            let Some(coord) = object.placement else {
                continue;
            };
            let stat = object.kind.defence();
            let owner = object.owner;

            let (neighbours, count) = grid.adjacent(coord);
            for next in &neighbours[..count as usize] {
                if let Some(cell) = grid.get_mut(*next) {
                    if cell.owner() == Some(owner) {
                        cell.set_defence(cell.defence().max(stat));
                    }
                }
            }
            if let Some(cell) = grid.get_mut(coord) {
                cell.set_defence(cell.defence().max(stat));
            }
        }
    }
}

/// Apply a single-cell ownership transfer to the player ledger.
///
/// No-op when the owner did not actually change. Decrements the
/// previous owner (which may flip their done flag) and credits the new
/// owner.
///
/// # Errors
///
/// Returns [`EngineError::UnknownPlayer`] if either side of the
/// transition is missing from the active-player mapping: ownership must
/// never be guessed.
pub fn claim_territory_delta(
    players: &mut HashMap<PlayerId, PlayerState>,
    transition: OwnerTransition,
) -> EngineResult<()> {
    if transition.previous == Some(transition.next) {
        return Ok(());
    }

    if let Some(previous) = transition.previous {
        let loser = players
            .get(&previous)
            .ok_or(EngineError::UnknownPlayer(previous))?;
        players.insert(previous, loser.remove_territory(1));
    }

    let winner = players
        .get(&transition.next)
        .ok_or(EngineError::UnknownPlayer(transition.next))?;
    players.insert(transition.next, winner.add_territory(1));
    Ok(())
}

/// Claim the unclaimed, non-water cells around a freshly placed capital.
///
/// Returns the number of cells claimed so the caller can credit that
/// many territory points in one batch; this is a bulk initial grant,
/// not a capture, and bypasses the single-cell delta path.
pub fn expand_capital_area(grid: &mut HexGrid, capital_at: Coord, owner: PlayerId) -> u32 {
    let mut claimed = 0;
    let (neighbours, count) = grid.adjacent(capital_at);
    for next in &neighbours[..count as usize] {
        if let Some(cell) = grid.get_mut(*next) {
            if !cell.cell_type().is_water() && cell.owner().is_none() {
                cell.set_owner(Some(owner));
                claimed += 1;
            }
        }
    }
    claimed
}

/// Build an owned/unowned overlay for one player.
///
/// Owned cells are marked `0`; everything else stays unmarked.
#[must_use]
pub fn territory_mask(grid: &HexGrid, player: PlayerId) -> MarkerGrid {
    let mut mask = MarkerGrid::new(grid.width(), grid.height());
    for (coord, cell) in grid.iter() {
        if cell.owner() == Some(player) {
            mask.set(coord, 0);
        }
    }
    mask
}
