//! Consistency checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine: every
//! command leaves per-cell ownership, per-player territory counters and
//! per-cell defence values mutually consistent. If one fires, it
//! indicates a bug in a command path, not a gameplay state.

use std::collections::HashMap;

use crate::game::{HexGrid, PlayerId, PlayerState};

/// Invariant violation found by [`check_invariants`].
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all engine invariants.
///
/// Returns the violations found, or an empty list if all hold.
#[must_use]
pub fn check_invariants(
    grid: &HexGrid,
    players: &HashMap<PlayerId, PlayerState>,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut owned_cells = 0i64;

    for (coord, cell) in grid.iter() {
        if cell.cell_type().is_water() {
            if cell.owner().is_some() {
                violations.push(InvariantViolation {
                    message: format!("water cell {coord:?} has an owner"),
                });
            }
            if cell.occupant().is_some() {
                violations.push(InvariantViolation {
                    message: format!("water cell {coord:?} holds an object"),
                });
            }
            continue;
        }

        if let Some(owner) = cell.owner() {
            owned_cells += 1;
            if !players.contains_key(&owner) {
                violations.push(InvariantViolation {
                    message: format!("cell {coord:?} owned by inactive player {owner}"),
                });
            }
        }

        if let Some(occupant) = cell.occupant() {
            let Some(owner) = cell.owner() else {
                violations.push(InvariantViolation {
                    message: format!("occupied cell {coord:?} has no owner"),
                });
                continue;
            };
            let resolved = players
                .get(&owner)
                .and_then(|player| player.object(occupant));
            match resolved {
                None => violations.push(InvariantViolation {
                    message: format!(
                        "cell {coord:?} references object {occupant} missing from player {owner}"
                    ),
                }),
                Some(object) if object.placement != Some(coord) => {
                    violations.push(InvariantViolation {
                        message: format!(
                            "object {occupant} thinks it stands at {:?}, cell {coord:?} disagrees",
                            object.placement
                        ),
                    });
                }
                Some(_) => {}
            }
        }
    }

    // Territory conservation: counters must equal owned non-water cells.
    let counted: i64 = players
        .values()
        .map(|player| i64::from(player.territory()))
        .sum();
    if counted != owned_cells {
        violations.push(InvariantViolation {
            message: format!(
                "territory counters sum to {counted}, but {owned_cells} non-water cells are owned"
            ),
        });
    }

    for player in players.values() {
        if player.is_done() && player.territory() > 0 {
            violations.push(InvariantViolation {
                message: format!(
                    "player {} is done but still counts {} territory",
                    player.id,
                    player.territory()
                ),
            });
        }

        // Every placed object must be mirrored by its cell.
        for object in player.objects() {
            let Some(at) = object.placement else {
                continue;
            };
            let occupant = grid.get(at).and_then(|cell| cell.occupant());
            if occupant != Some(object.id) {
                violations.push(InvariantViolation {
                    message: format!(
                        "object {} of player {} claims cell {at:?}, which holds {occupant:?}",
                        object.id, player.id
                    ),
                });
            }
        }
    }

    violations
}

/// Assert all engine invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with a detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(grid: &HexGrid, players: &HashMap<PlayerId, PlayerState>) {
    let violations = check_invariants(grid, players);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Engine invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_grid: &HexGrid, _players: &HashMap<PlayerId, PlayerState>) {}
