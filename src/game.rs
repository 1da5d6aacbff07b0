//! Rules engine for hex-based territorial conquest.
//!
//! Implements the simulation core:
//! - Hex board with terrain, ownership, defence and occupancy
//! - Buildings and units as tagged variants with stat blocks
//! - Immutable player resource ledger with pure transitions
//! - Reachable-cell search for unit movement
//! - Territory ledger keeping ownership, counters and coverage consistent
//! - Turn engine driving phases, elimination and round advancement

mod engine;
mod grid;
mod invariants;
mod object;
mod player;
mod search;
mod territory;

pub use engine::{TurnEngine, TurnState};
pub use grid::{Cell, CellType, Coord, HexGrid, MarkerGrid, OwnerTransition, UNMARKED};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use object::{GameObject, ObjectId, ObjectKind, FARM_COST_SURCHARGE};
pub use player::{PlayerId, PlayerState, ThemeId};
pub use search::reachable_cells;
pub use territory::{
    claim_territory_delta, expand_capital_area, recount_defence_coverage, territory_mask,
};
