//! Turn engine: turn order, phases, and player commands.
//!
//! The engine owns the board and the authoritative player mapping, and
//! orchestrates every command: placement, movement, capital creation,
//! elimination and round advancement. Player snapshots are replaced
//! wholesale on each mutation; the turn order sequence is fixed at game
//! start and never reordered - elimination changes who is skipped, not
//! the sequence itself.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::game::{
    claim_territory_delta, expand_capital_area, reachable_cells, recount_defence_coverage,
    territory_mask, Coord, GameObject, HexGrid, MarkerGrid, ObjectId, ObjectKind, PlayerId,
    PlayerState,
};
use crate::record::{GameId, TurnRecord, TurnRecorder};

/// Phase reported after advancing the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// The current player must place a capital before play continues.
    ///
    /// Reported throughout round 0, and again mid-game for any player
    /// whose capital has been destroyed.
    CapitalPlacement,
    /// Ongoing play.
    Normal,
    /// One or zero players remain; no further turns are dispatched.
    Finished,
}

/// The turn-processing engine.
pub struct TurnEngine<R: TurnRecorder> {
    game_id: GameId,
    round: u32,
    seat: usize,
    grid: HexGrid,
    recorder: R,
    players: HashMap<PlayerId, PlayerState>,
    turn_order: Vec<PlayerId>,
    object_to_place: Option<GameObject>,
    unit_to_move: Option<ObjectId>,
    next_object_id: ObjectId,
    finished: bool,
}

impl<R: TurnRecorder> fmt::Debug for TurnEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnEngine")
            .field("game_id", &self.game_id)
            .field("round", &self.round)
            .field("seat", &self.seat)
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}

impl<R: TurnRecorder> TurnEngine<R> {
    /// Create an engine at round 0, seat 0.
    ///
    /// The turn order is the order of `players` and is never reordered.
    #[must_use]
    pub fn new(game_id: GameId, grid: HexGrid, players: Vec<PlayerState>, recorder: R) -> Self {
        let turn_order: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        let players = players.into_iter().map(|p| (p.id, p)).collect();
        Self {
            game_id,
            round: 0,
            seat: 0,
            grid,
            recorder,
            players,
            turn_order,
            object_to_place: None,
            unit_to_move: None,
            next_object_id: 1,
            finished: false,
        }
    }

    /// Game identifier used in persistence records.
    #[must_use]
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Current round number; round 0 is the capital-placement phase.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// The board.
    #[must_use]
    pub const fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// The active-player mapping. Eliminated players are removed, not
    /// merely flagged, at the first round wrap after elimination.
    #[must_use]
    pub const fn players(&self) -> &HashMap<PlayerId, PlayerState> {
        &self.players
    }

    /// The fixed turn-order sequence.
    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    /// The recorder collaborator, for inspection.
    #[must_use]
    pub const fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Whether the current seat is the first in the order.
    #[must_use]
    pub const fn is_first_seat(&self) -> bool {
        self.seat == 0
    }

    /// Whether the current seat is the last in the order.
    #[must_use]
    pub fn is_last_seat(&self) -> bool {
        self.seat + 1 == self.turn_order.len()
    }

    /// The player whose turn it is, if still active.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerState> {
        self.players.get(self.turn_order.get(self.seat)?)
    }

    /// Mint a fresh, unplaced object for a player.
    pub fn new_object(&mut self, owner: PlayerId, kind: ObjectKind) -> GameObject {
        let id = self.next_object_id;
        self.next_object_id += 1;
        GameObject::new(id, owner, kind)
    }

    /// Stage an object for placement by the input layer.
    pub fn select_object_to_place(&mut self, object: GameObject) {
        self.object_to_place = Some(object);
    }

    /// The staged placement, if any.
    #[must_use]
    pub const fn object_to_place(&self) -> Option<&GameObject> {
        self.object_to_place.as_ref()
    }

    /// Consume the staged placement; the caller clears the slot.
    pub fn take_object_to_place(&mut self) -> Option<GameObject> {
        self.object_to_place.take()
    }

    /// Stage a unit for movement by the input layer.
    pub fn select_unit_to_move(&mut self, unit: ObjectId) {
        self.unit_to_move = Some(unit);
    }

    /// The staged unit, if any.
    #[must_use]
    pub const fn unit_to_move(&self) -> Option<ObjectId> {
        self.unit_to_move
    }

    /// Consume the staged unit; the caller clears the slot.
    pub fn take_unit_to_move(&mut self) -> Option<ObjectId> {
        self.unit_to_move.take()
    }

    /// Advance to the next player's turn.
    ///
    /// Seat advancement skips eliminated (removed) ids; wrapping past
    /// the last seat purges done players and advances the round. A
    /// still-present done player occupies a slot that is visibly
    /// skipped: their turn record is emitted, then play moves on.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Record`] if the persistence collaborator
    /// fails; the turn must not claim completion without its record.
    pub fn advance_turn(&mut self) -> EngineResult<TurnState> {
        if self.finished {
            return Ok(TurnState::Finished);
        }
        loop {
            self.next_seat();

            if self.players.len() < 2 {
                self.recorder.record_game_finished(self.game_id)?;
                self.finished = true;
                return Ok(TurnState::Finished);
            }

            // Capital-placement turns precede economic simulation.
            if self.round == 0 {
                return Ok(TurnState::CapitalPlacement);
            }

            let id = self.turn_order[self.seat];
            let Some(player) = self.players.get(&id) else {
                continue;
            };
            if player.is_done() {
                self.emit_turn_record(id)?;
                continue;
            }

            let (player, solvent) = player.resolve_income();
            self.players.insert(id, player);
            if !solvent {
                self.wipe_player_army(id);
            }
            if let Some(player) = self.players.get(&id) {
                let refreshed = player.refresh_units();
                self.players.insert(id, refreshed);
            }

            self.emit_turn_record(id)?;

            // Capital destroyed (or never placed): request a new one.
            if self.players.get(&id).is_some_and(|p| p.capital().is_none()) {
                let capital = self.new_object(id, ObjectKind::Capital);
                self.object_to_place = Some(capital);
                return Ok(TurnState::CapitalPlacement);
            }
            return Ok(TurnState::Normal);
        }
    }

    /// Place an object on a cell, evicting and destroying any occupant.
    ///
    /// Out-of-bounds or water targets are no-ops. The placing player's
    /// roster gains the object (full cost deducted), the territory delta
    /// is applied and defence coverage is fully recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPlayer`] if the object's owner or
    /// either side of the ownership transfer is not an active player.
    pub fn place_object(&mut self, object: GameObject, at: Coord) -> EngineResult<()> {
        let Some(cell) = self.grid.get(at) else {
            return Ok(());
        };
        if cell.cell_type().is_water() {
            return Ok(());
        }

        // Validate the owner before touching any state: an unknown
        // owner aborts the command outright.
        let owner = object.owner;
        if !self.players.contains_key(&owner) {
            return Err(EngineError::UnknownPlayer(owner));
        }

        if cell.occupant().is_some() {
            self.kill_occupant(at);
        }

        let id = object.id;
        let player = self
            .players
            .get(&owner)
            .ok_or(EngineError::UnknownPlayer(owner))?;
        let player = player.add_object(object).with_placement(id, at);
        self.players.insert(owner, player);

        if let Some(transition) = self.grid.place_object(id, owner, at) {
            claim_territory_delta(&mut self.players, transition)?;
        }
        recount_defence_coverage(&mut self.grid, &self.players);
        Ok(())
    }

    /// Place a player's capital and claim its surrounding area.
    ///
    /// Used during round 0 and whenever a player must re-place a
    /// destroyed capital. Neighbouring unclaimed, non-water cells are
    /// claimed in one batch and credited as a bulk territory grant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPlayer`] if `player_id` is not an
    /// active player.
    pub fn place_capital(&mut self, player_id: PlayerId, at: Coord) -> EngineResult<()> {
        let Some(cell) = self.grid.get(at) else {
            return Ok(());
        };
        if cell.cell_type().is_water() {
            return Ok(());
        }

        if !self.players.contains_key(&player_id) {
            return Err(EngineError::UnknownPlayer(player_id));
        }

        if cell.occupant().is_some() {
            self.kill_occupant(at);
        }

        let capital = self.new_object(player_id, ObjectKind::Capital);
        let player = self
            .players
            .get(&player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        let player = player.add_object(capital).with_placement(capital.id, at);
        self.players.insert(player_id, player);

        if let Some(transition) = self.grid.place_object(capital.id, player_id, at) {
            claim_territory_delta(&mut self.players, transition)?;
        }

        let claimed = expand_capital_area(&mut self.grid, at, player_id);
        if claimed > 0 {
            let player = self
                .players
                .get(&player_id)
                .ok_or(EngineError::UnknownPlayer(player_id))?;
            let credited = player.add_territory(i32::try_from(claimed).unwrap_or(i32::MAX));
            self.players.insert(player_id, credited);
        }

        recount_defence_coverage(&mut self.grid, &self.players);
        Ok(())
    }

    /// Move a unit to a cell.
    ///
    /// No-op when the target is absent or movement is illegal: a
    /// friendly destination must be empty, an enemy or neutral one must
    /// have defence strictly below the unit's power, and water is never
    /// enterable. A defeated occupant is destroyed, the unit is unlinked
    /// from its old cell, the territory delta applied, coverage
    /// recomputed and the unit's moved flag set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPlayer`] if the ownership transfer
    /// references a player missing from the active mapping.
    pub fn move_unit(&mut self, unit_id: ObjectId, at: Coord) -> EngineResult<()> {
        let Some((owner, unit)) = self.find_object(unit_id) else {
            return Ok(());
        };
        if !unit.kind.is_unit() || !self.can_move(&unit, at) {
            return Ok(());
        }

        if self.grid.get(at).is_some_and(|c| c.occupant().is_some()) {
            self.kill_occupant(at);
        }
        if let Some(old) = unit.placement {
            self.grid.remove_occupant(old);
        }

        if let Some(transition) = self.grid.place_object(unit_id, owner, at) {
            let player = self
                .players
                .get(&owner)
                .ok_or(EngineError::UnknownPlayer(owner))?;
            let player = player.with_placement(unit_id, at).mark_unit_moved(unit_id);
            self.players.insert(owner, player);
            claim_territory_delta(&mut self.players, transition)?;
        }
        recount_defence_coverage(&mut self.grid, &self.players);
        Ok(())
    }

    /// Remove every unit a player owns from the board and roster.
    ///
    /// Insolvency liquidation; defence coverage is fully recomputed.
    pub fn wipe_player_army(&mut self, player_id: PlayerId) {
        let Some(player) = self.players.get(&player_id) else {
            return;
        };
        let placements: Vec<Coord> = player.units().iter().filter_map(|u| u.placement).collect();
        let disbanded = player.disband_units();
        self.players.insert(player_id, disbanded);
        for at in placements {
            self.grid.remove_occupant(at);
        }
        recount_defence_coverage(&mut self.grid, &self.players);
    }

    /// Reachability overlay for the unit standing at `start`.
    ///
    /// `None` when the start cell is out of bounds or holds no unit.
    #[must_use]
    pub fn reachable_cells(&self, start: Coord) -> Option<MarkerGrid> {
        reachable_cells(&self.grid, &self.players, start)
    }

    /// Owned/unowned overlay for one player.
    #[must_use]
    pub fn player_territory_mask(&self, player: PlayerId) -> MarkerGrid {
        territory_mask(&self.grid, player)
    }

    /// Movement legality for a unit onto a target cell.
    fn can_move(&self, unit: &GameObject, at: Coord) -> bool {
        let Some(cell) = self.grid.get(at) else {
            return false;
        };
        if cell.cell_type().is_water() {
            return false;
        }
        if cell.owner() == Some(unit.owner) {
            return cell.occupant().is_none();
        }
        unit.power() > cell.defence()
    }

    /// Destroy the occupant of a cell: remove it from its owner's
    /// roster (if the owner is still active) and unlink it from the
    /// grid. Ownership of the cell is untouched.
    fn kill_occupant(&mut self, at: Coord) {
        let Some(cell) = self.grid.get(at) else {
            return;
        };
        let Some(occupant) = cell.occupant() else {
            return;
        };
        if let Some(owner) = cell.owner() {
            if let Some(player) = self.players.get(&owner) {
                let updated = player.remove_object(occupant);
                self.players.insert(owner, updated);
            }
        }
        self.grid.remove_occupant(at);
    }

    /// Find an object and its owning player across all rosters.
    fn find_object(&self, id: ObjectId) -> Option<(PlayerId, GameObject)> {
        self.players
            .values()
            .find_map(|player| player.object(id).map(|object| (player.id, *object)))
    }

    fn emit_turn_record(&mut self, id: PlayerId) -> EngineResult<()> {
        let player = self
            .players
            .get(&id)
            .ok_or(EngineError::UnknownPlayer(id))?;
        let record = TurnRecord {
            game_id: self.game_id,
            player: id,
            round: self.round,
            gold: player.gold(),
            territory: player.territory(),
        };
        self.recorder.record_turn(&record)?;
        Ok(())
    }

    /// Advance the seat index, skipping removed ids; wrapping past the
    /// last seat purges done players and advances the round, and the
    /// skip rules are re-evaluated on the wrapped pass too.
    fn next_seat(&mut self) {
        loop {
            if self.seat + 1 >= self.turn_order.len() {
                self.next_round();
                self.seat = 0;
            } else {
                self.seat += 1;
            }
            if self.players.is_empty() {
                return;
            }
            if self.players.contains_key(&self.turn_order[self.seat]) {
                return;
            }
        }
    }

    fn next_round(&mut self) {
        self.players.retain(|_, player| !player.is_done());
        self.round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CellType;
    use crate::record::MemoryRecorder;

    fn land_grid(width: u16, height: u16) -> HexGrid {
        let mut grid = HexGrid::new(width, height).expect("non-zero dimensions");
        for y in 0..height {
            for x in 0..width {
                grid.get_mut(Coord::new(x, y))
                    .expect("in bounds")
                    .set_cell_type(CellType::Plains);
            }
        }
        grid
    }

    fn two_player_engine() -> TurnEngine<MemoryRecorder> {
        let grid = land_grid(10, 10);
        let players = vec![
            PlayerState::new(1, "Anna", 0).with_gold(50),
            PlayerState::new(2, "Bjorn", 1).with_gold(50),
        ];
        TurnEngine::new(7, grid, players, MemoryRecorder::new())
    }

    /// Both capitals placed, engine advanced into round 1.
    fn started_engine() -> TurnEngine<MemoryRecorder> {
        let mut engine = two_player_engine();
        engine.place_capital(1, Coord::new(2, 2)).expect("place");
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::CapitalPlacement);
        engine.place_capital(2, Coord::new(7, 7)).expect("place");
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);
        engine
    }

    #[test]
    fn test_capital_phase_then_normal() {
        let engine = started_engine();
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.current_player().expect("active").id, 1);
    }

    #[test]
    fn test_capital_placement_claims_area() {
        let mut engine = two_player_engine();
        engine.place_capital(1, Coord::new(2, 2)).expect("place");

        let player = engine.players().get(&1).expect("present");
        // Own cell plus six unclaimed neighbours.
        assert_eq!(player.territory(), 7);
        assert!(player.capital().is_some());
        assert_eq!(
            engine.grid().get(Coord::new(2, 2)).expect("in bounds").owner(),
            Some(1)
        );
        // Capital defence covers its own cell.
        assert!(engine.grid().get(Coord::new(2, 2)).expect("in bounds").defence() > 0);
    }

    #[test]
    fn test_income_resolved_each_round() {
        let mut engine = started_engine();
        let before = engine.players().get(&1).expect("present").gold();

        // Player 1's first normal turn has already run in started_engine.
        // Player 2's turn, then wrap back to player 1.
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);

        let after = engine.players().get(&1).expect("present").gold();
        // Capital income + 7 territory.
        assert_eq!(after, before + ObjectKind::Capital.income() + 7);
    }

    #[test]
    fn test_turn_records_emitted() {
        let engine = started_engine();
        let records = &engine.recorder().turns;
        // One record for player 1's first normal turn.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player, 1);
        assert_eq!(records[0].round, 1);
        assert_eq!(records[0].game_id, 7);
    }

    #[test]
    fn test_place_object_deducts_cost_and_covers() {
        let mut engine = started_engine();
        let tower = engine.new_object(1, ObjectKind::Tower);
        let gold = engine.players().get(&1).expect("present").gold();

        engine.place_object(tower, Coord::new(2, 3)).expect("place");

        let player = engine.players().get(&1).expect("present");
        assert_eq!(player.gold(), gold - ObjectKind::Tower.cost());
        assert_eq!(player.buildings().len(), 1);
        assert_eq!(
            engine.grid().get(Coord::new(2, 3)).expect("in bounds").defence(),
            ObjectKind::Tower.defence()
        );
    }

    #[test]
    fn test_place_object_out_of_bounds_is_noop() {
        let mut engine = started_engine();
        let tower = engine.new_object(1, ObjectKind::Tower);
        engine.place_object(tower, Coord::new(50, 50)).expect("no-op");
        assert!(engine.players().get(&1).expect("present").buildings().is_empty());
    }

    #[test]
    fn test_place_object_unknown_owner_is_fatal() {
        let mut engine = started_engine();
        let farm = engine.new_object(1, ObjectKind::Farm);
        let farm_id = farm.id;
        engine.place_object(farm, Coord::new(2, 3)).expect("place");

        let stray = GameObject::new(99, 9, ObjectKind::Tower);
        let err = engine
            .place_object(stray, Coord::new(2, 3))
            .expect_err("unknown owner");
        assert_eq!(err, EngineError::UnknownPlayer(9));

        // The aborted command changed nothing: the farm still stands.
        assert_eq!(
            engine.grid().get(Coord::new(2, 3)).expect("in bounds").occupant(),
            Some(farm_id)
        );
    }

    #[test]
    fn test_place_object_evicts_occupant() {
        let mut engine = started_engine();
        let farm = engine.new_object(1, ObjectKind::Farm);
        engine.place_object(farm, Coord::new(2, 3)).expect("place");
        assert_eq!(engine.players().get(&1).expect("present").farm_count(), 1);

        let tower = engine.new_object(1, ObjectKind::Tower);
        engine.place_object(tower, Coord::new(2, 3)).expect("place");

        let player = engine.players().get(&1).expect("present");
        assert_eq!(player.farm_count(), 0);
        assert_eq!(player.buildings().len(), 1);
    }

    #[test]
    fn test_move_unit_captures_enemy_cell() {
        let mut engine = started_engine();
        let militia = engine.new_object(1, ObjectKind::Militia);
        let militia_id = militia.id;
        engine.place_object(militia, Coord::new(2, 3)).expect("place");

        // March towards an unfortified cell of player 2's capital area.
        let target = Coord::new(7, 6);
        assert_eq!(engine.grid().get(target).expect("in bounds").owner(), Some(2));
        let defence = engine.grid().get(target).expect("in bounds").defence();
        assert!(ObjectKind::Militia.power().expect("unit") > defence);

        let p1_before = engine.players().get(&1).expect("present").territory();
        let p2_before = engine.players().get(&2).expect("present").territory();

        engine.move_unit(militia_id, target).expect("move");

        let p1 = engine.players().get(&1).expect("present");
        let p2 = engine.players().get(&2).expect("present");
        assert_eq!(p1.territory(), p1_before + 1);
        assert_eq!(p2.territory(), p2_before - 1);
        assert_eq!(engine.grid().get(target).expect("in bounds").owner(), Some(1));
        assert!(p1.object(militia_id).expect("alive").moved);
        // The unit left its old cell.
        assert_eq!(
            engine.grid().get(Coord::new(2, 3)).expect("in bounds").occupant(),
            None
        );
    }

    #[test]
    fn test_move_unit_blocked_by_fortified_cell() {
        let mut engine = started_engine();
        let militia = engine.new_object(1, ObjectKind::Militia);
        let militia_id = militia.id;
        engine.place_object(militia, Coord::new(2, 3)).expect("place");

        // Player 2's capital cell is covered by the capital itself; give
        // it a tower so defence >= militia power.
        let tower = engine.new_object(2, ObjectKind::Tower);
        engine.place_object(tower, Coord::new(7, 6)).expect("place");

        let target = Coord::new(7, 6);
        assert!(engine.grid().get(target).expect("in bounds").defence() >= 2);

        engine.move_unit(militia_id, target).expect("no-op");

        // Nothing changed: the tower still stands.
        assert_eq!(engine.players().get(&2).expect("present").buildings().len(), 1);
        assert_eq!(
            engine.players().get(&1).expect("present").object(militia_id).expect("alive").placement,
            Some(Coord::new(2, 3))
        );
    }

    #[test]
    fn test_move_unit_rejects_occupied_friendly_cell() {
        let mut engine = started_engine();
        let first = engine.new_object(1, ObjectKind::Militia);
        let first_id = first.id;
        engine.place_object(first, Coord::new(2, 3)).expect("place");
        let second = engine.new_object(1, ObjectKind::Militia);
        let second_id = second.id;
        engine.place_object(second, Coord::new(3, 3)).expect("place");

        engine.move_unit(first_id, Coord::new(3, 3)).expect("no-op");

        // Both units still stand where they were.
        let player = engine.players().get(&1).expect("present");
        assert_eq!(player.object(first_id).expect("alive").placement, Some(Coord::new(2, 3)));
        assert_eq!(player.object(second_id).expect("alive").placement, Some(Coord::new(3, 3)));
    }

    #[test]
    fn test_capture_last_cell_eliminates() {
        let grid = land_grid(10, 10);
        let players = vec![
            PlayerState::new(1, "Anna", 0).with_gold(50),
            PlayerState::new(2, "Bjorn", 1).with_gold(50),
        ];
        let mut engine = TurnEngine::new(7, grid, players, MemoryRecorder::new());

        // Give player 2 exactly one cell by hand instead of a capital area.
        let lone = Coord::new(7, 7);
        engine.grid.get_mut(lone).expect("in bounds").set_owner(Some(2));
        let p2 = engine.players.get(&2).expect("present").add_territory(1);
        engine.players.insert(2, p2);

        engine.place_capital(1, Coord::new(2, 2)).expect("place");
        let militia = engine.new_object(1, ObjectKind::Militia);
        let militia_id = militia.id;
        engine.place_object(militia, Coord::new(2, 3)).expect("place");

        engine.move_unit(militia_id, lone).expect("move");

        let p2 = engine.players().get(&2).expect("still mapped until wrap");
        assert_eq!(p2.territory(), 0);
        assert!(p2.is_done());
    }

    #[test]
    fn test_finished_reported_and_recorded_once() {
        let mut engine = started_engine();

        // Eliminate player 2 directly through the ledger.
        let p2 = engine.players.get(&2).expect("present");
        let territory = p2.territory();
        let eliminated = p2.remove_territory(territory);
        engine.players.insert(2, eliminated);

        // Next wrap purges player 2; fewer than 2 players remain.
        let mut state = engine.advance_turn().expect("advance");
        while state != TurnState::Finished {
            state = engine.advance_turn().expect("advance");
        }
        assert_eq!(engine.recorder().finished, vec![7]);

        // Terminal: repeated calls stay Finished without re-recording.
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Finished);
        assert_eq!(engine.recorder().finished, vec![7]);
    }

    #[test]
    fn test_done_player_skipped_with_record() {
        let grid = land_grid(12, 12);
        let players = vec![
            PlayerState::new(1, "Anna", 0).with_gold(50),
            PlayerState::new(2, "Bjorn", 1).with_gold(50),
            PlayerState::new(3, "Ciri", 2).with_gold(50),
        ];
        let mut engine = TurnEngine::new(9, grid, players, MemoryRecorder::new());
        engine.place_capital(1, Coord::new(2, 2)).expect("place");
        engine.advance_turn().expect("advance");
        engine.place_capital(2, Coord::new(6, 6)).expect("place");
        engine.advance_turn().expect("advance");
        engine.place_capital(3, Coord::new(10, 10)).expect("place");
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);

        // Flag player 2 done mid-round; they are still in the mapping.
        let p2 = engine.players.get(&2).expect("present");
        let territory = p2.territory();
        engine.players.insert(2, p2.remove_territory(territory));

        let records_before = engine.recorder().turns.len();
        // Player 2's slot: recorded skip, then player 3 plays.
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);
        assert_eq!(engine.current_player().expect("active").id, 3);

        let skipped: Vec<_> = engine.recorder().turns[records_before..]
            .iter()
            .map(|r| r.player)
            .collect();
        assert_eq!(skipped, vec![2, 3]);
    }

    #[test]
    fn test_insolvency_liquidates_army() {
        let mut engine = started_engine();

        // Burden player 2 with an army they cannot pay for. All four
        // knights stand on player 2's own capital area, so territory
        // income stays at 7 while upkeep runs to -24.
        let garrison = [
            Coord::new(7, 6),
            Coord::new(8, 7),
            Coord::new(6, 7),
            Coord::new(7, 8),
        ];
        for coord in garrison {
            let knight = engine.new_object(2, ObjectKind::Knight);
            engine.place_object(knight, coord).expect("place");
        }
        let p2 = engine.players.get(&2).expect("present").with_gold(0);
        engine.players.insert(2, p2);

        // Player 2's next turn resolves income: four knights cost more
        // than capital + territory income.
        assert_eq!(engine.advance_turn().expect("advance"), TurnState::Normal);
        assert_eq!(engine.current_player().expect("active").id, 2);

        let p2 = engine.players().get(&2).expect("present");
        assert_eq!(p2.gold(), 0);
        assert!(p2.units().is_empty());
        for coord in garrison {
            assert_eq!(engine.grid().get(coord).expect("in bounds").occupant(), None);
        }
    }

    #[test]
    fn test_capital_loss_requests_replacement() {
        let mut engine = started_engine();

        // Destroy player 2's capital with a strong enough unit.
        let knight = engine.new_object(1, ObjectKind::Knight);
        let knight_id = knight.id;
        engine.place_object(knight, Coord::new(6, 6)).expect("place");
        let capital_at = engine
            .players()
            .get(&2)
            .expect("present")
            .capital()
            .expect("stands")
            .placement
            .expect("placed");
        engine.move_unit(knight_id, capital_at).expect("move");
        assert!(engine.players().get(&2).expect("present").capital().is_none());

        // Player 2's next turn reports the capital sub-state and stages
        // a capital for placement.
        assert_eq!(
            engine.advance_turn().expect("advance"),
            TurnState::CapitalPlacement
        );
        assert_eq!(engine.current_player().expect("active").id, 2);
        let staged = engine.take_object_to_place().expect("staged capital");
        assert_eq!(staged.kind, ObjectKind::Capital);
        assert_eq!(staged.owner, 2);
    }

    #[test]
    fn test_selection_slots_cleared_by_caller() {
        let mut engine = two_player_engine();
        let farm = engine.new_object(1, ObjectKind::Farm);
        engine.select_object_to_place(farm);
        assert!(engine.object_to_place().is_some());
        let taken = engine.take_object_to_place().expect("staged");
        assert_eq!(taken.kind, ObjectKind::Farm);
        assert!(engine.object_to_place().is_none());

        engine.select_unit_to_move(42);
        assert_eq!(engine.unit_to_move(), Some(42));
        assert_eq!(engine.take_unit_to_move(), Some(42));
        assert!(engine.unit_to_move().is_none());
    }

    #[test]
    fn test_seat_introspection() {
        let engine = two_player_engine();
        assert_eq!(engine.game_id(), 7);
        assert_eq!(engine.turn_order(), &[1, 2]);
        assert!(engine.is_first_seat());
        assert!(!engine.is_last_seat());
    }

    #[test]
    fn test_territory_mask_matches_ownership() {
        let engine = started_engine();
        let mask = engine.player_territory_mask(1);
        let mut marked = 0;
        for y in 0..10 {
            for x in 0..10 {
                if mask.is_marked(Coord::new(x, y)) {
                    marked += 1;
                }
            }
        }
        assert_eq!(marked, engine.grid().count_owned(1));
    }
}
