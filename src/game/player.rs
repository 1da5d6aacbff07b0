//! Immutable player resource ledger.
//!
//! Every mutation produces a new `PlayerState` snapshot. A single
//! command recomputes several derived fields at once (gold, territory,
//! done), and copy-and-replace keeps other readers from ever observing
//! an inconsistent intermediate state.

use crate::game::{Coord, GameObject, ObjectId, ObjectKind, FARM_COST_SURCHARGE};

/// Unique identifier for a player.
pub type PlayerId = u8;

/// Opaque handle to a player's border/visual theme.
pub type ThemeId = u16;

/// Immutable snapshot of one player's resources and rosters.
///
/// The rosters own the object values; the grid only refers to them by
/// id. Farms are tracked separately from other buildings because their
/// cost scales with the number already owned.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Border/visual theme handle (opaque to the engine).
    pub theme: ThemeId,
    gold: i32,
    territory: i32,
    buildings: Vec<GameObject>,
    units: Vec<GameObject>,
    farms: Vec<GameObject>,
    capital: Option<GameObject>,
    done: bool,
}

impl PlayerState {
    /// Create a fresh player with empty rosters and no gold.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, theme: ThemeId) -> Self {
        Self {
            id,
            name: name.into(),
            theme,
            gold: 0,
            territory: 0,
            buildings: Vec::new(),
            units: Vec::new(),
            farms: Vec::new(),
            capital: None,
            done: false,
        }
    }

    /// Current gold balance. May be negative between placement and the
    /// next income resolution.
    #[must_use]
    pub const fn gold(&self) -> i32 {
        self.gold
    }

    /// Snapshot with the gold balance replaced. Game-setup seeding only.
    #[must_use]
    pub fn with_gold(&self, gold: i32) -> Self {
        let mut next = self.clone();
        next.gold = gold;
        next
    }

    /// Number of claimable cells this player owns.
    #[must_use]
    pub const fn territory(&self) -> i32 {
        self.territory
    }

    /// Whether this player has been eliminated. Never reverts to `false`.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// The player's capital, if one stands.
    #[must_use]
    pub const fn capital(&self) -> Option<&GameObject> {
        self.capital.as_ref()
    }

    /// Owned non-farm buildings.
    #[must_use]
    pub fn buildings(&self) -> &[GameObject] {
        &self.buildings
    }

    /// Owned units.
    #[must_use]
    pub fn units(&self) -> &[GameObject] {
        &self.units
    }

    /// Owned farms.
    #[must_use]
    pub fn farms(&self) -> &[GameObject] {
        &self.farms
    }

    /// Number of farms owned (drives farm cost scaling).
    #[must_use]
    pub fn farm_count(&self) -> usize {
        self.farms.len()
    }

    /// Iterate over every owned object: buildings, farms, units, capital.
    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.buildings
            .iter()
            .chain(self.farms.iter())
            .chain(self.units.iter())
            .chain(self.capital.iter())
    }

    /// Look up an owned object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects().find(|object| object.id == id)
    }

    /// Full placement cost of an object for this player.
    ///
    /// Farms cost their base price plus the current farm count plus a
    /// flat surcharge; everything else costs its base price.
    #[must_use]
    pub fn full_cost(&self, kind: ObjectKind) -> i32 {
        let mut cost = kind.cost();
        if kind == ObjectKind::Farm {
            cost += i32::try_from(self.farms.len()).unwrap_or(i32::MAX) + FARM_COST_SURCHARGE;
        }
        cost
    }

    /// Add an object to the matching roster, deducting its full cost.
    ///
    /// Gold is allowed to go negative here; the clamp to zero happens
    /// only during income resolution.
    #[must_use]
    pub fn add_object(&self, object: GameObject) -> Self {
        let mut next = self.clone();
        next.gold -= self.full_cost(object.kind);
        match object.kind {
            ObjectKind::Capital => next.capital = Some(object),
            ObjectKind::Farm => next.farms.push(object),
            ObjectKind::Tower | ObjectKind::SuperTower => next.buildings.push(object),
            ObjectKind::Militia | ObjectKind::Knight => next.units.push(object),
        }
        next
    }

    /// Remove an object from the matching roster.
    ///
    /// If the object is the capital, the capital reference is cleared.
    /// Unknown ids leave the snapshot unchanged.
    #[must_use]
    pub fn remove_object(&self, id: ObjectId) -> Self {
        let mut next = self.clone();
        if next.capital.as_ref().is_some_and(|c| c.id == id) {
            next.capital = None;
            return next;
        }
        next.units.retain(|object| object.id != id);
        next.farms.retain(|object| object.id != id);
        next.buildings.retain(|object| object.id != id);
        next
    }

    /// Resolve per-round income.
    ///
    /// Farm, capital and territory income accrue only while a capital
    /// stands; building and unit incomes always apply. A negative result
    /// clamps gold to zero and reports `solvent = false`, signalling
    /// that the player's army must be liquidated.
    #[must_use]
    pub fn resolve_income(&self) -> (Self, bool) {
        let mut next = self.clone();

        if let Some(capital) = &next.capital {
            let farms = i32::try_from(next.farms.len()).unwrap_or(i32::MAX);
            next.gold += farms * ObjectKind::Farm.income();
            next.gold += capital.kind.income();
            next.gold += next.territory;
        }
        for building in &next.buildings {
            next.gold += building.kind.income();
        }
        for unit in &next.units {
            next.gold += unit.kind.income();
        }

        if next.gold < 0 {
            next.gold = 0;
            return (next, false);
        }
        (next, true)
    }

    /// Credit territory.
    #[must_use]
    pub fn add_territory(&self, n: i32) -> Self {
        let mut next = self.clone();
        next.territory += n;
        next
    }

    /// Debit territory. Reaching zero or below eliminates the player.
    #[must_use]
    pub fn remove_territory(&self, n: i32) -> Self {
        let mut next = self.clone();
        next.territory -= n;
        if next.territory <= 0 {
            next.done = true;
        }
        next
    }

    /// Clear the moved flag on every owned unit.
    #[must_use]
    pub fn refresh_units(&self) -> Self {
        let mut next = self.clone();
        for unit in &mut next.units {
            unit.moved = false;
        }
        next
    }

    /// Record where an owned object now stands.
    #[must_use]
    pub fn with_placement(&self, id: ObjectId, coord: Coord) -> Self {
        let mut next = self.clone();
        for object in next
            .units
            .iter_mut()
            .chain(next.farms.iter_mut())
            .chain(next.buildings.iter_mut())
            .chain(next.capital.iter_mut())
        {
            if object.id == id {
                object.placement = Some(coord);
            }
        }
        next
    }

    /// Flag an owned unit as having moved this round.
    #[must_use]
    pub fn mark_unit_moved(&self, id: ObjectId) -> Self {
        let mut next = self.clone();
        for unit in &mut next.units {
            if unit.id == id {
                unit.moved = true;
            }
        }
        next
    }

    /// Drop every unit from the roster (insolvency liquidation).
    #[must_use]
    pub fn disband_units(&self) -> Self {
        let mut next = self.clone();
        next.units.clear();
        next
    }
}
