//! Game pieces: buildings and units.
//!
//! The original building/unit hierarchy is flattened into a tagged
//! variant with a `match`-dispatched stat block. Object values are owned
//! by their controlling player's roster; the grid refers to them by id.

use crate::game::{Coord, PlayerId};

/// Unique identifier for a placed or pending game object.
///
/// Minted by the turn engine; never reused within a game.
pub type ObjectId = u32;

/// Extra gold added to a farm's cost on top of the per-farm scaling.
pub const FARM_COST_SURCHARGE: i32 = 2;

/// Kind of game object, carrying its static stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Seat of a player's economy; required for farm, capital and
    /// territory income.
    Capital,
    /// Income building; cost scales with the number already owned.
    Farm,
    /// Defensive building.
    Tower,
    /// Heavy defensive building.
    SuperTower,
    /// Cheap unit: low power, modest reach.
    Militia,
    /// Heavy unit: high power and reach, expensive upkeep.
    Knight,
}

impl ObjectKind {
    /// Base placement cost in gold (before farm scaling).
    #[must_use]
    pub const fn cost(self) -> i32 {
        match self {
            ObjectKind::Capital => 0,
            ObjectKind::Farm => 12,
            ObjectKind::Tower => 15,
            ObjectKind::SuperTower => 35,
            ObjectKind::Militia => 10,
            ObjectKind::Knight => 25,
        }
    }

    /// Gold produced (or consumed, negative) each round.
    #[must_use]
    pub const fn income(self) -> i32 {
        match self {
            ObjectKind::Capital => 10,
            ObjectKind::Farm => 4,
            ObjectKind::Tower => -1,
            ObjectKind::SuperTower => -3,
            ObjectKind::Militia => -2,
            ObjectKind::Knight => -6,
        }
    }

    /// Defence contributed to the object's cell and same-owner neighbours.
    #[must_use]
    pub const fn defence(self) -> u32 {
        match self {
            ObjectKind::Capital => 1,
            ObjectKind::Farm => 0,
            ObjectKind::Tower => 2,
            ObjectKind::SuperTower => 3,
            ObjectKind::Militia => 1,
            ObjectKind::Knight => 2,
        }
    }

    /// Attack power; `None` for buildings.
    #[must_use]
    pub const fn power(self) -> Option<u32> {
        match self {
            ObjectKind::Militia => Some(2),
            ObjectKind::Knight => Some(3),
            _ => None,
        }
    }

    /// Movement range in cells; `None` for buildings.
    #[must_use]
    pub const fn range(self) -> Option<u32> {
        match self {
            ObjectKind::Militia => Some(4),
            ObjectKind::Knight => Some(5),
            _ => None,
        }
    }

    /// Check whether this kind is a mobile unit.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        matches!(self, ObjectKind::Militia | ObjectKind::Knight)
    }

    /// Check whether this kind is a building.
    #[must_use]
    pub const fn is_building(self) -> bool {
        !self.is_unit()
    }
}

/// A live game object.
///
/// Exactly one instance exists per placement; the object is destroyed
/// when its cell is overtaken by a stronger claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameObject {
    /// Identifier referenced by the occupying cell.
    pub id: ObjectId,
    /// Controlling player.
    pub owner: PlayerId,
    /// Variant tag with the static stat block.
    pub kind: ObjectKind,
    /// Cell this object stands on; `None` before placement.
    pub placement: Option<Coord>,
    /// Whether this unit has already moved this round.
    pub moved: bool,
}

impl GameObject {
    /// Create an unplaced object.
    #[must_use]
    pub const fn new(id: ObjectId, owner: PlayerId, kind: ObjectKind) -> Self {
        Self {
            id,
            owner,
            kind,
            placement: None,
            moved: false,
        }
    }

    /// Attack power, or 0 for buildings.
    #[must_use]
    pub fn power(&self) -> u32 {
        self.kind.power().unwrap_or(0)
    }

    /// Movement range, or 0 for buildings.
    #[must_use]
    pub fn range(&self) -> u32 {
        self.kind.range().unwrap_or(0)
    }
}
