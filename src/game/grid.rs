//! Hex board: cells, coordinates, and the grid itself.
//!
//! Coordinates use an offset scheme for flat-top hexagons with odd
//! columns shifted down, so the six neighbour deltas depend on the
//! parity of the x coordinate.

use crate::game::{ObjectId, PlayerId};

use serde::{Deserialize, Serialize};

/// Neighbour deltas for even columns (flat-top, odd columns shifted down).
const EVEN_COLUMN_DELTAS: [(i32, i32); 6] =
    [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)];

/// Neighbour deltas for odd columns.
const ODD_COLUMN_DELTAS: [(i32, i32); 6] = [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Get the up to six adjacent hex coordinates, filtered to bounds.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 6], u8) {
        let deltas = if self.x & 1 == 0 {
            &EVEN_COLUMN_DELTAS
        } else {
            &ODD_COLUMN_DELTAS
        };

        let mut result = [Coord::new(0, 0); 6];
        let mut count = 0u8;

        for (dx, dy) in deltas {
            let nx = i32::from(self.x) + dx;
            let ny = i32::from(self.y) + dy;
            if let (Ok(nx), Ok(ny)) = (u16::try_from(nx), u16::try_from(ny)) {
                if nx < width && ny < height {
                    result[count as usize] = Coord::new(nx, ny);
                    count += 1;
                }
            }
        }

        (result, count)
    }
}

/// Terrain classification of a cell.
///
/// Terrain is fixed by generation: a defined type is never overwritten
/// and `Undefined` is never assigned over a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellType {
    /// Not yet classified by the generator.
    Undefined = 0,
    /// Water - never owned, never occupied.
    Water = 1,
    /// Open land.
    Plains = 2,
    /// Wooded land.
    Forest = 3,
    /// High ground.
    Hills = 4,
}

impl CellType {
    /// Check whether this terrain is water.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, CellType::Water)
    }

    /// Check whether this terrain is claimable land.
    #[must_use]
    pub const fn is_land(self) -> bool {
        matches!(self, CellType::Plains | CellType::Forest | CellType::Hills)
    }
}

/// A single cell on the board.
///
/// The cell holds a non-owning reference to its occupant: the object
/// value itself lives in the controlling player's roster.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    cell_type: CellType,
    elevation: f64,
    humidity: f64,
    owner: Option<PlayerId>,
    defence: u32,
    occupant: Option<ObjectId>,
}

impl Cell {
    /// Create an unclassified cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell_type: CellType::Undefined,
            elevation: -1.0,
            humidity: -1.0,
            owner: None,
            defence: 0,
            occupant: None,
        }
    }

    /// Terrain type of this cell.
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Generation-time elevation sample.
    #[must_use]
    pub const fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Generation-time humidity sample.
    #[must_use]
    pub const fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Owning player, or `None` while unclaimed.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Current defence coverage value.
    #[must_use]
    pub const fn defence(&self) -> u32 {
        self.defence
    }

    /// Occupying object, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<ObjectId> {
        self.occupant
    }

    /// Classify this cell's terrain.
    ///
    /// Ignored if the incoming type is `Undefined` or the cell already
    /// has a defined type: terrain never changes after generation.
    pub fn set_cell_type(&mut self, cell_type: CellType) {
        if cell_type == CellType::Undefined || self.cell_type != CellType::Undefined {
            return;
        }
        self.cell_type = cell_type;
    }

    /// Record the generator's elevation sample.
    pub fn set_elevation(&mut self, elevation: f64) {
        self.elevation = elevation;
    }

    /// Record the generator's humidity sample.
    pub fn set_humidity(&mut self, humidity: f64) {
        self.humidity = humidity;
    }

    /// Transfer ownership of this cell. Water never changes owner.
    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        if self.cell_type.is_water() {
            return;
        }
        self.owner = owner;
    }

    /// Set the defence coverage value.
    pub fn set_defence(&mut self, defence: u32) {
        self.defence = defence;
    }

    /// Set or clear the occupant reference. Water never holds an occupant.
    pub fn set_occupant(&mut self, occupant: Option<ObjectId>) {
        if self.cell_type.is_water() {
            return;
        }
        self.occupant = occupant;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership change produced by placing an object on a cell.
///
/// Consumed by the territory ledger; when `previous == Some(next)` no
/// territory delta is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerTransition {
    /// Owner of the cell before placement (`None` = unclaimed).
    pub previous: Option<PlayerId>,
    /// Owner of the cell after placement.
    pub next: PlayerId,
}

/// The hex board.
#[derive(Debug, Clone)]
pub struct HexGrid {
    width: u16,
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl HexGrid {
    /// Create a new grid of unclassified cells.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        let cells = vec![Cell::new(); size];

        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Width of the board in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the board in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if a coordinate is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get a reference to the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.coord_to_index(coord).map(|idx| &self.cells[idx])
    }

    /// Get a mutable reference to the cell at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.coord_to_index(coord).map(|idx| &mut self.cells[idx])
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().enumerate().map(|(idx, cell)| {
            let x = u16::try_from(idx % usize::from(self.width)).unwrap_or(u16::MAX);
            let y = u16::try_from(idx / usize::from(self.width)).unwrap_or(u16::MAX);
            (Coord::new(x, y), cell)
        })
    }

    /// In-bounds neighbours of a coordinate.
    #[must_use]
    pub fn adjacent(&self, coord: Coord) -> ([Coord; 6], u8) {
        coord.adjacent(self.width, self.height)
    }

    /// Place an object reference on a cell, transferring ownership.
    ///
    /// Any previous occupant must already have been evicted by the
    /// caller: the grid does not resolve combat. Returns the owner
    /// transition for the territory ledger, or `None` for out-of-bounds
    /// or water targets (water never changes owner or holds objects).
    pub fn place_object(
        &mut self,
        object: ObjectId,
        owner: PlayerId,
        coord: Coord,
    ) -> Option<OwnerTransition> {
        let cell = self.get_mut(coord)?;
        if cell.cell_type().is_water() {
            return None;
        }
        let previous = cell.owner();
        cell.set_occupant(Some(object));
        cell.set_owner(Some(owner));
        Some(OwnerTransition {
            previous,
            next: owner,
        })
    }

    /// Clear the occupant reference from a cell without touching ownership.
    pub fn remove_occupant(&mut self, coord: Coord) {
        if let Some(cell) = self.get_mut(coord) {
            cell.set_occupant(None);
        }
    }

    /// Count non-water cells owned by a player.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> u32 {
        u32::try_from(
            self.cells
                .iter()
                .filter(|cell| cell.owner() == Some(player) && !cell.cell_type().is_water())
                .count(),
        )
        .unwrap_or(u32::MAX)
    }
}

/// Sentinel for cells not covered by a marker overlay.
pub const UNMARKED: i16 = -1;

/// A board-shaped overlay of `i16` markers.
///
/// Used for reachability results (remaining movement budget per cell)
/// and territory masks (owned / unowned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGrid {
    width: u16,
    height: u16,
    values: Vec<i16>,
}

impl MarkerGrid {
    /// Create an overlay matching the given dimensions, all `UNMARKED`.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            values: vec![UNMARKED; size],
        }
    }

    /// Overlay width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Overlay height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Marker at a coordinate, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<i16> {
        self.index(coord).map(|idx| self.values[idx])
    }

    /// Set the marker at a coordinate. Out-of-bounds writes are ignored.
    pub fn set(&mut self, coord: Coord, value: i16) {
        if let Some(idx) = self.index(coord) {
            self.values[idx] = value;
        }
    }

    /// Check whether a coordinate carries a non-sentinel marker.
    #[must_use]
    pub fn is_marked(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|v| v != UNMARKED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_even_column() {
        let coord = Coord::new(4, 4);
        let (adj, count) = coord.adjacent(10, 10);
        let adj = &adj[..count as usize];
        assert_eq!(count, 6);
        assert!(adj.contains(&Coord::new(4, 3)));
        assert!(adj.contains(&Coord::new(4, 5)));
        assert!(adj.contains(&Coord::new(5, 3)));
        assert!(adj.contains(&Coord::new(5, 4)));
        assert!(adj.contains(&Coord::new(3, 3)));
        assert!(adj.contains(&Coord::new(3, 4)));
    }

    #[test]
    fn test_adjacent_odd_column() {
        let coord = Coord::new(5, 4);
        let (adj, count) = coord.adjacent(10, 10);
        let adj = &adj[..count as usize];
        assert_eq!(count, 6);
        assert!(adj.contains(&Coord::new(5, 3)));
        assert!(adj.contains(&Coord::new(5, 5)));
        assert!(adj.contains(&Coord::new(6, 4)));
        assert!(adj.contains(&Coord::new(6, 5)));
        assert!(adj.contains(&Coord::new(4, 4)));
        assert!(adj.contains(&Coord::new(4, 5)));
    }

    #[test]
    fn test_adjacent_corner_clipped() {
        let coord = Coord::new(0, 0);
        let (adj, count) = coord.adjacent(10, 10);
        let adj = &adj[..count as usize];
        assert_eq!(count, 2);
        assert!(adj.contains(&Coord::new(0, 1)));
        assert!(adj.contains(&Coord::new(1, 0)));
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let width = 8;
        let height = 8;
        for x in 0..width {
            for y in 0..height {
                let from = Coord::new(x, y);
                let (adj, count) = from.adjacent(width, height);
                for neighbour in &adj[..count as usize] {
                    let (back, back_count) = neighbour.adjacent(width, height);
                    assert!(
                        back[..back_count as usize].contains(&from),
                        "{neighbour:?} does not list {from:?} back"
                    );
                }
            }
        }
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(HexGrid::new(0, 10).is_none());
        assert!(HexGrid::new(10, 0).is_none());
    }

    #[test]
    fn test_grid_bounds() {
        let grid = HexGrid::new(10, 10).unwrap();
        assert!(grid.in_bounds(Coord::new(0, 0)));
        assert!(grid.in_bounds(Coord::new(9, 9)));
        assert!(!grid.in_bounds(Coord::new(10, 0)));
        assert!(grid.get(Coord::new(0, 10)).is_none());
    }

    #[test]
    fn test_terrain_set_once() {
        let mut cell = Cell::new();
        cell.set_cell_type(CellType::Undefined);
        assert_eq!(cell.cell_type(), CellType::Undefined);

        cell.set_cell_type(CellType::Plains);
        assert_eq!(cell.cell_type(), CellType::Plains);

        // Already defined: further classification is ignored.
        cell.set_cell_type(CellType::Water);
        assert_eq!(cell.cell_type(), CellType::Plains);
    }

    #[test]
    fn test_water_rejects_owner_and_occupant() {
        let mut cell = Cell::new();
        cell.set_cell_type(CellType::Water);

        cell.set_owner(Some(1));
        cell.set_occupant(Some(7));

        assert_eq!(cell.owner(), None);
        assert_eq!(cell.occupant(), None);
    }

    #[test]
    fn test_place_object_reports_transition() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        grid.get_mut(Coord::new(3, 3))
            .unwrap()
            .set_cell_type(CellType::Plains);

        let first = grid.place_object(1, 1, Coord::new(3, 3)).unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.next, 1);

        let second = grid.place_object(2, 2, Coord::new(3, 3)).unwrap();
        assert_eq!(second.previous, Some(1));
        assert_eq!(second.next, 2);
        assert_eq!(grid.get(Coord::new(3, 3)).unwrap().occupant(), Some(2));
    }

    #[test]
    fn test_place_object_rejects_water_and_out_of_bounds() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        grid.get_mut(Coord::new(3, 3))
            .unwrap()
            .set_cell_type(CellType::Water);

        assert!(grid.place_object(1, 1, Coord::new(3, 3)).is_none());
        assert!(grid.place_object(1, 1, Coord::new(20, 3)).is_none());
    }

    #[test]
    fn test_remove_occupant_keeps_owner() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        grid.get_mut(Coord::new(3, 3))
            .unwrap()
            .set_cell_type(CellType::Plains);
        grid.place_object(1, 1, Coord::new(3, 3));

        grid.remove_occupant(Coord::new(3, 3));
        let cell = grid.get(Coord::new(3, 3)).unwrap();
        assert_eq!(cell.occupant(), None);
        assert_eq!(cell.owner(), Some(1));
    }

    #[test]
    fn test_marker_grid_sentinel() {
        let mut markers = MarkerGrid::new(4, 4);
        assert_eq!(markers.get(Coord::new(2, 2)), Some(UNMARKED));
        assert!(!markers.is_marked(Coord::new(2, 2)));

        markers.set(Coord::new(2, 2), 3);
        assert_eq!(markers.get(Coord::new(2, 2)), Some(3));
        assert!(markers.is_marked(Coord::new(2, 2)));

        // Out of bounds: read is None, write is ignored.
        assert_eq!(markers.get(Coord::new(9, 0)), None);
        markers.set(Coord::new(9, 0), 3);
    }
}
