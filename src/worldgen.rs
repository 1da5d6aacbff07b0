//! Deterministic terrain generation.
//!
//! Black-box generator for the engine: given a seed and dimensions it
//! yields a fully classified board. Elevation and humidity are sampled
//! as smoothed value-noise fields, then each cell is classified as
//! water, plains, forest or hills. The same `(seed, width, height)`
//! triple always produces the same board, so the pair of map dimensions
//! and seed is all a collaborator needs to persist.

// Noise generation uses intentional casts for coordinate/RNG operations
#![allow(clippy::cast_precision_loss)]

use crate::game::{CellType, Coord, HexGrid};

/// Elevation below which a cell becomes water.
const SEA_LEVEL: f64 = 0.38;

/// Elevation above which a cell becomes hills.
const HILL_LEVEL: f64 = 0.66;

/// Humidity above which land becomes forest.
const FOREST_HUMIDITY: f64 = 0.58;

/// Smoothing passes applied to the raw noise lattice.
const SMOOTHING_PASSES: u32 = 2;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random f64 in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }
}

/// Error type for terrain generation.
#[derive(Debug, Clone)]
pub struct WorldgenError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for WorldgenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "World generation error: {}", self.reason)
    }
}

impl std::error::Error for WorldgenError {}

/// Generate a fully classified board.
///
/// # Errors
///
/// Returns an error if either dimension is zero.
pub fn generate_grid(seed: u64, width: u16, height: u16) -> Result<HexGrid, WorldgenError> {
    let mut grid = HexGrid::new(width, height).ok_or_else(|| WorldgenError {
        reason: "Invalid board dimensions (must be > 0)".to_string(),
    })?;

    let mut rng = Rng::new(seed);
    let elevation = noise_field(&mut rng, width, height);
    let humidity = noise_field(&mut rng, width, height);

    for y in 0..height {
        for x in 0..width {
            let coord = Coord::new(x, y);
            let idx = usize::from(y) * usize::from(width) + usize::from(x);
            let e = elevation[idx];
            let h = humidity[idx];

            let cell_type = if e < SEA_LEVEL {
                CellType::Water
            } else if e > HILL_LEVEL {
                CellType::Hills
            } else if h > FOREST_HUMIDITY {
                CellType::Forest
            } else {
                CellType::Plains
            };

            if let Some(cell) = grid.get_mut(coord) {
                cell.set_elevation(e);
                cell.set_humidity(h);
                cell.set_cell_type(cell_type);
            }
        }
    }

    Ok(grid)
}

/// Sample a smoothed value-noise field over the board.
///
/// A raw random lattice is averaged with its hex neighbourhood for a
/// few passes, which trades white noise for contiguous regions: lakes
/// instead of puddles, ranges instead of lone peaks.
fn noise_field(rng: &mut Rng, width: u16, height: u16) -> Vec<f64> {
    let size = usize::from(width) * usize::from(height);
    let mut field: Vec<f64> = (0..size).map(|_| rng.next_f64()).collect();

    for _ in 0..SMOOTHING_PASSES {
        let mut smoothed = vec![0.0f64; size];
        for y in 0..height {
            for x in 0..width {
                let coord = Coord::new(x, y);
                let idx = usize::from(y) * usize::from(width) + usize::from(x);

                let mut total = field[idx];
                let mut samples = 1.0f64;
                let (neighbours, count) = coord.adjacent(width, height);
                for next in &neighbours[..count as usize] {
                    let nidx = usize::from(next.y) * usize::from(width) + usize::from(next.x);
                    total += field[nidx];
                    samples += 1.0;
                }
                smoothed[idx] = total / samples;
            }
        }
        field = smoothed;
    }

    field
}
