//! Map command implementation.

use super::{CliError, OutputFormat};
use lugal::worldgen::generate_grid;
use lugal::{CellType, Coord, HexGrid};
use serde::Serialize;

/// JSON payload for a generated board.
#[derive(Debug, Serialize)]
struct JsonBoard {
    seed: u64,
    width: u16,
    height: u16,
    rows: Vec<Vec<CellType>>,
}

/// Execute the map command.
///
/// # Errors
///
/// Returns an error if the board cannot be generated or encoded.
pub(crate) fn execute(
    seed: u64,
    width: u16,
    height: u16,
    format: OutputFormat,
) -> Result<(), CliError> {
    let grid = generate_grid(seed, width, height).map_err(|e| CliError::new(e.to_string()))?;

    match format {
        OutputFormat::Text => render_text(&grid, seed),
        OutputFormat::Json => render_json(&grid, seed)?,
    }
    Ok(())
}

fn glyph(cell_type: CellType) -> char {
    match cell_type {
        CellType::Undefined => '?',
        CellType::Water => '~',
        CellType::Plains => '.',
        CellType::Forest => '"',
        CellType::Hills => '^',
    }
}

fn render_text(grid: &HexGrid, seed: u64) {
    println!("seed {seed}, {}x{}", grid.width(), grid.height());

    for y in 0..grid.height() {
        let mut line = String::with_capacity(usize::from(grid.width()) * 2);
        for x in 0..grid.width() {
            if let Some(cell) = grid.get(Coord::new(x, y)) {
                line.push(glyph(cell.cell_type()));
                line.push(' ');
            }
        }
        // Offset odd rows to suggest the hex stagger.
        let indent = if y % 2 == 1 { " " } else { "" };
        println!("{indent}{line}");
    }

    let mut water = 0u32;
    let mut plains = 0u32;
    let mut forest = 0u32;
    let mut hills = 0u32;
    for (_, cell) in grid.iter() {
        match cell.cell_type() {
            CellType::Water => water += 1,
            CellType::Plains => plains += 1,
            CellType::Forest => forest += 1,
            CellType::Hills => hills += 1,
            CellType::Undefined => {}
        }
    }
    println!();
    println!("water {water}  plains {plains}  forest {forest}  hills {hills}");
}

fn render_json(grid: &HexGrid, seed: u64) -> Result<(), CliError> {
    let rows: Vec<Vec<CellType>> = (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .filter_map(|x| grid.get(Coord::new(x, y)).map(lugal::Cell::cell_type))
                .collect()
        })
        .collect();

    let board = JsonBoard {
        seed,
        width: grid.width(),
        height: grid.height(),
        rows,
    };

    let encoded = serde_json::to_string_pretty(&board)
        .map_err(|e| CliError::new(format!("Failed to encode board: {e}")))?;
    println!("{encoded}");
    Ok(())
}
