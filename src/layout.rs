//! Level layouts stored as comma-separated integer grids, `1` for walls.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::constants::{MAZE_COLS, MAZE_ROWS};
use crate::error::LayoutError;
use crate::grid::Grid;
use crate::types::CellKind;

const UTF8_BOM: char = '\u{feff}';
const WALL_VALUE: i64 = 1;

pub fn parse_layout(text: &str) -> Result<Grid, LayoutError> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut rows: Vec<Vec<CellKind>> = Vec::with_capacity(MAZE_ROWS as usize);

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let row_idx = rows.len();
        let mut row = Vec::with_capacity(MAZE_COLS as usize);
        for (col_idx, raw) in line.split(',').enumerate() {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            let parsed: i64 = value.parse().map_err(|_| LayoutError::InvalidCell {
                row: row_idx,
                col: col_idx,
                value: value.to_string(),
            })?;
            row.push(if parsed == WALL_VALUE {
                CellKind::Wall
            } else {
                CellKind::Open
            });
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.len() != MAZE_ROWS as usize {
        return Err(LayoutError::RowCount {
            expected: MAZE_ROWS as usize,
            found: rows.len(),
        });
    }
    if let Some((row, cells)) = rows
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != MAZE_COLS as usize)
    {
        return Err(LayoutError::ColumnCount {
            row,
            expected: MAZE_COLS as usize,
            found: cells.len(),
        });
    }

    Ok(Grid::new(rows))
}

pub fn read_layout(path: &Path) -> Result<Grid, LayoutError> {
    let text = fs::read_to_string(path).map_err(|source| LayoutError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout(&text)
}

/// Loads `level{n}.csv` from `dir`. Any problem falls back to the built-in
/// layout so the engine always receives a valid grid.
pub fn load_level(dir: &Path, level: u32) -> Grid {
    let path = dir.join(format!("level{level}.csv"));
    match read_layout(&path) {
        Ok(grid) => {
            info!(level, path = %path.display(), "level layout loaded");
            grid
        }
        Err(error) => {
            warn!(level, %error, "using built-in layout");
            Grid::default_layout()
        }
    }
}
