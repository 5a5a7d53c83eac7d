use crate::constants::{CELL_SIZE, RADIUS_OFFSET, TUNNEL_ROW};
use crate::types::{Cell, CellKind, Vec2};

const DEFAULT_TILES: [&str; 13] = [
    "#########################",
    "#...........#...........#",
    "#.##.###.##.#.##.###.##.#",
    "#.#.......#.#.#.......#.#",
    "#...#.#.#...#...#.#.#...#",
    "#.###.#.###...###.#.###.#",
    ".........................",
    "#.###.#.###...###.#.###.#",
    "#...#.#.#...#...#.#.#...#",
    "#.#.......#.#.#.......#.#",
    "#.##.###.##.#.##.###.##.#",
    "#...........#...........#",
    "#########################",
];

/// Static maze geometry for one level. Immutable once built.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: i32,
    cols: i32,
    tunnel_row: i32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Trusts its input: rows are expected to be rectangular.
    pub fn new(layout: Vec<Vec<CellKind>>) -> Self {
        let rows = layout.len() as i32;
        let cols = layout.first().map(|row| row.len()).unwrap_or(0) as i32;
        let cells = layout.into_iter().flatten().collect();
        Self {
            rows,
            cols,
            tunnel_row: TUNNEL_ROW,
            cells,
        }
    }

    /// `#` is a wall, anything else is open.
    pub fn from_tiles(tiles: &[&str]) -> Self {
        let layout = tiles
            .iter()
            .map(|line| {
                line.chars()
                    .map(|ch| if ch == '#' { CellKind::Wall } else { CellKind::Open })
                    .collect()
            })
            .collect();
        Self::new(layout)
    }

    pub fn default_layout() -> Self {
        Self::from_tiles(&DEFAULT_TILES)
    }

    pub fn with_tunnel_row(mut self, tunnel_row: i32) -> Self {
        self.tunnel_row = tunnel_row;
        self
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn tunnel_row(&self) -> i32 {
        self.tunnel_row
    }

    pub fn pixel_width(&self) -> f64 {
        self.cols as f64 * CELL_SIZE
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }

    pub fn is_open(&self, row: i32, col: i32) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        self.cells[(row * self.cols + col) as usize] == CellKind::Open
    }

    /// Columns past either edge of the tunnel row count as open.
    pub fn is_open_or_tunnel(&self, row: i32, col: i32) -> bool {
        if row == self.tunnel_row && (col < 0 || col >= self.cols) {
            return true;
        }
        self.is_open(row, col)
    }

    pub fn is_cell_open_or_tunnel(&self, cell: Cell) -> bool {
        self.is_open_or_tunnel(cell.row, cell.col)
    }

    /// Collision primitive for movement: the entity is a square of side
    /// `CELL_SIZE - 2 * RADIUS_OFFSET` centered on the point.
    pub fn can_occupy(&self, x: f64, y: f64) -> bool {
        let half = CELL_SIZE / 2.0 - RADIUS_OFFSET;
        let left_col = cell_index(x - half);
        let right_col = cell_index(x + half);
        let top_row = cell_index(y - half);
        let bottom_row = cell_index(y + half);

        self.is_open_or_tunnel(top_row, left_col)
            && self.is_open_or_tunnel(top_row, right_col)
            && self.is_open_or_tunnel(bottom_row, left_col)
            && self.is_open_or_tunnel(bottom_row, right_col)
    }

    pub fn cell_at(&self, pos: Vec2) -> Cell {
        Cell::new(cell_index(pos.y), cell_index(pos.x))
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols)
                .filter(move |&col| self.is_open(row, col))
                .map(move |col| Cell::new(row, col))
        })
    }

    pub fn center_cell(&self) -> Cell {
        Cell::new(self.rows / 2, self.cols / 2)
    }

    /// The target cell if open, otherwise the first open cell found on
    /// growing square rings around it.
    pub fn find_spawn_position(&self, row: i32, col: i32) -> Cell {
        if self.is_open(row, col) {
            return Cell::new(row, col);
        }

        let max_radius = self.rows.max(self.cols);
        for radius in 1..=max_radius {
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    if dr.abs() != radius && dc.abs() != radius {
                        continue;
                    }
                    if self.is_open(row + dr, col + dc) {
                        return Cell::new(row + dr, col + dc);
                    }
                }
            }
        }

        self.center_cell()
    }

    pub fn tiles(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| if self.is_open(row, col) { '.' } else { '#' })
                    .collect()
            })
            .collect()
    }
}

pub fn cell_index(coordinate: f64) -> i32 {
    (coordinate / CELL_SIZE).floor() as i32
}

pub fn cell_center(index: i32) -> f64 {
    index as f64 * CELL_SIZE + CELL_SIZE / 2.0
}

pub fn center_of(cell: Cell) -> Vec2 {
    Vec2::new(cell_center(cell.col), cell_center(cell.row))
}
