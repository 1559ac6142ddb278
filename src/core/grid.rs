//! # Grid Model
//!
//! Tiles, positions, and the 4×4 projection the rest of the engine reads.
//!
//! ```text
//! Board
//! ├── settled: Vec<SettledTile>   // occupy cells, carry per-move annotations
//! └── merging: Vec<MergingTile>   // ghosts sliding into a merge, never occupy
//! ```
//!
//! The grid itself is never stored. `project_grid()` rebuilds it from the
//! settled list every time, so ghosts can't leak into occupancy checks.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side length of the square grid.
pub const GRID_SIZE: usize = 4;

/// Largest tile a 4×4 board can hold (2^17).
pub const MAX_TILE: u32 = 131_072;

/// Tile identity. Unique within one game instance, never reused.
pub type TileId = u64;

/// A cell address, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step one cell by `(dr, dc)`. Returns `None` when that leaves the grid.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The durable part of a tile: what survives a save/load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub position: Position,
}

/// Per-move animation data. Produced by the resolver, consumed by renderers,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotation {
    /// Where the tile sat before the last move. `None` for fresh spawns.
    pub previous: Option<Position>,
    pub is_new: bool,
    pub is_merged: bool,
    /// The merge that produced this tile beat the highest value seen so far.
    pub is_milestone: bool,
}

/// A tile occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledTile {
    pub tile: Tile,
    pub annotation: Annotation,
}

impl SettledTile {
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            annotation: Annotation::default(),
        }
    }
}

/// A tile consumed by a merge this move. Kept only so a renderer can slide it
/// into `merging_into` before it disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergingTile {
    pub id: TileId,
    /// Value before the merge.
    pub value: u32,
    pub from: Position,
    pub merging_into: Position,
}

/// Hands out tile ids. The first id is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdAllocator {
    last: TileId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose next id is `max_id + 1`.
    pub fn resume_after(max_id: TileId) -> Self {
        Self { last: max_id }
    }

    pub fn allocate(&mut self) -> TileId {
        self.last += 1;
        self.last
    }

    /// The most recently allocated id (0 before the first allocation).
    pub fn last(&self) -> TileId {
        self.last
    }
}

/// The 4×4 projection of a board's settled tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Option<Tile>; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells[pos.row][pos.col].as_ref()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.cells[pos.row][pos.col].is_none()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        positions().filter(|&p| self.is_empty_at(p)).collect()
    }

    /// Tile values as a matrix, 0 for empty cells.
    pub fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut out = [[0; GRID_SIZE]; GRID_SIZE];
        for p in positions() {
            out[p.row][p.col] = self.get(p).map_or(0, |t| t.value);
        }
        out
    }
}

/// All positions in row-major order.
pub fn positions() -> impl Iterator<Item = Position> {
    (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position { row, col }))
}

/// Tile list for one game: settled tiles plus any ghosts left by the last move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    pub(crate) settled: Vec<SettledTile>,
    pub(crate) merging: Vec<MergingTile>,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(settled: Vec<SettledTile>, merging: Vec<MergingTile>) -> Self {
        Self { settled, merging }
    }

    /// Build a settled board from a value matrix (0 = empty), allocating ids
    /// in row-major order.
    ///
    /// ```
    /// use twenty48::core::grid::{Board, IdAllocator};
    /// let mut ids = IdAllocator::new();
    /// let board = Board::from_values(
    ///     [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]],
    ///     &mut ids,
    /// );
    /// assert_eq!(board.settled().len(), 2);
    /// assert_eq!(ids.last(), 2);
    /// ```
    pub fn from_values(rows: [[u32; GRID_SIZE]; GRID_SIZE], ids: &mut IdAllocator) -> Self {
        let settled = positions()
            .filter(|p| rows[p.row][p.col] > 0)
            .map(|position| {
                SettledTile::new(Tile {
                    id: ids.allocate(),
                    value: rows[position.row][position.col],
                    position,
                })
            })
            .collect();
        Self {
            settled,
            merging: Vec::new(),
        }
    }

    pub fn settled(&self) -> &[SettledTile] {
        &self.settled
    }

    pub fn merging(&self) -> &[MergingTile] {
        &self.merging
    }

    /// Drop ghosts left over from the previous move.
    pub fn clear_merging(&mut self) {
        self.merging.clear();
    }

    pub fn project_grid(&self) -> Grid {
        let mut grid = Grid::default();
        for settled in &self.settled {
            let tile = settled.tile;
            if tile.value > 0 {
                grid.cells[tile.position.row][tile.position.col] = Some(tile);
            }
        }
        grid
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        self.project_grid().empty_cells()
    }

    /// Shorthand for `project_grid().values()`.
    pub fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        self.project_grid().values()
    }

    pub fn max_value(&self) -> u32 {
        self.settled.iter().map(|t| t.tile.value).max().unwrap_or(0)
    }

    pub fn pick_random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.empty_cells();
        if cells.is_empty() {
            return None;
        }
        Some(cells[rng.gen_range(0..cells.len())])
    }

    /// Clear ghosts, then place a 2 (90%) or 4 (10%) on a random empty cell.
    /// A full board comes back cleaned but otherwise unchanged.
    pub fn spawn_random_tile<R: Rng + ?Sized>(
        mut self,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Self {
        self.clear_merging();
        if let Some(position) = self.pick_random_empty_cell(rng) {
            let value = generate_random_value(rng);
            self.settled.push(SettledTile {
                tile: Tile {
                    id: ids.allocate(),
                    value,
                    position,
                },
                annotation: Annotation {
                    is_new: true,
                    ..Annotation::default()
                },
            });
        }
        self
    }

    /// Two spawns on an empty board.
    pub fn initial_tiles<R: Rng + ?Sized>(ids: &mut IdAllocator, rng: &mut R) -> Self {
        Board::empty().spawn_random_tile(ids, rng).spawn_random_tile(ids, rng)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { format!("{:>5}", ".") } else { format!("{v:>5}") })
                .collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

fn generate_random_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
