//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::grid::{Board, GRID_SIZE, IdAllocator};
use crate::core::state::{Game, GameStatus};
use crate::core::storage::{StoredGameState, StoredTile};

/// Deterministic RNG for reproducible spawns.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A settled board from a value matrix, ids allocated row-major from 1.
pub fn board(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Board {
    Board::from_values(rows, &mut IdAllocator::new())
}

/// A stored snapshot with the given values, ids allocated row-major from 1.
pub fn stored(
    rows: [[u32; GRID_SIZE]; GRID_SIZE],
    score: u64,
    status: GameStatus,
) -> StoredGameState {
    let tiles: Vec<StoredTile> = board(rows)
        .settled()
        .iter()
        .map(|t| StoredTile::from(&t.tile))
        .collect();
    let highest_tile = tiles.iter().map(|t| t.value).max().unwrap_or(0);
    StoredGameState {
        tiles,
        score,
        best_score: score,
        game_status: status,
        highest_tile,
    }
}

/// A game in `Playing` status with the given values and a seeded RNG.
pub fn game_with(rows: [[u32; GRID_SIZE]; GRID_SIZE], seed: u64) -> Game {
    Game::from_stored(stored(rows, 0, GameStatus::Playing), seeded_rng(seed))
}
