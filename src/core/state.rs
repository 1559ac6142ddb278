//! # Game State
//!
//! The state machine around the resolver. This module contains game rules
//! only; presentation state lives in the `tui` module.
//!
//! ```text
//! Game
//! ├── board: Board            // settled tiles; ghosts are dropped on spawn
//! ├── score: u64              // sum of every merge this game
//! ├── best_score: u64         // running max, survives new_game()
//! ├── status: GameStatus      // playing | won | lost
//! ├── highest_tile: u32       // highest value ever merged to
//! ├── ids: IdAllocator        // next tile id
//! └── rng: StdRng             // spawn randomness
//! ```
//!
//! ```text
//!            move (accepted)
//!   playing ────────────────► playing | won | lost
//!   won     ── continue ────► playing
//!   any     ── new_game ────► playing
//! ```
//!
//! Moves while `won` or `lost` are ignored. The win fires once: only on the
//! move that takes the board from no tile ≥ 2048 to at least one.

use std::fmt;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::grid::{Board, GRID_SIZE, IdAllocator, Position, SettledTile, Tile, positions};
use super::resolver::{Direction, resolve_move};
use super::storage::StoredGameState;

/// The value that wins the game.
pub const WIN_TILE: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct Game {
    board: Board,
    score: u64,
    best_score: u64,
    status: GameStatus,
    highest_tile: u32,
    ids: IdAllocator,
    rng: StdRng,
}

impl Game {
    /// A fresh game seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A fresh game drawing spawns from `rng`.
    pub fn with_rng(mut rng: StdRng) -> Self {
        let mut ids = IdAllocator::new();
        let board = Board::initial_tiles(&mut ids, &mut rng);
        let highest_tile = board.max_value();
        Self {
            board,
            score: 0,
            best_score: 0,
            status: GameStatus::Playing,
            highest_tile,
            ids,
            rng,
        }
    }

    /// Rebuild a game from a stored snapshot. The id allocator resumes after
    /// the highest stored id. Tiles outside the grid are dropped.
    pub fn from_stored(stored: StoredGameState, rng: StdRng) -> Self {
        let settled: Vec<SettledTile> = stored
            .tiles
            .iter()
            .filter(|t| t.row < GRID_SIZE && t.col < GRID_SIZE)
            .map(|t| {
                SettledTile::new(Tile {
                    id: t.id,
                    value: t.value,
                    position: Position::new(t.row, t.col),
                })
            })
            .collect();
        let max_id = stored.tiles.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            board: Board::from_parts(settled, Vec::new()),
            score: stored.score,
            best_score: stored.best_score.max(stored.score),
            status: stored.game_status,
            highest_tile: stored.highest_tile,
            ids: IdAllocator::resume_after(max_id),
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    /// The most recently allocated tile id.
    pub fn last_tile_id(&self) -> u64 {
        self.ids.last()
    }

    /// Apply a move. Returns `true` if the move was accepted (something slid
    /// or merged), in which case a tile was spawned and the status updated.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Playing {
            debug!("Ignoring move {} while {}", direction, self.status);
            return false;
        }

        let outcome = resolve_move(&self.board, direction, self.highest_tile);
        if !outcome.moved {
            debug!("Move {} changed nothing", direction);
            return false;
        }

        let had_won = has_won(&self.board);
        let board = outcome.board.spawn_random_tile(&mut self.ids, &mut self.rng);

        self.score += outcome.score_delta;
        self.best_score = self.best_score.max(self.score);
        self.highest_tile = outcome
            .merged_values
            .iter()
            .copied()
            .fold(self.highest_tile, u32::max);

        self.status = if has_won(&board) && !had_won {
            info!("Reached {} with score {}", WIN_TILE, self.score);
            GameStatus::Won
        } else if !can_move(&board) {
            info!("No moves left, final score {}", self.score);
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };
        self.board = board;

        debug!(
            "Move {} accepted: +{} (score={}, best={}, status={})",
            direction, outcome.score_delta, self.score, self.best_score, self.status
        );
        true
    }

    /// Dismiss the win and keep playing. No-op unless the game is `Won`.
    pub fn continue_playing(&mut self) -> bool {
        if self.status != GameStatus::Won {
            return false;
        }
        self.status = GameStatus::Playing;
        true
    }

    /// Start over with two fresh tiles. Best score is kept.
    pub fn new_game(&mut self) {
        self.board = Board::initial_tiles(&mut self.ids, &mut self.rng);
        self.score = 0;
        self.status = GameStatus::Playing;
        self.highest_tile = self.board.max_value();
        info!("New game started (best score {})", self.best_score);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Any settled tile at or above [`WIN_TILE`].
pub fn has_won(board: &Board) -> bool {
    board.settled().iter().any(|t| t.tile.value >= WIN_TILE)
}

/// True if some direction would change the board: an empty cell exists, or
/// two orthogonally adjacent tiles share a value.
pub fn can_move(board: &Board) -> bool {
    let grid = board.project_grid();
    positions().any(|p| {
        let Some(tile) = grid.get(p) else {
            return true;
        };
        [p.offset(0, 1), p.offset(1, 0)]
            .into_iter()
            .flatten()
            .any(|n| grid.get(n).is_some_and(|other| other.value == tile.value))
    })
}
