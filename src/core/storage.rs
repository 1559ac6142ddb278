//! # Game Persistence
//!
//! Single-slot save/load of the current game under [`STORAGE_KEY`].
//!
//! Only the settled tiles' id/value/position and the scalar fields are
//! written; per-move annotations and ghosts mean nothing after a reload.
//! Persistence is best-effort: `save()` logs and swallows failures, `load()`
//! turns every read, parse, or shape problem into `None` so the caller starts
//! a fresh game.
//!
//! The backing store is a [`GameStore`]. [`FileStore`] writes one JSON file
//! per key with an atomic rename (write `.tmp`, then `rename()`);
//! [`MemoryStore`] keeps everything in process.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::grid::{GRID_SIZE, MAX_TILE, Tile, TileId};
use super::state::{Game, GameStatus};

/// Key the game is stored under.
pub const STORAGE_KEY: &str = "game-2048-state";

/// A settled tile as persisted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredTile {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
}

impl From<&Tile> for StoredTile {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id,
            value: tile.value,
            row: tile.position.row,
            col: tile.position.col,
        }
    }
}

/// The persisted projection of a [`Game`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredGameState {
    pub tiles: Vec<StoredTile>,
    pub score: u64,
    pub best_score: u64,
    pub game_status: GameStatus,
    pub highest_tile: u32,
}

impl From<&Game> for StoredGameState {
    fn from(game: &Game) -> Self {
        Self {
            tiles: game
                .board()
                .settled()
                .iter()
                .map(|t| StoredTile::from(&t.tile))
                .collect(),
            score: game.score(),
            best_score: game.best_score(),
            game_status: game.status(),
            highest_tile: game.highest_tile(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid saved game: {0}")]
    Shape(String),
}

/// A durable string key-value store.
pub trait GameStore {
    /// Returns `Ok(None)` when nothing was stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl GameStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        atomic_write(&self.path_for(key), value)?;
        Ok(())
    }
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persist `game`. Failures are logged and otherwise ignored.
pub fn save(store: &dyn GameStore, game: &Game) {
    let snapshot = StoredGameState::from(game);
    match try_save(store, &snapshot) {
        Ok(()) => debug!(
            "Game saved ({} tiles, score {})",
            snapshot.tiles.len(),
            snapshot.score
        ),
        Err(e) => warn!("Failed to save game: {}", e),
    }
}

fn try_save(store: &dyn GameStore, snapshot: &StoredGameState) -> Result<(), StorageError> {
    let json = serde_json::to_string(snapshot)?;
    store.write(STORAGE_KEY, &json)
}

/// Load the stored snapshot. `None` when absent, unreadable, or malformed.
pub fn load(store: &dyn GameStore) -> Option<StoredGameState> {
    match try_load(store) {
        Ok(found) => found,
        Err(e) => {
            warn!("Discarding saved game: {}", e);
            None
        }
    }
}

fn try_load(store: &dyn GameStore) -> Result<Option<StoredGameState>, StorageError> {
    let Some(json) = store.read(STORAGE_KEY)? else {
        return Ok(None);
    };
    let snapshot: StoredGameState = serde_json::from_str(&json)?;
    validate(&snapshot)?;
    Ok(Some(snapshot))
}

/// Load and rebuild a game, resuming tile ids after the highest stored id.
pub fn load_game(store: &dyn GameStore, rng: StdRng) -> Option<Game> {
    load(store).map(|snapshot| Game::from_stored(snapshot, rng))
}

/// Reject snapshots that could not have come from a real game.
fn validate(snapshot: &StoredGameState) -> Result<(), StorageError> {
    if snapshot.highest_tile > MAX_TILE {
        return Err(StorageError::Shape(format!(
            "highest tile {} is out of range",
            snapshot.highest_tile
        )));
    }
    let mut cells = HashSet::new();
    let mut ids = HashSet::new();
    for tile in &snapshot.tiles {
        if tile.row >= GRID_SIZE || tile.col >= GRID_SIZE {
            return Err(StorageError::Shape(format!(
                "tile {} at ({}, {}) is off the grid",
                tile.id, tile.row, tile.col
            )));
        }
        if tile.value < 2 || tile.value > MAX_TILE || !tile.value.is_power_of_two() {
            return Err(StorageError::Shape(format!(
                "tile {} has value {}",
                tile.id, tile.value
            )));
        }
        if !cells.insert((tile.row, tile.col)) {
            return Err(StorageError::Shape(format!(
                "two tiles at ({}, {})",
                tile.row, tile.col
            )));
        }
        if !ids.insert(tile.id) {
            return Err(StorageError::Shape(format!("duplicate tile id {}", tile.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::Direction;
    use crate::test_support::{game_with, seeded_rng, stored};

    fn store_with(json: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.write(STORAGE_KEY, json).unwrap();
        store
    }

    #[test]
    fn test_json_shape_matches_saved_format() {
        let snapshot = stored([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 12, GameStatus::Won);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tiles": [{ "id": 1, "value": 2, "row": 0, "col": 0 }],
                "score": 12,
                "bestScore": 12,
                "gameStatus": "won",
                "highestTile": 2
            })
        );
    }

    #[test]
    fn test_round_trip_through_memory_store() {
        let mut game = game_with([[2, 2, 4, 0], [0, 0, 4, 0], [0; 4], [0; 4]], 21);
        assert!(game.apply_move(Direction::Left));
        assert_eq!(game.score(), 4);

        let store = MemoryStore::new();
        save(&store, &game);
        let restored = load_game(&store, seeded_rng(0)).unwrap();

        assert_eq!(restored.score(), game.score());
        assert_eq!(restored.best_score(), game.best_score());
        assert_eq!(restored.status(), game.status());
        assert_eq!(restored.highest_tile(), game.highest_tile());
        assert_eq!(restored.last_tile_id(), game.last_tile_id());

        let original: Vec<Tile> = game.board().settled().iter().map(|t| t.tile).collect();
        let reloaded: Vec<Tile> = restored.board().settled().iter().map(|t| t.tile).collect();
        assert_eq!(original, reloaded);
        assert!(restored.board().merging().is_empty());
        assert!(restored.board().settled().iter().all(|t| t.annotation == Default::default()));
    }

    #[test]
    fn test_save_excludes_ghosts() {
        let mut game = game_with([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], 1);
        assert!(game.apply_move(Direction::Left));
        let snapshot = StoredGameState::from(&game);
        assert_eq!(snapshot.tiles.len(), game.board().settled().len());
    }

    #[test]
    fn test_load_missing_is_none() {
        assert!(load(&MemoryStore::new()).is_none());
    }

    #[test]
    fn test_load_corrupt_json_is_none() {
        assert!(load(&store_with("{not json")).is_none());
        assert!(load(&store_with("null")).is_none());
        assert!(load(&store_with(r#"{"tiles": [], "score": 0}"#)).is_none());
    }

    #[test]
    fn test_load_unknown_status_is_none() {
        let json = r#"{
            "tiles": [],
            "score": 0,
            "bestScore": 0,
            "gameStatus": "paused",
            "highestTile": 0
        }"#;
        assert!(load(&store_with(json)).is_none());
    }

    fn snapshot_json(tiles: &str, highest_tile: u64) -> String {
        format!(
            r#"{{"tiles":[{tiles}],"score":0,"bestScore":0,"gameStatus":"playing","highestTile":{highest_tile}}}"#
        )
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        let off_grid = snapshot_json(r#"{"id":1,"value":2,"row":4,"col":0}"#, 2);
        let bad_value = snapshot_json(r#"{"id":1,"value":3,"row":0,"col":0}"#, 2);
        let stacked = snapshot_json(
            r#"{"id":1,"value":2,"row":0,"col":0},{"id":2,"value":4,"row":0,"col":0}"#,
            4,
        );
        let dup_id = snapshot_json(
            r#"{"id":1,"value":2,"row":0,"col":0},{"id":1,"value":4,"row":0,"col":1}"#,
            4,
        );
        let oversized = snapshot_json(
            r#"{"id":1,"value":2147483648,"row":0,"col":0},{"id":2,"value":2147483648,"row":0,"col":1}"#,
            2,
        );
        let highest_out_of_range = snapshot_json(r#"{"id":1,"value":2,"row":0,"col":0}"#, 262_144);
        for json in [off_grid, bad_value, stacked, dup_id, oversized, highest_out_of_range] {
            assert!(load(&store_with(&json)).is_none(), "accepted {json}");
        }
    }

    #[test]
    fn test_load_accepts_largest_tile() {
        let json = snapshot_json(
            r#"{"id":1,"value":131072,"row":0,"col":3},{"id":2,"value":2,"row":1,"col":3}"#,
            131_072,
        );
        let store = store_with(&json);
        let mut game = load_game(&store, seeded_rng(3)).unwrap();
        assert!(game.apply_move(Direction::Left));
        assert_eq!(game.board().values()[0][0], 131_072);

        save(&store, &game);
        let restored = load_game(&store, seeded_rng(4)).unwrap();
        assert_eq!(restored.board().values(), game.board().values());
    }

    #[test]
    fn test_load_restores_id_counter() {
        let json = r#"{
            "tiles": [
                {"id": 7, "value": 2, "row": 0, "col": 0},
                {"id": 31, "value": 4, "row": 3, "col": 3}
            ],
            "score": 8,
            "bestScore": 20,
            "gameStatus": "playing",
            "highestTile": 4
        }"#;
        let game = load_game(&store_with(json), seeded_rng(1)).unwrap();
        assert_eq!(game.last_tile_id(), 31);
        assert_eq!(game.best_score(), 20);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.read(STORAGE_KEY).unwrap().is_none());
        store.write(STORAGE_KEY, "{}").unwrap();
        assert_eq!(store.read(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("nested").join("game-2048-state.json").exists());
        assert!(!dir.path().join("nested").join("game-2048-state.tmp").exists());
    }

    #[test]
    fn test_save_to_unwritable_store_is_swallowed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file where the directory should be: every write fails.
        let store = FileStore::new(file.path());
        let game = game_with([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        save(&store, &game);
        assert!(load(&store).is_none());
    }
}
