//! # Move Resolver
//!
//! Slides and merges every tile for one direction. Pure: no randomness, no
//! spawning, no score bookkeeping beyond the delta of this move.
//!
//! Tiles are processed nearest-wall first so that when a tile checks its next
//! cell, everything closer to the wall has already settled in the destination
//! grid. Each destination cell absorbs at most one merge per move, so
//! `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`, never `[8, 0, 0, 0]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::{Annotation, Board, GRID_SIZE, MergingTile, Position, SettledTile};

/// A direction to slide tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement as `(row, col)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Sort key: smaller means closer to the wall tiles travel towards.
    fn wall_distance(self, pos: Position) -> usize {
        match self {
            Direction::Left => pos.col,
            Direction::Right => GRID_SIZE - 1 - pos.col,
            Direction::Up => pos.row,
            Direction::Down => GRID_SIZE - 1 - pos.row,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string is not one of `up`, `down`, `left`, `right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction: {:?}", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Everything a single move produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Settled tiles followed by the ghosts consumed this move.
    pub board: Board,
    pub score_delta: u64,
    /// False when nothing slid or merged. Such a move must not be committed.
    pub moved: bool,
    /// Value of every merge result, in processing order.
    pub merged_values: Vec<u32>,
}

/// Resolve `direction` against `board`.
///
/// `current_highest` is the highest value ever merged to; a merge that beats
/// it (and every earlier merge of this move) is flagged as a milestone.
///
/// ```
/// use twenty48::core::grid::{Board, IdAllocator};
/// use twenty48::core::resolver::{Direction, resolve_move};
///
/// let mut ids = IdAllocator::new();
/// let board = Board::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids);
/// let outcome = resolve_move(&board, Direction::Left, 2);
/// assert_eq!(outcome.board.values()[0], [4, 0, 0, 0]);
/// assert_eq!(outcome.score_delta, 4);
/// assert!(outcome.moved);
/// ```
pub fn resolve_move(board: &Board, direction: Direction, current_highest: u32) -> MoveOutcome {
    let mut ordered: Vec<SettledTile> = board
        .settled()
        .iter()
        .map(|t| SettledTile {
            tile: t.tile,
            annotation: Annotation {
                previous: Some(t.tile.position),
                ..Annotation::default()
            },
        })
        .collect();
    // Stable, so tiles on different lines keep their relative order.
    ordered.sort_by_key(|t| direction.wall_distance(t.tile.position));

    let (dr, dc) = direction.delta();

    // Destination grid holds indices into `settled`.
    let mut occupant: [[Option<usize>; GRID_SIZE]; GRID_SIZE] = [[None; GRID_SIZE]; GRID_SIZE];
    let mut merged_at = [[false; GRID_SIZE]; GRID_SIZE];

    let mut settled: Vec<SettledTile> = Vec::with_capacity(ordered.len());
    let mut merging: Vec<MergingTile> = Vec::new();
    let mut merged_values = Vec::new();
    let mut score_delta: u64 = 0;
    let mut moved = false;
    let mut running_highest = current_highest;

    for mut moving in ordered {
        let start = moving.tile.position;
        let mut pos = start;
        let mut consumed = false;

        while let Some(next) = pos.offset(dr, dc) {
            let Some(idx) = occupant[next.row][next.col] else {
                pos = next;
                continue;
            };

            let target = &mut settled[idx];
            // A value that can't double without overflowing just stops.
            let doubled = moving.tile.value.checked_mul(2);
            if let Some(value) = doubled
                && target.tile.value == moving.tile.value
                && !merged_at[next.row][next.col]
            {
                merged_at[next.row][next.col] = true;
                target.tile.value = value;
                target.annotation.is_merged = true;
                if value > running_highest {
                    target.annotation.is_milestone = true;
                    running_highest = value;
                }

                score_delta += u64::from(value);
                merged_values.push(value);
                merging.push(MergingTile {
                    id: moving.tile.id,
                    value: moving.tile.value,
                    from: start,
                    merging_into: next,
                });
                consumed = true;
            }
            break;
        }

        if consumed {
            moved = true;
            continue;
        }
        if pos != start {
            moved = true;
        }
        moving.tile.position = pos;
        occupant[pos.row][pos.col] = Some(settled.len());
        settled.push(moving);
    }

    MoveOutcome {
        board: Board::from_parts(settled, merging),
        score_delta,
        moved,
        merged_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::IdAllocator;
    use crate::test_support::board;

    fn resolve(rows: [[u32; 4]; 4], direction: Direction) -> MoveOutcome {
        resolve_move(&board(rows), direction, 2)
    }

    #[test]
    fn test_merge_pair_left() {
        let out = resolve([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values(), [[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(out.score_delta, 4);
        assert!(out.moved);
        assert_eq!(out.merged_values, vec![4]);
    }

    #[test]
    fn test_no_equal_neighbours_does_not_move() {
        let out = resolve([[2, 4, 2, 4], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [2, 4, 2, 4]);
        assert!(!out.moved);
        assert_eq!(out.score_delta, 0);
        assert!(out.merged_values.is_empty());
        assert!(out.board.merging().is_empty());
    }

    #[test]
    fn test_four_equal_merge_pairwise() {
        let out = resolve([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [4, 4, 0, 0]);
        assert_eq!(out.score_delta, 8);
        assert_eq!(out.merged_values, vec![4, 4]);
    }

    #[test]
    fn test_no_double_merge_into_same_cell() {
        let out = resolve([[4, 2, 2, 0], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [4, 4, 0, 0]);
        assert_eq!(out.merged_values, vec![4]);

        let out = resolve([[0, 2, 2, 4], [0; 4], [0; 4], [0; 4]], Direction::Right);
        assert_eq!(out.board.values()[0], [0, 0, 4, 4]);
    }

    #[test]
    fn test_three_equal_merges_nearest_wall_pair() {
        let out = resolve([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [4, 2, 0, 0]);

        let out = resolve([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]], Direction::Right);
        assert_eq!(out.board.values()[0], [0, 0, 2, 4]);
    }

    #[test]
    fn test_gap_slide_then_merge() {
        let out = resolve([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [4, 0, 0, 0]);
        let out = resolve([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]], Direction::Right);
        assert_eq!(out.board.values()[0], [0, 0, 0, 4]);
    }

    #[test]
    fn test_tiles_too_large_to_double_do_not_merge() {
        let huge = 1 << 31;
        let out = resolve([[0, huge, 0, huge], [0; 4], [0; 4], [0; 4]], Direction::Left);
        assert_eq!(out.board.values()[0], [huge, huge, 0, 0]);
        assert!(out.moved);
        assert!(out.merged_values.is_empty());
        assert_eq!(out.score_delta, 0);
    }

    #[test]
    fn test_full_board_each_direction() {
        let rows = [[2, 4, 8, 16], [2, 8, 8, 0], [4, 0, 4, 4], [0, 0, 0, 2]];

        let left = resolve(rows, Direction::Left);
        assert_eq!(left.board.values(), [[2, 4, 8, 16], [2, 16, 0, 0], [8, 4, 0, 0], [2, 0, 0, 0]]);

        let right = resolve(rows, Direction::Right);
        assert_eq!(
            right.board.values(),
            [[2, 4, 8, 16], [0, 0, 2, 16], [0, 0, 4, 8], [0, 0, 0, 2]]
        );

        let up = resolve(rows, Direction::Up);
        assert_eq!(up.board.values(), [[4, 4, 16, 16], [4, 8, 4, 4], [0, 0, 0, 2], [0, 0, 0, 0]]);

        let down = resolve(rows, Direction::Down);
        assert_eq!(down.board.values(), [[0, 0, 0, 0], [0, 0, 0, 16], [4, 4, 16, 4], [4, 8, 4, 2]]);
    }

    #[test]
    fn test_ghost_records_merge_target() {
        let mut ids = IdAllocator::new();
        let start = Board::from_values([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]], &mut ids);
        let out = resolve_move(&start, Direction::Left, 2);

        assert_eq!(out.board.settled().len(), 1);
        assert_eq!(out.board.merging().len(), 1);

        let survivor = out.board.settled()[0];
        assert_eq!(survivor.tile.id, 1);
        assert_eq!(survivor.tile.position, Position::new(0, 0));
        assert_eq!(survivor.annotation.previous, Some(Position::new(0, 1)));
        assert!(survivor.annotation.is_merged);

        let ghost = out.board.merging()[0];
        assert_eq!(ghost.id, 2);
        assert_eq!(ghost.value, 2);
        assert_eq!(ghost.from, Position::new(0, 3));
        assert_eq!(ghost.merging_into, Position::new(0, 0));

        // Ghosts never occupy a cell.
        assert_eq!(out.board.empty_cells().len(), 15);
    }

    #[test]
    fn test_previous_positions_snapshot() {
        let out = resolve([[0, 0, 0, 0], [0, 0, 8, 0], [0; 4], [0; 4]], Direction::Down);
        let tile = out.board.settled()[0];
        assert_eq!(tile.tile.position, Position::new(3, 2));
        assert_eq!(tile.annotation.previous, Some(Position::new(1, 2)));
        assert!(!tile.annotation.is_new);
    }

    #[test]
    fn test_stale_flags_and_ghosts_are_dropped() {
        let mut ids = IdAllocator::new();
        let mut start = Board::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids);
        start.settled[0].annotation = Annotation {
            previous: None,
            is_new: true,
            is_merged: true,
            is_milestone: true,
        };
        start.merging.push(MergingTile {
            id: 50,
            value: 2,
            from: Position::new(0, 2),
            merging_into: Position::new(0, 0),
        });

        let out = resolve_move(&start, Direction::Right, 2);
        assert!(out.board.merging().is_empty());
        let tile = out.board.settled()[0].annotation;
        assert!(!tile.is_new && !tile.is_merged && !tile.is_milestone);
    }

    #[test]
    fn test_milestone_only_for_first_new_high() {
        let out = resolve_move(
            &board([[32, 32, 32, 32], [0; 4], [0; 4], [0; 4]]),
            Direction::Left,
            32,
        );
        let flags: Vec<(u32, bool)> = out
            .board
            .settled()
            .iter()
            .map(|t| (t.tile.value, t.annotation.is_milestone))
            .collect();
        assert_eq!(flags, vec![(64, true), (64, false)]);
    }

    #[test]
    fn test_milestone_not_set_below_highest() {
        let out = resolve_move(&board([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]]), Direction::Left, 64);
        let tile = out.board.settled()[0];
        assert!(tile.annotation.is_merged);
        assert!(!tile.annotation.is_milestone);
    }

    #[test]
    fn test_resolving_fixed_point_again_is_noop() {
        let boards = [
            [[2, 2, 4, 8], [0, 4, 4, 4], [2, 0, 2, 0], [16, 16, 16, 16]],
            [[2, 4, 8, 16], [32, 64, 128, 256], [512, 1024, 2, 4], [8, 16, 32, 64]],
            [[0, 0, 0, 2], [0, 0, 2, 0], [0, 2, 0, 0], [2, 0, 0, 0]],
        ];
        for rows in boards {
            for direction in Direction::ALL {
                let mut current = board(rows);
                let mut passes = 0;
                loop {
                    let out = resolve_move(&current, direction, 2);
                    current = out.board;
                    if !out.moved {
                        break;
                    }
                    passes += 1;
                    assert!(passes <= GRID_SIZE * GRID_SIZE, "no fixed point for {rows:?}");
                }
                let again = resolve_move(&current, direction, 2);
                assert!(!again.moved, "{direction} was not a fixed point for {rows:?}");
                assert_eq!(again.board.values(), current.values());
                assert_eq!(again.score_delta, 0);
            }
        }
    }

    #[test]
    fn test_second_pass_only_merges() {
        // After one pass every line is packed against the wall, so a repeat only
        // changes lines that still hold an equal pair.
        let rows = [[2, 2, 4, 8], [0, 4, 4, 4], [2, 0, 2, 0], [0, 0, 0, 2]];
        let first = resolve(rows, Direction::Left);
        assert_eq!(first.board.values(), [[4, 4, 8, 0], [8, 4, 0, 0], [4, 0, 0, 0], [2, 0, 0, 0]]);

        let second = resolve_move(&first.board, Direction::Left, 2);
        assert_eq!(second.board.values(), [[8, 8, 0, 0], [8, 4, 0, 0], [4, 0, 0, 0], [2, 0, 0, 0]]);
        assert_eq!(second.merged_values, vec![8]);
    }

    #[test]
    fn test_score_delta_is_sum_of_merges() {
        let rows = [[2, 2, 4, 4], [8, 8, 8, 0], [2, 0, 2, 2], [4, 4, 4, 4]];
        for direction in Direction::ALL {
            let out = resolve(rows, direction);
            let sum: u64 = out.merged_values.iter().map(|&v| u64::from(v)).sum();
            assert_eq!(out.score_delta, sum);
            assert_eq!(out.board.merging().len(), out.merged_values.len());

            let mut targets: Vec<Position> =
                out.board.merging().iter().map(|g| g.merging_into).collect();
            targets.sort();
            targets.dedup();
            assert_eq!(targets.len(), out.merged_values.len(), "a cell merged twice");
        }
    }

    #[test]
    fn test_tile_count_conserved() {
        let rows = [[2, 2, 4, 4], [8, 8, 8, 0], [2, 0, 2, 2], [4, 4, 4, 4]];
        let before = rows.iter().flatten().filter(|&&v| v > 0).count();
        for direction in Direction::ALL {
            let out = resolve(rows, direction);
            assert_eq!(out.board.settled().len() + out.board.merging().len(), before);
            let total_before: u32 = rows.iter().flatten().sum();
            let total_after: u32 = out.board.values().iter().flatten().sum();
            assert_eq!(total_before, total_after);
        }
    }

    #[test]
    fn test_direction_parse_and_display() {
        for direction in Direction::ALL {
            assert_eq!(direction.label().parse::<Direction>(), Ok(direction));
            assert_eq!(direction.to_string(), direction.label());
        }
        assert!("north".parse::<Direction>().is_err());
        assert!("Up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let back: Direction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(back, Direction::Down);
    }
}
