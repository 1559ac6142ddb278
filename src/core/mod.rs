//! # Core Game Logic
//!
//! This module contains the 2048 rules.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Grid (tiles, ids)    │
//!                    │  • Resolver (moves)     │
//!                    │  • Game (status, score) │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │  Storage   │
//!             │  Adapter   │          │ (file/mem) │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`grid`]: `Board`, `Tile`, positions and the tile id allocator
//! - [`resolver`]: `resolve_move()`, sliding and merging in one direction
//! - [`state`]: The `Game` struct and its status transitions
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`storage`]: Save/load of the current game
//! - [`config`]: `~/.twenty48/config.toml` and its override hierarchy

pub mod action;
pub mod config;
pub mod grid;
pub mod resolver;
pub mod state;
pub mod storage;
