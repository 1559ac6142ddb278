//! # Actions
//!
//! Everything a player can do becomes an `Action`.
//! Arrow key or swipe? That's `Action::Move(direction)`.
//! "New game" button in the overlay? That's `Action::NewGame`.
//!
//! The `update()` function applies an action to the `Game` and returns an
//! `Effect` naming the side effect the shell should perform. No I/O here:
//! saving happens in the adapter when it sees `Effect::Save`.
//!
//! ```text
//! Game + Action  →  update()  →  Game' + Effect
//! ```

use log::debug;

use super::resolver::Direction;
use super::state::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    NewGame,
    /// Dismiss the win overlay and keep playing.
    Continue,
    Quit,
}

/// What the shell should do after an `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The game changed and should be persisted.
    Save,
    Quit,
}

pub fn update(game: &mut Game, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Move(direction) => {
            if game.apply_move(direction) {
                Effect::Save
            } else {
                Effect::None
            }
        }
        Action::NewGame => {
            game.new_game();
            Effect::Save
        }
        Action::Continue => {
            if game.continue_playing() {
                Effect::Save
            } else {
                Effect::None
            }
        }
        Action::Quit => Effect::Quit,
    }
}
