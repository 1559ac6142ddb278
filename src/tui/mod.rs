//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the board,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms waiting for input and
//! only redraws after an event or a terminal resize. All pending events are
//! drained before the next draw.

mod component;
mod components;
mod event;
pub mod gesture;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::action::{Action, Effect, update};
use crate::core::config::{InputSettings, ResolvedConfig};
use crate::core::state::Game;
use crate::core::storage::{self, FileStore, GameStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{OverlayEvent, StatusOverlay};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::gesture::SwipeRecognizer;

/// TUI-specific presentation state (not part of core game logic)
pub struct TuiState {
    pub swipe: SwipeRecognizer,
}

impl TuiState {
    pub fn new(input: InputSettings) -> Self {
        Self {
            swipe: SwipeRecognizer::new(input),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;
        info!("Terminal modes enabled (mouse, focus change)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableFocusChange, DisableMouseCapture);
    }
}

/// Resume the saved game from `store`, or start a fresh one.
///
/// With `new_game` set the saved game is still read so the best score
/// carries over.
pub fn open_game(store: &dyn GameStore, rng: StdRng, new_game: bool) -> Game {
    let mut game = match storage::load(store) {
        Some(snapshot) => {
            info!(
                "Resuming saved game ({} tiles, score {}, {})",
                snapshot.tiles.len(),
                snapshot.score,
                snapshot.game_status
            );
            Game::from_stored(snapshot, rng)
        }
        None => {
            info!("No saved game, starting fresh");
            return Game::with_rng(rng);
        }
    };
    if new_game {
        game.new_game();
    }
    game
}

/// Map one input event to a core action, given the current game.
pub fn dispatch(event: &TuiEvent, game: &Game, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit | TuiEvent::Quit | TuiEvent::Escape => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        TuiEvent::PointerDown(..)
        | TuiEvent::PointerDrag(..)
        | TuiEvent::PointerUp(..)
        | TuiEvent::PointerLeft => return tui.swipe.handle_event(event).map(Action::Move),
        _ => {}
    }

    // The overlay owns Enter / c / n while the game is won or lost
    let mut overlay = StatusOverlay::new(game.status(), game.score());
    if overlay.is_visible() {
        return match overlay.handle_event(event) {
            Some(OverlayEvent::Continue) => Some(Action::Continue),
            Some(OverlayEvent::NewGame) => Some(Action::NewGame),
            None => None,
        };
    }

    match event {
        TuiEvent::Move(direction) => Some(Action::Move(*direction)),
        TuiEvent::NewGame => Some(Action::NewGame),
        _ => None,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let store = FileStore::new(&config.data_dir);
    let rng = match config.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut game = open_game(&store, rng, config.new_game);
    storage::save(&store, &game);
    let mut tui = TuiState::new(config.input);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable mouse capture: {}", e);
            None
        }
    };

    let mut needs_redraw = true; // Force first frame
    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &game, &tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(500));
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = dispatch(&event, &game, &mut tui) else {
                continue;
            };
            match update(&mut game, action) {
                Effect::Save => storage::save(&store, &game),
                Effect::Quit => {
                    should_quit = true;
                    break;
                }
                Effect::None => {}
            }
        }

        if should_quit {
            break Ok(());
        }
    };

    // Save on exit
    storage::save(&store, &game);
    info!("Exiting with score {} (best {})", game.score(), game.best_score());

    drop(terminal_mode_guard);
    ratatui::restore();
    result
}
