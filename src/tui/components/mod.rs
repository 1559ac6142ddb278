//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `ScoreBar`: Top line with score, best score and outcome
//! - `BoardView`: The tile grid
//!
//! ### Event-Driven Components
//!
//! Components that also turn `TuiEvent`s into higher-level events:
//! - `StatusOverlay`: Win/loss dialog emitting continue / new game
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── score_bar.rs       (Top status line)
//! ├── board.rs           (4×4 grid)
//! └── status_overlay.rs  (Win/loss dialog)
//! ```

pub mod board;
pub mod score_bar;
pub mod status_overlay;

pub use board::BoardView;
pub use score_bar::ScoreBar;
pub use status_overlay::{OverlayEvent, StatusOverlay};
