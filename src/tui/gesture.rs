//! # Swipe Recognizer
//!
//! Turns a left-button drag into a [`Direction`].
//!
//! Press records the start cell; release (or focus loss mid-drag) measures
//! the displacement. Terminal cells are not square, so cell deltas are
//! scaled to units first (`cell_width` × `cell_height` units per cell). If
//! the larger axis moved less than `swipe_threshold` units the drag is a tap
//! and is discarded. Otherwise the dominant axis and its sign pick the
//! direction; exact ties go vertical.

use log::debug;

use crate::core::config::InputSettings;
use crate::core::resolver::Direction;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    settings: InputSettings,
    start: Option<(u16, u16)>,
    last: Option<(u16, u16)>,
}

impl SwipeRecognizer {
    pub fn new(settings: InputSettings) -> Self {
        Self {
            settings,
            start: None,
            last: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn press(&mut self, col: u16, row: u16) {
        self.start = Some((col, row));
        self.last = Some((col, row));
    }

    pub fn drag(&mut self, col: u16, row: u16) {
        if self.start.is_some() {
            self.last = Some((col, row));
        }
    }

    /// Finish the drag at (`col`, `row`).
    pub fn release(&mut self, col: u16, row: u16) -> Option<Direction> {
        let start = self.start.take()?;
        self.last = None;
        self.classify_cells(start, (col, row))
    }

    /// Finish the drag at the last known pointer position.
    pub fn leave(&mut self) -> Option<Direction> {
        let start = self.start.take()?;
        let end = self.last.take().unwrap_or(start);
        self.classify_cells(start, end)
    }

    fn classify_cells(&self, start: (u16, u16), end: (u16, u16)) -> Option<Direction> {
        let dx = (f32::from(end.0) - f32::from(start.0)) * self.settings.cell_width;
        let dy = (f32::from(end.1) - f32::from(start.1)) * self.settings.cell_height;
        let direction = classify(dx, dy, self.settings.swipe_threshold);
        debug!("Swipe dx={} dy={} -> {:?}", dx, dy, direction);
        direction
    }
}

impl EventHandler for SwipeRecognizer {
    type Event = Direction;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Direction> {
        match *event {
            TuiEvent::PointerDown(col, row) => {
                self.press(col, row);
                None
            }
            TuiEvent::PointerDrag(col, row) => {
                self.drag(col, row);
                None
            }
            TuiEvent::PointerUp(col, row) => self.release(col, row),
            TuiEvent::PointerLeft => self.leave(),
            _ => None,
        }
    }
}

/// Direction of a displacement in units (y grows downward), or `None` when
/// both axes are under `threshold`.
pub fn classify(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < threshold {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}
