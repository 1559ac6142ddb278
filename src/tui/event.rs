use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::core::resolver::Direction;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    // Board input
    Move(Direction),

    // Keys with a fixed meaning
    NewGame,
    Continue,
    Confirm,
    Quit,
    Escape,
    ForceQuit, // Ctrl+C

    // Pointer (column, row) in terminal cells
    PointerDown(u16, u16),
    PointerDrag(u16, u16),
    PointerUp(u16, u16),
    /// The terminal lost focus mid-drag.
    PointerLeft,

    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Unmapped input and read
/// errors both come back as `None`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(ev) => map_event(ev),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

pub fn map_event(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => map_mouse(mouse_event),
        Event::FocusLost => Some(TuiEvent::PointerLeft),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Terminals with keyboard enhancement also report releases and repeats.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Up) => Some(TuiEvent::Move(Direction::Up)),
        (_, KeyCode::Down) => Some(TuiEvent::Move(Direction::Down)),
        (_, KeyCode::Left) => Some(TuiEvent::Move(Direction::Left)),
        (_, KeyCode::Right) => Some(TuiEvent::Move(Direction::Right)),
        (_, KeyCode::Char('n' | 'N')) => Some(TuiEvent::NewGame),
        (_, KeyCode::Char('c' | 'C')) => Some(TuiEvent::Continue),
        (_, KeyCode::Char('q' | 'Q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Enter) => Some(TuiEvent::Confirm),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        _ => None,
    }
}

fn map_mouse(mouse_event: MouseEvent) -> Option<TuiEvent> {
    let (col, row) = (mouse_event.column, mouse_event.row);
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(TuiEvent::PointerDown(col, row)),
        MouseEventKind::Drag(MouseButton::Left) => Some(TuiEvent::PointerDrag(col, row)),
        MouseEventKind::Up(MouseButton::Left) => Some(TuiEvent::PointerUp(col, row)),
        _ => None,
    }
}
