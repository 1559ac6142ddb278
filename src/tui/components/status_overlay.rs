//! # Status Overlay Component
//!
//! Centered dialog shown over the board once the game is won or lost.
//! Renders nothing while playing.
//!
//! - Won: `c`/Enter keeps playing, `n` starts over.
//! - Lost: `n`/Enter starts over.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::core::state::GameStatus;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Events emitted by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Continue,
    NewGame,
}

pub struct StatusOverlay {
    pub status: GameStatus,
    pub score: u64,
}

impl StatusOverlay {
    pub fn new(status: GameStatus, score: u64) -> Self {
        Self { status, score }
    }

    pub fn is_visible(&self) -> bool {
        self.status != GameStatus::Playing
    }
}

impl EventHandler for StatusOverlay {
    type Event = OverlayEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<OverlayEvent> {
        match (self.status, event) {
            (GameStatus::Won, TuiEvent::Continue | TuiEvent::Confirm) => {
                Some(OverlayEvent::Continue)
            }
            (GameStatus::Lost, TuiEvent::Confirm) => Some(OverlayEvent::NewGame),
            (GameStatus::Won | GameStatus::Lost, TuiEvent::NewGame) => Some(OverlayEvent::NewGame),
            _ => None,
        }
    }
}

impl Component for StatusOverlay {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, headline, help, color) = match self.status {
            GameStatus::Playing => return,
            GameStatus::Won => (
                " You win! ",
                "You reached 2048!",
                " c Keep going  n New game ",
                Color::Green,
            ),
            GameStatus::Lost => (
                " Game over ",
                "No moves left.",
                " n New game  q Quit ",
                Color::Red,
            ),
        };

        let overlay = centered_rect(60, 40, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));

        let body = vec![
            Line::from(headline).style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Line::from(format!("Score {}", self.score)),
        ];
        let paragraph = Paragraph::new(body).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, overlay);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
