//! # ScoreBar Component
//!
//! Top line: title, current score, best score and, once the game is over
//! or won, the status.
//!
//! Stateless. All three numbers come straight from the `Game`:
//!
//! ```rust,ignore
//! let mut bar = ScoreBar::new(game.score(), game.best_score(), game.status());
//! bar.render(frame, title_area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::GameStatus;
use crate::tui::component::Component;

pub struct ScoreBar {
    pub score: u64,
    pub best_score: u64,
    pub status: GameStatus,
}

impl ScoreBar {
    pub fn new(score: u64, best_score: u64, status: GameStatus) -> Self {
        Self {
            score,
            best_score,
            status,
        }
    }
}

impl Component for ScoreBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled(" 2048 ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" Score ", label),
            Span::styled(self.score.to_string(), value),
            Span::styled("  Best ", label),
            Span::styled(self.best_score.to_string(), value),
        ];
        match self.status {
            GameStatus::Playing => {}
            GameStatus::Won => {
                spans.push(Span::styled("  | You win!", Style::default().fg(Color::Green)))
            }
            GameStatus::Lost => {
                spans.push(Span::styled("  | Game over", Style::default().fg(Color::Red)))
            }
        }

        frame.render_widget(Line::from(spans), area);
    }
}
