use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::Game;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{BoardView, ScoreBar, StatusOverlay};

const HELP_TEXT: &str = "←↑→↓ / drag: move   n: new game   q: quit";
const SWIPE_TEXT: &str = "release to swipe";

pub fn draw_ui(frame: &mut Frame, game: &Game, tui: &TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    ScoreBar::new(game.score(), game.best_score(), game.status()).render(frame, title_area);
    BoardView::new(game.board()).render(frame, main_area);
    StatusOverlay::new(game.status(), game.score()).render(frame, main_area);

    let help = if tui.swipe.is_tracking() { SWIPE_TEXT } else { HELP_TEXT };
    frame.render_widget(
        Line::from(help).style(Style::default().fg(Color::DarkGray)).centered(),
        help_area,
    );
}
