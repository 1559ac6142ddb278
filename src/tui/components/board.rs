//! # BoardView Component
//!
//! Draws the 4×4 grid. Each tile is a fixed-size coloured block with its
//! value centred in it; empty cells are drawn as dim blocks so the grid shape
//! stays visible.
//!
//! The last move's annotations drive the highlighting:
//! - spawned tiles are bold
//! - merge results are reversed
//! - a merge that set a new highest tile is underlined in yellow
//!
//! Ghost tiles are skipped. The terminal redraws whole frames, so only the
//! settled board is shown.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::grid::{Annotation, Board, GRID_SIZE, Position, positions};
use crate::tui::component::Component;

pub const TILE_WIDTH: u16 = 7;
pub const TILE_HEIGHT: u16 = 3;
const GAP: u16 = 1;

/// Outer size of the board including its border.
pub const BOARD_WIDTH: u16 = GRID_SIZE as u16 * TILE_WIDTH + (GRID_SIZE as u16 - 1) * GAP + 2;
pub const BOARD_HEIGHT: u16 = GRID_SIZE as u16 * TILE_HEIGHT + 2;

pub struct BoardView<'a> {
    pub board: &'a Board,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

impl Component for BoardView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer = board_rect(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(outer);
        frame.render_widget(block, outer);

        let grid = self.board.project_grid();
        for pos in positions() {
            let rect = tile_rect(inner, pos).intersection(inner);
            if rect.is_empty() {
                continue;
            }
            let paragraph = match grid.get(pos) {
                Some(tile) => {
                    let annotation = self
                        .board
                        .settled()
                        .iter()
                        .find(|s| s.tile.id == tile.id)
                        .map(|s| s.annotation)
                        .unwrap_or_default();
                    tile_paragraph(tile.value, annotation, rect)
                }
                None => Paragraph::new("").style(Style::default().bg(EMPTY_CELL)),
            };
            frame.render_widget(paragraph, rect);
        }
    }
}

const EMPTY_CELL: Color = Color::Rgb(60, 58, 50);

/// The board's outer rect, centred in `area` and clipped to it.
pub fn board_rect(area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(BOARD_WIDTH) / 2;
    let y = area.y + area.height.saturating_sub(BOARD_HEIGHT) / 2;
    Rect::new(x, y, BOARD_WIDTH, BOARD_HEIGHT).intersection(area)
}

/// The rect of the cell at `pos` inside the board's inner area.
pub fn tile_rect(inner: Rect, pos: Position) -> Rect {
    Rect::new(
        inner.x + pos.col as u16 * (TILE_WIDTH + GAP),
        inner.y + pos.row as u16 * TILE_HEIGHT,
        TILE_WIDTH,
        TILE_HEIGHT,
    )
}

fn tile_paragraph(value: u32, annotation: Annotation, rect: Rect) -> Paragraph<'static> {
    let mut style = tile_style(value);
    if annotation.is_new {
        style = style.add_modifier(Modifier::BOLD);
    }
    if annotation.is_merged {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if annotation.is_milestone {
        style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
    }

    let label = center_label(&value.to_string(), rect.width as usize);
    let pad = rect.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(label));
    Paragraph::new(lines).style(style)
}

/// Pad `label` with spaces on both sides to `width` display columns.
fn center_label(label: &str, width: usize) -> String {
    let used = label.width();
    if used >= width {
        return label.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), label, " ".repeat(right))
}

fn tile_style(value: u32) -> Style {
    let (fg, bg) = match value {
        2 => (Color::Black, Color::Rgb(238, 228, 218)),
        4 => (Color::Black, Color::Rgb(237, 224, 200)),
        8 => (Color::White, Color::Rgb(242, 177, 121)),
        16 => (Color::White, Color::Rgb(245, 149, 99)),
        32 => (Color::White, Color::Rgb(246, 124, 95)),
        64 => (Color::White, Color::Rgb(246, 94, 59)),
        128 => (Color::White, Color::Rgb(237, 207, 114)),
        256 => (Color::White, Color::Rgb(237, 204, 97)),
        512 => (Color::White, Color::Rgb(237, 200, 80)),
        1024 => (Color::White, Color::Rgb(237, 197, 63)),
        2048 => (Color::White, Color::Rgb(237, 194, 46)),
        // Past 2048
        _ => (Color::White, Color::Rgb(148, 85, 200)),
    };
    Style::default().fg(fg).bg(bg)
}
