//! Layout and drawing: board, side panel, game over overlay.

use crate::game::GameState;
use crate::grid::Occupancy;
use crate::piece::ShapeKind;
use crate::render::{BoardRenderer, render_board};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;
const BLOCK: &str = "██";

/// Board size in terminal cells including the border.
fn board_outer_size(columns: usize, rows: usize) -> (u16, u16) {
    (columns as u16 * CELL_WIDTH + 2, rows as u16 + 2)
}

/// Draws grid cells into a ratatui buffer. Row 0 is the bottom line of `area`.
pub struct TerminalBoard<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    rows: usize,
    theme: &'a Theme,
}

impl<'a> TerminalBoard<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, rows: usize, theme: &'a Theme) -> Self {
        Self {
            buf,
            area,
            rows,
            theme,
        }
    }

    /// Top-left buffer position of grid cell `(column, row)`, if it fits.
    fn position(&self, column: usize, row: usize) -> Option<(u16, u16)> {
        if row >= self.rows {
            return None;
        }
        let x = self.area.x + column as u16 * CELL_WIDTH;
        let y = self.area.y + (self.rows - 1 - row) as u16;
        let fits = x + CELL_WIDTH <= self.area.right() && y < self.area.bottom();
        fits.then_some((x, y))
    }

    fn paint(&mut self, column: usize, row: usize, symbol: &str, style: Style) {
        if let Some((x, y)) = self.position(column, row) {
            self.buf.set_string(x, y, symbol, style);
        }
    }

    fn cell_style(&self, fg: ratatui::style::Color) -> Style {
        let style = Style::default().fg(fg);
        match self.theme.board_bg {
            Some(bg) => style.bg(bg),
            None => style,
        }
    }
}

impl BoardRenderer for TerminalBoard<'_> {
    fn draw_background(&mut self, columns: usize, rows: usize) {
        let Some(bg) = self.theme.board_bg else {
            return;
        };
        let style = Style::default().bg(bg);
        for row in 0..rows {
            for column in 0..columns {
                self.paint(column, row, "  ", style);
            }
        }
    }

    fn draw_filled(&mut self, column: usize, row: usize, _shape: ShapeKind) {
        let style = self.cell_style(self.theme.filled);
        self.paint(column, row, BLOCK, style);
    }

    fn draw_moving(&mut self, column: usize, row: usize, shape: ShapeKind) {
        let style = self.cell_style(self.theme.moving_color(shape));
        self.paint(column, row, BLOCK, style);
    }
}

/// Draw the whole screen: centred board with side panel, plus the game over box.
pub fn draw(frame: &mut Frame, state: &GameState, theme: &Theme) {
    let area = frame.area();
    let grid = state.grid();
    let (bw, bh) = board_outer_size(grid.columns(), grid.rows());

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bw + SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(bh), Constraint::Fill(1)])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    draw_board(frame, state, theme, inner[0]);
    draw_sidebar(frame, state, theme, inner[1]);
    if state.is_game_over() {
        draw_game_over(frame, state, theme, inner[0]);
    }
}

fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(" droptris ", Style::default().fg(theme.title)));
    let board_area = block.inner(area);
    block.render(area, frame.buffer_mut());

    let rows = state.grid().rows();
    let mut board = TerminalBoard::new(frame.buffer_mut(), board_area, rows, theme);
    render_board(state.grid(), &mut board);
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let help_style = Style::default().fg(theme.inactive_fg);
    let piece = state
        .piece()
        .map_or("-", |p| p.shape.label());

    let lines = vec![
        Line::from(vec![
            Span::styled("Piece: ", title_style),
            Span::styled(piece, fg_style),
        ]),
        Line::from(vec![
            Span::styled("Rows: ", title_style),
            Span::styled(state.lines_cleared.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Settled: ", title_style),
            Span::styled(state.pieces_settled.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Blocks: ", title_style),
            Span::styled(state.grid().count(Occupancy::Filled).to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Updates: ", title_style),
            Span::styled(state.updates().to_string(), fg_style),
        ]),
        Line::default(),
        Line::from(Span::styled("←/→  move", help_style)),
        Line::from(Span::styled("↑    flip", help_style)),
        Line::from(Span::styled("R    restart", help_style)),
        Line::from(Span::styled("Q    quit", help_style)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line));
    Paragraph::new(lines)
        .block(block)
        .render(area, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let w = area.width.min(20);
    let h = area.height.min(5);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };
    Clear.render(rect, frame.buffer_mut());
    let text = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} rows", state.lines_cleared),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled("R restart", Style::default().fg(theme.inactive_fg))),
    ];
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line)),
        )
        .render(rect, frame.buffer_mut());
}
