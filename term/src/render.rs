use std::fmt::Write;

use chrono::{DateTime, Utc};
use sapper_core::{Board, CellView, Phase};

pub(crate) fn cell_glyph(view: CellView) -> char {
    use CellView::*;
    match view {
        Hidden => '#',
        Flagged => 'F',
        Revealed(0) => '.',
        Revealed(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        Mine => '*',
        TriggeredMine => 'X',
        Misflagged => '!',
    }
}

pub(crate) fn status_line(board: &Board, now: DateTime<Utc>) -> String {
    let phase = match board.phase() {
        Phase::NotStarted => "ready",
        Phase::Playing => "playing",
        Phase::Won => "you won!",
        Phase::Lost => "boom, you lost",
    };
    format!(
        "{phase}  mines left: {}  time: {}s",
        board.mines_left(),
        board.elapsed_secs(now)
    )
}

/// Draws the board with column rulers on top and row numbers on the left.
pub(crate) fn render(board: &Board, now: DateTime<Utc>) -> String {
    let (rows, columns) = board.size();
    let mut out = String::new();

    if columns > 10 {
        out.push_str("    ");
        for col in 0..columns {
            match col / 10 {
                0 => out.push(' '),
                tens => out.push(char::from_digit(u32::from(tens % 10), 10).unwrap_or(' ')),
            }
        }
        out.push('\n');
    }
    out.push_str("    ");
    for col in 0..columns {
        out.push(char::from_digit(u32::from(col % 10), 10).unwrap_or(' '));
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{row:>3} ");
        for col in 0..columns {
            let view = board.cell_view((row, col)).unwrap_or(CellView::Hidden);
            out.push(cell_glyph(view));
        }
        out.push('\n');
    }

    out.push_str(&status_line(board, now));
    out
}
