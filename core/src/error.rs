use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {rows}x{columns} with {mines} mines")]
    InvalidConfig {
        rows: Coord,
        columns: Coord,
        mines: CellCount,
    },
    #[error("Position is outside the board")]
    InvalidPosition,
    #[error("Unknown difficulty preset")]
    UnknownPreset,
}

pub type Result<T> = core::result::Result<T, GameError>;
