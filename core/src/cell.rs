use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One square of the board, as stored by the engine.
///
/// `neighboring_mines` is only meaningful once the cell is revealed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    state: CellState,
    flagged: bool,
    neighboring_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn state(self) -> CellState {
        self.state
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Hidden and not flagged.
    pub const fn is_open_candidate(self) -> bool {
        self.is_hidden() && !self.flagged
    }

    /// Adjacent mine count, `None` while hidden.
    pub const fn neighboring_mines(self) -> Option<u8> {
        match self.state {
            CellState::Hidden => None,
            CellState::Revealed => Some(self.neighboring_mines),
        }
    }

    pub(crate) fn place_mine(&mut self) {
        self.is_mine = true;
    }

    /// Returns whether a flag was cleared.
    pub(crate) fn reveal(&mut self, neighboring_mines: u8) -> bool {
        self.state = CellState::Revealed;
        self.neighboring_mines = neighboring_mines;
        core::mem::take(&mut self.flagged)
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }
}

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    TriggeredMine,
    Misflagged,
}

impl CellView {
    /// Whether the cell is visually closed.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Misflagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
