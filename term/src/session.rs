use chrono::{DateTime, Utc};
use sapper_core::{Board, MarkOutcome, RevealOutcome};

use crate::input::{Command, HELP};

/// What the front end should print after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    Board,
    Unchanged,
    Text(String),
    Quit,
}

/// Routes player commands to the engine and gates input once the game ended.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    board: Board,
}

impl Session {
    pub(crate) fn new(board: Board) -> Self {
        Self { board }
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn apply(&mut self, command: Command, now: DateTime<Utc>) -> Reply {
        use Command::*;

        if command.targets_cell() && self.board.is_finished() {
            return Reply::Text("The game is over, start a new one with `n`".to_string());
        }

        let result = match command {
            Open(pos) => self.board.open(pos, now).map(RevealOutcome::has_update),
            Reveal(pos) => self.board.reveal(pos, now).map(RevealOutcome::has_update),
            Chord(pos) => self.board.chord(pos, now).map(RevealOutcome::has_update),
            Mark(pos) => self.board.mark(pos).map(MarkOutcome::has_update),
            Flag(pos) => self.board.toggle_flag(pos).map(MarkOutcome::has_update),
            FlagAll(pos) => self.board.flag_all(pos).map(MarkOutcome::has_update),
            New(Some(preset)) => {
                self.board.select_preset(preset);
                Ok(true)
            }
            New(None) => {
                self.board.apply_config(self.board.config());
                Ok(true)
            }
            Time => return Reply::Text(format!("{}s", self.board.elapsed_secs(now))),
            Help => return Reply::Text(HELP.to_string()),
            Quit => return Reply::Quit,
        };

        match result {
            Ok(true) => {
                log::debug!("{:?} applied, phase {:?}", command, self.board.phase());
                Reply::Board
            }
            Ok(false) => Reply::Unchanged,
            Err(err) => {
                log::debug!("{:?} rejected: {}", command, err);
                Reply::Text(err.to_string())
            }
        }
    }
}
