use std::str::FromStr;

use sapper_core::{Coord, Difficulty, GameError, Position};
use thiserror::Error;

pub(crate) const HELP: &str = "\
commands (ROW COL are zero based):
  o ROW COL   primary click: reveal, or chord a revealed number
  m ROW COL   secondary click: flag, or flag around a revealed number
  r ROW COL   reveal
  c ROW COL   chord
  f ROW COL   toggle flag
  a ROW COL   flag all hidden neighbors
  n [PRESET]  new game (beginner, intermediate, expert)
  t           elapsed time
  h           this help
  q           quit";

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Open(Position),
    Mark(Position),
    Reveal(Position),
    Chord(Position),
    Flag(Position),
    FlagAll(Position),
    New(Option<Difficulty>),
    Time,
    Help,
    Quit,
}

impl Command {
    pub(crate) const fn targets_cell(self) -> bool {
        use Command::*;
        matches!(
            self,
            Open(_) | Mark(_) | Reveal(_) | Chord(_) | Flag(_) | FlagAll(_)
        )
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`, type `h` for help")]
    UnknownCommand(String),
    #[error("Expected a row and a column")]
    MissingCoordinate,
    #[error("`{0}` is not a valid coordinate")]
    BadCoordinate(String),
    #[error("Unexpected `{0}` after command")]
    TrailingInput(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        use Command::*;

        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "o" | "open" => Open(position(&mut words)?),
            "m" | "mark" => Mark(position(&mut words)?),
            "r" | "reveal" => Reveal(position(&mut words)?),
            "c" | "chord" => Chord(position(&mut words)?),
            "f" | "flag" => Flag(position(&mut words)?),
            "a" | "flag-all" => FlagAll(position(&mut words)?),
            "n" | "new" => New(words.next().map(str::parse::<Difficulty>).transpose()?),
            "t" | "time" => Time,
            "h" | "help" | "?" => Help,
            "q" | "quit" => Quit,
            _ => return Err(CommandError::UnknownCommand(verb.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::TrailingInput(extra.to_string()));
        }
        Ok(command)
    }
}

fn position<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Position, CommandError> {
    let row = coord(words.next())?;
    let col = coord(words.next())?;
    Ok((row, col))
}

fn coord(word: Option<&str>) -> Result<Coord, CommandError> {
    let word = word.ok_or(CommandError::MissingCoordinate)?;
    word.parse()
        .map_err(|_| CommandError::BadCoordinate(word.to_string()))
}
