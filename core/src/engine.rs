use alloc::vec::Vec;
use chrono::{DateTime, TimeDelta, Utc};
use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Counters and timestamps of the game in progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub revealed_count: CellCount,
    pub flagged_count: CellCount,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub phase: Phase,
}

/// The board engine: grid, mines and game lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    seed: u64,
    mines_placed: bool,
    state: GameState,
    triggered_mine: Option<Position>,
}

impl Board {
    /// Fresh board whose mines will be placed on the first reveal, using `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        log::debug!(
            "New {}x{} board with {} mines",
            config.rows(),
            config.columns(),
            config.mines()
        );
        Self {
            config,
            cells: Array2::default(config.size().to_nd_index()),
            seed,
            mines_placed: false,
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    /// Board with a known layout; the first reveal skips mine placement.
    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        let (rows, columns) = layout.size();
        let config = GameConfig::new(rows, columns, layout.mine_count())?;
        let mut board = Self::new(config, 0);
        for pos in layout.iter_mines() {
            board.cells[pos.to_nd_index()].place_mine();
        }
        board.mines_placed = true;
        Ok(board)
    }

    /// Replaces the board with a hidden, mine-free grid and resets the game.
    pub fn configure(&mut self, rows: Coord, columns: Coord, mines: CellCount) -> Result<()> {
        let config = GameConfig::new(rows, columns, mines)?;
        self.apply_config(config);
        Ok(())
    }

    pub fn select_preset(&mut self, difficulty: Difficulty) {
        log::debug!("Selected preset {}", difficulty);
        self.apply_config(difficulty.config());
    }

    /// Same as [`Board::configure`] for an already validated config.
    pub fn apply_config(&mut self, config: GameConfig) {
        let next_seed = SmallRng::seed_from_u64(self.seed).random();
        *self = Self::new(config, next_seed);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Position {
        self.config.size()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase.is_finished()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn hidden_count(&self) -> CellCount {
        self.config.total_cells() - self.state.revealed_count
    }

    /// Mines not yet accounted for by a flag, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.state.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    pub fn cells(&self) -> ArrayView2<'_, Cell> {
        self.cells.view()
    }

    pub fn cell_at(&self, pos: Position) -> Result<Cell> {
        let pos = self.validate_position(pos)?;
        Ok(self.cells[pos.to_nd_index()])
    }

    /// What a renderer should show at `pos`; mines only become visible once
    /// the game has ended.
    pub fn cell_view(&self, pos: Position) -> Result<CellView> {
        let cell = self.cell_at(pos)?;

        Ok(match (self.state.phase, cell.neighboring_mines()) {
            (_, Some(_)) if cell.is_mine() && self.triggered_mine == Some(pos) => {
                CellView::TriggeredMine
            }
            (_, Some(_)) if cell.is_mine() => CellView::Mine,
            (_, Some(count)) => CellView::Revealed(count),
            (Phase::Won, None) if cell.is_mine() => CellView::Flagged,
            (Phase::Lost, None) if cell.is_flagged() => CellView::Misflagged,
            (_, None) if cell.is_flagged() => CellView::Flagged,
            (_, None) => CellView::Hidden,
        })
    }

    pub fn neighbors(&self, pos: Position) -> NeighborIter {
        self.cells.iter_neighbors(pos)
    }

    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        let (rows, columns) = self.size();
        if pos.0 < rows && pos.1 < columns {
            Ok(pos)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    /// Reveals a hidden cell, flood filling zero regions. The first reveal of
    /// a game places the mines and starts the clock.
    pub fn reveal(&mut self, pos: Position, now: DateTime<Utc>) -> Result<RevealOutcome> {
        let pos = self.validate_position(pos)?;

        if self.is_finished() || self.cells[pos.to_nd_index()].is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.phase.is_ready() {
            self.start(pos, now);
        }

        Ok(self.reveal_from(pos, now))
    }

    /// Reveals the unflagged hidden neighbors of a revealed cell whose
    /// number is already accounted for by flags.
    pub fn chord(&mut self, pos: Position, now: DateTime<Utc>) -> Result<RevealOutcome> {
        let pos = self.validate_position(pos)?;

        if self.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let Some(count) = self.cells[pos.to_nd_index()].neighboring_mines() else {
            return Ok(RevealOutcome::NoChange);
        };

        let hidden = self.count_neighbors(pos, |cell| cell.is_hidden());
        let candidates: Vec<Position> = self
            .neighbors(pos)
            .filter(|&neighbor| self.cells[neighbor.to_nd_index()].is_open_candidate())
            .collect();

        let expected_safe = hidden.checked_sub(count);
        if candidates.is_empty() || expected_safe != Some(candidates.len() as u8) {
            return Ok(RevealOutcome::NoChange);
        }

        log::debug!("Chord at {:?} over {} cells", pos, candidates.len());
        let mut outcome = RevealOutcome::NoChange;
        for neighbor in candidates {
            outcome = outcome | self.reveal(neighbor, now)?;
        }
        Ok(outcome)
    }

    /// Flags every hidden neighbor of a revealed cell when they must all be mines.
    pub fn flag_all(&mut self, pos: Position) -> Result<MarkOutcome> {
        let pos = self.validate_position(pos)?;

        if self.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let Some(count) = self.cells[pos.to_nd_index()].neighboring_mines() else {
            return Ok(MarkOutcome::NoChange);
        };

        if self.count_neighbors(pos, |cell| cell.is_hidden()) != count {
            return Ok(MarkOutcome::NoChange);
        }

        let mut outcome = MarkOutcome::NoChange;
        for neighbor in self.neighbors(pos) {
            let cell = &mut self.cells[neighbor.to_nd_index()];
            if cell.is_open_candidate() {
                cell.set_flagged(true);
                self.state.flagged_count += 1;
                outcome = MarkOutcome::Changed;
            }
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, pos: Position) -> Result<MarkOutcome> {
        let pos = self.validate_position(pos)?;

        let cell = &mut self.cells[pos.to_nd_index()];
        if self.state.phase.is_finished() || cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }

        if cell.is_flagged() {
            cell.set_flagged(false);
            self.state.flagged_count -= 1;
        } else {
            cell.set_flagged(true);
            self.state.flagged_count += 1;
        }
        Ok(MarkOutcome::Changed)
    }

    /// Primary click: reveal a hidden cell, chord a revealed one.
    pub fn open(&mut self, pos: Position, now: DateTime<Utc>) -> Result<RevealOutcome> {
        if self.cell_at(pos)?.is_revealed() {
            self.chord(pos, now)
        } else {
            self.reveal(pos, now)
        }
    }

    /// Secondary click: flag a hidden cell, flag around a revealed one.
    pub fn mark(&mut self, pos: Position) -> Result<MarkOutcome> {
        if self.cell_at(pos)?.is_revealed() {
            self.flag_all(pos)
        } else {
            self.toggle_flag(pos)
        }
    }

    /// Elapsed game time as seen at `now`, frozen once the game ended.
    pub fn tick(&self, now: DateTime<Utc>) -> TimeDelta {
        match (self.state.phase, self.state.started_at, self.state.ended_at) {
            (Phase::Playing, Some(started_at), _) => now - started_at,
            (Phase::Won | Phase::Lost, Some(started_at), Some(ended_at)) => ended_at - started_at,
            _ => TimeDelta::zero(),
        }
    }

    /// How many whole seconds have passed since the game started, 0 if it hasn't started.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        self.tick(now).num_seconds().clamp(0, u32::MAX.into()) as u32
    }

    fn start(&mut self, first: Position, now: DateTime<Utc>) {
        if !self.mines_placed {
            let layout = RejectionSampler::new(self.seed).generate(self.config, first);
            for pos in layout.iter_mines() {
                self.cells[pos.to_nd_index()].place_mine();
            }
            self.mines_placed = true;
        }

        log::debug!("Started at {:?} from {:?}", now, first);
        self.state.started_at = Some(now);
        self.state.phase = Phase::Playing;
    }

    fn reveal_from(&mut self, origin: Position, now: DateTime<Utc>) -> RevealOutcome {
        if self.cells[origin.to_nd_index()].is_mine() {
            self.lose(origin, now);
            return RevealOutcome::Lost;
        }

        let mut outcome = RevealOutcome::NoChange;
        let mut to_visit = Vec::from([origin]);

        while let Some(pos) = to_visit.pop() {
            if self.cells[pos.to_nd_index()].is_revealed() {
                continue;
            }

            let adjacent_mines = self.adjacent_mine_count(pos);
            self.reveal_cell(pos, adjacent_mines);
            outcome = RevealOutcome::Revealed;
            log::trace!("Revealed {:?}, adjacent mines: {}", pos, adjacent_mines);

            if self.hidden_count() == self.mine_count() {
                self.win(now);
                return RevealOutcome::Won;
            }

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.neighbors(pos)
                        .filter(|&neighbor| self.cells[neighbor.to_nd_index()].is_hidden()),
                );
            }
        }

        outcome
    }

    fn reveal_cell(&mut self, pos: Position, adjacent_mines: u8) {
        if self.cells[pos.to_nd_index()].reveal(adjacent_mines) {
            self.state.flagged_count -= 1;
        }
        self.state.revealed_count += 1;
    }

    fn win(&mut self, now: DateTime<Utc>) {
        log::debug!("Won at {:?}", now);
        self.state.phase = Phase::Won;
        self.state.ended_at = Some(now);
    }

    fn lose(&mut self, triggered: Position, now: DateTime<Utc>) {
        log::debug!("Lost at {:?} on mine {:?}", now, triggered);
        self.state.phase = Phase::Lost;
        self.state.ended_at = Some(now);
        self.triggered_mine = Some(triggered);

        let mines: Vec<Position> = self
            .cells
            .indexed_iter()
            .filter(|&(_, cell)| cell.is_mine() && cell.is_hidden())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect();
        for pos in mines {
            let adjacent_mines = self.adjacent_mine_count(pos);
            self.reveal_cell(pos, adjacent_mines);
        }
    }

    fn adjacent_mine_count(&self, pos: Position) -> u8 {
        self.count_neighbors(pos, |cell| cell.is_mine())
    }

    fn count_neighbors(&self, pos: Position, predicate: impl Fn(Cell) -> bool) -> u8 {
        let mut count = 0;
        for neighbor in self.neighbors(pos) {
            if predicate(self.cells[neighbor.to_nd_index()]) {
                count += 1;
            }
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GameConfig::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(secs * 1000).unwrap()
    }

    fn board(size: Position, mines: &[Position]) -> Board {
        Board::from_layout(&MineLayout::from_mine_coords(size, mines).unwrap()).unwrap()
    }

    fn revealed(board: &Board, pos: Position) -> bool {
        board.cell_at(pos).unwrap().is_revealed()
    }

    #[test]
    fn first_reveal_places_mines_away_from_click() {
        let mut board = Board::new(Difficulty::Beginner.config(), 3);
        assert_eq!(board.cells().iter().filter(|cell| cell.is_mine()).count(), 0);

        let outcome = board.reveal((4, 4), t(0)).unwrap();

        assert_ne!(outcome, RevealOutcome::Lost);
        assert!(!board.cell_at((4, 4)).unwrap().is_mine());
        assert_eq!(board.cells().iter().filter(|cell| cell.is_mine()).count(), 10);
        assert!(matches!(board.phase(), Phase::Playing | Phase::Won));
        assert_eq!(board.game_state().started_at, Some(t(0)));
    }

    #[test]
    fn reveal_mine_loses_and_shows_all_mines() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);
        assert_eq!(board.reveal((0, 1), t(0)).unwrap(), RevealOutcome::Revealed);

        let outcome = board.reveal((0, 0), t(5)).unwrap();

        assert_eq!(outcome, RevealOutcome::Lost);
        assert_eq!(board.phase(), Phase::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert!(revealed(&board, (0, 0)));
        assert!(revealed(&board, (2, 2)));
        assert!(!revealed(&board, (1, 1)));
        assert_eq!(board.cell_view((0, 0)).unwrap(), CellView::TriggeredMine);
        assert_eq!(board.cell_view((2, 2)).unwrap(), CellView::Mine);
        assert_eq!(board.game_state().ended_at, Some(t(5)));
    }

    #[test]
    fn losing_clears_flags_on_mines_but_keeps_misflags() {
        let mut board = board((2, 3), &[(0, 0), (0, 2)]);
        board.reveal((1, 1), t(0)).unwrap();
        board.toggle_flag((0, 2)).unwrap();
        board.toggle_flag((1, 0)).unwrap();
        assert_eq!(board.game_state().flagged_count, 2);

        assert_eq!(board.reveal((0, 0), t(1)).unwrap(), RevealOutcome::Lost);

        let mine = board.cell_at((0, 2)).unwrap();
        assert!(mine.is_revealed());
        assert!(!mine.is_flagged());
        assert_eq!(board.game_state().flagged_count, 1);
        assert_eq!(board.cell_view((1, 0)).unwrap(), CellView::Misflagged);
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border() {
        // mines along the right column
        let mut board = board((4, 4), &[(0, 3), (1, 3), (2, 3), (3, 3)]);

        let outcome = board.reveal((0, 0), t(0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        for row in 0..4 {
            assert_eq!(board.cell_at((row, 0)).unwrap().neighboring_mines(), Some(0));
            assert_eq!(board.cell_at((row, 1)).unwrap().neighboring_mines(), Some(0));
            assert!(board.cell_at((row, 2)).unwrap().neighboring_mines().unwrap() >= 2);
            assert!(!revealed(&board, (row, 3)));
        }
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        // wall of mines in column 2 splits the board
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2)];
        let mut board = board((4, 5), &mines);

        assert_eq!(board.reveal((0, 0), t(0)).unwrap(), RevealOutcome::Revealed);

        for row in 0..4 {
            assert!(revealed(&board, (row, 0)));
            assert!(revealed(&board, (row, 1)));
            assert!(!revealed(&board, (row, 3)));
            assert!(!revealed(&board, (row, 4)));
        }
        assert_eq!(board.game_state().revealed_count, 8);
        assert_eq!(board.phase(), Phase::Playing);
    }

    #[test]
    fn flood_fill_clears_flags_it_passes_over() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((0, 1)).unwrap();
        assert_eq!(board.game_state().flagged_count, 1);

        assert_eq!(board.reveal((0, 0), t(0)).unwrap(), RevealOutcome::Won);

        assert!(!board.cell_at((0, 1)).unwrap().is_flagged());
        assert_eq!(board.game_state().flagged_count, 0);
    }

    #[test]
    fn revealing_last_safe_cell_wins() {
        let mut board = board((2, 2), &[(0, 0)]);
        assert_eq!(board.reveal((0, 1), t(0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 0), t(1)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(board.reveal((1, 1), t(2)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.phase(), Phase::Won);
        assert_eq!(board.hidden_count(), board.mine_count());
        assert_eq!(board.cell_view((0, 0)).unwrap(), CellView::Flagged);
    }

    #[test]
    fn zero_mine_board_is_won_by_first_reveal() {
        let mut board = Board::new(GameConfig::new(5, 5, 0).unwrap(), 9);
        assert_eq!(board.reveal((2, 2), t(0)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.hidden_count(), 0);
    }

    #[test]
    fn finished_game_ignores_commands() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((1, 1), t(0)).unwrap();
        board.reveal((0, 0), t(1)).unwrap();
        let before = board.clone();

        assert_eq!(board.reveal((0, 1), t(2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.chord((1, 1), t(2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.flag_all((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn out_of_bounds_is_rejected_without_change() {
        let mut board = Board::new(GameConfig::new(3, 4, 2).unwrap(), 0);
        let before = board.clone();

        assert_eq!(board.reveal((3, 0), t(0)), Err(GameError::InvalidPosition));
        assert_eq!(board.reveal((0, 4), t(0)), Err(GameError::InvalidPosition));
        assert_eq!(board.toggle_flag((9, 9)), Err(GameError::InvalidPosition));
        assert_eq!(board.cell_view((3, 3)), Err(GameError::InvalidPosition));
        assert_eq!(board, before);
    }

    #[test]
    fn toggle_flag_twice_restores_state() {
        let mut board = Board::default();
        let before = board.game_state().flagged_count;

        assert_eq!(board.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);
        assert!(board.cell_at((1, 1)).unwrap().is_flagged());
        assert_eq!(board.mines_left(), 9);
        assert_eq!(board.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);

        assert!(!board.cell_at((1, 1)).unwrap().is_flagged());
        assert_eq!(board.game_state().flagged_count, before);
        assert_eq!(board.phase(), Phase::NotStarted);
    }

    #[test]
    fn toggle_flag_on_revealed_cell_is_noop() {
        let mut board = board((1, 3), &[(0, 1)]);
        board.reveal((0, 0), t(0)).unwrap();
        assert_eq!(board.phase(), Phase::Playing);
        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.game_state().flagged_count, 0);
    }

    #[test]
    fn chord_reveals_unflagged_neighbors_when_flags_match() {
        let mines = &[(0, 1), (2, 1)];
        let mut board = board((3, 3), mines);

        board.reveal((1, 1), t(0)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((2, 1)).unwrap();

        let outcome = board.chord((1, 1), t(1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.cell_at((1, 0)).unwrap().neighboring_mines(), Some(2));
        assert_eq!(board.cell_at((1, 2)).unwrap().neighboring_mines(), Some(2));
    }

    #[test]
    fn chord_with_two_flags_reveals_the_two_remaining_neighbors() {
        let mut board = board((2, 4), &[(0, 0), (0, 2)]);
        board.reveal((1, 1), t(0)).unwrap();
        board.reveal((0, 1), t(0)).unwrap();
        board.toggle_flag((0, 0)).unwrap();
        board.toggle_flag((0, 2)).unwrap();
        assert_eq!(board.cell_at((1, 1)).unwrap().neighboring_mines(), Some(2));

        let outcome = board.chord((1, 1), t(1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(revealed(&board, (1, 0)));
        assert!(revealed(&board, (1, 2)));
        assert!(!revealed(&board, (0, 3)));
        assert_eq!(board.phase(), Phase::Playing);
    }

    #[test]
    fn chord_finishing_the_board_wins() {
        let mut board = board((3, 3), &[(0, 0), (0, 2), (2, 0)]);
        for pos in [(1, 1), (0, 1), (1, 0), (2, 1)] {
            board.reveal(pos, t(0)).unwrap();
        }
        board.toggle_flag((2, 0)).unwrap();
        assert_eq!(board.cell_at((2, 1)).unwrap().neighboring_mines(), Some(1));

        assert_eq!(board.chord((2, 1), t(1)).unwrap(), RevealOutcome::Won);
        assert!(revealed(&board, (1, 2)));
        assert!(revealed(&board, (2, 2)));
    }

    #[test]
    fn chord_without_enough_flags_is_noop() {
        let mut board = board((3, 3), &[(0, 1), (2, 1)]);
        board.reveal((1, 1), t(0)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        let before = board.clone();

        assert_eq!(board.chord((1, 1), t(1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn chord_with_wrong_flag_loses() {
        let mut board = board((3, 3), &[(0, 1)]);
        board.reveal((1, 1), t(0)).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.chord((1, 1), t(1)).unwrap(), RevealOutcome::Lost);
        assert_eq!(board.phase(), Phase::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 1)));
    }

    #[test]
    fn chord_on_hidden_cell_is_noop() {
        let mut board = board((3, 3), &[(0, 1)]);
        board.reveal((2, 2), t(0)).unwrap();
        assert_eq!(board.chord((0, 0), t(1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn flag_all_marks_hidden_neighbors_when_count_matches() {
        let mines = &[(0, 0), (0, 2)];
        let mut board = board((1, 4), mines);

        assert_eq!(board.reveal((0, 1), t(0)).unwrap(), RevealOutcome::Revealed);
        let outcome = board.flag_all((0, 1)).unwrap();

        assert_eq!(outcome, MarkOutcome::Changed);
        assert!(board.cell_at((0, 0)).unwrap().is_flagged());
        assert!(board.cell_at((0, 2)).unwrap().is_flagged());
        assert_eq!(board.game_state().flagged_count, 2);
        assert_eq!(board.flag_all((0, 1)).unwrap(), MarkOutcome::NoChange);
    }

    #[test]
    fn flag_all_needs_hidden_count_to_match() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((1, 1), t(0)).unwrap();
        assert_eq!(board.flag_all((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.game_state().flagged_count, 0);
    }

    #[test]
    fn open_and_mark_route_by_cell_state() {
        let mut board = board((1, 4), &[(0, 0), (0, 2)]);
        assert_eq!(board.open((0, 1), t(0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.mark((0, 1)).unwrap(), MarkOutcome::Changed);
        assert!(board.cell_at((0, 2)).unwrap().is_flagged());
        assert_eq!(board.mark((0, 3)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.mark((0, 3)).unwrap(), MarkOutcome::Changed);
        // (0, 1) sees its two mines flagged, chording opens nothing new
        assert_eq!(board.open((0, 1), t(1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.open((0, 3), t(2)).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn tick_tracks_elapsed_time_and_freezes() {
        let mut board = board((1, 3), &[(0, 1)]);
        assert_eq!(board.tick(t(100)), TimeDelta::zero());

        board.reveal((0, 0), t(10)).unwrap();
        assert_eq!(board.phase(), Phase::Playing);
        assert_eq!(board.tick(t(13)), TimeDelta::seconds(3));
        assert_eq!(board.elapsed_secs(t(25)), 15);

        assert_eq!(board.reveal((0, 2), t(30)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.tick(t(99)), TimeDelta::seconds(20));
        assert_eq!(board.elapsed_secs(t(5)), 20);
    }

    #[test]
    fn elapsed_secs_clamps_clock_skew() {
        let mut board = board((1, 3), &[(0, 1)]);
        board.reveal((0, 0), t(10)).unwrap();
        assert_eq!(board.elapsed_secs(t(0)), 0);
    }

    #[test]
    fn configure_resets_and_validates() {
        let mut board = Board::new(Difficulty::Beginner.config(), 11);
        board.reveal((0, 0), t(0)).unwrap();

        assert_eq!(
            board.configure(4, 4, 16),
            Err(GameError::InvalidConfig {
                rows: 4,
                columns: 4,
                mines: 16
            })
        );
        assert_eq!(board.size(), (9, 9));

        board.configure(4, 6, 5).unwrap();
        assert_eq!(board.size(), (4, 6));
        assert_eq!(board.phase(), Phase::NotStarted);
        assert_eq!(board.game_state(), &GameState::default());
        assert!(board.cells().iter().all(|cell| cell.is_hidden() && !cell.is_mine()));
    }

    #[test]
    fn select_preset_replaces_board() {
        let mut board = Board::default();
        board.toggle_flag((0, 0)).unwrap();

        board.select_preset(Difficulty::Expert);

        assert_eq!(board.config(), Difficulty::Expert.config());
        assert_eq!(board.cells().dim(), (24, 24));
        assert_eq!(board.game_state().flagged_count, 0);
    }

    #[test]
    fn board_state_serializes() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((1, 1), t(0)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }
}
