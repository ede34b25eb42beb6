use crate::*;
pub use rejection::*;

mod rejection;

/// Chooses where the mines go once the first cell to reveal is known.
pub trait MineGenerator {
    /// Must return exactly `config.mines()` mines, none of them at `exclude`.
    fn generate(self, config: GameConfig, exclude: Position) -> MineLayout;
}
