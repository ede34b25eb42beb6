use super::*;

/// Uniform placement by rejection sampling: draw random positions and keep
/// those that are neither the excluded cell nor already mined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RejectionSampler {
    seed: u64,
}

impl RejectionSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RejectionSampler {
    fn generate(self, config: GameConfig, exclude: Position) -> MineLayout {
        use rand::prelude::*;

        let (rows, columns) = config.size();
        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut draws: u32 = 0;

        // GameConfig guarantees at least one free cell besides `exclude`
        // for every mine, so this terminates.
        while mines_placed < config.mines() {
            let pos = (rng.random_range(0..rows), rng.random_range(0..columns));
            draws += 1;
            if pos == exclude || mines[pos.to_nd_index()] {
                continue;
            }
            mines[pos.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} avoiding {:?} after {} draws",
            mines_placed,
            rows,
            columns,
            exclude,
            draws
        );

        MineLayout::from_mine_mask(mines)
    }
}
