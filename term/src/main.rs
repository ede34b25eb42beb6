use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::Parser;
use sapper_core::{Board, CellCount, Coord, Difficulty, GameConfig};

use input::Command;
use session::{Reply, Session};

mod input;
mod render;
mod session;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Difficulty preset
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,

    /// Custom number of rows, needs --columns and --mines
    #[arg(long, requires_all = ["columns", "mines"], conflicts_with = "difficulty")]
    rows: Option<Coord>,

    /// Custom number of columns
    #[arg(long, requires_all = ["rows", "mines"])]
    columns: Option<Coord>,

    /// Custom number of mines
    #[arg(long, requires_all = ["rows", "columns"])]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> sapper_core::Result<GameConfig> {
        match (self.rows, self.columns, self.mines) {
            (Some(rows), Some(columns), Some(mines)) => GameConfig::new(rows, columns, mines),
            _ => Ok(self.difficulty.config()),
        }
    }
}

fn init_logging(filter: log::LevelFilter) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };

    // also forwards `log` records from the engine
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut session = Session::new(Board::new(config, seed));
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render::render(session.board(), Utc::now()))?;
    writeln!(stdout, "type `h` for help")?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };

        let was_finished = session.board().is_finished();
        let now = Utc::now();
        match session.apply(command, now) {
            Reply::Board => writeln!(stdout, "{}", render::render(session.board(), now))?,
            Reply::Unchanged => writeln!(stdout, "{}", render::status_line(session.board(), now))?,
            Reply::Text(text) => writeln!(stdout, "{text}")?,
            Reply::Quit => break,
        }

        if !was_finished && session.board().is_finished() {
            log::info!(
                "Game over: {:?} after {}s",
                session.board().phase(),
                session.board().elapsed_secs(now)
            );
            writeln!(stdout, "*** game over, `n` for a new game, `q` to quit ***")?;
        }
        stdout.flush()?;
    }

    Ok(())
}
