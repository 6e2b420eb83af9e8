//! Droptris — single-screen falling-block puzzle in the terminal.

mod app;
mod controller;
mod game;
mod grid;
mod input;
mod lines;
mod piece;
mod render;
mod theme;
mod tick;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Options derived from CLI that affect the simulation (grid size, cadence, timing, seed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub columns: u16,
    pub rows: u16,
    pub gravity_every: u32,
    pub update_rate: f64,
    pub max_frame_ms: u64,
    pub seed: Option<u64>,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            columns: args.columns,
            rows: args.rows,
            gravity_every: args.gravity_every,
            update_rate: args.update_rate,
            max_frame_ms: args.max_frame_ms,
            seed: args.seed,
        }
    }
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("droptris: {err:#}");
        std::process::exit(-1);
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref()) {
        Ok(theme) => theme,
        Err(err) => {
            warn!("theme unavailable, using defaults: {err}");
            theme::Theme::default()
        }
    };
    let config = GameConfig::from(args);
    info!(
        "starting {}x{} grid, gravity every {} updates at {} Hz",
        config.columns, config.rows, config.gravity_every, config.update_rate
    );
    let mut app = App::new(&config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the board.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

/// Falling-block puzzle in the terminal: squares, lines and Z-blocks.
#[derive(Debug, Parser)]
#[command(
    name = "droptris",
    version,
    about = "Single-screen falling-block puzzle in the terminal. Steer squares, lines and Z-blocks; full rows disappear.",
    long_about = "Droptris drops one of three shapes at a time onto a grid (10x16 by default).\n\n\
        Pieces fall one row per gravity tick. When a piece cannot fall any further it settles; \
        any completely filled row is removed and everything above it moves down.\n\n\
        CONTROLS:\n  Left/Right (h/l)  Move    Up (k)  Flip line / Z-block\n  R  Restart after game over    Q / Esc / Ctrl-C  Quit"
)]
pub struct Args {
    /// Grid width in cells.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(4..=40), value_name = "COLS")]
    pub columns: u16,

    /// Grid height in cells.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(4..=40), value_name = "ROWS")]
    pub rows: u16,

    /// Update calls per gravity tick (the piece falls one row every N updates).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..), value_name = "N")]
    pub gravity_every: u32,

    /// Simulation updates per second (1 to 1000).
    #[arg(long, default_value_t = 60.0, value_parser = parse_update_rate, value_name = "RATE")]
    pub update_rate: f64,

    /// Upper bound on the time one loop cycle may feed the simulation, in ms.
    #[arg(long, default_value_t = 100, value_name = "MS")]
    pub max_frame_ms: u64,

    /// Board theme file (`theme[key]="value"` lines). Built-in colours if not set or unreadable.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Seed for the shape sequence (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_update_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if rate.is_finite() && (tick::MIN_UPDATE_RATE..=tick::MAX_UPDATE_RATE).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!(
            "must be between {} and {} updates per second",
            tick::MIN_UPDATE_RATE,
            tick::MAX_UPDATE_RATE
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_board() {
        let args = Args::try_parse_from(["droptris"]).unwrap();
        let config = GameConfig::from(&args);
        assert_eq!((config.columns, config.rows), (10, 16));
        assert_eq!(config.gravity_every, 10);
        assert_eq!(config.max_frame_ms, 100);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(Args::try_parse_from(["droptris", "--columns", "3"]).is_err());
        assert!(Args::try_parse_from(["droptris", "--gravity-every", "0"]).is_err());
        let args = Args::try_parse_from(["droptris", "--rows", "20", "--seed", "9"]).unwrap();
        assert_eq!((args.rows, args.seed), (20, Some(9)));
    }

    #[test]
    fn test_update_rate_is_bounded() {
        for rate in ["0.5", "1001", "5000", "inf", "NaN", "fast"] {
            assert!(
                Args::try_parse_from(["droptris", "--update-rate", rate]).is_err(),
                "accepted {rate}"
            );
        }
        let args = Args::try_parse_from(["droptris", "--update-rate", "1000"]).unwrap();
        assert_eq!(args.update_rate, 1000.0);
        assert_eq!(Args::try_parse_from(["droptris"]).unwrap().update_rate, 60.0);
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
