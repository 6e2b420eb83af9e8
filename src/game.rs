//! Game state: grid, active piece, gravity ticks, spawning and settling.

use crate::controller::{ActivePiece, Shift};
use crate::grid::{Grid, PlacementError};
use crate::lines;
use crate::piece::ShapeKind;
use crate::tick::TickScheduler;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What one update call did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not a gravity tick, or the game is over.
    Idle,
    Spawned(ShapeKind),
    Fell,
    /// The piece settled and this many rows were cleared.
    Settled { cleared: usize },
    /// The new piece had no room; the game is over.
    ToppedOut(ShapeKind),
}

/// Everything the simulation owns. There is at most one active piece.
#[derive(Debug)]
pub struct GameState {
    grid: Grid,
    piece: Option<ActivePiece>,
    ticks: TickScheduler,
    rng: StdRng,
    game_over: bool,
    pub lines_cleared: u32,
    pub pieces_settled: u32,
}

impl GameState {
    pub fn new(config: &crate::GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(
            usize::from(config.columns),
            usize::from(config.rows),
            config.gravity_every,
            rng,
        )
    }

    pub fn with_rng(columns: usize, rows: usize, cadence: u32, rng: StdRng) -> Self {
        Self {
            grid: Grid::new(columns, rows),
            piece: None,
            ticks: TickScheduler::new(cadence),
            rng,
            game_over: false,
            lines_cleared: 0,
            pieces_settled: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Update calls since the last (re)start.
    pub fn updates(&self) -> u64 {
        self.ticks.updates()
    }

    /// One simulation update call. Every `cadence`-th call is a gravity tick.
    pub fn update(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Idle;
        }
        if self.ticks.advance() {
            self.gravity_tick()
        } else {
            TickOutcome::Idle
        }
    }

    /// Spawn a piece if none is active, otherwise move the active piece down.
    pub fn gravity_tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Idle;
        }
        let Some(piece) = self.piece.as_mut() else {
            let shape = ShapeKind::ALL[self.rng.gen_range(0..ShapeKind::ALL.len())];
            return self.spawn(shape);
        };
        match piece.fall(&mut self.grid) {
            Ok(()) => TickOutcome::Fell,
            Err(_) => {
                let shape = piece.shape;
                let cells = piece.cells();
                self.piece = None;
                let cleared = lines::settle(&mut self.grid, &cells, shape);
                self.pieces_settled += 1;
                self.lines_cleared += cleared as u32;
                if cleared > 0 {
                    info!("cleared {cleared} row(s), {} total", self.lines_cleared);
                }
                TickOutcome::Settled { cleared }
            }
        }
    }

    /// Place `shape` at its spawn point. Ends the game if there is no room.
    pub fn spawn(&mut self, shape: ShapeKind) -> TickOutcome {
        if self.piece.is_some() {
            return TickOutcome::Idle;
        }
        match ActivePiece::spawn(&mut self.grid, shape) {
            Ok(piece) => {
                debug!("spawned {:?} at ({}, {})", shape, piece.column, piece.row);
                self.piece = Some(piece);
                TickOutcome::Spawned(shape)
            }
            Err(err) => {
                info!("game over: {shape:?} cannot spawn ({err})");
                self.game_over = true;
                TickOutcome::ToppedOut(shape)
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(Shift::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(Shift::Right)
    }

    fn shift(&mut self, shift: Shift) -> bool {
        self.with_piece(|piece, grid| piece.shift(grid, shift).map(|()| true))
    }

    pub fn toggle_orientation(&mut self) -> bool {
        self.with_piece(|piece, grid| piece.toggle_orientation(grid))
    }

    fn with_piece(
        &mut self,
        op: impl FnOnce(&mut ActivePiece, &mut Grid) -> Result<bool, PlacementError>,
    ) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        match op(piece, &mut self.grid) {
            Ok(changed) => changed,
            Err(err) => {
                debug!("rejected move: {err}");
                false
            }
        }
    }

    /// Fresh grid and counters; keeps the RNG stream and the cadence.
    pub fn restart(&mut self) {
        self.grid = Grid::new(self.grid.columns(), self.grid.rows());
        self.piece = None;
        self.ticks = TickScheduler::new(self.ticks.cadence());
        self.game_over = false;
        self.lines_cleared = 0;
        self.pieces_settled = 0;
    }
}
