//! App: terminal init, main loop, input and tick handling.

use crate::GameConfig;
use crate::game::{GameState, TickOutcome};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::tick::FrameClock;
use anyhow::Result;
use crossterm::event::{self, Event};
use log::{info, warn};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    theme: Theme,
    state: GameState,
    clock: FrameClock,
    quit: bool,
}

impl App {
    pub fn new(config: &GameConfig, theme: Theme) -> Self {
        Self {
            theme,
            state: GameState::new(config),
            clock: FrameClock::new(
                config.update_rate,
                Duration::from_millis(config.max_frame_ms),
                config.gravity_every,
            ),
            quit: false,
        }
    }

    /// Apply one input action to the game. Takes effect immediately.
    fn apply_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.state.move_left();
            }
            Action::MoveRight => {
                self.state.move_right();
            }
            Action::ToggleOrientation => {
                self.state.toggle_orientation();
            }
            Action::Restart => {
                info!("restart");
                self.state.restart();
            }
            Action::Quit => self.quit = true,
            Action::None => {}
        }
    }

    /// Run the fixed-rate updates that `elapsed` is worth.
    fn advance(&mut self, elapsed: Duration) {
        for _ in 0..self.clock.advance(elapsed) {
            if let TickOutcome::ToppedOut(shape) = self.state.update() {
                info!(
                    "topped out by {:?} after {} pieces, {} rows",
                    shape, self.state.pieces_settled, self.state.lines_cleared
                );
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        if let Err(err) = terminal.show_cursor() {
            warn!("cannot restore cursor: {err}");
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    /// poll input → apply → tick → draw, until quit.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut last = Instant::now();
        while !self.quit {
            if event::poll(self.clock.until_next())? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        self.apply_action(key_to_action(key));
                    }
                }
            }
            if self.quit {
                break;
            }

            let now = Instant::now();
            self.advance(now.duration_since(last));
            last = now;

            terminal.draw(|f| crate::ui::draw(f, &self.state, &self.theme))?;
        }
        Ok(())
    }
}
