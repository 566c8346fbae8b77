use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at, sleep_until};

use crate::game::Phase;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::{Session, SessionEvent};

/// Frames per second for drawing, independent of the game tick
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Terminal front end driving one session
///
/// Single-task scheduling: input, the game tick, the power-up deadline and
/// the render timer all meet in one `select!` loop, so every handler runs to
/// completion before the next fires. Pausing drops the tick timer; a fresh
/// one is built on resume or whenever the tick period changes.
pub struct SessionRunner {
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl SessionRunner {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_event_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        // No tick timer until the session starts running
        let mut ticker: Option<Interval> = None;
        let mut tick_period = self.session.tick_period();

        loop {
            let deadline = self
                .session
                .next_deadline_in()
                .map(|delay| Instant::now() + delay);

            tokio::select! {
                // Keyboard input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = next_tick(&mut ticker) => {
                    self.advance_session();
                }

                // Earliest power-up or effect deadline
                _ = sleep_until_deadline(deadline) => {
                    self.session.expire_due();
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session.view(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            self.sync_ticker(&mut ticker, &mut tick_period);

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    /// Rebuild or drop the tick timer after anything may have changed the
    /// phase, the base speed or the multiplier
    fn sync_ticker(&mut self, ticker: &mut Option<Interval>, tick_period: &mut Duration) {
        if self.session.phase() != Phase::Running {
            *ticker = None;
            return;
        }

        let period = self.session.tick_period();
        if ticker.is_none() || period != *tick_period {
            *tick_period = period;
            *ticker = Some(interval_at(Instant::now() + period, period));
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    self.session.steer(direction);
                }
                KeyAction::TogglePause => {
                    self.session.toggle_pause();
                }
                KeyAction::Confirm => self.confirm(),
                KeyAction::Restart => self.restart(),
                KeyAction::SpeedUp => {
                    self.session.adjust_speed(1);
                }
                KeyAction::SpeedDown => {
                    self.session.adjust_speed(-1);
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Enter: start a fresh board, or clear a finished one
    fn confirm(&mut self) {
        match self.session.phase() {
            Phase::Idle => {
                self.session.start();
            }
            Phase::Over => {
                self.session.acknowledge();
            }
            Phase::Running | Phase::Paused => {}
        }
    }

    /// R: from a finished game, straight into a new one
    fn restart(&mut self) {
        if self.session.phase() == Phase::Over {
            self.session.acknowledge();
        }
        if self.session.phase() == Phase::Idle {
            self.session.start();
        }
    }

    fn advance_session(&mut self) {
        for event in self.session.advance() {
            match event {
                SessionEvent::GameOver {
                    final_score,
                    new_high_score,
                    ..
                } => {
                    self.metrics.on_game_over();
                    if new_high_score {
                        info!("new high score: {final_score}");
                    }
                }
                other => debug!("{other:?}"),
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Wait for the next game tick, or forever while ticking is suspended
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Wait until the deadline, or forever when there is none
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::storage::HighScoreStore;

    fn test_runner() -> SessionRunner {
        let session = Session::new(GameConfig::small(), HighScoreStore::disabled()).unwrap();
        SessionRunner::new(session)
    }

    #[test]
    fn test_runner_starts_idle() {
        let runner = test_runner();
        assert_eq!(runner.session.phase(), Phase::Idle);
        assert!(!runner.should_quit);
    }

    #[test]
    fn test_confirm_starts_and_restart_chains_from_over() {
        let mut runner = test_runner();

        runner.confirm();
        assert_eq!(runner.session.phase(), Phase::Running);

        // confirm while running does nothing
        runner.confirm();
        assert_eq!(runner.session.phase(), Phase::Running);

        runner.session.state_mut().phase = Phase::Over;
        runner.restart();
        assert_eq!(runner.session.phase(), Phase::Running);
        assert_eq!(runner.session.state().score, 0);
    }

    #[test]
    fn test_ticker_follows_phase() {
        let mut runner = test_runner();
        let mut ticker = None;
        let mut period = runner.session.tick_period();

        // tokio timers need a runtime to be created
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = rt.enter();

        runner.sync_ticker(&mut ticker, &mut period);
        assert!(ticker.is_none(), "idle session must not tick");

        runner.session.start();
        runner.sync_ticker(&mut ticker, &mut period);
        assert!(ticker.is_some());

        runner.session.pause();
        runner.sync_ticker(&mut ticker, &mut period);
        assert!(ticker.is_none(), "paused session must drop its ticker");

        // dropping it again stays a no-op
        runner.sync_ticker(&mut ticker, &mut period);
        assert!(ticker.is_none());
    }
}
