//! Game orchestration: one simulation, one active control strategy, and the
//! adaptive tick loop that drives them.

pub mod scheduler;

pub use scheduler::{FrameScheduler, SchedulerState};

use std::io::{stderr, Stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time;

use crate::control::{ControlStrategy, GreedyChase, ManualControl};
use crate::input::{InputHandler, InputHub, KeyAction};
use crate::render::Renderer;
use crate::stats::SessionStats;
use crate::universe::Universe;

/// Which built-in strategy is driving the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pilot {
    Manual,
    Auto,
}

impl Pilot {
    fn other(self) -> Pilot {
        match self {
            Pilot::Manual => Pilot::Auto,
            Pilot::Auto => Pilot::Manual,
        }
    }
}

/// Result of one tick, read once per frame and never stored beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub alive: bool,
    pub score: u32,
}

pub struct GameSession {
    universe: Universe,
    strategy: Box<dyn ControlStrategy>,
    active_pilot: Pilot,
    hub: InputHub,
    scheduler: FrameScheduler,
    input_handler: InputHandler,
    renderer: Renderer,
    stats: SessionStats,
    alive: bool,
    should_quit: bool,
}

impl GameSession {
    pub fn new(width: u32, height: u32, pilot: Pilot) -> Result<Self> {
        let universe = Universe::new(width, height)?;
        let hub = InputHub::new();
        let strategy = build_pilot(pilot, &hub);

        Ok(Self {
            universe,
            strategy,
            active_pilot: pilot,
            hub,
            scheduler: FrameScheduler::new(),
            input_handler: InputHandler::new(),
            renderer: Renderer::new(),
            stats: SessionStats::new(),
            alive: true,
            should_quit: false,
        })
    }

    /// Takes over the terminal and runs the game until the player quits.
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.strategy.on_activate();
        self.stats.on_game_start();

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick timer is rearmed after every live tick with a delay
        // derived from the current score. While the scheduler is stopped the
        // timer is simply never polled or rearmed; restart resets it to fire
        // at once.
        let mut tick_timer = Box::pin(time::sleep(Duration::ZERO));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event) {
                            tick_timer.as_mut().reset(time::Instant::now());
                        }
                        self.draw(terminal)?;
                    }
                }

                () = tick_timer.as_mut(), if self.scheduler.is_running() => {
                    let outcome = self.tick();
                    self.draw(terminal)?;
                    if outcome.alive {
                        let delay = FrameScheduler::delay_after(outcome.score);
                        tick_timer.as_mut().reset(time::Instant::now() + delay);
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Routes a terminal event. Returns true when the tick timer should be
    /// rearmed immediately (the game was restarted).
    fn handle_event(&mut self, event: Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                self.hub.publish(direction);
                false
            }
            KeyAction::SwapPilot => {
                self.toggle_strategy();
                false
            }
            KeyAction::Restart => {
                self.restart();
                true
            }
            KeyAction::Quit => {
                self.should_quit = true;
                false
            }
            KeyAction::None => false,
        }
    }

    /// Advances the simulation one step, polls the active strategy, and
    /// commits the returned direction for the *next* step. Death stops the
    /// scheduler so no further tick is armed until a restart.
    pub fn tick(&mut self) -> TickOutcome {
        let alive = self.universe.tick();
        let direction = self.strategy.poll(&self.universe);
        self.universe.set_direction(direction);

        if !alive {
            if self.alive {
                self.stats.on_game_over(self.universe.score());
            }
            self.scheduler.stop();
        }
        self.alive = alive;

        TickOutcome {
            alive,
            score: self.universe.score(),
        }
    }

    /// Replaces the active strategy with `next`, activating it exactly once.
    /// The previous strategy is dropped, which releases any input
    /// subscription it held. Simulation state is untouched.
    pub fn swap_strategy(&mut self, mut next: Box<dyn ControlStrategy>) {
        next.on_activate();
        self.strategy = next;
    }

    /// Alternates between the two built-in pilots; bound to the swap key.
    pub fn toggle_strategy(&mut self) {
        let pilot = self.active_pilot.other();
        let next = build_pilot(pilot, &self.hub);
        self.active_pilot = pilot;
        self.swap_strategy(next);
    }

    /// Resets the simulation and the strategy's latched direction, then
    /// resumes scheduling.
    pub fn restart(&mut self) {
        self.universe.restart();
        self.strategy.reset();
        self.alive = true;
        self.scheduler.resume();
        self.stats.on_game_start();
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.stats.update();
        let renderer = &self.renderer;
        let universe = &self.universe;
        let alive = self.alive;
        let label = self.strategy.label();
        let stats = &self.stats;
        terminal
            .draw(|frame| {
                renderer.render(frame, universe, alive, label, stats);
            })
            .context("Failed to draw frame")?;
        Ok(())
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

fn build_pilot(pilot: Pilot, hub: &InputHub) -> Box<dyn ControlStrategy> {
    match pilot {
        Pilot::Manual => Box::new(ManualControl::new(hub.clone())),
        Pilot::Auto => Box::new(GreedyChase::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::{Cell, Direction};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Probe {
        activations: Arc<AtomicUsize>,
    }

    impl ControlStrategy for Probe {
        fn on_activate(&mut self) {
            self.activations.fetch_add(1, Ordering::SeqCst);
        }

        fn poll(&mut self, _universe: &Universe) -> Direction {
            Direction::Right
        }

        fn label(&self) -> &'static str {
            "Probe"
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn test_polled_direction_applies_on_the_next_step() {
        let mut session = GameSession::new(8, 8, Pilot::Auto).unwrap();
        // Head starts at (0, 1); an unaligned target makes the autopilot
        // steer down.
        session.universe.place_target_at(4, 5);

        // This tick still resolves with the buffered Right direction.
        session.tick();
        assert_eq!(session.universe.head_position(), 2); // (0, 2)

        // The direction polled last tick takes effect now.
        session.tick();
        assert_eq!(session.universe.head_position(), 10); // (1, 2)
    }

    #[test]
    fn test_swap_preserves_score_and_board() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.universe.place_target_at(0, 2);
        let outcome = session.tick();
        assert!(outcome.alive);
        assert_eq!(outcome.score, 1);
        assert_eq!(session.strategy.label(), "You!");

        let cells_before = session.universe.cell_states().to_vec();
        session.toggle_strategy();

        assert_eq!(session.strategy.label(), "Computer");
        assert_eq!(session.universe.score(), 1);
        assert_eq!(session.universe.cell_states(), cells_before.as_slice());
        assert!(session.alive);
    }

    #[test]
    fn test_toggle_alternates_pilots() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.toggle_strategy();
        assert_eq!(session.active_pilot, Pilot::Auto);
        session.toggle_strategy();
        assert_eq!(session.active_pilot, Pilot::Manual);
        assert_eq!(session.strategy.label(), "You!");
    }

    #[test]
    fn test_swap_activates_exactly_once() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        let activations = Arc::new(AtomicUsize::new(0));
        session.swap_strategy(Box::new(Probe {
            activations: Arc::clone(&activations),
        }));
        assert_eq!(activations.load(Ordering::SeqCst), 1);

        // Swapping again replaces the probe without re-activating it.
        session.toggle_strategy();
        assert_eq!(activations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_death_stops_scheduling_until_restart() {
        let mut session = GameSession::new(4, 4, Pilot::Manual).unwrap();
        session.universe.place_target_at(3, 3);

        let mut outcome = session.tick();
        while outcome.alive {
            outcome = session.tick();
        }

        assert!(!session.alive);
        assert!(!session.scheduler.is_running());

        session.restart();
        assert!(session.scheduler.is_running());
        assert!(session.alive);
        assert_eq!(session.universe.score(), 0);
        assert_eq!(session.universe.head_position(), 1);
    }

    #[test]
    fn test_restart_resets_manual_latch_to_right() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.strategy.on_activate();

        session.hub.publish(Direction::Down);
        assert_eq!(session.strategy.poll(&session.universe), Direction::Down);

        session.restart();
        assert_eq!(session.strategy.poll(&session.universe), Direction::Right);
    }

    #[test]
    fn test_restart_discards_presses_from_the_previous_game() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.strategy.on_activate();

        // A press that was never polled, e.g. arrows mashed on the death
        // screen, must not steer the new snake.
        session.hub.publish(Direction::Down);
        session.restart();

        assert_eq!(session.strategy.poll(&session.universe), Direction::Right);
    }

    #[test]
    fn test_dropped_manual_strategy_releases_its_subscription() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.strategy.on_activate();
        session.toggle_strategy(); // manual dropped, autopilot in

        // With no subscriber left, steering presses go nowhere.
        session.hub.publish(Direction::Up);
        session.universe.place_target_at(0, 5); // same row: autopilot says Right
        session.tick();
        assert_eq!(session.strategy.poll(&session.universe), Direction::Right);
    }

    #[test]
    fn test_restart_after_eating_restores_initial_board() {
        let mut session = GameSession::new(8, 8, Pilot::Manual).unwrap();
        session.universe.place_target_at(0, 2);
        session.tick();
        assert_eq!(session.universe.score(), 1);

        session.restart();
        let occupied = session
            .universe
            .cell_states()
            .iter()
            .filter(|&&cell| cell == Cell::Occupied)
            .count();
        assert_eq!(occupied, 2);
    }
}
