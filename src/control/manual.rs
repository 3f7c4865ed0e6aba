use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

use super::ControlStrategy;
use crate::input::InputHub;
use crate::universe::{Direction, Universe};

/// Keyboard-driven strategy: latches the most recent directional key press.
///
/// The hub subscription is created on activation and dropped with the
/// strategy, so repeated swaps never accumulate listeners.
pub struct ManualControl {
    current: Direction,
    hub: InputHub,
    keys: Option<Receiver<Direction>>,
}

impl ManualControl {
    pub fn new(hub: InputHub) -> Self {
        Self {
            current: Direction::default(),
            hub,
            keys: None,
        }
    }
}

impl ControlStrategy for ManualControl {
    fn on_activate(&mut self) {
        self.keys = Some(self.hub.subscribe());
    }

    fn poll(&mut self, _universe: &Universe) -> Direction {
        if let Some(keys) = &mut self.keys {
            // Drain everything published since the last poll; only the most
            // recent press wins.
            loop {
                match keys.try_recv() {
                    Ok(direction) => self.current = direction,
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }
        }
        self.current
    }

    fn label(&self) -> &'static str {
        "You!"
    }

    fn reset(&mut self) {
        self.current = Direction::default();
        // Presses queued before the reset must not steer the new game;
        // a fresh subscription only sees what is published after it.
        if self.keys.is_some() {
            self.keys = Some(self.hub.subscribe());
        }
    }
}
