use tokio::sync::broadcast;

use crate::universe::Direction;

const CHANNEL_CAPACITY: usize = 32;

/// Fan-out point for directional key presses.
///
/// The session publishes every recognized directional press here; a manual
/// strategy subscribes on activation. Dropping the receiver (when the
/// strategy is swapped out) is the unsubscription, so repeated swaps never
/// stack up listeners. A subscriber only observes presses published after it
/// subscribed, which keeps a freshly activated strategy on the default
/// direction until the player actually steers.
#[derive(Clone)]
pub struct InputHub {
    sender: broadcast::Sender<Direction>,
}

impl InputHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes a directional press. Silently dropped when nothing is
    /// subscribed (e.g. while the autopilot is driving).
    pub fn publish(&self, direction: Direction) {
        let _ = self.sender.send(direction);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Direction> {
        self.sender.subscribe()
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}
