//! Pluggable sources of the next movement direction.
//!
//! A strategy is polled exactly once per tick; the session commits the
//! returned direction to the simulation for the following step. Strategies
//! are swapped at runtime by replacing the boxed instance; a fresh instance
//! is built for every activation.

mod chase;
mod manual;

pub use chase::GreedyChase;
pub use manual::ManualControl;

use crate::universe::{Direction, Universe};

/// A source of movement directions for the snake.
pub trait ControlStrategy: Send {
    /// Called exactly once when the strategy becomes the active one,
    /// including after every runtime swap.
    fn on_activate(&mut self);

    /// Returns the direction to commit for the next simulation step. Called
    /// once per tick; must not block.
    fn poll(&mut self, universe: &Universe) -> Direction;

    /// Short display name for the UI.
    fn label(&self) -> &'static str;

    /// Returns the latched direction to the default (`Right`). Invoked when
    /// the simulation restarts so strategy state matches simulation state.
    fn reset(&mut self);
}
