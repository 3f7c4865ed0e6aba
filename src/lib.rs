//! Terminal snake with swappable control strategies.
//!
//! This library provides:
//! - The grid simulation (universe module)
//! - Pluggable control strategies: keyboard and greedy autopilot (control module)
//! - Keyboard mapping and the direction-event hub (input module)
//! - Session orchestration and the adaptive frame scheduler (session module)
//! - TUI rendering (render module)

pub mod control;
pub mod input;
pub mod render;
pub mod session;
pub mod stats;
pub mod universe;

pub use control::{ControlStrategy, GreedyChase, ManualControl};
pub use session::{FrameScheduler, GameSession, Pilot, TickOutcome};
pub use universe::{Cell, Direction, Universe};
