//! Keyboard classification and the direction-event hub.

pub mod handler;
pub mod hub;

pub use handler::{InputHandler, KeyAction};
pub use hub::InputHub;
