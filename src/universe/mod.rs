//! The grid simulation: cells, snake body, target placement, collision and
//! scoring. The rest of the crate only touches the narrow query/command
//! surface on [`Universe`].

pub mod cell;
pub mod direction;
pub mod grid;

pub use cell::Cell;
pub use direction::Direction;
pub use grid::{position_of, Universe};
