/// State of a single grid cell, in the row-major order exposed by
/// [`Universe::cell_states`](super::Universe::cell_states).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty = 0,
    Occupied = 1,
    Target = 2,
}
