use super::ControlStrategy;
use crate::universe::{position_of, Direction, Universe};

/// Autopilot strategy: greedy axis-aligned chase toward the target.
///
/// Not a pathfinder. It ignores walls and the snake's own body, and when
/// neither row nor column is aligned it always moves vertically first,
/// deferring horizontal correction to a later tick.
pub struct GreedyChase {
    current: Direction,
}

impl GreedyChase {
    pub fn new() -> Self {
        Self {
            current: Direction::default(),
        }
    }
}

impl Default for GreedyChase {
    fn default() -> Self {
        Self::new()
    }
}

/// The chase decision itself: a pure function of head and target (row, col)
/// positions.
fn chase_direction(head: (u32, u32), target: (u32, u32)) -> Direction {
    let (head_row, head_col) = head;
    let (target_row, target_col) = target;

    if head_row == target_row {
        if head_col < target_col {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if head_col == target_col {
        if head_row < target_row {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if head_row < target_row {
        Direction::Down
    } else {
        Direction::Up
    }
}

impl ControlStrategy for GreedyChase {
    fn on_activate(&mut self) {}

    fn poll(&mut self, universe: &Universe) -> Direction {
        let width = universe.width();
        let head = position_of(universe.head_position(), width);
        let target = position_of(universe.target_position(), width);
        self.current = chase_direction(head, target);
        self.current
    }

    fn label(&self) -> &'static str {
        "Computer"
    }

    fn reset(&mut self) {
        self.current = Direction::default();
    }
}
