use std::collections::VecDeque;

use anyhow::{bail, Result};
use rand::Rng;

use super::{Cell, Direction};

type Coord = (u32, u32);

/// Largest cell count the simulation will accept. Far beyond anything a
/// terminal can draw, but keeps index arithmetic and allocation sane.
const MAX_CELLS: u64 = 1 << 20;

/// Converts a linear cell index into a (row, col) pair for a grid of the
/// given width.
pub fn position_of(index: usize, width: u32) -> Coord {
    let width = width as usize;
    ((index / width) as u32, (index % width) as u32)
}

/// The snake body as a coordinate deque: tail at the front, head at the back.
#[derive(Debug, Clone)]
struct Snake {
    body: VecDeque<Coord>,
    direction: Direction,
}

impl Snake {
    fn new(tail: Coord, head: Coord) -> Self {
        let mut body = VecDeque::new();
        body.push_back(tail);
        body.push_back(head);
        Self {
            body,
            direction: Direction::default(),
        }
    }

    fn head(&self) -> Coord {
        *self.body.back().unwrap()
    }

    fn push_head(&mut self, coord: Coord) {
        self.body.push_back(coord);
    }

    fn pop_tail(&mut self) -> Coord {
        self.body.pop_front().unwrap()
    }
}

/// The grid simulation: cells, snake, target placement, collision and
/// scoring. Consumers drive it through a narrow surface: [`tick`],
/// [`set_direction`], and the query methods.
///
/// [`tick`]: Universe::tick
/// [`set_direction`]: Universe::set_direction
pub struct Universe {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    snake: Snake,
    target: usize,
    score: u32,
    rng: rand::rngs::ThreadRng,
}

impl Universe {
    /// Creates a fresh universe: a two-segment snake in the top-left corner
    /// heading right, one randomly placed target, score zero.
    ///
    /// Fails if the grid cannot hold the initial snake plus a free cell for
    /// the target.
    pub fn new(width: u32, height: u32) -> Result<Universe> {
        let cell_count = u64::from(width) * u64::from(height);
        if width < 2 || cell_count < 3 {
            bail!("grid {width}x{height} is too small for a snake and a target");
        }
        if cell_count > MAX_CELLS {
            bail!("grid {width}x{height} is too large to simulate");
        }

        let mut universe = Universe {
            width,
            height,
            cells: vec![Cell::Empty; cell_count as usize],
            snake: Snake::new((0, 0), (0, 1)),
            target: 0,
            score: 0,
            rng: rand::thread_rng(),
        };
        universe.occupy_snake_cells();
        universe.place_random_target();
        Ok(universe)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Linear index of the snake's head cell.
    pub fn head_position(&self) -> usize {
        let (row, col) = self.snake.head();
        self.index_of(row, col)
    }

    /// Linear index of the current target cell.
    pub fn target_position(&self) -> usize {
        self.target
    }

    /// Row-major per-cell states, for drawing.
    pub fn cell_states(&self) -> &[Cell] {
        &self.cells
    }

    /// Latches a new movement direction for the next tick. A direction
    /// opposite to the current one is ignored (the snake cannot reverse
    /// into itself).
    pub fn set_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(self.snake.direction) {
            self.snake.direction = direction;
        }
    }

    /// Advances the simulation one step. Returns whether the snake is still
    /// alive: leaving the grid or running into its own body is fatal;
    /// reaching the target grows the snake, bumps the score, and spawns a
    /// new target.
    pub fn tick(&mut self) -> bool {
        let (row, col) = self.snake.head();
        let (d_row, d_col) = self.snake.direction.delta();
        let next_row = i64::from(row) + i64::from(d_row);
        let next_col = i64::from(col) + i64::from(d_col);

        if next_row < 0
            || next_col < 0
            || next_row >= i64::from(self.height)
            || next_col >= i64::from(self.width)
        {
            return false;
        }

        let next = (next_row as u32, next_col as u32);
        let index = self.index_of(next.0, next.1);

        match self.cells[index] {
            Cell::Occupied => return false,
            Cell::Target => {
                self.snake.push_head(next);
                self.cells[index] = Cell::Occupied;
                self.score += 1;
                self.place_random_target();
            }
            Cell::Empty => {
                self.snake.push_head(next);
                self.cells[index] = Cell::Occupied;
                let (tail_row, tail_col) = self.snake.pop_tail();
                let tail_index = self.index_of(tail_row, tail_col);
                self.cells[tail_index] = Cell::Empty;
            }
        }

        true
    }

    /// Resets to the initial state. Grid dimensions are unchanged.
    pub fn restart(&mut self) {
        self.cells.fill(Cell::Empty);
        self.snake = Snake::new((0, 0), (0, 1));
        self.score = 0;
        self.occupy_snake_cells();
        self.place_random_target();
    }

    /// Moves the target to a specific cell, clearing the previous one.
    /// Programmatic placement hook; random placement is the normal path.
    pub fn place_target_at(&mut self, row: u32, col: u32) {
        if self.cells[self.target] == Cell::Target {
            self.cells[self.target] = Cell::Empty;
        }
        let index = self.index_of(row, col);
        self.cells[index] = Cell::Target;
        self.target = index;
    }

    fn index_of(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    fn occupy_snake_cells(&mut self) {
        for &(row, col) in &self.snake.body {
            let index = self.index_of(row, col);
            self.cells[index] = Cell::Occupied;
        }
    }

    fn place_random_target(&mut self) {
        if !self.cells.contains(&Cell::Empty) {
            return;
        }
        loop {
            let index = self.rng.gen_range(0..self.cells.len());
            if self.cells[index] != Cell::Occupied {
                self.cells[index] = Cell::Target;
                self.target = index;
                break;
            }
        }
    }
}
