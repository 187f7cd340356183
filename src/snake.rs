use std::collections::VecDeque;

use crate::grid::{Cell, Direction, Grid};
use tracing::trace;
use Direction::*;

const START_DIRECTION: Direction = Right;

pub struct Snake {
    start: Cell,
    body: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
    target_length: usize,
}

impl Snake {
    pub fn new(start: Cell) -> Self {
        let mut snake = Snake {
            start,
            body: VecDeque::new(),
            direction: START_DIRECTION,
            pending_direction: None,
            target_length: 1,
        };
        snake.reset();
        snake
    }

    /// Body cells, head first.
    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn head(&self) -> Cell {
        // The body is never empty: it starts with one cell and `advance`
        // pushes before it pops.
        self.body[0]
    }

    /// Queues a turn for the next move. A request to go straight back is
    /// dropped, otherwise the head would run into the neck.
    pub fn set_pending_direction(&mut self, new_direction: Direction) {
        if new_direction == self.direction.opposite() {
            trace!(?new_direction, current = ?self.direction, "reversal ignored");
            return;
        }
        self.pending_direction = Some(new_direction);
    }

    /// Moves one cell forward and returns the tail cell that was dropped, or
    /// `None` when the snake grew this move.
    pub fn advance(&mut self, grid: &Grid) -> Option<Cell> {
        if let Some(dir) = self.pending_direction.take() {
            self.direction = dir;
        }

        let new_head = grid.wrap(self.head(), self.direction);
        self.body.push_front(new_head);

        if self.body.len() > self.target_length {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&cell| cell == head)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(self.start);
        self.target_length = 1;
        self.direction = START_DIRECTION;
        self.pending_direction = None;
    }

    /// Builds a snake with an explicit body, as if it had been playing for a
    /// while.
    #[cfg(test)]
    pub fn with_body(start: Cell, body: &[Cell], direction: Direction) -> Self {
        Snake {
            start,
            body: body.iter().copied().collect(),
            direction,
            pending_direction: None,
            target_length: body.len(),
        }
    }
}
