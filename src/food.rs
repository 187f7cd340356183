use std::collections::HashSet;

use crate::grid::{Cell, Grid};
use rand::Rng;

pub struct Food {
    position: Cell,
}

impl Food {
    /// Places a new food item on a random cell outside `occupied`.
    pub fn new<R: Rng + ?Sized>(grid: &Grid, occupied: &HashSet<Cell>, rng: &mut R) -> Self {
        let mut food = Food { position: Cell::new(0, 0) };
        food.relocate(grid, occupied, rng);
        food
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Moves the food to a uniformly random cell that is not in `occupied`.
    ///
    /// Sampling is retried until a free cell comes up, so this never returns
    /// if `occupied` covers the whole grid.
    pub fn relocate<R: Rng + ?Sized>(&mut self, grid: &Grid, occupied: &HashSet<Cell>, rng: &mut R) {
        self.position = loop {
            let cell = grid.random_cell(rng);
            if !occupied.contains(&cell) {
                break cell;
            }
        };
    }

    #[cfg(test)]
    pub fn at(position: Cell) -> Self {
        Food { position }
    }
}
