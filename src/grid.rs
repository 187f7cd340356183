use rand::Rng;
use Direction::*;

/// A grid-aligned position, in pixels. Both coordinates are multiples of the
/// grid's unit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit vector, with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// A toroidal playing field measured in pixels and split into square cells of
/// `unit` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    unit: i32,
}

impl Grid {
    /// `width` and `height` must be positive multiples of `unit`; the config
    /// layer checks this before a grid is built.
    pub fn new(width: i32, height: i32, unit: i32) -> Self {
        debug_assert!(unit > 0 && width % unit == 0 && height % unit == 0);
        Grid { width, height, unit }
    }

    pub fn unit(&self) -> i32 {
        self.unit
    }

    /// Number of cells along the x axis.
    pub fn columns(&self) -> i32 {
        self.width / self.unit
    }

    /// Number of cells along the y axis.
    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }

    pub fn capacity(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x)
            && (0..self.height).contains(&cell.y)
            && cell.x % self.unit == 0
            && cell.y % self.unit == 0
    }

    /// Moves `cell` one unit towards `direction`, re-entering on the opposite
    /// edge when it leaves the field.
    pub fn wrap(&self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: (cell.x + dx * self.unit).rem_euclid(self.width),
            y: (cell.y + dy * self.unit).rem_euclid(self.height),
        }
    }

    /// Uniformly samples one cell of the grid.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        Cell {
            x: rng.gen_range(0..self.columns()) * self.unit,
            y: rng.gen_range(0..self.rows()) * self.unit,
        }
    }

    /// Column and row index of a cell.
    pub fn index_of(&self, cell: Cell) -> (i32, i32) {
        (cell.x / self.unit, cell.y / self.unit)
    }

    #[cfg(test)]
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |col| Cell::new(col * self.unit, row * self.unit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn reference_grid() -> Grid {
        Grid::new(640, 480, 20)
    }

    #[test]
    fn test_dimensions() {
        let grid = reference_grid();
        assert_eq!(grid.columns(), 32);
        assert_eq!(grid.rows(), 24);
        assert_eq!(grid.capacity(), 768);
        assert_eq!(grid.cells().count(), 768);
    }

    #[test]
    fn test_opposites() {
        assert_eq!(Up.opposite(), Down);
        assert_eq!(Down.opposite(), Up);
        assert_eq!(Left.opposite(), Right);
        assert_eq!(Right.opposite(), Left);
    }

    #[test]
    fn test_wrap_moves_one_unit() {
        let grid = reference_grid();
        let cell = Cell::new(320, 240);
        assert_eq!(grid.wrap(cell, Up), Cell::new(320, 220));
        assert_eq!(grid.wrap(cell, Down), Cell::new(320, 260));
        assert_eq!(grid.wrap(cell, Left), Cell::new(300, 240));
        assert_eq!(grid.wrap(cell, Right), Cell::new(340, 240));
    }

    #[test]
    fn test_wrap_reenters_opposite_edge() {
        let grid = reference_grid();
        assert_eq!(grid.wrap(Cell::new(620, 100), Right), Cell::new(0, 100));
        assert_eq!(grid.wrap(Cell::new(0, 100), Left), Cell::new(620, 100));
        assert_eq!(grid.wrap(Cell::new(40, 0), Up), Cell::new(40, 460));
        assert_eq!(grid.wrap(Cell::new(40, 460), Down), Cell::new(40, 0));
    }

    #[test]
    fn test_wrap_stays_on_grid() {
        let grid = reference_grid();
        for cell in grid.cells() {
            for &dir in Direction::ALL.iter() {
                assert!(grid.contains(grid.wrap(cell, dir)), "{:?} {:?}", cell, dir);
            }
        }
    }

    #[test]
    fn test_wrap_then_opposite_is_identity() {
        // Holds on the edges too, since both moves wrap modulo the grid.
        let grid = Grid::new(60, 40, 20);
        for cell in grid.cells() {
            for &dir in Direction::ALL.iter() {
                let there = grid.wrap(cell, dir);
                assert_eq!(grid.wrap(there, dir.opposite()), cell);
            }
        }
    }

    #[test]
    fn test_contains() {
        let grid = reference_grid();
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(620, 460)));
        assert!(!grid.contains(Cell::new(640, 0)));
        assert!(!grid.contains(Cell::new(0, -20)));
        assert!(!grid.contains(Cell::new(10, 0)));
    }

    #[test]
    fn test_random_cell_is_aligned() {
        let grid = reference_grid();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(grid.contains(grid.random_cell(&mut rng)));
        }
    }

    #[test]
    fn test_index_of() {
        let grid = reference_grid();
        assert_eq!(grid.index_of(Cell::new(0, 0)), (0, 0));
        assert_eq!(grid.index_of(Cell::new(320, 240)), (16, 12));
    }
}
