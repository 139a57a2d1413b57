//! The cellular automaton itself: a toroidal field of cells and Conway's rule.

use rand::Rng;

/// A `width` x `height` field of cells whose edges wrap around.
///
/// Cells are stored row-major. A grid is treated as an immutable generation:
/// [`step`] always returns a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    #[cfg(test)]
    pub fn with_alive(width: usize, height: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(x, y) in alive {
            grid.set(x, y, true);
        }
        grid
    }

    /// Number of cells per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads a cell without wrapping.
    ///
    /// # Arguments
    ///
    /// * `x` - Column, below `width`
    /// * `y` - Row, below `height`
    ///
    /// # Panics
    ///
    /// When the coordinates are outside the grid.
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    /// Sets a cell without wrapping. Same bounds as [`Grid::is_alive`].
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        self.cells[y * self.width + x] = alive;
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Counts the live cells among the 8 neighbours of `(x, y)`.
    ///
    /// Coordinates wrap, so a cell on an edge sees the opposite edge.
    ///
    /// # Returns
    ///
    /// The number of live neighbours (0-8)
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let nx = (x as isize + dx).rem_euclid(self.width as isize) as usize;
                let ny = (y as isize + dy).rem_euclid(self.height as isize) as usize;

                if self.is_alive(nx, ny) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Iterates `(x, y, alive)` row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &alive)| (i % self.width, i / self.width, alive))
    }
}

/// Result of advancing one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub grid: Grid,
    /// Whether any cell differs from the previous generation.
    pub changed: bool,
    pub population: usize,
}

/// Fills a new grid where every cell is alive with probability `density`.
///
/// # Arguments
///
/// * `width` - Cells per row
/// * `height` - Rows
/// * `density` - Probability of a live cell, between 0 and 1
/// * `rng` - Source of randomness; a seeded one gives a reproducible grid
pub fn seed<R: Rng + ?Sized>(width: usize, height: usize, density: f64, rng: &mut R) -> Grid {
    Grid {
        width,
        height,
        cells: (0..width * height).map(|_| rng.gen_bool(density)).collect(),
    }
}

/// Computes the next generation without touching `grid`:
///
/// * a live cell with two or three live neighbours survives
/// * a dead cell with exactly three live neighbours is born
/// * every other cell dies or stays dead
pub fn step(grid: &Grid) -> Step {
    let mut next = Grid::new(grid.width, grid.height);
    let mut changed = false;
    let mut population = 0;

    for y in 0..grid.height {
        for x in 0..grid.width {
            let alive = grid.is_alive(x, y);
            let next_alive = match (alive, grid.live_neighbors(x, y)) {
                (true, 2) | (true, 3) => true,
                (false, 3) => true,
                _ => false,
            };
            next.set(x, y, next_alive);
            changed |= next_alive != alive;
            population += usize::from(next_alive);
        }
    }

    Step {
        grid: next,
        changed,
        population,
    }
}
