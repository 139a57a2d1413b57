use std::time::Duration;

use super::grid::{self, Grid, Step};

/// One seeded run of the simulation, owned by the control loop.
#[derive(Debug, Clone)]
pub struct Session {
    /// The current generation
    pub grid: Grid,
    /// Sessions started since launch, this one included
    pub run: u64,
    /// Generations stepped since seeding
    pub generation: u64,
    /// Live cells in `grid`
    pub population: usize,
    /// Frame rate the loop is ticking at
    pub fps: u32,
    /// Memory used by the whole system, sampled before each frame
    pub memory_mib: u64,
}

/// What one generation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    /// No cell changed.
    Converged,
    /// Two consecutive generations have the same population.
    Stalled,
}

impl Session {
    /// Starts a session at generation 0 on `grid`.
    ///
    /// # Arguments
    ///
    /// * `grid` - The seeded first generation
    /// * `run` - Sequence number of this session
    /// * `fps` - Frame rate to tick at
    pub fn new(grid: Grid, run: u64, fps: u32) -> Session {
        Session {
            population: grid.population(),
            grid,
            run,
            generation: 0,
            fps,
            memory_mib: 0,
        }
    }

    /// Swaps in the next generation and reports whether the run should go on.
    ///
    /// Stall detection only compares the two most recent populations, so an
    /// oscillator whose phases share a population is reported as stalled too.
    pub fn advance(&mut self) -> Progress {
        let Step {
            grid,
            changed,
            population,
        } = grid::step(&self.grid);
        let previous = self.population;

        self.grid = grid;
        self.generation += 1;
        self.population = population;

        if !changed {
            Progress::Converged
        } else if population == previous {
            Progress::Stalled
        } else {
            Progress::Running
        }
    }

    /// One frame per second faster, never above `max_fps`.
    pub fn speed_up(&mut self, max_fps: u32) {
        self.fps = self.fps.saturating_add(1).min(max_fps);
    }

    /// One frame per second slower, never below `min_fps`.
    pub fn slow_down(&mut self, min_fps: u32) {
        self.fps = self.fps.saturating_sub(1).max(min_fps);
    }

    /// Time between two frame ticks at the current rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_counts_population() {
        let session = Session::new(Grid::with_alive(5, 5, &[(0, 0), (4, 4)]), 3, 10);
        assert_eq!(session.population, 2);
        assert_eq!(session.generation, 0);
        assert_eq!(session.run, 3);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut session = Session::new(Grid::new(3, 3), 1, 10);
        session.speed_up(60);
        assert_eq!(session.fps, 11);

        session.fps = 1;
        for _ in 0..5 {
            session.slow_down(1);
        }
        assert_eq!(session.fps, 1);

        session.fps = 60;
        session.speed_up(60);
        assert_eq!(session.fps, 60);
    }

    #[test]
    fn test_frame_interval() {
        let mut session = Session::new(Grid::new(3, 3), 1, 10);
        assert_eq!(session.frame_interval(), Duration::from_millis(100));
        session.fps = 1;
        assert_eq!(session.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_advance_reports_convergence() {
        let block = Grid::with_alive(4, 4, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        let mut session = Session::new(block, 1, 10);
        assert_eq!(session.advance(), Progress::Converged);
        assert_eq!(session.generation, 1);
    }

    #[test]
    fn test_advance_reports_repeated_population() {
        // a glider keeps five cells in every phase
        let glider = Grid::with_alive(10, 10, &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        let mut session = Session::new(glider, 1, 10);
        assert_eq!(session.population, 5);
        assert_eq!(session.advance(), Progress::Stalled);
        assert_eq!(session.population, 5);
    }

    #[test]
    fn test_advance_keeps_running_while_population_moves() {
        // an R-pentomino grows for a while
        let r = Grid::with_alive(20, 20, &[(10, 9), (11, 9), (9, 10), (10, 10), (10, 11)]);
        let mut session = Session::new(r, 1, 10);
        assert_eq!(session.advance(), Progress::Running);
        assert_eq!(session.population, 6);
    }
}
