//! Turns a session snapshot into terminal commands.
//!
//! Every frame is a full redraw: each cell is two blank columns on a colored
//! background, followed by a status banner below the grid.

use crate::tty::{Command, Rgb};

use super::session::Session;

/// Lines reserved under the grid for the banner.
pub const BANNER_LINES: usize = 2;

const CELL: &str = "  ";
const KEY_HINTS: &str = "q quit | + faster | - slower | any other key restarts";

/// Draws the grid and banner of `session`.
///
/// Live cells sweep through the color wheel with position and generation;
/// dead cells are painted `dead`.
pub fn draw(session: &Session, dead: Rgb) -> Vec<Command> {
    let grid = &session.grid;
    let columns = grid.width() * 2;
    let mut commands = Vec::with_capacity(grid.width() * grid.height() * 3 + 1 + BANNER_LINES * 2);

    for (x, y, alive) in grid.cells() {
        commands.push(Command::MoveTo {
            x: (x * 2) as u16,
            y: y as u16,
        });
        let color = if alive {
            live_color(x, y, session.generation)
        } else {
            dead
        };
        commands.push(Command::SetBackground(color));
        commands.push(Command::Print(CELL.into()));
    }

    commands.push(Command::ResetStyle);
    for (i, line) in banner(session).into_iter().enumerate() {
        commands.push(Command::MoveTo {
            x: 0,
            y: (grid.height() + i) as u16,
        });
        commands.push(Command::Print(pad(&line, columns).into()));
    }
    commands
}

fn banner(session: &Session) -> [String; BANNER_LINES] {
    [
        format!(
            "run {} | {} fps | generation {} | population {} | memory {} MiB",
            session.run, session.fps, session.generation, session.population, session.memory_mib
        ),
        KEY_HINTS.to_owned(),
    ]
}

/// Pads with spaces, or cuts, to exactly `columns` characters.
fn pad(line: &str, columns: usize) -> String {
    format!("{line:<columns$.columns$}")
}

fn live_color(x: usize, y: usize, generation: u64) -> Rgb {
    let hue = (x as u64 + y as u64 + generation) % 256;
    wheel(hue as u8, 0.65, 0.95)
}

/// Color at `hue` on a 256-step wheel, red at 0 and cyan at 128.
fn wheel(hue: u8, saturation: f32, value: f32) -> Rgb {
    let position = f32::from(hue) * 6.0 / 256.0;
    let sector = position.floor();
    let fraction = position - sector;

    let low = value * (1.0 - saturation);
    let falling = value * (1.0 - saturation * fraction);
    let rising = value * (1.0 - saturation * (1.0 - fraction));
    let (r, g, b) = match sector as u8 {
        0 => (value, rising, low),
        1 => (falling, value, low),
        2 => (low, value, rising),
        3 => (low, falling, value),
        4 => (rising, low, value),
        _ => (value, low, falling),
    };

    let channel = |c: f32| (c * 255.0).round() as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::grid::Grid;

    const DEAD: Rgb = Rgb::new(0, 0, 0);

    fn session(grid: Grid) -> Session {
        let mut session = Session::new(grid, 2, 10);
        session.generation = 7;
        session.memory_mib = 512;
        session
    }

    #[test]
    fn test_cells_are_two_columns_wide() {
        let commands = draw(&session(Grid::with_alive(30, 3, &[(1, 0)])), DEAD);

        assert_eq!(commands[0], Command::MoveTo { x: 0, y: 0 });
        assert_eq!(commands[1], Command::SetBackground(DEAD));
        assert_eq!(commands[2], Command::Print("  ".into()));

        assert_eq!(commands[3], Command::MoveTo { x: 2, y: 0 });
        assert_eq!(commands[4], Command::SetBackground(live_color(1, 0, 7)));

        // first cell of the second row
        assert_eq!(commands[90], Command::MoveTo { x: 0, y: 1 });
    }

    #[test]
    fn test_banner_sits_below_grid_at_full_width() {
        let commands = draw(&session(Grid::new(40, 3)), DEAD);
        assert_eq!(commands.len(), 40 * 3 * 3 + 1 + BANNER_LINES * 2);

        let banner = &commands[40 * 3 * 3..];
        assert_eq!(banner[0], Command::ResetStyle);
        assert_eq!(banner[1], Command::MoveTo { x: 0, y: 3 });
        assert_eq!(banner[3], Command::MoveTo { x: 0, y: 4 });

        let Command::Print(status) = &banner[2] else {
            panic!("expected status line, got {:?}", banner[2]);
        };
        assert_eq!(status.len(), 80);
        assert!(status.starts_with("run 2 | 10 fps | generation 7 | population 0 | memory 512 MiB"));

        let Command::Print(hints) = &banner[4] else {
            panic!("expected key hints, got {:?}", banner[4]);
        };
        assert_eq!(hints.trim_end(), KEY_HINTS);
        assert_eq!(hints.len(), 80);
    }

    #[test]
    fn test_narrow_banner_is_cut() {
        let commands = draw(&session(Grid::new(4, 1)), DEAD);
        let Some(Command::Print(last)) = commands.last() else {
            panic!("banner missing");
        };
        assert_eq!(last, "q quit |");
    }

    #[test]
    fn test_draw_is_pure() {
        let session = session(Grid::with_alive(6, 6, &[(1, 2), (2, 2), (3, 2)]));
        assert_eq!(draw(&session, DEAD), draw(&session, DEAD));
    }

    #[test]
    fn test_hue_sweeps_with_generation() {
        assert_ne!(live_color(3, 4, 0), live_color(3, 4, 40));
        assert_eq!(live_color(3, 4, 0), live_color(3, 4, 256));
        assert_eq!(live_color(1, 0, 5), live_color(0, 1, 5));
    }

    #[test]
    fn test_wheel_primaries() {
        assert_eq!(wheel(0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(wheel(128, 1.0, 1.0), Rgb::new(0, 255, 255));
        assert_eq!(wheel(200, 0.5, 0.0), Rgb::new(0, 0, 0));
        assert_eq!(wheel(77, 0.0, 1.0), Rgb::new(255, 255, 255));
    }
}
