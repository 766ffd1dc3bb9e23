use crate::config::Config;
use crate::map::{Cell, Grid};
use glam::DVec2;

/// what stopped a ray
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Blocked {
    Wall { row: usize, col: usize },
    /// the ray left the grid without touching a wall
    Edge,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayCast {
    /// euclidean distance walked from the origin
    pub distance: f64,
    /// last grid-line crossing reached, `hit_x`/`hit_y` in grid space
    pub point: DVec2,
    /// `None` when the iteration bound ran out first
    pub blocked: Option<Blocked>,
}

impl RayCast {
    pub fn is_hit(&self) -> bool {
        self.blocked.is_some()
    }
}

/// unit direction for a heading, angle 0 points towards decreasing x and angles grow clockwise
pub fn direction(theta: f64) -> DVec2 {
    DVec2::new(-theta.cos(), theta.sin())
}

fn snap(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= tolerance {
        rounded
    } else {
        value
    }
}

/// Looks a small step ahead of a position to decide whether it may be occupied.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Probe {
    pub step: f64,
    pub snap_tolerance: f64,
}

impl Default for Probe {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Probe {
    pub fn from_config(config: &Config) -> Self {
        Self {
            step: config.probe_step,
            snap_tolerance: config.snap_tolerance,
        }
    }

    /// the point one probe step ahead, with near-integer coordinates snapped onto grid lines
    pub fn target(&self, pos: DVec2, dir: DVec2) -> DVec2 {
        let ahead = pos + dir * self.step;
        DVec2::new(
            snap(ahead.x, self.snap_tolerance),
            snap(ahead.y, self.snap_tolerance),
        )
    }

    pub fn probe(&self, grid: &Grid, pos: DVec2, dir: DVec2) -> Cell {
        grid.cell_at(self.target(pos, dir))
    }

    /// walls and the world edge both block
    pub fn can_advance(&self, grid: &Grid, pos: DVec2, dir: DVec2) -> bool {
        self.probe(grid, pos, dir).is_open()
    }

    fn blocked(&self, grid: &Grid, pos: DVec2, dir: DVec2) -> Option<Blocked> {
        let target = self.target(pos, dir);
        if !grid.contains(target) {
            return Some(Blocked::Edge);
        }
        blocked_cell(grid, target.x.floor() as isize, target.y.floor() as isize)
    }
}

fn blocked_cell(grid: &Grid, row: isize, col: isize) -> Option<Blocked> {
    match grid.cell(row, col) {
        Cell::Open => None,
        Cell::Wall => Some(Blocked::Wall {
            row: row as usize,
            col: col as usize,
        }),
        Cell::OutOfBounds => Some(Blocked::Edge),
    }
}

/// Grid DDA: hops from one grid-line crossing to the next until the entered cell or the probe
/// ahead of the crossing is blocked.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Caster {
    pub probe: Probe,
    /// `None` bounds the walk by the number of cells in the grid
    pub max_iterations: Option<usize>,
}

/// ray length covered by one unit of advance along `axis`
fn unit_step(axis: f64, other: f64) -> f64 {
    if axis == 0. {
        f64::INFINITY
    } else {
        (1. + (other / axis) * (other / axis)).sqrt()
    }
}

/// -1, 0 or 1, with NaN treated as not stepping
fn step_sign(component: f64) -> f64 {
    if component < 0. {
        -1.
    } else if component > 0. {
        1.
    } else {
        0.
    }
}

/// index of the cell a ray moving with sign `step` occupies just past `coord`
fn cell_index(coord: f64, step: f64) -> isize {
    if step < 0. {
        coord.ceil() as isize - 1
    } else {
        coord.floor() as isize
    }
}

impl Caster {
    pub fn from_config(config: &Config) -> Self {
        Self {
            probe: Probe::from_config(config),
            max_iterations: config.max_iterations,
        }
    }

    /// floored and stepping-side indices of a coordinate that was not crossed
    fn straddled(&self, coord: f64, step: f64) -> [isize; 2] {
        let coord = snap(coord, self.probe.snap_tolerance);
        [coord.floor() as isize, cell_index(coord, step)]
    }

    /// next grid line along one axis, or the coordinate itself when not stepping on it
    fn next_line(coord: f64, step: f64, tolerance: f64) -> f64 {
        let coord = snap(coord, tolerance);
        if step < 0. {
            (coord - 1.).ceil()
        } else if step > 0. {
            (coord + 1.).floor()
        } else {
            coord
        }
    }

    pub fn cast(&self, grid: &Grid, origin: DVec2, theta: f64) -> RayCast {
        let dir = direction(theta);
        let unit = DVec2::new(unit_step(dir.x, dir.y), unit_step(dir.y, dir.x));
        let step = DVec2::new(step_sign(dir.x), step_sign(dir.y));
        let max_iterations = self
            .max_iterations
            .unwrap_or(grid.rows() * grid.cols());

        let mut pos = origin;
        let mut distance = 0.;
        // the origin is taken as given, only computed crossings are snapped
        let mut tolerance = 0.;

        for _ in 0..max_iterations {
            let target = DVec2::new(
                Self::next_line(pos.x, step.x, tolerance),
                Self::next_line(pos.y, step.y, tolerance),
            );
            tolerance = self.probe.snap_tolerance;
            let along_x = if step.x == 0. {
                f64::INFINITY
            } else {
                (target.x - pos.x).abs() * unit.x
            };
            let along_y = if step.y == 0. {
                f64::INFINITY
            } else {
                (target.y - pos.y).abs() * unit.y
            };

            log::trace!("at {pos} towards {target}, x option {along_x}, y option {along_y}");

            if !along_x.is_finite() && !along_y.is_finite() {
                break;
            }

            // the other coordinate is always measured from the origin, never the previous crossing
            let crossed_x = along_x <= along_y;
            if crossed_x {
                distance += along_x;
                pos = DVec2::new(target.x, origin.y + dir.y * (target.x - origin.x) / dir.x);
            } else {
                distance += along_y;
                pos = DVec2::new(origin.x + dir.x * (target.y - origin.y) / dir.y, target.y);
            }

            // the cell past the crossed line, and the floored cell the probe would see when the
            // other coordinate sits on a line the ray is leaving
            let entered = if crossed_x {
                let row = cell_index(target.x, step.x);
                self.straddled(pos.y, step.y).map(|col| (row, col))
            } else {
                let col = cell_index(target.y, step.y);
                self.straddled(pos.x, step.x).map(|row| (row, col))
            };
            let blocked = entered
                .into_iter()
                .find_map(|(row, col)| blocked_cell(grid, row, col))
                .or_else(|| self.probe.blocked(grid, pos, dir));

            if let Some(blocked) = blocked {
                log::trace!("blocked by {blocked:?} at {pos} after {distance}");
                return RayCast {
                    distance,
                    point: pos,
                    blocked: Some(blocked),
                };
            }
        }

        RayCast {
            distance,
            point: pos,
            blocked: None,
        }
    }
}

/// probe with the default step and tolerance
pub fn can_advance(grid: &Grid, x: f64, y: f64, dx: f64, dy: f64) -> bool {
    Probe::default().can_advance(grid, DVec2::new(x, y), DVec2::new(dx, dy))
}

/// cast with the default caster, returning `(distance, hit_x, hit_y)`
pub fn cast(grid: &Grid, x: f64, y: f64, theta: f64) -> (f64, f64, f64) {
    let ray = Caster::default().cast(grid, DVec2::new(x, y), theta);
    (ray.distance, ray.point.x, ray.point.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    const EPS: f64 = 1e-9;

    fn room() -> Grid {
        Grid::parse("###\n#.#\n###").unwrap()
    }

    fn open(rows: usize, cols: usize) -> Grid {
        Grid::from_rows(vec![vec![false; cols]; rows]).unwrap()
    }

    #[test]
    fn direction_convention() {
        let north = direction(0.);
        assert!((north.x + 1.).abs() < EPS);
        assert!(north.y.abs() < EPS);

        let east = direction(FRAC_PI_2);
        assert!(east.x.abs() < EPS);
        assert!((east.y - 1.).abs() < EPS);

        for theta in [0.3, 1.7, 4.2, -2.5, 100.] {
            assert!((direction(theta).length() - 1.).abs() < EPS);
        }
    }

    #[test]
    fn probe_blocks_walls_and_edges() {
        let grid = room();
        let probe = Probe::default();
        let centre = DVec2::new(1.5, 1.5);

        assert!(probe.can_advance(&grid, centre, DVec2::new(-1., 0.)));
        assert_eq!(probe.probe(&grid, DVec2::new(1.02, 1.5), DVec2::new(-1., 0.)), Cell::Wall);
        assert!(!can_advance(&grid, 1.02, 1.5, -1., 0.));
        assert!(!can_advance(&grid, 2.98, 1.5, 1., 0.));

        let grid = open(2, 2);
        assert_eq!(probe.probe(&grid, DVec2::new(0.02, 1.), DVec2::new(-1., 0.)), Cell::OutOfBounds);
        assert_eq!(probe.probe(&grid, DVec2::new(1.98, 1.), DVec2::new(1., 0.)), Cell::OutOfBounds);
        assert!(can_advance(&grid, 1.9, 1., 1., 0.));
    }

    #[test]
    fn probe_snaps_drift_onto_grid_lines() {
        let grid = Grid::parse("#..\n...").unwrap();
        let probe = Probe::default();
        // 0.9996 would floor into the wall row without snapping
        let pos = DVec2::new(0.9996 + 0.05, 0.5);
        assert!(probe.can_advance(&grid, pos, DVec2::new(-1., 0.)));
        let pos = DVec2::new(0.99 + 0.05, 0.5);
        assert!(!probe.can_advance(&grid, pos, DVec2::new(-1., 0.)));
    }

    #[test]
    fn axis_aligned_casts_in_a_single_cell_room() {
        let grid = room();
        let expected = [
            (0., DVec2::new(0., 1.)),
            (FRAC_PI_2, DVec2::new(1., 2.)),
            (PI, DVec2::new(2., 1.)),
            (3. * FRAC_PI_2, DVec2::new(1., 0.)),
        ];

        for (theta, point) in expected {
            let ray = Caster::default().cast(&grid, DVec2::new(1., 1.), theta);
            assert!(ray.is_hit(), "theta {theta} missed");
            assert!((ray.distance - 1.).abs() < EPS, "theta {theta}: {}", ray.distance);
            assert!(ray.point.distance(point) < EPS, "theta {theta}: {}", ray.point);
        }
    }

    #[test]
    fn exact_zero_components_stay_finite() {
        let grid = Grid::parse("#####\n#...#\n#...#\n#...#\n#####").unwrap();
        // sin(0) and the x step at theta = 0 are exact, so dy is exactly zero
        let (distance, hit_x, hit_y) = cast(&grid, 2.5, 2.5, 0.);
        assert!(distance.is_finite());
        assert!((distance - 1.5).abs() < EPS);
        assert!((hit_x - 1.).abs() < EPS);
        assert!((hit_y - 2.5).abs() < EPS);

        for theta in [FRAC_PI_2, PI, 3. * FRAC_PI_2] {
            let (distance, hit_x, hit_y) = cast(&grid, 2.5, 2.5, theta);
            assert!(distance.is_finite() && hit_x.is_finite() && hit_y.is_finite());
            assert!((distance - 1.5).abs() < EPS, "theta {theta}: {distance}");
        }
    }

    #[test]
    fn diagonal_hits_the_first_wall_cell() {
        let grid = Grid::parse("#####\n#...#\n#...#\n#...#\n#####").unwrap();
        let ray = Caster::default().cast(&grid, DVec2::new(2.5, 2.5), PI / 4.);
        // heads towards decreasing x and increasing y, reaching the (1, 4) corner
        assert!((ray.distance - 1.5 * 2f64.sqrt()).abs() < 1e-6);
        assert!(ray.point.distance(DVec2::new(1., 4.)) < 1e-6);
        assert!(matches!(ray.blocked, Some(Blocked::Wall { .. })));
    }

    #[test]
    fn corner_clipped_within_one_probe_step_still_stops_the_ray() {
        let grid = Grid::parse("#####\n#.#.#\n#...#\n#...#\n#####").unwrap();
        let theta = PI / 4. + 0.2;
        let dir = direction(theta);
        // enters wall (1, 2) at y = 2.98 and would leave it 0.02 later
        let origin = DVec2::new(2.5, 2.98 + dir.y * 0.5 / dir.x);

        let ray = Caster::default().cast(&grid, origin, theta);
        assert_eq!(ray.blocked, Some(Blocked::Wall { row: 1, col: 2 }));
        assert!(ray.point.distance(DVec2::new(2., 2.98)) < 1e-9, "{}", ray.point);
        assert!((ray.distance - 0.5 / -dir.x).abs() < 1e-9);
    }

    #[test]
    fn origin_close_to_a_line_still_checks_the_first_crossing() {
        let grid = Grid::parse("###\n###\n#.#\n###").unwrap();
        // 0.0005 below the x = 2 line, so the wall row above is one tiny hop away
        let ray = Caster::default().cast(&grid, DVec2::new(2.0005, 1.5), 0.);
        assert_eq!(ray.blocked, Some(Blocked::Wall { row: 1, col: 1 }));
        assert!((ray.distance - 0.0005).abs() < EPS);
    }

    #[test]
    fn full_turns_do_not_change_the_result() {
        let grid = Grid::parse("#######\n#.....#\n#..#..#\n#.....#\n#######").unwrap();
        let origin = DVec2::new(1.3, 1.6);
        for theta in [0.2, 1.1, 2.9, 3.7, 5.1, 6.0] {
            let a = Caster::default().cast(&grid, origin, theta);
            let b = Caster::default().cast(&grid, origin, theta + TAU);
            let c = Caster::default().cast(&grid, origin, theta - TAU);
            assert!((a.distance - b.distance).abs() < 1e-6);
            assert!((a.distance - c.distance).abs() < 1e-6);
            assert!(a.point.distance(b.point) < 1e-6);
            assert_eq!(a.blocked, b.blocked);
        }
    }

    #[test]
    fn open_grid_reports_the_edge() {
        let grid = open(4, 4);
        let ray = Caster::default().cast(&grid, DVec2::new(2., 2.), 0.);
        assert_eq!(ray.blocked, Some(Blocked::Edge));
        assert!((ray.distance - 2.).abs() < EPS);
    }

    #[test]
    fn exhausted_bound_is_a_miss() {
        let grid = open(10, 10);
        let caster = Caster {
            max_iterations: Some(2),
            ..Caster::default()
        };
        let ray = caster.cast(&grid, DVec2::new(5.5, 5.5), 0.);
        assert!(!ray.is_hit());
        assert!((ray.distance - 1.5).abs() < EPS);
        assert!(ray.point.distance(DVec2::new(4., 5.5)) < EPS);
    }

    #[test]
    fn nan_heading_terminates() {
        let ray = Caster::default().cast(&room(), DVec2::new(1.5, 1.5), f64::NAN);
        assert!(!ray.is_hit());
    }
}
