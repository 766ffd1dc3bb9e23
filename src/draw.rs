use crate::config::Config;
use crate::map::Grid;
use crate::projection::{Camera, Projector, Slice};
use crate::ray::{direction, Caster};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const WALL: Rgba = Rgba::rgb(200, 30, 30);
    pub const VOID: Rgba = Rgba::rgb(30, 30, 30);
    pub const PLAYER: Rgba = Rgba::rgb(200, 200, 30);
    pub const HIT: Rgba = Rgba::rgb(30, 200, 30);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Presentation-agnostic drawing primitive, in pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgba,
    },
}

/// size of one half of the window: the overhead map on the left, the 3D view on the right
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn for_grid(grid: &Grid, scale_factor: u32) -> Self {
        Self {
            width: grid.cols() * scale_factor as usize,
            height: grid.rows() * scale_factor as usize,
        }
    }
}

/// Overhead view: cells, the player and a fan of rays across the field of view.
pub fn map_view(grid: &Grid, camera: &Camera, config: &Config) -> Vec<DrawCommand> {
    let scale = config.scale_factor as f32;
    let mut commands = Vec::with_capacity(grid.rows() * grid.cols() + 1 + 2 * config.debug_rays);

    for (row, col, wall) in grid.iter() {
        commands.push(DrawCommand::FillRect {
            x: col as f32 * scale,
            y: row as f32 * scale,
            w: scale - 1.,
            h: scale - 1.,
            color: if wall { Rgba::WALL } else { Rgba::VOID },
        });
    }

    // grid x runs down the screen and grid y runs across it
    let (px, py) = (camera.pos.y as f32 * scale, camera.pos.x as f32 * scale);
    commands.push(DrawCommand::FillCircle {
        x: px,
        y: py,
        radius: config.player_size as f32 * scale / 2.,
        color: Rgba::PLAYER,
    });

    let caster = Caster::from_config(config);
    let first = camera.xy_rotation - camera.fov / 2.;
    let increment = if config.debug_rays > 1 {
        camera.fov / (config.debug_rays - 1) as f64
    } else {
        0.
    };
    for n in 0..config.debug_rays {
        let theta = first + n as f64 * increment;
        let ray = caster.cast(grid, camera.pos, theta);
        let end = camera.pos + direction(theta) * ray.distance;
        let (ex, ey) = (end.y as f32 * scale, end.x as f32 * scale);

        commands.push(DrawCommand::Line {
            x1: px,
            y1: py,
            x2: ex,
            y2: ey,
            color: Rgba::WHITE,
        });
        if ray.is_hit() {
            commands.push(DrawCommand::FillCircle {
                x: ex,
                y: ey,
                radius: 2.,
                color: Rgba::HIT,
            });
        }
    }

    commands
}

/// one vertical line per projected column, shifted right by `offset_x`
pub fn scene_view(slices: &[Option<Slice>], offset_x: f32) -> Vec<DrawCommand> {
    slices
        .iter()
        .flatten()
        .map(|slice| {
            let x = offset_x + slice.column as f32;
            DrawCommand::Line {
                x1: x,
                y1: slice.draw_start as f32,
                x2: x,
                y2: slice.draw_end as f32,
                color: slice.color,
            }
        })
        .collect()
}

/// full frame: overhead map on the left, projected scene on the right
pub fn frame(grid: &Grid, camera: &Camera, config: &Config, viewport: Viewport) -> Vec<DrawCommand> {
    let slices = Projector::from_config(config).render_slices(grid, camera, viewport.height);
    let mut commands = map_view(grid, camera, config);
    commands.extend(scene_view(&slices, viewport.width as f32));
    commands
}

const RAMP: &[u8] = b".:-=+*#%@";

/// text rendering of projected slices, one line per pixel row
pub fn ascii(slices: &[Option<Slice>], height: usize) -> String {
    let mut out = String::with_capacity((slices.len() + 1) * height);
    for y in 0..height {
        for slice in slices {
            out.push(match slice {
                Some(slice) if (slice.draw_start..=slice.draw_end).contains(&y) => {
                    let level = (slice.color.r as usize * RAMP.len()) / 256;
                    RAMP[level] as char
                }
                _ => ' ',
            });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use std::f64::consts::FRAC_PI_2;

    fn ring() -> Grid {
        Grid::parse("#####\n#...#\n#...#\n#...#\n#####").unwrap()
    }

    #[test]
    fn map_view_layout() {
        let grid = ring();
        let config = Config {
            debug_rays: 3,
            ..Config::default()
        };
        let camera = Camera::new(DVec2::new(2.5, 2.5), 0., FRAC_PI_2, 250);
        let commands = map_view(&grid, &camera, &config);

        // 25 cells, the player, then a line and a hit marker per ray
        assert_eq!(commands.len(), 25 + 1 + 3 * 2);
        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                x: 0.,
                y: 0.,
                w: 49.,
                h: 49.,
                color: Rgba::WALL
            }
        );
        assert_eq!(
            commands[7],
            DrawCommand::FillRect {
                x: 100.,
                y: 50.,
                w: 49.,
                h: 49.,
                color: Rgba::VOID
            }
        );
        assert_eq!(
            commands[25],
            DrawCommand::FillCircle {
                x: 125.,
                y: 125.,
                radius: 5.,
                color: Rgba::PLAYER
            }
        );

        // the middle ray points straight up the screen and stops on the top wall
        match commands[28] {
            DrawCommand::Line { x1, y1, x2, y2, .. } => {
                assert_eq!((x1, y1), (125., 125.));
                assert!((x2 - 125.).abs() < 1e-3);
                assert!((y2 - 50.).abs() < 1e-3);
            }
            other => panic!("expected a ray, got {other:?}"),
        }
    }

    #[test]
    fn scene_is_offset_and_skips_misses() {
        let grid = ring();
        let camera = Camera::new(DVec2::new(2.5, 2.5), 0., FRAC_PI_2, 4);
        let mut slices = Projector::default().render_slices(&grid, &camera, 60);
        slices[1] = None;

        let commands = scene_view(&slices, 100.);
        assert_eq!(commands.len(), 3);
        for command in commands {
            match command {
                DrawCommand::Line { x1, x2, y1, y2, .. } => {
                    assert_eq!(x1, x2);
                    assert!(x1 >= 100. && x1 < 104. && x1 != 101.);
                    assert!(y1 <= y2 && y2 < 60.);
                }
                other => panic!("expected a slice, got {other:?}"),
            }
        }
    }

    #[test]
    fn frame_covers_both_halves() {
        let grid = ring();
        let config = Config::default();
        let viewport = Viewport::for_grid(&grid, config.scale_factor);
        assert_eq!(viewport, Viewport { width: 250, height: 250 });

        let camera = Camera::new(DVec2::new(2.5, 2.5), 0.7, config.fov, viewport.width);
        let commands = frame(&grid, &camera, &config, viewport);
        let scene = commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Line { x1, .. } if *x1 >= 250.))
            .count();
        assert_eq!(scene, 250);
    }

    #[test]
    fn ascii_draws_columns() {
        let grid = ring();
        let camera = Camera::new(DVec2::new(2.5, 2.5), 0., FRAC_PI_2, 6);
        let slices = Projector::default().render_slices(&grid, &camera, 10);
        let text = ascii(&slices, 10);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line.chars().count() == 6));
        assert!(lines[5].chars().all(|c| c != ' '));
    }
}
