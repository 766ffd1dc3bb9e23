use crate::config::Config;
use crate::draw::Rgba;
use crate::map::Grid;
use crate::ray::{Caster, RayCast};
use glam::DVec2;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Camera {
    /// position in grid units, `x` is the row axis
    pub pos: DVec2,
    /// heading in radians, see [`crate::ray::direction`]
    pub xy_rotation: f64,
    pub fov: f64,
    /// number of raster columns the projection plane spans
    pub plane_width: f64,
    pub plane_dist_from_camera: f64,
}

impl Camera {
    pub fn new(pos: DVec2, xy_rotation: f64, fov: f64, raster_width: usize) -> Self {
        let plane_width = raster_width as f64;
        Self {
            pos,
            xy_rotation,
            fov,
            plane_width,
            plane_dist_from_camera: plane_width / (2. * (fov / 2.).tan()),
        }
    }

    pub fn columns(&self) -> usize {
        self.plane_width as usize
    }

    /// angle between the forward axis and the ray through the centre of `column`
    pub fn ray_offset(&self, column: usize) -> f64 {
        let plane_x = column as f64 + 0.5;
        ((plane_x - self.plane_width / 2.) / self.plane_dist_from_camera).atan()
    }

    pub fn ray_angle(&self, column: usize) -> f64 {
        self.xy_rotation + self.ray_offset(column)
    }
}

/// vertical wall segment for one raster column
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Slice {
    pub column: usize,
    pub draw_start: usize,
    pub draw_end: usize,
    pub color: Rgba,
    pub perp_distance: f64,
    pub ray: RayCast,
}

/// brightness for a wall at `perp_distance`, closer is brighter
pub fn shade(perp_distance: f64) -> u8 {
    let distance = perp_distance.max(0.);
    (40. + 215. / (distance + 1.)).clamp(40., 255.) as u8
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Projector {
    pub caster: Caster,
    pub wall_scale: f64,
    pub min_distance: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Projector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            caster: Caster::from_config(config),
            wall_scale: config.wall_scale,
            min_distance: config.min_distance,
        }
    }

    /// unclamped slice height on a `height` pixel screen
    pub fn line_height(&self, perp_distance: f64, height: usize) -> f64 {
        self.wall_scale * height as f64 / perp_distance.max(self.min_distance)
    }

    /// `(draw_start, draw_end)` centred on the screen and kept inside `[0, height)`
    pub fn project_slice(&self, perp_distance: f64, height: usize) -> (usize, usize) {
        let h = height as f64;
        let line_height = self.line_height(perp_distance, height);
        let start = (h / 2. - line_height / 2.).max(0.);
        let end = (h / 2. + line_height / 2.).min(h - 1.).max(start);
        (start as usize, end as usize)
    }

    /// cast the ray for one column, `None` when nothing was hit within the iteration bound
    pub fn project_column(
        &self,
        grid: &Grid,
        camera: &Camera,
        column: usize,
        height: usize,
    ) -> Option<Slice> {
        let offset = camera.ray_offset(column);
        let ray = self
            .caster
            .cast(grid, camera.pos, camera.xy_rotation + offset);
        if !ray.is_hit() {
            log::debug!("column {column} found no wall within the iteration bound");
            return None;
        }

        // project onto the forward axis to undo the fisheye bulge
        let perp_distance = ray.distance * offset.cos();
        let (draw_start, draw_end) = self.project_slice(perp_distance, height);

        Some(Slice {
            column,
            draw_start,
            draw_end,
            color: Rgba::rgb(shade(perp_distance), 0, 0),
            perp_distance,
            ray,
        })
    }

    pub fn render_slices(
        &self,
        grid: &Grid,
        camera: &Camera,
        height: usize,
    ) -> Vec<Option<Slice>> {
        (0..camera.columns())
            .map(|column| self.project_column(grid, camera, column, height))
            .collect()
    }
}
