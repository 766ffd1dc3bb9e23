use std::f64::consts::FRAC_PI_2;

/// Tunables for probing, traversal, movement and projection.
///
/// The defaults reproduce the look of the stock 50 pixel-per-cell renderer.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Config {
    /// How far the collision probe looks ahead, in grid units. Smaller values
    /// place hits closer to the true wall face at the cost of more steps.
    pub probe_step: f64,
    /// Coordinates closer than this to a grid line are snapped onto it.
    pub snap_tolerance: f64,
    /// Upper bound on traversal steps, `None` means `rows * cols`.
    pub max_iterations: Option<usize>,
    /// Translation per tick, in grid units.
    pub move_step: f64,
    /// Rotation per tick, in radians.
    pub rotate_step: f64,
    /// Player diameter, in grid units.
    pub player_size: f64,
    /// Horizontal field of view, in radians.
    pub fov: f64,
    /// Multiplier between screen height and inverse distance.
    pub wall_scale: f64,
    /// Distances are floored to this before dividing.
    pub min_distance: f64,
    /// Pixels per grid cell for the overhead view.
    pub scale_factor: u32,
    /// Number of rays drawn on the overhead view.
    pub debug_rays: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_step: 0.05,
            snap_tolerance: 0.001,
            max_iterations: None,
            move_step: 0.05,
            rotate_step: 0.025,
            player_size: 0.2,
            fov: FRAC_PI_2,
            wall_scale: 0.5,
            min_distance: 1e-3,
            scale_factor: 50,
            debug_rays: 40,
        }
    }
}
