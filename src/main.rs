use anyhow::Context;
use clap::Parser;
use gridcast::draw::ascii;
use gridcast::{Camera, Config, Grid, Projector};
use std::path::PathBuf;

#[cfg(feature = "sdl")]
mod game;

// helper trait to convert sdl's string errors into anyhow errors
#[cfg(feature = "sdl")]
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

#[cfg(feature = "sdl")]
impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

/// First-person raycaster over a text tile map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file: `#` is a wall, `*` is the spawn cell, anything else is floor
    #[arg(default_value = "map.txt")]
    map: PathBuf,

    /// Horizontal field of view in degrees
    #[arg(long, default_value = "90")]
    fov_degrees: f64,

    /// Collision probe look-ahead in grid units
    #[arg(long, default_value = "0.05")]
    probe_step: f64,

    /// Distance walked per tick in grid units
    #[arg(long, default_value = "0.05")]
    move_step: f64,

    /// Traversal step limit per ray (defaults to the number of cells)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Pixels per grid cell on the overhead map
    #[arg(long, default_value = "50")]
    scale: u32,

    /// Rays drawn on the overhead map
    #[arg(long, default_value = "40")]
    rays: usize,

    /// Print one frame as text instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Text columns in headless mode
    #[arg(long, default_value = "80")]
    columns: usize,

    /// Text rows in headless mode
    #[arg(long, default_value = "24")]
    rows: usize,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            probe_step: self.probe_step,
            move_step: self.move_step,
            max_iterations: self.max_iterations,
            fov: self.fov_degrees.to_radians(),
            scale_factor: self.scale,
            debug_rays: self.rays,
            ..Config::default()
        }
    }
}

fn headless(grid: &Grid, camera: &Camera, config: &Config, rows: usize) {
    let slices = Projector::from_config(config).render_slices(grid, camera, rows);
    let hits = slices.iter().flatten().count();
    log::info!("{hits} of {} columns hit a wall", slices.len());
    print!("{}", ascii(&slices, rows));
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCAST_LOG");
    let args = Args::parse();
    let config = args.config();
    log::debug!("{config:?}");

    if !(config.fov > 0. && config.fov < std::f64::consts::PI) {
        anyhow::bail!("field of view must be between 0 and 180 degrees");
    }
    if !(config.probe_step > 0.) {
        anyhow::bail!("probe step must be positive");
    }
    if !(config.move_step > 0.) {
        anyhow::bail!("move step must be positive");
    }

    let grid = Grid::load(&args.map)?;
    let spawn = grid
        .spawn_point()
        .context("map has no open cell to spawn in")?;
    log::info!("spawning at {spawn}");

    if args.headless || cfg!(not(feature = "sdl")) {
        if !args.headless {
            log::warn!("built without the sdl feature, rendering headless");
        }
        let camera = Camera::new(spawn, 0., config.fov, args.columns);
        headless(&grid, &camera, &config, args.rows);
        return Ok(());
    }

    #[cfg(feature = "sdl")]
    game::run(grid, spawn, config)?;

    Ok(())
}
