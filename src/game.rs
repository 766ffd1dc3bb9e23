use crate::StringToAnyhow;
use glam::DVec2;
use gridcast::draw::{frame, DrawCommand, Rgba, Viewport};
use gridcast::{Action, Camera, Config, Grid, InputState, Movement};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;
use std::time::{Duration, Instant};

const TARGET_FPS: u64 = 60;

#[derive(Clone, Copy, PartialEq, Debug)]
enum GameState {
    Playing,
    Paused,
    Exit,
}

fn key_action(key: Keycode) -> Option<Action> {
    Some(match key {
        Keycode::W | Keycode::Up => Action::Forward,
        Keycode::S | Keycode::Down => Action::Back,
        Keycode::A | Keycode::Left => Action::Left,
        Keycode::D | Keycode::Right => Action::Right,
        Keycode::Space | Keycode::F => Action::RotateClockwise,
        Keycode::G => Action::RotateCounterClockwise,
        _ => return None,
    })
}

fn sdl_color(color: Rgba) -> Color {
    Color::RGBA(color.r, color.g, color.b, color.a)
}

struct Game {
    grid: Grid,
    camera: Camera,
    config: Config,
    movement: Movement,
    input: InputState,
    viewport: Viewport,
    game_state: GameState,
    canvas: Canvas<Window>,
    update: bool,
}

impl Game {
    fn key_once(&mut self, key: Keycode) {
        match (key, self.game_state) {
            (Keycode::Escape, GameState::Playing) => self.game_state = GameState::Paused,
            (Keycode::Escape, GameState::Paused) => self.game_state = GameState::Playing,
            (Keycode::Q, _) => self.game_state = GameState::Exit,
            _ => {}
        }
        self.update = true;
    }

    fn key(&mut self, key: Keycode, pressed: bool) {
        if let Some(action) = key_action(key) {
            self.input.set(action, pressed);
        }
    }

    /// one simulation step, the camera is only touched here
    fn tick(&mut self) {
        if self.game_state == GameState::Playing
            && self.movement.tick(&mut self.camera, &self.input, &self.grid)
        {
            self.update = true;
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) -> anyhow::Result<()> {
        let r = radius.max(0.) as i32;
        for dy in -r..=r {
            let half = ((r * r - dy * dy) as f32).sqrt() as i32;
            let row = y as i32 + dy;
            self.canvas
                .draw_line(Point::new(x as i32 - half, row), Point::new(x as i32 + half, row))
                .ah()?;
        }
        Ok(())
    }

    fn execute(&mut self, command: DrawCommand) -> anyhow::Result<()> {
        match command {
            DrawCommand::FillRect { x, y, w, h, color } => {
                self.canvas.set_draw_color(sdl_color(color));
                self.canvas
                    .fill_rect(Rect::new(x as i32, y as i32, w.max(0.) as u32, h.max(0.) as u32))
                    .ah()?;
            }
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color,
            } => {
                self.canvas.set_draw_color(sdl_color(color));
                self.fill_circle(x, y, radius)?;
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => {
                self.canvas.set_draw_color(sdl_color(color));
                self.canvas
                    .draw_line(
                        Point::new(x1 as i32, y1 as i32),
                        Point::new(x2 as i32, y2 as i32),
                    )
                    .ah()?;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();

        for command in frame(&self.grid, &self.camera, &self.config, self.viewport) {
            self.execute(command)?;
        }

        if self.game_state == GameState::Paused {
            self.canvas.set_blend_mode(BlendMode::Blend);
            self.canvas.set_draw_color(Color::RGBA(0, 0, 0, 0xDD));
            self.canvas.fill_rect(None).ah()?;
            self.canvas.set_blend_mode(BlendMode::None);
        }

        self.canvas.present();
        Ok(())
    }
}

pub(crate) fn run(grid: Grid, spawn: DVec2, config: Config) -> anyhow::Result<()> {
    let viewport = Viewport::for_grid(&grid, config.scale_factor);

    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let window = video
        .window(
            "Raycaster!",
            (viewport.width * 2) as u32,
            viewport.height as u32,
        )
        .position_centered()
        .build()?;
    log::info!("creating canvas");
    let canvas = window.into_canvas().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;

    let mut game = Game {
        camera: Camera::new(spawn, 0., config.fov, viewport.width),
        movement: Movement::from_config(&config),
        input: InputState::default(),
        grid,
        config,
        viewport,
        game_state: GameState::Playing,
        canvas,
        update: true,
    };

    let delta = Duration::from_millis(1_000 / TARGET_FPS);

    'main_loop: loop {
        let prev = Instant::now();

        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat,
                    ..
                } => {
                    if !repeat {
                        game.key_once(k);
                    }
                    game.key(k, true);
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => game.key(k, false),
                _ => {}
            }
        }

        if game.game_state == GameState::Exit {
            break;
        }

        game.tick();

        if game.update {
            if let Err(err) = game.draw() {
                log::error!("error while in game state {:?}: {err}", game.game_state);
                return Err(err);
            }
            game.update = false;
        }

        let diff = prev.elapsed();
        if diff < delta {
            std::thread::sleep(delta - diff);
        }
    }

    log::info!("exiting");
    Ok(())
}
