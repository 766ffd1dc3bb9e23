use crate::config::Config;
use crate::map::Grid;
use crate::projection::Camera;
use crate::ray::Probe;
use glam::DVec2;
use std::f64::consts::TAU;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// towards decreasing x, up the overhead map
    Forward,
    Back,
    /// towards decreasing y
    Left,
    Right,
    RotateClockwise,
    RotateCounterClockwise,
}

/// Which actions are currently held, updated from key down/up edges.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    rotate_clockwise: bool,
    rotate_counter_clockwise: bool,
}

impl InputState {
    pub fn set(&mut self, action: Action, pressed: bool) {
        *self.flag(action) = pressed;
    }

    pub fn is_active(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Back => self.back,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::RotateClockwise => self.rotate_clockwise,
            Action::RotateCounterClockwise => self.rotate_counter_clockwise,
        }
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }

    fn flag(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Forward => &mut self.forward,
            Action::Back => &mut self.back,
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::RotateClockwise => &mut self.rotate_clockwise,
            Action::RotateCounterClockwise => &mut self.rotate_counter_clockwise,
        }
    }
}

/// Applies one tick of held input to the camera.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Movement {
    pub step: f64,
    pub rotate_step: f64,
    pub player_size: f64,
    pub probe: Probe,
}

impl Default for Movement {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Movement {
    pub fn from_config(config: &Config) -> Self {
        Self {
            step: config.move_step,
            rotate_step: config.rotate_step,
            player_size: config.player_size,
            probe: Probe::from_config(config),
        }
    }

    /// translate along a grid axis when the probe from the player's leading edge allows it
    fn translate(&self, camera: &mut Camera, grid: &Grid, dir: DVec2) -> bool {
        let edge = camera.pos + dir * (self.player_size / 2.);
        if !self.probe.can_advance(grid, edge, dir) {
            log::trace!("blocked moving {dir} from {}", camera.pos);
            return false;
        }
        camera.pos += dir * self.step;
        true
    }

    /// returns whether the camera changed
    pub fn tick(&self, camera: &mut Camera, input: &InputState, grid: &Grid) -> bool {
        if !input.any() {
            return false;
        }
        let mut moved = false;

        let translations = [
            (Action::Forward, DVec2::NEG_X),
            (Action::Back, DVec2::X),
            (Action::Left, DVec2::NEG_Y),
            (Action::Right, DVec2::Y),
        ];
        for (action, dir) in translations {
            if input.is_active(action) {
                moved |= self.translate(camera, grid, dir);
            }
        }

        let mut turn = 0.;
        if input.is_active(Action::RotateCounterClockwise) {
            turn -= self.rotate_step;
        }
        if input.is_active(Action::RotateClockwise) {
            turn += self.rotate_step;
        }
        if turn != 0. {
            camera.xy_rotation = (camera.xy_rotation + turn).rem_euclid(TAU);
            moved = true;
        }

        moved
    }
}
