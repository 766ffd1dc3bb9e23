//! First-person grid raycaster.
//!
//! A boolean occupancy [`Grid`] and a [`Camera`] go in; per-column wall
//! distances, projected [`Slice`]s and presentation-agnostic
//! [`DrawCommand`]s come out. Rays walk the grid with a DDA that hops between
//! grid-line crossings, stopping in the first wall cell it enters or where a
//! [`Probe`] one step ahead refuses to advance.

pub mod config;
pub mod draw;
pub mod map;
pub mod movement;
pub mod projection;
pub mod ray;

pub use config::Config;
pub use draw::{DrawCommand, Rgba, Viewport};
pub use map::{Cell, Grid};
pub use movement::{Action, InputState, Movement};
pub use projection::{Camera, Projector, Slice};
pub use ray::{Blocked, Caster, Probe, RayCast};
