//! The explicit step shared by the zero search and the tabulator.
//!
//! One step, given speed `v = |vel|`:
//! 1. `dt = step_length / v` (finer steps at higher speed)
//! 2. drag `dv = retardation(v + headwind)`, applied along `-vel / v`
//! 3. `vel += (drag + gravity) * dt`
//! 4. `pos += (vel_old + vel_new) / 2 * dt` (trapezoid)
//! 5. `t += dt`
//!
//! The velocity half ([`Stepper::kick`]) and the position half
//! ([`Stepper::drift`]) are separate because the tabulator samples the state
//! between them.

use ballistics_core::units;
use ballistics_models::{retardation, DragError, DragFunction};
use nalgebra::Vector2;

use crate::{Load, GRAVITY};

/// Mutable state of one integration run. x is along the sight line, y is
/// height above it; feet, seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrationState {
    pub t: f64,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl IntegrationState {
    /// Muzzle state: bore elevated by `angle_rad`, one sight height below
    /// the line of sight.
    pub fn launch(muzzle_velocity: f64, angle_rad: f64, sight_height_in: f64) -> Self {
        Self {
            t: 0.0,
            pos: Vector2::new(0.0, -units::inches_to_feet(sight_height_in)),
            vel: Vector2::new(muzzle_velocity * angle_rad.cos(), muzzle_velocity * angle_rad.sin()),
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// Where an integration run stands. Everything but `Advancing` is terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Advancing,
    /// Falling and already below the target height.
    BelowTargetDescending,
    /// Vertical speed dominates horizontal speed.
    NearVertical,
    /// Range (zero search) or row count (tabulator) limit hit.
    RangeLimitReached,
    /// Air-relative speed left the drag model's domain.
    OutOfDragDomain { velocity: f64 },
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        self != Phase::Advancing
    }
}

/// Bookkeeping from the velocity half of a step.
#[derive(Clone, Copy, Debug)]
pub struct Kick {
    pub dt: f64,
    pub prev_vel: Vector2<f64>,
}

/// Drag/gravity parameters for one run.
#[derive(Clone, Copy, Debug)]
pub struct Stepper {
    drag_function: DragFunction,
    drag_coefficient: f64,
    gravity: Vector2<f64>,
    /// Distance-like numerator of `dt = step_length / v` [ft].
    step_length: f64,
    /// Added to speed before the drag lookup [fps].
    headwind_fps: f64,
}

impl Stepper {
    /// `gravity_tilt_rad` rotates gravity into the run's frame.
    pub fn new(load: &Load, gravity_tilt_rad: f64, step_length: f64) -> Self {
        Self {
            drag_function: load.drag_function,
            drag_coefficient: load.drag_coefficient,
            gravity: Vector2::new(GRAVITY * gravity_tilt_rad.sin(), GRAVITY * gravity_tilt_rad.cos()),
            step_length,
            headwind_fps: 0.0,
        }
    }

    #[must_use]
    pub fn with_headwind(mut self, headwind_fps: f64) -> Self {
        self.headwind_fps = headwind_fps;
        self
    }

    pub fn gravity(&self) -> Vector2<f64> {
        self.gravity
    }

    /// Velocity update. Leaves the state untouched on a drag-model failure.
    pub fn kick(&self, s: &mut IntegrationState) -> Result<Kick, DragError> {
        let prev_vel = s.vel;
        let v = s.speed();
        let dt = self.step_length / v;

        let dv = retardation(self.drag_function, self.drag_coefficient, v + self.headwind_fps)?;
        let drag = -s.vel * (dv / v);

        s.vel += (drag + self.gravity) * dt;
        Ok(Kick { dt, prev_vel })
    }

    /// Position update from the average of the old and new velocity.
    pub fn drift(&self, s: &mut IntegrationState, kick: Kick) {
        s.pos += (s.vel + kick.prev_vel) * (kick.dt / 2.0);
    }

    /// Full step: kick, drift, advance time. Returns `dt`.
    pub fn step(&self, s: &mut IntegrationState) -> Result<f64, DragError> {
        let kick = self.kick(s)?;
        self.drift(s, kick);
        s.t += kick.dt;
        Ok(kick.dt)
    }
}
