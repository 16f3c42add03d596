//! Zero-angle search.
//!
//! Start level and raise the bore in coarse steps (14° by default) until a
//! trial trajectory ends up above the target height; then halve the step and
//! reverse. Each time the trial crosses the target the step is halved and
//! reversed again, until the step is below the angular tolerance. Usually
//! fewer than 30 trials.
//!
//! The response to angle is not smooth at the extremes (trials end early on
//! the early-exit heuristics), so this is deliberately a bracketing search
//! rather than a Newton-type one.

use ballistics_core::units;
use ballistics_models::DragFunction;
use log::{debug, warn};

use crate::step::{IntegrationState, Phase, Stepper};
use crate::{positive, Load, SolverError, ZeroTarget};

/// Tuning of the zero-angle search.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZeroSearchConfig {
    /// First angular step [deg].
    pub initial_step_deg: f64,
    /// Stop once the step is smaller than this [MOA].
    pub tolerance_moa: f64,
    /// Give up once a trial angle exceeds this [deg].
    pub max_angle_deg: f64,
    /// A trial stops once `vy > near_vertical_ratio * vx`.
    pub near_vertical_ratio: f64,
}

impl Default for ZeroSearchConfig {
    fn default() -> Self {
        Self {
            initial_step_deg: 14.0,
            tolerance_moa: 0.01,
            max_angle_deg: 45.0,
            near_vertical_ratio: 3.0,
        }
    }
}

impl ZeroSearchConfig {
    /// A zero or negative step or tolerance would never terminate.
    pub fn validate(&self) -> Result<(), SolverError> {
        positive("initial_step_deg", self.initial_step_deg)?;
        positive("tolerance_moa", self.tolerance_moa)?;
        positive("max_angle_deg", self.max_angle_deg)?;
        positive("near_vertical_ratio", self.near_vertical_ratio)
    }
}

/// Result of the search. `converged == false` means the search hit the
/// angle ceiling and `angle_deg` must not be used as a zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZeroSolution {
    /// Bore angle relative to the sight line [deg].
    pub angle_deg: f64,
    pub converged: bool,
    /// Number of trial trajectories integrated.
    pub iterations: u32,
}

/// Bore angle [deg] that puts the trajectory `y_intercept` inches above the
/// sight line at `zero_range` yards, with the default search tuning.
pub fn zero_angle(
    drag_function: DragFunction,
    drag_coefficient: f64,
    vi: f64,
    sight_height: f64,
    zero_range: f64,
    y_intercept: f64,
) -> Result<ZeroSolution, SolverError> {
    solve_zero(
        &Load::new(drag_function, drag_coefficient, vi, sight_height),
        &ZeroTarget::new(zero_range, y_intercept),
        &ZeroSearchConfig::default(),
    )
}

pub fn solve_zero(
    load: &Load,
    target: &ZeroTarget,
    config: &ZeroSearchConfig,
) -> Result<ZeroSolution, SolverError> {
    load.validate()?;
    target.validate()?;
    config.validate()?;

    let search = ZeroSearch::new(load, target, config);
    let tolerance = units::moa_to_rad(config.tolerance_moa);
    let max_angle = units::deg_to_rad(config.max_angle_deg);

    let mut angle = 0.0;
    let mut da = units::deg_to_rad(config.initial_step_deg);
    let mut iterations = 0;

    loop {
        iterations += 1;
        let (phase, end) = search.trial(angle)?;
        let y = end.pos.y;
        debug!(
            "zero trial {iterations}: angle={:.6}° da={:.6}° end={phase:?} x={:.1}ft y={:.4}ft",
            units::rad_to_deg(angle),
            units::rad_to_deg(da),
            end.pos.x,
            y
        );

        if y > search.target_y && da > 0.0 {
            da = -da / 2.0;
        }
        if y < search.target_y && da < 0.0 {
            da = -da / 2.0;
        }

        let precise = da.abs() < tolerance;
        let exceeded = angle > max_angle;
        angle += da;

        if precise || exceeded {
            let solution = ZeroSolution {
                angle_deg: units::rad_to_deg(angle),
                converged: precise && !exceeded,
                iterations,
            };
            if !solution.converged {
                warn!(
                    "no zero below {}°: giving up at {:.3}° after {iterations} trials",
                    config.max_angle_deg, solution.angle_deg
                );
            }
            return Ok(solution);
        }
    }
}

/// Fixed parameters of the trial trajectories, in feet.
pub(crate) struct ZeroSearch<'a> {
    load: &'a Load,
    target_y: f64,
    range_limit: f64,
    near_vertical_ratio: f64,
}

impl<'a> ZeroSearch<'a> {
    pub(crate) fn new(load: &'a Load, target: &ZeroTarget, config: &ZeroSearchConfig) -> Self {
        Self {
            load,
            target_y: units::inches_to_feet(target.y_intercept_in),
            range_limit: units::yards_to_feet(target.range_yd),
            near_vertical_ratio: config.near_vertical_ratio,
        }
    }

    /// Integrate one trial at bore angle `angle` [rad] until it is terminal.
    /// A trial that reaches the zero range ends just past it.
    pub(crate) fn trial(&self, angle: f64) -> Result<(Phase, IntegrationState), SolverError> {
        // Gravity rotates with the bore for the trial frame.
        let stepper = Stepper::new(self.load, angle, 1.0);
        let mut s = IntegrationState::launch(self.load.muzzle_velocity_fps, angle, self.load.sight_height_in);

        let mut phase = Phase::Advancing;
        while !phase.is_terminal() {
            let kick = stepper.kick(&mut s)?;
            stepper.drift(&mut s, kick);
            phase = self.transition(&s);
            if !phase.is_terminal() {
                s.t += kick.dt;
            }
        }
        Ok((phase, s))
    }

    /// Early exits first, then the range check.
    pub(crate) fn transition(&self, s: &IntegrationState) -> Phase {
        if s.vel.y < 0.0 && s.pos.y < self.target_y {
            Phase::BelowTargetDescending
        } else if s.vel.y > self.near_vertical_ratio * s.vel.x {
            Phase::NearVertical
        } else if s.pos.x > self.range_limit {
            Phase::RangeLimitReached
        } else {
            Phase::Advancing
        }
    }
}
