//! ballistics-pointmass
//!
//! Point-mass exterior ballistics over the G-function retardation tables of
//! `ballistics-models`:
//! - Zero-angle search by coarse-to-fine successive approximation.
//! - Trajectory table sampled once per whole yard of range.
//!
//! Both integrate the same explicit scheme (see [`step`]): drag from the
//! retardation table split along the velocity direction, gravity resolved
//! into the bore frame, trapezoidal position update, `dt` inversely
//! proportional to speed.
//!
//! Units at the API: velocity [fps], range [yd], heights [in], wind [mph],
//! angles [deg]. Internally the integrators run in feet and seconds.
//!
//! ```no_run
//! use ballistics_models::DragFunction;
//! use ballistics_pointmass::{tabulate, zero_angle};
//!
//! # fn main() -> Result<(), ballistics_pointmass::SolverError> {
//! let zero = zero_angle(DragFunction::G1, 0.5, 2800.0, 1.5, 100.0, 0.0)?;
//! let table = tabulate(DragFunction::G1, 0.5, 2800.0, 1.5, 0.0, zero.angle_deg, 10.0, 90.0)?;
//! println!("{:?}", table.record_at(300));
//! # Ok(())
//! # }
//! ```

pub mod step;
pub mod table;
pub mod zero;

#[cfg(feature = "serde")]
pub mod config;

use ballistics_core::Wind;
use ballistics_models::{DragError, DragFunction, VELOCITY_CEILING};
use thiserror::Error;

pub use step::{IntegrationState, Phase};
pub use table::{solve_table, tabulate, SolutionRecord, TableConfig, Trajectory};
pub use zero::{solve_zero, zero_angle, ZeroSearchConfig, ZeroSolution};

#[cfg(feature = "serde")]
pub use config::ShotConfig;

/// Gravity [ft/s²], positive up.
pub const GRAVITY: f64 = -32.194;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("invalid {field} = {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error(transparent)]
    Drag(#[from] DragError),

    #[error("invalid scenario document: {0}")]
    Config(String),
}

/// Projectile and sight: everything both solvers need.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Load {
    pub drag_function: DragFunction,
    /// Ballistic coefficient for `drag_function`, already atmosphere-corrected.
    pub drag_coefficient: f64,
    pub muzzle_velocity_fps: f64,
    /// Height of the sight line above the bore centerline [in].
    pub sight_height_in: f64,
}

impl Load {
    pub fn new(
        drag_function: DragFunction,
        drag_coefficient: f64,
        muzzle_velocity_fps: f64,
        sight_height_in: f64,
    ) -> Self {
        Self { drag_function, drag_coefficient, muzzle_velocity_fps, sight_height_in }
    }

    /// Fail fast on inputs the integrators cannot make sense of.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.drag_function.is_defined() {
            return Err(DragError::UndefinedDragFunction(self.drag_function).into());
        }
        positive("drag_coefficient", self.drag_coefficient)?;
        positive("muzzle_velocity_fps", self.muzzle_velocity_fps)?;
        if self.muzzle_velocity_fps >= VELOCITY_CEILING {
            return Err(SolverError::InvalidInput {
                field: "muzzle_velocity_fps",
                value: self.muzzle_velocity_fps,
                reason: "must be below the drag model ceiling of 10000 fps",
            });
        }
        finite("sight_height_in", self.sight_height_in)
    }
}

/// Where the zeroed trajectory must cross the sight line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZeroTarget {
    pub range_yd: f64,
    /// Height above the sight line at `range_yd` [in]; usually 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub y_intercept_in: f64,
}

impl ZeroTarget {
    pub fn new(range_yd: f64, y_intercept_in: f64) -> Self {
        Self { range_yd, y_intercept_in }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        positive("zero range_yd", self.range_yd)?;
        finite("y_intercept_in", self.y_intercept_in)
    }
}

/// Firing geometry and conditions for one table.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shot {
    /// Uphill (+) / downhill (-) angle of the line of sight [deg].
    pub shooting_angle_deg: f64,
    /// Bore angle relative to the sight line, usually from [`zero_angle`] [deg].
    pub zero_angle_deg: f64,
    pub wind: Wind,
}

impl Shot {
    pub fn level(zero_angle_deg: f64) -> Self {
        Self { shooting_angle_deg: 0.0, zero_angle_deg, wind: Wind::calm() }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        finite("shooting_angle_deg", self.shooting_angle_deg)?;
        finite("zero_angle_deg", self.zero_angle_deg)?;
        finite("wind speed_mph", self.wind.speed_mph)?;
        finite("wind angle_deg", self.wind.angle_deg)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), SolverError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidInput { field, value, reason: "must be finite" })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SolverError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidInput { field, value, reason: "must be greater than zero" })
    }
}

/* ----------------------------------- tests ---------------------------------- */
