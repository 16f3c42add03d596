//! Trajectory tabulator: one [`SolutionRecord`] per whole yard of range.
//!
//! The bore points at the zero angle; the shooting angle only tilts gravity
//! (uphill/downhill fire without re-tilting the sight frame). Steps are half
//! as long as the zero search's so that every yard gets sampled.

use ballistics_core::{units, windage, Wind};
use ballistics_models::{DragError, DragFunction};
use log::debug;

use crate::step::{IntegrationState, Phase, Stepper};
use crate::{positive, Load, Shot, SolverError};

/// Tuning of the tabulator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Row ceiling: stop once more than this many yards are tabulated.
    pub max_rows: usize,
    /// Stop once `|vy| > near_vertical_ratio * |vx|`.
    pub near_vertical_ratio: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { max_rows: 50_001, near_vertical_ratio: 3.0 }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        positive("near_vertical_ratio", self.near_vertical_ratio)
    }
}

/// One row of the table.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionRecord {
    /// Whole-yard boundary this row was sampled at.
    pub range_yd: f64,
    /// Height relative to the line of sight [in].
    pub path_in: f64,
    /// Sight correction [MOA], small-angle `-(y/x)`.
    pub correction_moa: f64,
    pub time_s: f64,
    /// Crosswind drift [in].
    pub windage_in: f64,
    /// Current speed [fps].
    pub velocity_fps: f64,
    pub velocity_x_fps: f64,
    pub velocity_y_fps: f64,
    /// Nominal muzzle velocity of the run [fps].
    pub muzzle_velocity_fps: f64,
}

/// The full table plus why it stopped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    pub records: Vec<SolutionRecord>,
    pub termination: Phase,
}

impl Trajectory {
    /// Number of rows; valid ranges are `0..max_valid_range()` yards.
    pub fn max_valid_range(&self) -> usize {
        self.records.len()
    }

    /// Row for `range_yd` yards, if the trajectory got that far.
    pub fn record_at(&self, range_yd: usize) -> Option<&SolutionRecord> {
        self.records.get(range_yd)
    }

    /// True when the row ceiling, not the trajectory, ended the table.
    pub fn is_truncated(&self) -> bool {
        self.termination == Phase::RangeLimitReached
    }
}

/// Tabulate with the default ceiling. Angles in degrees, wind in mph.
#[allow(clippy::too_many_arguments)]
pub fn tabulate(
    drag_function: DragFunction,
    drag_coefficient: f64,
    vi: f64,
    sight_height: f64,
    shooting_angle: f64,
    zero_angle: f64,
    wind_speed: f64,
    wind_angle: f64,
) -> Result<Trajectory, SolverError> {
    solve_table(
        &Load::new(drag_function, drag_coefficient, vi, sight_height),
        &Shot {
            shooting_angle_deg: shooting_angle,
            zero_angle_deg: zero_angle,
            wind: Wind::new(wind_speed, wind_angle),
        },
        &TableConfig::default(),
    )
}

#[allow(clippy::cast_precision_loss)]
pub fn solve_table(load: &Load, shot: &Shot, config: &TableConfig) -> Result<Trajectory, SolverError> {
    load.validate()?;
    shot.validate()?;
    config.validate()?;

    let headwind = units::mph_to_fps(shot.wind.headwind());
    let crosswind = shot.wind.crosswind();
    let tilt = units::deg_to_rad(shot.shooting_angle_deg + shot.zero_angle_deg);

    let stepper = Stepper::new(load, tilt, 0.5).with_headwind(headwind);
    let mut s = IntegrationState::launch(
        load.muzzle_velocity_fps,
        units::deg_to_rad(shot.zero_angle_deg),
        load.sight_height_in,
    );

    let mut records = Vec::new();
    let mut n = 0usize;
    let termination = loop {
        let kick = match stepper.kick(&mut s) {
            Ok(kick) => kick,
            Err(DragError::VelocityOutOfDomain { velocity, .. }) => {
                break Phase::OutOfDragDomain { velocity };
            }
            Err(e) => return Err(e.into()),
        };
        s.t += kick.dt;

        if units::feet_to_yards(s.pos.x) >= n as f64 {
            records.push(record(n as f64, &s, load.muzzle_velocity_fps, crosswind));
            n += 1;
        }

        stepper.drift(&mut s, kick);

        let phase = transition(&s, n, config);
        if phase.is_terminal() {
            break phase;
        }
    };

    debug!(
        "tabulated {} rows ({:?}) for {} bc={} vi={}",
        records.len(),
        termination,
        load.drag_function,
        load.drag_coefficient,
        load.muzzle_velocity_fps
    );
    Ok(Trajectory { records, termination })
}

fn transition(s: &IntegrationState, rows: usize, config: &TableConfig) -> Phase {
    if s.vel.y.abs() > (config.near_vertical_ratio * s.vel.x).abs() {
        Phase::NearVertical
    } else if rows > config.max_rows {
        Phase::RangeLimitReached
    } else {
        Phase::Advancing
    }
}

fn record(range_yd: f64, s: &IntegrationState, vi: f64, crosswind: f64) -> SolutionRecord {
    let (x, y) = (s.pos.x, s.pos.y);
    // Drop angle is undefined at the muzzle.
    let correction_moa = if x > 0.0 { -units::rad_to_moa(y / x) } else { 0.0 };
    SolutionRecord {
        range_yd,
        path_in: units::feet_to_inches(y),
        correction_moa,
        time_s: s.t,
        windage_in: windage(crosswind, vi, x, s.t),
        velocity_fps: s.speed(),
        velocity_x_fps: s.vel.x,
        velocity_y_fps: s.vel.y,
        muzzle_velocity_fps: vi,
    }
}
