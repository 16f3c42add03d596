//! JSON scenario documents: load + zero + conditions in one file.
//!
//! ```json
//! {
//!   "load": { "drag_function": "G1", "drag_coefficient": 0.5,
//!             "muzzle_velocity_fps": 2800.0, "sight_height_in": 1.5 },
//!   "zero": { "range_yd": 100.0 },
//!   "wind": { "speed_mph": 10.0, "angle_deg": 90.0 },
//!   "atmosphere": { "altitude_ft": 5000.0, "barometer_inhg": 24.9,
//!                   "temperature_f": 41.0, "relative_humidity": 0.5 }
//! }
//! ```
//!
//! Everything but `load` and `zero` is optional.

use ballistics_core::{Atmosphere, Wind};
use serde::{Deserialize, Serialize};

use crate::{
    solve_table, solve_zero, Load, Shot, SolverError, TableConfig, Trajectory, ZeroSearchConfig,
    ZeroSolution, ZeroTarget,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotConfig {
    pub load: Load,
    pub zero: ZeroTarget,
    #[serde(default)]
    pub shooting_angle_deg: f64,
    #[serde(default)]
    pub wind: Wind,
    /// When present, the load's coefficient is corrected for it before solving.
    #[serde(default)]
    pub atmosphere: Option<Atmosphere>,
    #[serde(default)]
    pub zero_search: ZeroSearchConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl ShotConfig {
    pub fn from_json_str(s: &str) -> Result<Self, SolverError> {
        serde_json::from_str(s).map_err(|e| SolverError::Config(e.to_string()))
    }

    /// The load as the solvers see it.
    pub fn effective_load(&self) -> Load {
        match self.atmosphere {
            Some(atmos) => Load { drag_coefficient: atmos.correct(self.load.drag_coefficient), ..self.load },
            None => self.load,
        }
    }

    /// Zero the load, then tabulate with the resulting angle.
    ///
    /// The zero is always solved level and in still air; the shooting angle
    /// and wind only apply to the table.
    pub fn solve(&self) -> Result<(ZeroSolution, Trajectory), SolverError> {
        let load = self.effective_load();
        let zero = solve_zero(&load, &self.zero, &self.zero_search)?;
        let shot = Shot {
            shooting_angle_deg: self.shooting_angle_deg,
            zero_angle_deg: zero.angle_deg,
            wind: self.wind,
        };
        let table = solve_table(&load, &shot, &self.table)?;
        Ok((zero, table))
    }
}
