//! Core ballistics math utilities
//!
//! Includes:
//! - Units & conversions (angles, imperial lengths and speeds)
//! - Atmospheric correction of a ballistic coefficient
//! - Wind representation and windage deflection
//!
//! Everything here is closed-form: no iteration, no failure modes.

use serde::{Deserialize, Serialize};

/// -------------------------
/// Units & Conversions
/// -------------------------

pub mod units {
    /// Radians per degree.
    pub const RAD_PER_DEG: f64 = 0.017_453_292_519_943_295;
    /// Degrees per radian.
    pub const DEG_PER_RAD: f64 = 57.295_779_513_082_32;
    /// Radians per angular minute.
    pub const RAD_PER_MOA: f64 = 0.000_290_888_208_665_721_6;
    /// Angular minutes per radian.
    pub const MOA_PER_RAD: f64 = 3_437.746_770_784_939;

    pub fn deg_to_rad(deg: f64) -> f64 { deg * RAD_PER_DEG }
    pub fn rad_to_deg(rad: f64) -> f64 { rad * DEG_PER_RAD }

    pub fn deg_to_moa(deg: f64) -> f64 { deg * 60.0 }
    pub fn moa_to_deg(moa: f64) -> f64 { moa / 60.0 }

    pub fn moa_to_rad(moa: f64) -> f64 { moa * RAD_PER_MOA }
    pub fn rad_to_moa(rad: f64) -> f64 { rad * MOA_PER_RAD }

    pub fn mil_to_moa(mil: f64) -> f64 { mil * 3.437_746_770_784_939 }
    pub fn moa_to_mil(moa: f64) -> f64 { moa / 3.437_746_770_784_939 }

    pub fn yards_to_feet(yd: f64) -> f64 { yd * 3.0 }
    pub fn feet_to_yards(ft: f64) -> f64 { ft / 3.0 }

    pub fn inches_to_feet(inches: f64) -> f64 { inches / 12.0 }
    pub fn feet_to_inches(ft: f64) -> f64 { ft * 12.0 }

    /// Miles per hour to feet per second.
    pub fn mph_to_fps(mph: f64) -> f64 { mph * 5280.0 / 3600.0 }
    /// Miles per hour to inches per second.
    pub fn mph_to_ips(mph: f64) -> f64 { mph * 17.60 }
}

/// -------------------------
/// Atmosphere
/// -------------------------

/// Shooter environment in the units the correction formula is fitted in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub altitude_ft: f64,
    /// Station-reported ("standardized") pressure, not absolute.
    pub barometer_inhg: f64,
    pub temperature_f: f64,
    /// Relative humidity as a fraction, 0.0 ..= 1.0.
    pub relative_humidity: f64,
}

impl Atmosphere {
    /// Standard conditions: sea level, 29.53 inHg, 59°F, 78% RH.
    pub fn standard() -> Self {
        Self {
            altitude_ft: 0.0,
            barometer_inhg: 29.53,
            temperature_f: 59.0,
            relative_humidity: 0.78,
        }
    }

    /// Correct a standard-conditions drag coefficient for this atmosphere.
    pub fn correct(&self, drag_coefficient: f64) -> f64 {
        atmospheric_correction(
            drag_coefficient,
            self.altitude_ft,
            self.barometer_inhg,
            self.temperature_f,
            self.relative_humidity,
        )
    }
}

impl Default for Atmosphere {
    fn default() -> Self { Self::standard() }
}

/// Corrects a "standard" drag coefficient for differing atmospheric conditions.
///
/// # Arguments
/// * `altitude` - feet above sea level
/// * `barometer` - standardized pressure [inHg]
/// * `temperature` - [°F]
/// * `humidity` - relative humidity fraction (0.5 = 50%)
pub fn atmospheric_correction(
    drag_coefficient: f64,
    altitude: f64,
    barometer: f64,
    temperature: f64,
    humidity: f64,
) -> f64 {
    let fa = altitude_factor(altitude);
    let ft = temperature_factor(temperature, altitude);
    let fr = humidity_factor(temperature, barometer, humidity);
    let fp = pressure_factor(barometer);

    drag_coefficient * (fa * (1.0 + ft - fp) * fr)
}

fn humidity_factor(temperature: f64, pressure: f64, humidity: f64) -> f64 {
    // Water vapor pressure fit [inHg]
    let vpw = 4e-6 * temperature.powi(3) - 0.0004 * temperature.powi(2) + 0.0234 * temperature
        - 0.2517;
    0.995 * (pressure / (pressure - 0.3783 * humidity * vpw))
}

fn pressure_factor(pressure: f64) -> f64 {
    const P_STD: f64 = 29.53; // inHg
    (pressure - P_STD) / P_STD
}

fn temperature_factor(temperature: f64, altitude: f64) -> f64 {
    let t_std = -0.0036 * altitude + 59.0;
    (temperature - t_std) / (459.6 + t_std)
}

fn altitude_factor(altitude: f64) -> f64 {
    let fa = -4e-15 * altitude.powi(3) + 4e-10 * altitude.powi(2) - 3e-5 * altitude + 1.0;
    1.0 / fa
}

/// -------------------------
/// Wind
/// -------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mph: f64,
    /// Direction the wind comes FROM: 0° = headwind, 90° = right→left,
    /// 180° = tailwind, 270° (or -90°) = left→right.
    pub angle_deg: f64,
}

impl Wind {
    pub fn new(speed_mph: f64, angle_deg: f64) -> Self {
        Self { speed_mph, angle_deg }
    }

    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Resolve into headwind/tailwind component [mph], headwind positive.
    pub fn headwind(&self) -> f64 {
        headwind(self.speed_mph, self.angle_deg)
    }

    /// Resolve into crosswind component [mph], right→left positive.
    pub fn crosswind(&self) -> f64 {
        crosswind(self.speed_mph, self.angle_deg)
    }
}

impl Default for Wind {
    fn default() -> Self { Self::calm() }
}

pub fn headwind(speed: f64, angle_deg: f64) -> f64 {
    units::deg_to_rad(angle_deg).cos() * speed
}

pub fn crosswind(speed: f64, angle_deg: f64) -> f64 {
    units::deg_to_rad(angle_deg).sin() * speed
}

/// Windage deflection [in] for a crosswind at a given range.
///
/// Lag-time rule: drift is the crosswind speed times the difference between
/// the actual time of flight and the vacuum time `range / vi`.
///
/// # Arguments
/// * `crosswind_mph` - crosswind component [mph]
/// * `vi` - muzzle velocity [ft/s]
/// * `range_ft` - range at which windage is wanted [ft]
/// * `time` - time of flight to that range [s]
pub fn windage(crosswind_mph: f64, vi: f64, range_ft: f64, time: f64) -> f64 {
    let vw = units::mph_to_ips(crosswind_mph);
    vw * (time - range_ft / vi)
}

/* -------------------------------- tests -------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn angle_conversions_match_pi() {
        assert_relative_eq!(units::deg_to_rad(180.0), PI, max_relative = 1e-14);
        assert_relative_eq!(units::rad_to_deg(PI), 180.0, max_relative = 1e-14);
        assert_relative_eq!(units::moa_to_rad(60.0), PI / 180.0, max_relative = 1e-14);
        assert_relative_eq!(units::rad_to_moa(PI / 180.0), 60.0, max_relative = 1e-12);
        assert_relative_eq!(units::deg_to_moa(1.5), 90.0);
        assert_relative_eq!(units::moa_to_deg(90.0), 1.5);
    }

    #[test]
    fn mil_moa_round_trip() {
        assert_relative_eq!(units::moa_to_mil(units::mil_to_moa(2.5)), 2.5, max_relative = 1e-12);
    }

    #[test]
    fn speed_conversions() {
        assert_relative_eq!(units::mph_to_fps(60.0), 88.0, max_relative = 1e-12);
        assert_relative_eq!(units::mph_to_ips(10.0), 176.0, max_relative = 1e-12);
    }

    #[test]
    fn standard_atmosphere_barely_changes_bc() {
        // The fit is not exactly 1.0 at standard conditions (humidity term ~0.995).
        let bc = Atmosphere::standard().correct(0.5);
        assert_relative_eq!(bc, 0.5, max_relative = 0.01);
    }

    #[test]
    fn thin_air_raises_bc() {
        let std = Atmosphere::standard();
        let high = Atmosphere { altitude_ft: 5000.0, barometer_inhg: 24.9, temperature_f: 41.0, ..std };
        assert!(high.correct(0.5) > std.correct(0.5));
    }

    #[test]
    fn wind_components_follow_clock_convention() {
        let head = Wind::new(10.0, 0.0);
        assert_relative_eq!(head.headwind(), 10.0);
        assert!(head.crosswind().abs() < 1e-12);

        let right_to_left = Wind::new(10.0, 90.0);
        assert_relative_eq!(right_to_left.crosswind(), 10.0);
        assert!(right_to_left.headwind().abs() < 1e-12);

        let tail = Wind::new(10.0, 180.0);
        assert_relative_eq!(tail.headwind(), -10.0);

        let left_to_right = Wind::new(10.0, -90.0);
        assert_relative_eq!(left_to_right.crosswind(), -10.0);
        assert_relative_eq!(Wind::new(10.0, 270.0).crosswind(), -10.0, max_relative = 1e-12);
    }

    #[test]
    fn windage_is_lag_time_times_wind() {
        // 300 ft at 3000 fps is 0.1 s in vacuum; 0.02 s lag at 10 mph (176 in/s).
        assert_relative_eq!(windage(10.0, 3000.0, 300.0, 0.12), 176.0 * 0.02, max_relative = 1e-9);
        assert_eq!(windage(0.0, 3000.0, 300.0, 0.12), 0.0);
    }

    #[test]
    fn atmosphere_json_round_trip() {
        let a = Atmosphere { altitude_ft: 1200.0, ..Atmosphere::standard() };
        let s = serde_json::to_string(&a).unwrap();
        let back: Atmosphere = serde_json::from_str(&s).unwrap();
        assert_eq!(a, back);
    }
}
