//! Per-vehicle configuration and fleet-wide tuning constants.
//!
//! `VehicleConfig` is copied into each vehicle at spawn time; a vehicle's
//! copy may diverge from the fleet default through targeted updates.  All
//! mutation goes through [`VehicleConfig::set`], which range-checks values so
//! the kinematics never see a zero deceleration or a negative speed cap.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Ticks a vehicle waits before attempting recovery (≈1 s at 60 ticks/s).
pub const RETRY_INTERVAL: u32 = 60;

/// Retry budget before the detour rank advances.
pub const MAX_RETRIES_PER_RANK: u32 = 3;

// ── ConfigKey ─────────────────────────────────────────────────────────────────

/// The tunable fields of a [`VehicleConfig`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigKey {
    MaxSpeed,
    Acceleration,
    Deceleration,
    SafetyDistance,
    HardBorrowLength,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigKey::MaxSpeed => "maxSpeed",
            ConfigKey::Acceleration => "acceleration",
            ConfigKey::Deceleration => "deceleration",
            ConfigKey::SafetyDistance => "safetyDistance",
            ConfigKey::HardBorrowLength => "hardBorrowLength",
        };
        f.write_str(name)
    }
}

// ── VehicleConfig ─────────────────────────────────────────────────────────────

/// Kinematic and arbitration tuning for one vehicle.
///
/// Units: speeds in px/tick, accelerations in px/tick², distances in px.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleConfig {
    /// Cruise speed cap.
    pub max_speed: f64,
    /// Speed gained per tick while below the target speed.
    pub acceleration: f64,
    /// Speed shed per tick while braking.
    pub deceleration: f64,
    /// Front-sensor radius for arbitration rule checks.
    pub safety_distance: f64,
    /// How many upcoming path nodes the vehicle leases.  0 disables leasing.
    pub hard_borrow_length: usize,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.4,
            acceleration: 0.10,
            deceleration: 0.15,
            safety_distance: 35.0,
            hard_borrow_length: 1,
        }
    }
}

impl VehicleConfig {
    /// Update one field, validating the value's range.
    ///
    /// `HardBorrowLength` must be an integer in `0..=5`; the float is
    /// rejected if it carries a fractional part.
    pub fn set(&mut self, key: ConfigKey, value: f64) -> CoreResult<()> {
        let invalid = || CoreError::InvalidConfigValue { key, value };
        match key {
            ConfigKey::MaxSpeed => {
                if !(value > 0.0 && value <= 20.0) {
                    return Err(invalid());
                }
                self.max_speed = value;
            }
            ConfigKey::Acceleration => {
                if !(value > 0.0 && value <= 5.0) {
                    return Err(invalid());
                }
                self.acceleration = value;
            }
            ConfigKey::Deceleration => {
                if !(value > 0.0 && value <= 5.0) {
                    return Err(invalid());
                }
                self.deceleration = value;
            }
            ConfigKey::SafetyDistance => {
                if !(0.0..=500.0).contains(&value) {
                    return Err(invalid());
                }
                self.safety_distance = value;
            }
            ConfigKey::HardBorrowLength => {
                if value.fract() != 0.0 || !(0.0..=5.0).contains(&value) {
                    return Err(invalid());
                }
                self.hard_borrow_length = value as usize;
            }
        }
        Ok(())
    }

    /// Read one field as `f64` (the unit used by the command interface).
    pub fn get(&self, key: ConfigKey) -> f64 {
        match key {
            ConfigKey::MaxSpeed => self.max_speed,
            ConfigKey::Acceleration => self.acceleration,
            ConfigKey::Deceleration => self.deceleration,
            ConfigKey::SafetyDistance => self.safety_distance,
            ConfigKey::HardBorrowLength => self.hard_borrow_length as f64,
        }
    }
}
