//! Tunable simulation parameters

use anyhow::{bail, Result};

use super::types::Dynamics;

/// Parameters read when spawning vehicles and timing spawns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Lower bound of the drawn spawn speed, before speed scaling
    pub min_speed: f32,
    /// Upper bound of the drawn spawn speed, before speed scaling
    pub max_speed: f32,
    /// Shortest wait between spawn attempts, in ticks
    pub min_spawn_interval: i32,
    /// Longest wait between spawn attempts, in ticks
    pub max_spawn_interval: i32,
    pub accel_coef: f32,
    pub decel_coef: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            min_speed: 30.0,
            max_speed: 50.0,
            min_spawn_interval: 20,
            max_spawn_interval: 40,
            accel_coef: 10.0,
            decel_coef: 10.0,
        }
    }
}

impl SimParams {
    /// Coefficients handed to newly spawned vehicles
    pub fn dynamics(&self) -> Dynamics {
        Dynamics {
            accel_coef: self.accel_coef,
            decel_coef: self.decel_coef,
        }
    }

    /// Check the ranges before handing parameters to a simulation
    pub fn validate(&self) -> Result<()> {
        if !(self.min_speed.is_finite() && self.max_speed.is_finite()) {
            bail!("Speed bounds must be finite numbers");
        }
        if self.min_speed < 0.0 {
            bail!("Minimum speed must not be negative (got {})", self.min_speed);
        }
        if self.min_speed > self.max_speed {
            bail!(
                "Minimum speed {} is greater than maximum speed {}",
                self.min_speed,
                self.max_speed
            );
        }
        if self.min_spawn_interval < 1 {
            bail!(
                "Minimum spawn interval must be at least one tick (got {})",
                self.min_spawn_interval
            );
        }
        if self.min_spawn_interval > self.max_spawn_interval {
            bail!(
                "Minimum spawn interval {} is greater than maximum spawn interval {}",
                self.min_spawn_interval,
                self.max_spawn_interval
            );
        }
        for (name, value) in [("Acceleration", self.accel_coef), ("Deceleration", self.decel_coef)] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} coefficient must be a positive number (got {})", name, value);
            }
        }
        Ok(())
    }
}
