//! The simulation that ties the roadway, parameters and spawn timing together
//!
//! This is the entry point for driving the highway one tick at a time.

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::params::SimParams;
use super::roadway::{Roadway, TickReport};
use super::stats::SimStats;
use super::types::VehicleId;

/// A highway experiment
pub struct Simulation {
    roadway: Roadway,
    params: SimParams,
    /// Ticks until the next spawn attempt
    spawn_countdown: i32,
    rng: StdRng,
    stats: SimStats,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimParams::default())
    }
}

impl Simulation {
    fn new_internal(params: SimParams, rng: StdRng) -> Self {
        Self {
            roadway: Roadway::new(),
            params,
            spawn_countdown: 0,
            rng,
            stats: SimStats::default(),
        }
    }

    /// Create a simulation seeded from the operating system
    pub fn new(params: SimParams) -> Self {
        Self::new_internal(params, StdRng::from_os_rng())
    }

    /// Create a simulation with a seeded RNG for reproducible runs
    pub fn with_seed(params: SimParams, seed: u64) -> Self {
        Self::new_internal(params, StdRng::seed_from_u64(seed))
    }

    pub fn roadway(&self) -> &Roadway {
        &self.roadway
    }

    pub fn roadway_mut(&mut self) -> &mut Roadway {
        &mut self.roadway
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn spawn_countdown(&self) -> i32 {
        self.spawn_countdown
    }

    pub fn set_spawn_countdown(&mut self, ticks: i32) {
        self.spawn_countdown = ticks;
    }

    /// Replace every parameter at once.
    ///
    /// Vehicles already on the road keep the coefficients they were spawned with.
    pub fn set_parameters(
        &mut self,
        min_speed: f32,
        max_speed: f32,
        min_spawn_interval: i32,
        max_spawn_interval: i32,
        accel_coef: f32,
        decel_coef: f32,
    ) {
        self.set_params(SimParams {
            min_speed,
            max_speed,
            min_spawn_interval,
            max_spawn_interval,
            accel_coef,
            decel_coef,
        });
    }

    pub fn set_params(&mut self, params: SimParams) {
        self.params = params;
    }

    /// Hold a vehicle at zero speed for `ticks` steps.
    /// Returns `false` if the vehicle is no longer on the road.
    pub fn delay_vehicle(&mut self, id: VehicleId, ticks: u32) -> bool {
        match self.roadway.vehicle_mut(id) {
            Some(vehicle) => {
                vehicle.delay(ticks);
                true
            }
            None => false,
        }
    }

    /// Remove every vehicle from the road
    pub fn clear(&mut self) {
        self.roadway.clear();
    }

    /// Main simulation tick
    pub fn step(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("Ignoring invalid time step {}, using 0", dt);
            0.0
        };

        // Counted in ticks, independent of dt
        self.spawn_countdown -= 1;

        let spawn_due = self.spawn_countdown <= 0;
        let report = self
            .roadway
            .step(dt, spawn_due, &self.params, &mut self.rng);

        if self.spawn_countdown <= 0 {
            self.spawn_countdown = self
                .rng
                .random_range(self.params.min_spawn_interval..=self.params.max_spawn_interval);
        }

        self.stats.record(dt, &report);
        report
    }
}
