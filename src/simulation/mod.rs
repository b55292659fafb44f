//! Single-lane highway simulation
//!
//! This module contains the simulation engine: vehicle kinematics, the
//! roadway that orders and links vehicles, and the simulation that times
//! spawns. It has no knowledge of how the state is displayed.

mod experiment;
mod params;
mod report;
mod roadway;
mod stats;
mod types;
mod vehicle;

pub use experiment::Simulation;
pub use params::SimParams;
pub use roadway::{Roadway, TickReport};
pub use stats::SimStats;
pub use types::{
    Dynamics, Status, VehicleId, CRASH_DURATION, DEFAULT_DT, NEXT_CRASH_DURATION,
    REMOVAL_THRESHOLD, ROAD_LENGTH, SAFE_GAP_LENGTHS, SPAWN_CLEARANCE, SPAWN_POSITION,
    SPEED_SCALE, TICKS_PER_SECOND, VEHICLE_LENGTH,
};
pub use vehicle::{StepOutcome, Vehicle, VehicleAttributes};
