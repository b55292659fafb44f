//! Core types for the highway simulation

/// A unique identifier for a vehicle on the roadway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Driving state of a vehicle, as reported to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Holding its current speed
    Constant,
    /// Speeding up toward its target
    Accelerating,
    /// Slowing down, or held at zero by a delay
    Slowing,
    /// Stopped after a collision until its crash timer runs out
    Crashed,
}

impl Status {
    /// Single character used by the text road strip
    pub fn glyph(self) -> char {
        match self {
            Status::Constant => '=',
            Status::Accelerating => '>',
            Status::Slowing => '<',
            Status::Crashed => 'X',
        }
    }
}

/// Acceleration and deceleration coefficients captured by a vehicle at spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    pub accel_coef: f32,
    pub decel_coef: f32,
}

/// Length of every vehicle in road units
pub const VEHICLE_LENGTH: f32 = 5.0;

/// Safe gap expressed in vehicle lengths
pub const SAFE_GAP_LENGTHS: f32 = 3.0;

/// Crash hold for the vehicle that ran into the one ahead, in ticks
pub const CRASH_DURATION: u32 = 1000;

/// Crash hold for the vehicle that was hit, in ticks
pub const NEXT_CRASH_DURATION: u32 = CRASH_DURATION + 200;

/// Drawn spawn speeds are divided by this before use
pub const SPEED_SCALE: f32 = 2.0;

/// Visible length of the road (1200 px scene at 8 px per unit)
pub const ROAD_LENGTH: f32 = 1200.0 / 8.0;

/// Vehicles at or beyond this position leave the road
pub const REMOVAL_THRESHOLD: f32 = ROAD_LENGTH;

/// The rearmost vehicle must be past this position before another spawns
pub const SPAWN_CLEARANCE: f32 = SAFE_GAP_LENGTHS * VEHICLE_LENGTH;

/// Rear bumper position of a freshly spawned vehicle, behind the visible road
pub const SPAWN_POSITION: f32 = -SPAWN_CLEARANCE;

/// Ticks per simulated second at the default time step
pub const TICKS_PER_SECOND: u32 = 1000;

/// Default time step in seconds
pub const DEFAULT_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
