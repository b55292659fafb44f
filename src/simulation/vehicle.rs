//! Vehicle kinematics for the highway simulation
//!
//! Each vehicle is a small state machine advanced once per tick. It only ever
//! looks at the vehicle directly ahead of it, which the roadway hands in.

use super::types::{
    Dynamics, Status, VehicleId, CRASH_DURATION, NEXT_CRASH_DURATION, SAFE_GAP_LENGTHS,
    SPAWN_POSITION, VEHICLE_LENGTH,
};

/// What happened to a vehicle during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Position was integrated (possibly by zero)
    Moved,
    /// Stayed in place: delayed, or still crashed
    Held,
    /// Ran into the vehicle ahead this tick
    Crashed,
    /// Left the crashed state this tick
    Recovered,
}

/// The attributes a vehicle starts out with
#[derive(Debug, Clone, Copy)]
pub struct VehicleAttributes {
    /// Rear bumper position
    pub position: f32,
    /// Desired cruising speed, already scaled to road units
    pub initial_speed: f32,
    /// Speed at creation
    pub current_speed: f32,
    pub dynamics: Dynamics,
}

impl VehicleAttributes {
    /// Attributes for a vehicle entering behind the visible road at its cruising speed
    pub fn spawned(initial_speed: f32, dynamics: Dynamics) -> Self {
        Self {
            position: SPAWN_POSITION,
            initial_speed,
            current_speed: initial_speed,
            dynamics,
        }
    }
}

/// A vehicle on the highway
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    status: Status,
    initial_speed: f32,
    current_speed: f32,
    target_speed: f32,
    /// Rear bumper
    position: f32,
    length: f32,
    delay_remaining: u32,
    crash_timer: u32,
    dynamics: Dynamics,
    /// Index of the vehicle ahead in the roadway, refreshed every tick
    ahead: Option<usize>,
}

impl Vehicle {
    pub fn new(id: VehicleId, attributes: &VehicleAttributes) -> Self {
        let initial_speed = attributes.initial_speed.max(0.0);
        Self {
            id,
            status: Status::Constant,
            initial_speed,
            current_speed: attributes.current_speed.max(0.0),
            target_speed: initial_speed,
            position: attributes.position,
            length: VEHICLE_LENGTH,
            delay_remaining: 0,
            crash_timer: 0,
            dynamics: attributes.dynamics,
            ahead: None,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Position of the rear bumper
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Position of the front edge
    pub fn front(&self) -> f32 {
        self.position + self.length
    }

    pub fn speed(&self) -> f32 {
        self.current_speed
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn initial_speed(&self) -> f32 {
        self.initial_speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn delay_remaining(&self) -> u32 {
        self.delay_remaining
    }

    pub fn crash_timer(&self) -> u32 {
        self.crash_timer
    }

    pub fn dynamics(&self) -> Dynamics {
        self.dynamics
    }

    /// Roadway index of the vehicle ahead, as linked on the last tick
    pub fn ahead(&self) -> Option<usize> {
        self.ahead
    }

    pub(crate) fn link_ahead(&mut self, ahead: Option<usize>) {
        self.ahead = ahead;
    }

    fn safe_gap(&self) -> f32 {
        SAFE_GAP_LENGTHS * self.length
    }

    /// Hold the vehicle at zero speed for `ticks` steps, starting on the next step
    pub fn delay(&mut self, ticks: u32) {
        self.target_speed = 0.0;
        self.delay_remaining = ticks;
    }

    /// Advance the vehicle by one tick.
    ///
    /// `ahead` is the vehicle directly in front, if any. It is borrowed mutably
    /// because a collision crashes both vehicles.
    pub fn step(&mut self, dt: f32, ahead: Option<&mut Vehicle>) -> StepOutcome {
        if self.status == Status::Crashed {
            return self.step_crashed(ahead.as_deref());
        }

        if self.delay_remaining > 0 {
            self.current_speed = 0.0;
            self.delay_remaining -= 1;
            self.status = Status::Slowing;
            return StepOutcome::Held;
        }

        match ahead.as_deref() {
            Some(next) if next.position - self.front() < self.safe_gap() => {
                self.follow(next.current_speed, dt)
            }
            _ => self.cruise(dt),
        }

        if let Some(next) = ahead {
            // Bodies that overlapped at the end of the last tick crash now
            if self.front() > next.position {
                self.crash(CRASH_DURATION);
                if next.status != Status::Crashed {
                    next.crash(NEXT_CRASH_DURATION);
                }
                return StepOutcome::Crashed;
            }
        }

        self.position += self.current_speed * dt;
        StepOutcome::Moved
    }

    /// The timer counts down first; recovery is only considered on a step that
    /// begins with the timer already at zero.
    fn step_crashed(&mut self, ahead: Option<&Vehicle>) -> StepOutcome {
        if self.crash_timer > 0 {
            self.crash_timer -= 1;
            return StepOutcome::Held;
        }

        let path_clear = match ahead {
            None => true,
            Some(next) => next.status != Status::Crashed && self.front() < next.position,
        };
        if !path_clear {
            return StepOutcome::Held;
        }

        self.current_speed = 0.0;
        self.status = Status::Accelerating;
        StepOutcome::Recovered
    }

    /// Match the speed of a vehicle that is closer than the safe gap
    fn follow(&mut self, lead_speed: f32, dt: f32) {
        self.target_speed = lead_speed;
        if self.current_speed > lead_speed {
            let slowed = self.current_speed - self.dynamics.decel_coef * dt;
            self.current_speed = slowed.max(lead_speed);
            self.status = Status::Slowing;
        } else if self.current_speed < lead_speed {
            let sped_up = self.current_speed + self.dynamics.accel_coef / 2.0 * dt;
            self.current_speed = sped_up.min(lead_speed);
            self.status = Status::Accelerating;
        } else {
            self.status = Status::Constant;
        }
    }

    /// Head back toward the cruising speed on an open road
    fn cruise(&mut self, dt: f32) {
        self.target_speed = self.initial_speed;
        if self.current_speed < self.initial_speed {
            let sped_up = self.current_speed + self.dynamics.accel_coef * dt;
            self.current_speed = sped_up.min(self.initial_speed);
            self.status = Status::Accelerating;
        } else {
            self.current_speed = self.initial_speed;
            self.status = Status::Constant;
        }
    }

    fn crash(&mut self, ticks: u32) {
        self.status = Status::Crashed;
        self.current_speed = 0.0;
        self.crash_timer = ticks;
    }
}
